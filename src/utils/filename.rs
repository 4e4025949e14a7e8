use crate::services::error::ServiceError;
use std::path::Path;

/// Reduces an uploaded filename to its final component and replaces
/// characters that are unsafe in a storage key.
pub fn sanitize_filename(filename: &str) -> Result<String, ServiceError> {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    if filename.contains("..") || filename.contains('\\') {
        tracing::warn!("Suspicious avatar filename received: {}", filename);
    }

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | ';' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = sanitized.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        return Err(ServiceError::InvalidInput(
            "Filename cannot be empty".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}

/// Text after the last '.', or the whole name when there is no dot.
pub fn extension_of(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) => &filename[idx + 1..],
        None => filename,
    }
}

/// Content-store key for a student's avatar, e.g. `7.png`
pub fn avatar_key(student_id: i32, filename: &str) -> String {
    format!("{}.{}", student_id, extension_of(filename))
}
