use std::env;
use std::path::PathBuf;

/// Runtime configuration for the registry service
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Root directory of the avatar content store (default: "avatars")
    pub avatars_dir: PathBuf,

    /// Maximum accepted avatar size in bytes (default: 5 MB)
    pub max_avatar_size: usize,

    /// Chunk size used when transferring avatar streams (default: 8 KB)
    pub io_buffer_size: usize,

    /// Origins allowed by CORS; empty means any origin
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            avatars_dir: PathBuf::from("avatars"),
            max_avatar_size: 5 * 1024 * 1024, // 5 MB
            io_buffer_size: 8 * 1024,
            allowed_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            avatars_dir: env::var("AVATARS_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.avatars_dir),

            max_avatar_size: env::var("MAX_AVATAR_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_avatar_size),

            io_buffer_size: env::var("IO_BUFFER_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|size: &usize| *size > 0)
                .unwrap_or(default.io_buffer_size),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(default.allowed_origins),
        }
    }

    /// Config for local development and tests, storing avatars under `dir`
    pub fn development(dir: impl Into<PathBuf>) -> Self {
        Self {
            avatars_dir: dir.into(),
            max_avatar_size: 1024 * 1024,
            io_buffer_size: 1024,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.avatars_dir, PathBuf::from("avatars"));
        assert_eq!(config.max_avatar_size, 5 * 1024 * 1024);
        assert_eq!(config.io_buffer_size, 8 * 1024);
        assert!(config.allowed_origins.is_empty());
    }

    #[test]
    fn test_development_config() {
        let config = AppConfig::development("/tmp/avatars");
        assert_eq!(config.avatars_dir, PathBuf::from("/tmp/avatars"));
        assert_eq!(config.max_avatar_size, 1024 * 1024);
        assert_eq!(config.allowed_origins.len(), 2);
    }

    #[test]
    fn test_from_env_overrides() {
        unsafe {
            env::set_var("MAX_AVATAR_SIZE", "2048");
            env::set_var("IO_BUFFER_SIZE", "0");
            env::set_var("ALLOWED_ORIGINS", "http://a.test, ,http://b.test");
        }
        let config = AppConfig::from_env();
        unsafe {
            env::remove_var("MAX_AVATAR_SIZE");
            env::remove_var("IO_BUFFER_SIZE");
            env::remove_var("ALLOWED_ORIGINS");
        }
        assert_eq!(config.max_avatar_size, 2048);
        // zero is rejected in favour of the default chunk size
        assert_eq!(config.io_buffer_size, 8 * 1024);
        assert_eq!(
            config.allowed_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }
}
