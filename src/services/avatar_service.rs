use crate::config::AppConfig;
use crate::entities::avatars;
use crate::models::{AvatarContent, AvatarDto};
use crate::services::content_store::{ContentReader, ContentStore, ContentWriter};
use crate::services::error::{ServiceError, StorageError};
use crate::stores::{AvatarStore, StudentStore};
use crate::utils::filename::{avatar_key, sanitize_filename};
use chrono::Utc;
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use std::io::ErrorKind;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Avatar ingestion and retrieval.
///
/// An upload writes the file to the content store first and then upserts the
/// metadata row in its own transaction. The two steps are not atomic: a
/// failure between them leaves a file with no metadata, and a new extension
/// for the same student leaves the previous file behind.
pub struct AvatarService {
    db: DatabaseConnection,
    storage: Arc<dyn ContentStore>,
    max_avatar_size: usize,
    io_buffer_size: usize,
}

impl AvatarService {
    pub fn new(db: DatabaseConnection, storage: Arc<dyn ContentStore>, config: &AppConfig) -> Self {
        Self {
            db,
            storage,
            max_avatar_size: config.max_avatar_size,
            io_buffer_size: config.io_buffer_size.max(1),
        }
    }

    pub async fn upload(
        &self,
        student_id: i32,
        filename: &str,
        content_type: Option<&str>,
        reader: impl AsyncRead + Unpin + Send,
        declared_size: Option<u64>,
    ) -> Result<AvatarDto, ServiceError> {
        // 1. Student must exist
        if StudentStore::find_by_id(&self.db, student_id).await?.is_none() {
            return Err(ServiceError::StudentNotFound(student_id));
        }

        if let Some(declared) = declared_size
            && declared > self.max_avatar_size as u64
        {
            return Err(ServiceError::AvatarTooLarge {
                limit: self.max_avatar_size,
            });
        }

        // 2. Deterministic key from the student id and the file extension
        let filename = sanitize_filename(filename)?;
        let key = avatar_key(student_id, &filename);

        // 3-4. Fresh file at the key
        self.storage.ensure_namespace().await?;
        if self.storage.delete_if_exists(&key).await? {
            tracing::debug!("Replacing existing avatar file {}", key);
        }
        let writer = self
            .storage
            .create_exclusive(&key)
            .await
            .map_err(|e| match e.source.kind() {
                ErrorKind::AlreadyExists => {
                    tracing::warn!("Avatar file {} was recreated concurrently", key);
                    ServiceError::ConcurrentWriteConflict { key: key.clone() }
                }
                _ => e.into(),
            })?;

        let location = self.storage.locate(&key);
        let bytes = match self.transfer(reader, writer, &location).await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.discard(&key).await;
                return Err(e);
            }
        };

        if let Some(declared) = declared_size
            && declared != bytes.len() as u64
        {
            tracing::warn!(
                "Declared avatar size {} differs from received {} bytes for student {}",
                declared,
                bytes.len(),
                student_id
            );
        }

        let media_type = content_type
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| sniff_media_type(&bytes));

        // 5. Upsert metadata keyed by student id
        let txn = self.db.begin().await?;
        let mut active = match AvatarStore::find_by_student_id(&txn, student_id).await? {
            Some(existing) => existing.into(),
            None => avatars::ActiveModel {
                student_id: Set(student_id),
                ..Default::default()
            },
        };
        active.file_path = Set(location);
        active.file_size = Set(bytes.len() as i64);
        active.media_type = Set(media_type);
        active.data = Set(Some(bytes));
        active.uploaded_at = Set(Utc::now());

        let saved = AvatarStore::save(&txn, active)
            .await
            .map_err(|e| ServiceError::from_write(e, &key))?;
        txn.commit().await?;

        tracing::info!(
            "Stored avatar for student {} ({} bytes, {})",
            student_id,
            saved.file_size,
            saved.media_type
        );
        Ok(saved.into())
    }

    /// Copies the upload into the content store in `io_buffer_size` chunks,
    /// keeping an inline copy of the bytes.
    async fn transfer(
        &self,
        mut reader: impl AsyncRead + Unpin + Send,
        mut writer: ContentWriter,
        location: &str,
    ) -> Result<Vec<u8>, ServiceError> {
        let mut chunk = vec![0u8; self.io_buffer_size];
        let mut bytes = Vec::new();

        loop {
            let n = reader.read(&mut chunk).await.map_err(|e| {
                ServiceError::InvalidInput(format!("Failed to read upload stream: {}", e))
            })?;
            if n == 0 {
                break;
            }
            if bytes.len() + n > self.max_avatar_size {
                return Err(ServiceError::AvatarTooLarge {
                    limit: self.max_avatar_size,
                });
            }
            writer
                .write_all(&chunk[..n])
                .await
                .map_err(|e| StorageError::new(location, e))?;
            bytes.extend_from_slice(&chunk[..n]);
        }

        writer
            .shutdown()
            .await
            .map_err(|e| StorageError::new(location, e))?;
        Ok(bytes)
    }

    async fn discard(&self, key: &str) {
        if let Err(e) = self.storage.delete_if_exists(key).await {
            tracing::error!("Failed to remove partial avatar file: {}", e);
        }
    }

    pub async fn fetch_metadata(&self, student_id: i32) -> Result<AvatarDto, ServiceError> {
        self.find_record(student_id).await.map(AvatarDto::from)
    }

    /// Bytes from the metadata record; reads the content store only when the
    /// record has no inline copy.
    pub async fn fetch_bytes_inline(&self, student_id: i32) -> Result<AvatarContent, ServiceError> {
        let record = self.find_record(student_id).await?;
        let bytes = match record.data {
            Some(bytes) => bytes,
            None => {
                let mut reader = self.open(&record.file_path).await?;
                let mut bytes = Vec::new();
                reader
                    .read_to_end(&mut bytes)
                    .await
                    .map_err(|e| StorageError::new(record.file_path.as_str(), e))?;
                bytes
            }
        };

        Ok(AvatarContent {
            size: bytes.len() as i64,
            bytes,
            media_type: record.media_type,
        })
    }

    /// Opens the stored file. A record whose file is gone fails with a
    /// storage error, not `AvatarNotFound`.
    pub async fn fetch_bytes_streamed(
        &self,
        student_id: i32,
    ) -> Result<(AvatarDto, ContentReader), ServiceError> {
        let record = self.find_record(student_id).await?;
        let reader = self.open(&record.file_path).await?;
        Ok((record.into(), reader))
    }

    /// `page_number` is one-based; pages past the end are empty
    pub async fn list_all(
        &self,
        page_number: u64,
        page_size: u64,
    ) -> Result<Vec<AvatarDto>, ServiceError> {
        if page_number < 1 || page_size < 1 {
            return Err(ServiceError::InvalidInput(
                "pageNumber and pageSize must be at least 1".to_string(),
            ));
        }
        let page = AvatarStore::find_page(&self.db, page_number - 1, page_size).await?;
        Ok(page.into_iter().map(AvatarDto::from).collect())
    }

    async fn find_record(&self, student_id: i32) -> Result<avatars::Model, ServiceError> {
        AvatarStore::find_by_student_id(&self.db, student_id)
            .await?
            .ok_or(ServiceError::AvatarNotFound(student_id))
    }

    async fn open(&self, location: &str) -> Result<ContentReader, ServiceError> {
        self.storage.open_read(location).await.map_err(|e| {
            tracing::error!("Avatar file missing or unreadable: {}", e);
            e.into()
        })
    }
}

fn sniff_media_type(bytes: &[u8]) -> String {
    infer::get(bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or(FALLBACK_MEDIA_TYPE)
        .to_string()
}
