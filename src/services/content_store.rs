use crate::services::error::StorageError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncRead, AsyncWrite, BufWriter};

pub type ContentReader = Box<dyn AsyncRead + Unpin + Send>;
pub type ContentWriter = Box<dyn AsyncWrite + Unpin + Send>;

/// Durable byte storage for avatar files, addressed by key.
///
/// Keys are flat names inside a single namespace; `locate` turns a key into
/// the location string persisted in avatar metadata, and `open_read` takes
/// such a location back.
#[async_trait]
pub trait ContentStore: Send + Sync {
    fn locate(&self, key: &str) -> String;
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;
    /// Creates the namespace if it is missing; an existing one is left as is.
    async fn ensure_namespace(&self) -> Result<(), StorageError>;
    /// Returns whether a file was removed.
    async fn delete_if_exists(&self, key: &str) -> Result<bool, StorageError>;
    /// Fails with `AlreadyExists` if the key is taken.
    async fn create_exclusive(&self, key: &str) -> Result<ContentWriter, StorageError>;
    async fn open_read(&self, location: &str) -> Result<ContentReader, StorageError>;
}

/// Filesystem content store rooted at an explicit directory.
#[derive(Debug, Clone)]
pub struct LocalContentStore {
    root: PathBuf,
}

impl LocalContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_of(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl ContentStore for LocalContentStore {
    fn locate(&self, key: &str) -> String {
        self.path_of(key).to_string_lossy().into_owned()
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.path_of(key);
        fs::try_exists(&path)
            .await
            .map_err(|e| StorageError::new(path.to_string_lossy(), e))
    }

    async fn ensure_namespace(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StorageError::new(self.root.to_string_lossy(), e))
    }

    async fn delete_if_exists(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.path_of(key);
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("Removed stored file {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::new(path.to_string_lossy(), e)),
        }
    }

    async fn create_exclusive(&self, key: &str) -> Result<ContentWriter, StorageError> {
        let path = self.path_of(key);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| StorageError::new(path.to_string_lossy(), e))?;
        Ok(Box::new(BufWriter::new(file)))
    }

    async fn open_read(&self, location: &str) -> Result<ContentReader, StorageError> {
        let file = File::open(location)
            .await
            .map_err(|e| StorageError::new(location, e))?;
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_exclusive_create_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalContentStore::new(dir.path().join("avatars"));
        store.ensure_namespace().await.unwrap();
        // second call must not fail on an existing directory
        store.ensure_namespace().await.unwrap();

        let mut writer = store.create_exclusive("1.png").await.unwrap();
        writer.write_all(b"pixels").await.unwrap();
        writer.shutdown().await.unwrap();

        assert!(store.exists("1.png").await.unwrap());
        let err = store.create_exclusive("1.png").await.err().unwrap();
        assert_eq!(err.source.kind(), ErrorKind::AlreadyExists);

        let mut reader = store.open_read(&store.locate("1.png")).await.unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"pixels");
    }

    #[tokio::test]
    async fn test_delete_if_exists_reports_removal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalContentStore::new(dir.path());

        assert!(!store.delete_if_exists("missing.png").await.unwrap());

        let mut writer = store.create_exclusive("2.jpg").await.unwrap();
        writer.shutdown().await.unwrap();
        assert!(store.delete_if_exists("2.jpg").await.unwrap());
        assert!(!store.exists("2.jpg").await.unwrap());
    }

    #[tokio::test]
    async fn test_open_missing_location_carries_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalContentStore::new(dir.path());
        let location = store.locate("ghost.png");

        let err = store.open_read(&location).await.err().unwrap();
        assert_eq!(err.path, location);
        assert_eq!(err.source.kind(), ErrorKind::NotFound);
    }
}
