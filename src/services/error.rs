use sea_orm::{DbErr, SqlErr};
use std::io;
use thiserror::Error;

/// I/O failure against the content store, tagged with the location involved.
#[derive(Error, Debug)]
#[error("storage I/O error at '{path}': {source}")]
pub struct StorageError {
    pub path: String,
    #[source]
    pub source: io::Error,
}

impl StorageError {
    pub fn new(path: impl Into<String>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// Which lookup failed for a not-found error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundKind {
    Student,
    FacultyId,
    FacultyName,
    Avatar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound(NotFoundKind),
    Storage,
    Conflict,
    Validation,
    PayloadTooLarge,
    Internal,
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Student with id {0} not found")]
    StudentNotFound(i32),

    #[error("Faculty with id {0} not found")]
    FacultyNotFound(i32),

    #[error("Faculty named '{0}' not found")]
    FacultyNameNotFound(String),

    #[error("Student with id {0} has no avatar")]
    AvatarNotFound(i32),

    #[error("Faculty with id {0} still has students assigned")]
    FacultyInUse(i32),

    #[error(transparent)]
    StorageIo(#[from] StorageError),

    #[error("Concurrent write detected for '{key}'")]
    ConcurrentWriteConflict { key: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Avatar exceeds the maximum allowed size of {limit} bytes")]
    AvatarTooLarge { limit: usize },

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::StudentNotFound(_) => ErrorKind::NotFound(NotFoundKind::Student),
            ServiceError::FacultyNotFound(_) => ErrorKind::NotFound(NotFoundKind::FacultyId),
            ServiceError::FacultyNameNotFound(_) => {
                ErrorKind::NotFound(NotFoundKind::FacultyName)
            }
            ServiceError::AvatarNotFound(_) => ErrorKind::NotFound(NotFoundKind::Avatar),
            ServiceError::StorageIo(_) => ErrorKind::Storage,
            ServiceError::FacultyInUse(_) | ServiceError::ConcurrentWriteConflict { .. } => {
                ErrorKind::Conflict
            }
            ServiceError::InvalidInput(_) => ErrorKind::Validation,
            ServiceError::AvatarTooLarge { .. } => ErrorKind::PayloadTooLarge,
            ServiceError::Database(_) => ErrorKind::Internal,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.kind(), ErrorKind::NotFound(_))
    }

    /// Maps a unique-constraint violation on `key` to a write conflict.
    pub(crate) fn from_write(err: DbErr, key: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::ConcurrentWriteConflict {
                key: key.to_string(),
            },
            _ => ServiceError::Database(err),
        }
    }
}
