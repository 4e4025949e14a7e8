use crate::services::error::{ErrorKind, ServiceError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::NotFound(_) => AppError::NotFound(message),
            ErrorKind::Validation => AppError::BadRequest(message),
            ErrorKind::PayloadTooLarge => AppError::PayloadTooLarge(message),
            ErrorKind::Conflict => AppError::Conflict(message),
            ErrorKind::Storage => AppError::Storage(message),
            ErrorKind::Internal => match err {
                ServiceError::Database(e) => AppError::Database(e),
                _ => AppError::Internal(message),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Avatar storage operation failed".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_statuses() {
        let cases = [
            (ServiceError::StudentNotFound(1), StatusCode::NOT_FOUND),
            (
                ServiceError::FacultyNameNotFound("Slytherin".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                ServiceError::InvalidInput("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (ServiceError::FacultyInUse(3), StatusCode::CONFLICT),
            (
                ServiceError::AvatarTooLarge { limit: 10 },
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
        ];

        for (err, status) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), status);
        }
    }

    #[tokio::test]
    async fn test_storage_failure_message_is_operation_neutral() {
        use crate::services::error::StorageError;
        use http_body_util::BodyExt;

        let write_failure: ServiceError = StorageError::new(
            "avatars/3.png",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only fs"),
        )
        .into();
        let response = AppError::from(write_failure).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Avatar storage operation failed");
    }
}
