use crate::AppState;
use crate::api::error::AppError;
use crate::models::AvatarDto;
use axum::{
    Json,
    body::Body,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    /// One-based page number
    pub page_number: u64,
    pub page_size: u64,
}

#[utoipa::path(
    get,
    path = "/avatar/{id}/preview",
    params(("id" = i32, Path, description = "Student id")),
    responses(
        (status = 200, description = "Inline copy of the avatar"),
        (status = 404, description = "Student has no avatar")
    ),
    tag = "avatar"
)]
pub async fn preview_avatar(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let content = state.avatar_service.fetch_bytes_inline(id).await?;
    Ok((
        [(header::CONTENT_TYPE, content.media_type)],
        content.bytes,
    ))
}

#[utoipa::path(
    get,
    path = "/avatar/{id}",
    params(("id" = i32, Path, description = "Student id")),
    responses(
        (status = 200, description = "Avatar streamed from the content store"),
        (status = 404, description = "Student has no avatar"),
        (status = 500, description = "Avatar record exists but its file is missing")
    ),
    tag = "avatar"
)]
pub async fn download_avatar(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let (avatar, reader) = state.avatar_service.fetch_bytes_streamed(id).await?;
    let stream = ReaderStream::with_capacity(reader, state.config.io_buffer_size);

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, avatar.media_type)
        .header(header::CONTENT_LENGTH, avatar.file_size)
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::Internal(e.to_string()))
}

#[utoipa::path(
    get,
    path = "/avatar/{id}/metadata",
    params(("id" = i32, Path, description = "Student id")),
    responses(
        (status = 200, description = "Avatar metadata", body = AvatarDto),
        (status = 404, description = "Student has no avatar")
    ),
    tag = "avatar"
)]
pub async fn avatar_metadata(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AvatarDto>, AppError> {
    Ok(Json(state.avatar_service.fetch_metadata(id).await?))
}

#[utoipa::path(
    get,
    path = "/avatar",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of avatar metadata", body = [AvatarDto]),
        (status = 400, description = "pageNumber or pageSize below 1")
    ),
    tag = "avatar"
)]
pub async fn list_avatars(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<AvatarDto>>, AppError> {
    Ok(Json(
        state
            .avatar_service
            .list_all(query.page_number, query.page_size)
            .await?,
    ))
}
