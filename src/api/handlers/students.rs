use crate::AppState;
use crate::api::error::AppError;
use crate::models::{AvatarDto, FacultyDtoOut, StudentDtoIn, StudentDtoOut};
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::header,
};
use futures::TryStreamExt;
use serde::Deserialize;
use tokio_util::io::StreamReader;
use utoipa::IntoParams;
use validator::Validate;

pub const AVATAR_FIELD: &str = "avatarImage";

#[derive(Debug, Deserialize, IntoParams)]
pub struct AgeQuery {
    /// Exact age; all students when omitted
    pub age: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AgeRangeQuery {
    pub from: i32,
    pub to: i32,
}

#[utoipa::path(
    post,
    path = "/student",
    request_body = StudentDtoIn,
    responses(
        (status = 200, description = "Student created", body = StudentDtoOut),
        (status = 400, description = "Invalid student"),
        (status = 404, description = "Faculty not found")
    ),
    tag = "student"
)]
pub async fn create_student(
    State(state): State<AppState>,
    Json(payload): Json<StudentDtoIn>,
) -> Result<Json<StudentDtoOut>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(Json(state.student_service.create(payload).await?))
}

#[utoipa::path(
    get,
    path = "/student/{id}",
    params(("id" = i32, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student found", body = StudentDtoOut),
        (status = 404, description = "Student not found")
    ),
    tag = "student"
)]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<StudentDtoOut>, AppError> {
    Ok(Json(state.student_service.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/student/{id}",
    params(("id" = i32, Path, description = "Student id")),
    request_body = StudentDtoIn,
    responses(
        (status = 200, description = "Student updated", body = StudentDtoOut),
        (status = 400, description = "Invalid student"),
        (status = 404, description = "Student or faculty not found")
    ),
    tag = "student"
)]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<StudentDtoIn>,
) -> Result<Json<StudentDtoOut>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(Json(state.student_service.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/student/{id}",
    params(("id" = i32, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student deleted", body = StudentDtoOut),
        (status = 404, description = "Student not found")
    ),
    tag = "student"
)]
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<StudentDtoOut>, AppError> {
    Ok(Json(state.student_service.delete(id).await?))
}

#[utoipa::path(
    get,
    path = "/student",
    params(AgeQuery),
    responses(
        (status = 200, description = "Students of the given age", body = [StudentDtoOut])
    ),
    tag = "student"
)]
pub async fn find_students_by_age(
    State(state): State<AppState>,
    Query(query): Query<AgeQuery>,
) -> Result<Json<Vec<StudentDtoOut>>, AppError> {
    Ok(Json(state.student_service.find_by_age(query.age).await?))
}

#[utoipa::path(
    get,
    path = "/student/filter",
    params(AgeRangeQuery),
    responses(
        (status = 200, description = "Students within the age range", body = [StudentDtoOut])
    ),
    tag = "student"
)]
pub async fn find_students_by_age_between(
    State(state): State<AppState>,
    Query(query): Query<AgeRangeQuery>,
) -> Result<Json<Vec<StudentDtoOut>>, AppError> {
    Ok(Json(
        state
            .student_service
            .find_by_age_between(query.from, query.to)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/student/{id}/faculty",
    params(("id" = i32, Path, description = "Student id")),
    responses(
        (status = 200, description = "Faculty of the student, null when unassigned", body = FacultyDtoOut),
        (status = 404, description = "Student not found")
    ),
    tag = "student"
)]
pub async fn faculty_of_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Option<FacultyDtoOut>>, AppError> {
    Ok(Json(state.student_service.faculty_of(id).await?))
}

#[utoipa::path(
    get,
    path = "/student/total-count",
    responses((status = 200, description = "Number of students", body = u64)),
    tag = "student"
)]
pub async fn total_count(State(state): State<AppState>) -> Result<Json<u64>, AppError> {
    Ok(Json(state.student_service.total_count().await?))
}

#[utoipa::path(
    get,
    path = "/student/avg-age",
    responses((status = 200, description = "Average age, null without students", body = f64)),
    tag = "student"
)]
pub async fn average_age(State(state): State<AppState>) -> Result<Json<Option<f64>>, AppError> {
    Ok(Json(state.student_service.average_age().await?))
}

#[utoipa::path(
    get,
    path = "/student/last-five",
    responses((status = 200, description = "Five newest students", body = [StudentDtoOut])),
    tag = "student"
)]
pub async fn last_five(State(state): State<AppState>) -> Result<Json<Vec<StudentDtoOut>>, AppError> {
    Ok(Json(state.student_service.most_recent_five().await?))
}

#[utoipa::path(
    post,
    path = "/student/{id}/avatar",
    params(("id" = i32, Path, description = "Student id")),
    request_body(content = Multipart, description = "Avatar image in the `avatarImage` field"),
    responses(
        (status = 200, description = "Avatar stored", body = AvatarDto),
        (status = 400, description = "Missing or invalid avatar"),
        (status = 404, description = "Student not found"),
        (status = 409, description = "Concurrent upload for the same student"),
        (status = 413, description = "Avatar too large")
    ),
    tag = "student"
)]
pub async fn upload_avatar(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Json<AvatarDto>, AppError> {
    let result: Result<Json<AvatarDto>, AppError> = async {
        while let Some(field) = multipart.next_field().await.map_err(|e| {
            let err_msg = e.to_string();
            if err_msg.contains("length limit exceeded") {
                AppError::PayloadTooLarge(
                    "Request body exceeds the maximum allowed limit".to_string(),
                )
            } else {
                AppError::BadRequest(err_msg)
            }
        })? {
            if field.name() != Some(AVATAR_FIELD) {
                continue;
            }

            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(|s| s.to_string());
            let declared_size = field
                .headers()
                .get(header::CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());

            let reader = StreamReader::new(field.map_err(std::io::Error::other));
            let avatar = state
                .avatar_service
                .upload(id, &filename, content_type.as_deref(), reader, declared_size)
                .await?;
            return Ok(Json(avatar));
        }

        Err(AppError::BadRequest(format!(
            "Multipart field '{}' is required",
            AVATAR_FIELD
        )))
    }
    .await;

    if let Err(e) = &result {
        // drain the remaining body before answering
        tracing::warn!("Avatar upload failed: {}", e);
        while let Ok(Some(mut field)) = multipart.next_field().await {
            while let Ok(Some(_)) = field.chunk().await {}
        }
    }
    result
}
