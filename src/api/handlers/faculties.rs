use crate::AppState;
use crate::api::error::AppError;
use crate::models::{FacultyDtoIn, FacultyDtoOut, StudentDtoOut};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ColorOrNameQuery {
    /// Substring matched against name or color, ignoring case
    pub color_or_name: String,
}

#[utoipa::path(
    post,
    path = "/faculty",
    request_body = FacultyDtoIn,
    responses(
        (status = 200, description = "Faculty created", body = FacultyDtoOut),
        (status = 400, description = "Invalid faculty")
    ),
    tag = "faculty"
)]
pub async fn create_faculty(
    State(state): State<AppState>,
    Json(payload): Json<FacultyDtoIn>,
) -> Result<Json<FacultyDtoOut>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(Json(state.faculty_service.create(payload).await?))
}

#[utoipa::path(
    get,
    path = "/faculty/{id}",
    params(("id" = i32, Path, description = "Faculty id")),
    responses(
        (status = 200, description = "Faculty found", body = FacultyDtoOut),
        (status = 404, description = "Faculty not found")
    ),
    tag = "faculty"
)]
pub async fn get_faculty(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<FacultyDtoOut>, AppError> {
    Ok(Json(state.faculty_service.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/faculty/{id}",
    params(("id" = i32, Path, description = "Faculty id")),
    request_body = FacultyDtoIn,
    responses(
        (status = 200, description = "Faculty updated", body = FacultyDtoOut),
        (status = 400, description = "Invalid faculty"),
        (status = 404, description = "Faculty not found")
    ),
    tag = "faculty"
)]
pub async fn update_faculty(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<FacultyDtoIn>,
) -> Result<Json<FacultyDtoOut>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(Json(state.faculty_service.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/faculty/{id}",
    params(("id" = i32, Path, description = "Faculty id")),
    responses(
        (status = 200, description = "Faculty deleted", body = FacultyDtoOut),
        (status = 404, description = "Faculty not found"),
        (status = 409, description = "Faculty still has students")
    ),
    tag = "faculty"
)]
pub async fn delete_faculty(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<FacultyDtoOut>, AppError> {
    Ok(Json(state.faculty_service.delete(id).await?))
}

#[utoipa::path(
    get,
    path = "/faculty/filter",
    params(ColorOrNameQuery),
    responses(
        (status = 200, description = "Matching faculties", body = [FacultyDtoOut])
    ),
    tag = "faculty"
)]
pub async fn filter_faculties(
    State(state): State<AppState>,
    Query(query): Query<ColorOrNameQuery>,
) -> Result<Json<Vec<FacultyDtoOut>>, AppError> {
    Ok(Json(
        state
            .faculty_service
            .find_by_color_or_name(&query.color_or_name)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/faculty/by-name/{name}/students",
    params(("name" = String, Path, description = "Faculty name, case-insensitive")),
    responses(
        (status = 200, description = "Students of the faculty", body = [StudentDtoOut]),
        (status = 404, description = "No faculty with that name")
    ),
    tag = "faculty"
)]
pub async fn students_of_faculty(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<StudentDtoOut>>, AppError> {
    Ok(Json(state.faculty_service.students_of_faculty(&name).await?))
}
