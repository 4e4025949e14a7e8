pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod stores;
pub mod utils;

use crate::config::AppConfig;
use crate::services::{AvatarService, ContentStore, FacultyService, StudentService};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Room for multipart boundaries and headers on top of the avatar itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::health::health_check,
        api::handlers::faculties::create_faculty,
        api::handlers::faculties::get_faculty,
        api::handlers::faculties::update_faculty,
        api::handlers::faculties::delete_faculty,
        api::handlers::faculties::filter_faculties,
        api::handlers::faculties::students_of_faculty,
        api::handlers::students::create_student,
        api::handlers::students::get_student,
        api::handlers::students::update_student,
        api::handlers::students::delete_student,
        api::handlers::students::find_students_by_age,
        api::handlers::students::find_students_by_age_between,
        api::handlers::students::faculty_of_student,
        api::handlers::students::total_count,
        api::handlers::students::average_age,
        api::handlers::students::last_five,
        api::handlers::students::upload_avatar,
        api::handlers::avatars::preview_avatar,
        api::handlers::avatars::download_avatar,
        api::handlers::avatars::avatar_metadata,
        api::handlers::avatars::list_avatars,
    ),
    components(
        schemas(
            api::handlers::health::HealthResponse,
            models::FacultyDtoIn,
            models::FacultyDtoOut,
            models::StudentDtoIn,
            models::StudentDtoOut,
            models::AvatarDto,
        )
    ),
    tags(
        (name = "faculty", description = "Faculty management endpoints"),
        (name = "student", description = "Student management and statistics endpoints"),
        (name = "avatar", description = "Avatar retrieval endpoints"),
        (name = "system", description = "Service health")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub storage: Arc<dyn ContentStore>,
    pub faculty_service: Arc<FacultyService>,
    pub student_service: Arc<StudentService>,
    pub avatar_service: Arc<AvatarService>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: DatabaseConnection, storage: Arc<dyn ContentStore>, config: AppConfig) -> Self {
        Self {
            faculty_service: Arc::new(FacultyService::new(db.clone())),
            student_service: Arc::new(StudentService::new(db.clone())),
            avatar_service: Arc::new(AvatarService::new(db.clone(), storage.clone(), &config)),
            db,
            storage,
            config,
        }
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

pub fn create_app(state: AppState) -> Router {
    use api::handlers::{avatars, faculties, health, students};

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::health_check))
        .route("/faculty", post(faculties::create_faculty))
        .route("/faculty/filter", get(faculties::filter_faculties))
        .route(
            "/faculty/by-name/:name/students",
            get(faculties::students_of_faculty),
        )
        .route(
            "/faculty/:id",
            get(faculties::get_faculty)
                .put(faculties::update_faculty)
                .delete(faculties::delete_faculty),
        )
        .route(
            "/student",
            get(students::find_students_by_age).post(students::create_student),
        )
        .route("/student/filter", get(students::find_students_by_age_between))
        .route("/student/total-count", get(students::total_count))
        .route("/student/avg-age", get(students::average_age))
        .route("/student/last-five", get(students::last_five))
        .route(
            "/student/:id",
            get(students::get_student)
                .put(students::update_student)
                .delete(students::delete_student),
        )
        .route("/student/:id/faculty", get(students::faculty_of_student))
        .route(
            "/student/:id/avatar",
            post(students::upload_avatar).layer(DefaultBodyLimit::max(
                state.config.max_avatar_size + MULTIPART_OVERHEAD,
            )),
        )
        .route("/avatar", get(avatars::list_avatars))
        .route("/avatar/:id", get(avatars::download_avatar))
        .route("/avatar/:id/preview", get(avatars::preview_avatar))
        .route("/avatar/:id/metadata", get(avatars::avatar_metadata))
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .layer(cors_layer(&state.config))
        .with_state(state)
}
