pub mod avatar_service;
pub mod content_store;
pub mod error;
pub mod faculty_service;
pub mod mapping;
pub mod student_service;

pub use avatar_service::AvatarService;
pub use content_store::{ContentStore, LocalContentStore};
pub use error::ServiceError;
pub use faculty_service::FacultyService;
pub use student_service::StudentService;
