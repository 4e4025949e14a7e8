//! Conversions between entities and the wire-shaped DTOs, plus foreign-key
//! resolution shared by the write paths.

use crate::entities::{avatars, faculties, students};
use crate::models::{AvatarDto, FacultyDtoIn, FacultyDtoOut, StudentDtoOut};
use crate::services::error::ServiceError;
use crate::stores::{FacultyStore, StudentWithFaculty};
use sea_orm::{ConnectionTrait, Set};

impl From<faculties::Model> for FacultyDtoOut {
    fn from(model: faculties::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            color: model.color,
        }
    }
}

impl From<avatars::Model> for AvatarDto {
    fn from(model: avatars::Model) -> Self {
        Self {
            id: model.id,
            file_path: model.file_path,
            file_size: model.file_size,
            media_type: model.media_type,
            student_id: model.student_id,
        }
    }
}

impl From<StudentWithFaculty> for StudentDtoOut {
    fn from((student, faculty): StudentWithFaculty) -> Self {
        student_to_dto(student, faculty)
    }
}

pub fn student_to_dto(student: students::Model, faculty: Option<faculties::Model>) -> StudentDtoOut {
    StudentDtoOut {
        id: student.id,
        name: student.name,
        age: student.age,
        faculty: faculty.map(FacultyDtoOut::from),
    }
}

/// Active model for a new faculty, or for overwriting `id` when given
pub fn faculty_from_dto(id: Option<i32>, dto: FacultyDtoIn) -> faculties::ActiveModel {
    let mut active = faculties::ActiveModel {
        name: Set(dto.name),
        color: Set(dto.color),
        ..Default::default()
    };
    if let Some(id) = id {
        active.id = Set(id);
    }
    active
}

/// Looks up the faculty a student write refers to
pub async fn resolve_faculty(
    db: &impl ConnectionTrait,
    id: i32,
) -> Result<faculties::Model, ServiceError> {
    FacultyStore::find_by_id(db, id)
        .await?
        .ok_or(ServiceError::FacultyNotFound(id))
}
