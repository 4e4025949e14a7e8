use crate::entities::students;
use crate::models::{FacultyDtoOut, StudentDtoIn, StudentDtoOut};
use crate::services::error::ServiceError;
use crate::services::mapping::{resolve_faculty, student_to_dto};
use crate::stores::{AvatarStore, StudentStore};
use chrono::Utc;
use sea_orm::{DatabaseConnection, Set, TransactionTrait};

const MOST_RECENT_LIMIT: u64 = 5;

pub struct StudentService {
    db: DatabaseConnection,
}

fn ensure_age(age: i32) -> Result<(), ServiceError> {
    if age < 0 {
        return Err(ServiceError::InvalidInput(format!(
            "Age must not be negative, got {}",
            age
        )));
    }
    Ok(())
}

impl StudentService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, dto: StudentDtoIn) -> Result<StudentDtoOut, ServiceError> {
        ensure_age(dto.age)?;
        let txn = self.db.begin().await?;

        let faculty = resolve_faculty(&txn, dto.faculty_id).await?;
        let active = students::ActiveModel {
            name: Set(dto.name),
            age: Set(dto.age),
            faculty_id: Set(Some(faculty.id)),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let saved = StudentStore::save(&txn, active).await?;

        txn.commit().await?;
        tracing::info!("Created student {} in faculty {}", saved.id, faculty.id);
        Ok(student_to_dto(saved, Some(faculty)))
    }

    pub async fn get(&self, id: i32) -> Result<StudentDtoOut, ServiceError> {
        StudentStore::find_with_faculty(&self.db, id)
            .await?
            .map(StudentDtoOut::from)
            .ok_or(ServiceError::StudentNotFound(id))
    }

    pub async fn update(&self, id: i32, dto: StudentDtoIn) -> Result<StudentDtoOut, ServiceError> {
        ensure_age(dto.age)?;
        let txn = self.db.begin().await?;

        let existing = StudentStore::find_by_id(&txn, id)
            .await?
            .ok_or(ServiceError::StudentNotFound(id))?;
        let faculty = resolve_faculty(&txn, dto.faculty_id).await?;

        let mut active: students::ActiveModel = existing.into();
        active.name = Set(dto.name);
        active.age = Set(dto.age);
        active.faculty_id = Set(Some(faculty.id));
        let saved = StudentStore::save(&txn, active).await?;

        txn.commit().await?;
        tracing::info!("Updated student {}", id);
        Ok(student_to_dto(saved, Some(faculty)))
    }

    /// Removes the student together with its avatar record and returns the
    /// student as it was before deletion. The avatar file stays in the
    /// content store.
    pub async fn delete(&self, id: i32) -> Result<StudentDtoOut, ServiceError> {
        let txn = self.db.begin().await?;

        let existing = StudentStore::find_with_faculty(&txn, id)
            .await?
            .ok_or(ServiceError::StudentNotFound(id))?;

        let avatars = AvatarStore::delete_by_student_id(&txn, id).await?;
        StudentStore::delete_by_id(&txn, id).await?;
        txn.commit().await?;

        if avatars > 0 {
            tracing::info!("Deleted student {}; avatar file left orphaned", id);
        } else {
            tracing::info!("Deleted student {}", id);
        }
        Ok(existing.into())
    }

    /// Exact age match, or every student when no age is given
    pub async fn find_by_age(&self, age: Option<i32>) -> Result<Vec<StudentDtoOut>, ServiceError> {
        let found = match age {
            Some(age) => StudentStore::find_by_age(&self.db, age).await?,
            None => StudentStore::find_all(&self.db).await?,
        };
        Ok(found.into_iter().map(StudentDtoOut::from).collect())
    }

    pub async fn find_by_age_between(
        &self,
        from: i32,
        to: i32,
    ) -> Result<Vec<StudentDtoOut>, ServiceError> {
        let found = StudentStore::find_by_age_between(&self.db, from, to).await?;
        Ok(found.into_iter().map(StudentDtoOut::from).collect())
    }

    /// `Ok(None)` when the student exists but has no faculty assigned
    pub async fn faculty_of(&self, student_id: i32) -> Result<Option<FacultyDtoOut>, ServiceError> {
        let (_, faculty) = StudentStore::find_with_faculty(&self.db, student_id)
            .await?
            .ok_or(ServiceError::StudentNotFound(student_id))?;
        Ok(faculty.map(FacultyDtoOut::from))
    }

    pub async fn total_count(&self) -> Result<u64, ServiceError> {
        Ok(StudentStore::count(&self.db).await?)
    }

    /// `None` when there are no students
    pub async fn average_age(&self) -> Result<Option<f64>, ServiceError> {
        Ok(StudentStore::average_age(&self.db).await?)
    }

    pub async fn most_recent_five(&self) -> Result<Vec<StudentDtoOut>, ServiceError> {
        let found = StudentStore::find_most_recent(&self.db, MOST_RECENT_LIMIT).await?;
        Ok(found.into_iter().map(StudentDtoOut::from).collect())
    }
}
