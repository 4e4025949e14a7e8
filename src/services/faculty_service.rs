use crate::models::{FacultyDtoIn, FacultyDtoOut, StudentDtoOut};
use crate::services::error::ServiceError;
use crate::services::mapping::faculty_from_dto;
use crate::stores::{FacultyStore, StudentStore};
use sea_orm::{DatabaseConnection, TransactionTrait};

pub struct FacultyService {
    db: DatabaseConnection,
}

impl FacultyService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, dto: FacultyDtoIn) -> Result<FacultyDtoOut, ServiceError> {
        let saved = FacultyStore::save(&self.db, faculty_from_dto(None, dto)).await?;
        tracing::info!("Created faculty {} ({})", saved.id, saved.name);
        Ok(saved.into())
    }

    pub async fn get(&self, id: i32) -> Result<FacultyDtoOut, ServiceError> {
        FacultyStore::find_by_id(&self.db, id)
            .await?
            .map(FacultyDtoOut::from)
            .ok_or(ServiceError::FacultyNotFound(id))
    }

    pub async fn update(&self, id: i32, dto: FacultyDtoIn) -> Result<FacultyDtoOut, ServiceError> {
        let txn = self.db.begin().await?;

        if FacultyStore::find_by_id(&txn, id).await?.is_none() {
            return Err(ServiceError::FacultyNotFound(id));
        }
        let saved = FacultyStore::save(&txn, faculty_from_dto(Some(id), dto)).await?;

        txn.commit().await?;
        tracing::info!("Updated faculty {}", id);
        Ok(saved.into())
    }

    /// Removes the faculty and returns it as it was before deletion.
    /// A faculty that still has students cannot be deleted.
    pub async fn delete(&self, id: i32) -> Result<FacultyDtoOut, ServiceError> {
        let txn = self.db.begin().await?;

        let existing = FacultyStore::find_by_id(&txn, id)
            .await?
            .ok_or(ServiceError::FacultyNotFound(id))?;

        let assigned = StudentStore::count_by_faculty_id(&txn, id).await?;
        if assigned > 0 {
            tracing::warn!(
                "Refusing to delete faculty {}: {} students assigned",
                id,
                assigned
            );
            return Err(ServiceError::FacultyInUse(id));
        }

        FacultyStore::delete_by_id(&txn, id).await?;
        txn.commit().await?;

        tracing::info!("Deleted faculty {}", id);
        Ok(existing.into())
    }

    /// Never fails on an empty match
    pub async fn find_by_color_or_name(
        &self,
        token: &str,
    ) -> Result<Vec<FacultyDtoOut>, ServiceError> {
        let found = FacultyStore::find_by_color_or_name(&self.db, token).await?;
        Ok(found.into_iter().map(FacultyDtoOut::from).collect())
    }

    pub async fn students_of_faculty(&self, name: &str) -> Result<Vec<StudentDtoOut>, ServiceError> {
        let faculty = FacultyStore::find_by_name_ignore_case(&self.db, name)
            .await?
            .ok_or_else(|| ServiceError::FacultyNameNotFound(name.to_string()))?;

        let students = StudentStore::find_all_by_faculty_id(&self.db, faculty.id).await?;
        Ok(students.into_iter().map(StudentDtoOut::from).collect())
    }
}
