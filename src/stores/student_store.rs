use crate::entities::{faculties, prelude::*, students};
use sea_orm::sea_query::{Alias, Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

/// A student together with the faculty it belongs to, if any
pub type StudentWithFaculty = (students::Model, Option<faculties::Model>);

/// Repository functions over the `students` table
pub struct StudentStore;

impl StudentStore {
    pub async fn find_by_id(
        db: &impl ConnectionTrait,
        id: i32,
    ) -> Result<Option<students::Model>, DbErr> {
        Students::find_by_id(id).one(db).await
    }

    pub async fn find_with_faculty(
        db: &impl ConnectionTrait,
        id: i32,
    ) -> Result<Option<StudentWithFaculty>, DbErr> {
        Students::find_by_id(id)
            .find_also_related(Faculties)
            .one(db)
            .await
    }

    pub async fn find_all(db: &impl ConnectionTrait) -> Result<Vec<StudentWithFaculty>, DbErr> {
        Students::find()
            .find_also_related(Faculties)
            .order_by_asc(students::Column::Id)
            .all(db)
            .await
    }

    /// Inserts when the id is unset, otherwise updates the existing row
    pub async fn save(
        db: &impl ConnectionTrait,
        student: students::ActiveModel,
    ) -> Result<students::Model, DbErr> {
        if student.id.is_not_set() {
            student.insert(db).await
        } else {
            student.update(db).await
        }
    }

    /// Returns whether a row was removed
    pub async fn delete_by_id(db: &impl ConnectionTrait, id: i32) -> Result<bool, DbErr> {
        let res = Students::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }

    pub async fn find_by_age(
        db: &impl ConnectionTrait,
        age: i32,
    ) -> Result<Vec<StudentWithFaculty>, DbErr> {
        Students::find()
            .filter(students::Column::Age.eq(age))
            .find_also_related(Faculties)
            .order_by_asc(students::Column::Id)
            .all(db)
            .await
    }

    /// Inclusive on both ends; `from > to` simply matches nothing
    pub async fn find_by_age_between(
        db: &impl ConnectionTrait,
        from: i32,
        to: i32,
    ) -> Result<Vec<StudentWithFaculty>, DbErr> {
        Students::find()
            .filter(students::Column::Age.between(from, to))
            .find_also_related(Faculties)
            .order_by_asc(students::Column::Id)
            .all(db)
            .await
    }

    pub async fn find_all_by_faculty_id(
        db: &impl ConnectionTrait,
        faculty_id: i32,
    ) -> Result<Vec<StudentWithFaculty>, DbErr> {
        Students::find()
            .filter(students::Column::FacultyId.eq(faculty_id))
            .find_also_related(Faculties)
            .order_by_asc(students::Column::Id)
            .all(db)
            .await
    }

    pub async fn count_by_faculty_id(
        db: &impl ConnectionTrait,
        faculty_id: i32,
    ) -> Result<u64, DbErr> {
        Students::find()
            .filter(students::Column::FacultyId.eq(faculty_id))
            .count(db)
            .await
    }

    pub async fn count(db: &impl ConnectionTrait) -> Result<u64, DbErr> {
        Students::find().count(db).await
    }

    /// `None` when there are no students
    pub async fn average_age(db: &impl ConnectionTrait) -> Result<Option<f64>, DbErr> {
        // postgres returns NUMERIC for avg(integer)
        let average: SimpleExpr = Func::cast_as(
            Func::avg(Expr::col(students::Column::Age)),
            Alias::new("double precision"),
        )
        .into();

        let row = Students::find()
            .select_only()
            .column_as(average, "average")
            .into_tuple::<Option<f64>>()
            .one(db)
            .await?;

        Ok(row.flatten())
    }

    /// Newest first, ties broken by the higher id
    pub async fn find_most_recent(
        db: &impl ConnectionTrait,
        limit: u64,
    ) -> Result<Vec<StudentWithFaculty>, DbErr> {
        Students::find()
            .order_by_desc(students::Column::CreatedAt)
            .order_by_desc(students::Column::Id)
            .limit(limit)
            .find_also_related(Faculties)
            .all(db)
            .await
    }
}
