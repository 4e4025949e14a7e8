use crate::entities::{faculties, prelude::*};
use crate::stores::{contains_ignore_case, lower, lower_value};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

/// Repository functions over the `faculties` table
pub struct FacultyStore;

impl FacultyStore {
    pub async fn find_by_id(
        db: &impl ConnectionTrait,
        id: i32,
    ) -> Result<Option<faculties::Model>, DbErr> {
        Faculties::find_by_id(id).one(db).await
    }

    pub async fn find_all(db: &impl ConnectionTrait) -> Result<Vec<faculties::Model>, DbErr> {
        Faculties::find()
            .order_by_asc(faculties::Column::Id)
            .all(db)
            .await
    }

    /// Inserts when the id is unset, otherwise updates the existing row
    pub async fn save(
        db: &impl ConnectionTrait,
        faculty: faculties::ActiveModel,
    ) -> Result<faculties::Model, DbErr> {
        if faculty.id.is_not_set() {
            faculty.insert(db).await
        } else {
            faculty.update(db).await
        }
    }

    /// Returns whether a row was removed
    pub async fn delete_by_id(db: &impl ConnectionTrait, id: i32) -> Result<bool, DbErr> {
        let res = Faculties::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }

    /// Faculties whose name or color contains `token`, ignoring case
    pub async fn find_by_color_or_name(
        db: &impl ConnectionTrait,
        token: &str,
    ) -> Result<Vec<faculties::Model>, DbErr> {
        Faculties::find()
            .filter(contains_ignore_case(
                &[faculties::Column::Name, faculties::Column::Color],
                token,
            ))
            .order_by_asc(faculties::Column::Id)
            .all(db)
            .await
    }

    /// Case-insensitive exact name match; the lowest id wins on duplicates
    pub async fn find_by_name_ignore_case(
        db: &impl ConnectionTrait,
        name: &str,
    ) -> Result<Option<faculties::Model>, DbErr> {
        Faculties::find()
            .filter(Expr::expr(lower(faculties::Column::Name)).eq(lower_value(name)))
            .order_by_asc(faculties::Column::Id)
            .one(db)
            .await
    }
}
