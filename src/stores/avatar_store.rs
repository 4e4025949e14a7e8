use crate::entities::{avatars, prelude::*};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};

/// Repository functions over the `avatars` table
pub struct AvatarStore;

impl AvatarStore {
    pub async fn find_by_id(
        db: &impl ConnectionTrait,
        id: i32,
    ) -> Result<Option<avatars::Model>, DbErr> {
        Avatars::find_by_id(id).one(db).await
    }

    pub async fn find_by_student_id(
        db: &impl ConnectionTrait,
        student_id: i32,
    ) -> Result<Option<avatars::Model>, DbErr> {
        Avatars::find()
            .filter(avatars::Column::StudentId.eq(student_id))
            .one(db)
            .await
    }

    /// Zero-based page of avatars ordered by id
    pub async fn find_page(
        db: &impl ConnectionTrait,
        page_index: u64,
        page_size: u64,
    ) -> Result<Vec<avatars::Model>, DbErr> {
        Avatars::find()
            .order_by_asc(avatars::Column::Id)
            .paginate(db, page_size)
            .fetch_page(page_index)
            .await
    }

    /// Inserts when the id is unset, otherwise updates the existing row
    pub async fn save(
        db: &impl ConnectionTrait,
        avatar: avatars::ActiveModel,
    ) -> Result<avatars::Model, DbErr> {
        if avatar.id.is_not_set() {
            avatar.insert(db).await
        } else {
            avatar.update(db).await
        }
    }

    pub async fn delete_by_student_id(
        db: &impl ConnectionTrait,
        student_id: i32,
    ) -> Result<u64, DbErr> {
        let res = Avatars::delete_many()
            .filter(avatars::Column::StudentId.eq(student_id))
            .exec(db)
            .await?;
        Ok(res.rows_affected)
    }

    pub async fn count(db: &impl ConnectionTrait) -> Result<u64, DbErr> {
        Avatars::find().count(db).await
    }
}
