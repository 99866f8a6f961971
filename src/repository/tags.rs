//! Tags repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::Store;
use crate::{
    error::{AppError, AppResult},
    models::{EntityKind, Tag},
};

#[derive(Clone)]
pub struct TagsRepository {
    pool: Pool<Postgres>,
}

impl TagsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store<Tag> for TagsRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Tag>> {
        let tag = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tag)
    }

    /// All tags in id order
    async fn find_all(&self) -> AppResult<Vec<Tag>> {
        let tags = sqlx::query_as::<_, Tag>("SELECT id, name FROM tags ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(tags)
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        let exists = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tags WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn save(&self, tag: Tag) -> AppResult<Tag> {
        match tag.id {
            None => {
                let created = sqlx::query_as::<_, Tag>("INSERT INTO tags (name) VALUES ($1) RETURNING id, name")
                    .bind(&tag.name)
                    .fetch_one(&self.pool)
                    .await?;
                Ok(created)
            }
            Some(id) => sqlx::query_as::<_, Tag>("UPDATE tags SET name = $1 WHERE id = $2 RETURNING id, name")
                .bind(&tag.name)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::not_found(EntityKind::Tag, id)),
        }
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        let total = sqlx::query_scalar("SELECT COUNT(*) FROM tags")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
