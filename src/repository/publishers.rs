//! Publishers repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{PagedSelect, PagedStore, Store};
use crate::{
    error::{AppError, AppResult},
    models::{EntityKind, Publisher},
    pagination::{Page, PageRequest},
    query::Predicate,
};

const PUBLISHERS_PAGE: PagedSelect = PagedSelect {
    columns: "p.id, p.name",
    from: "publishers p",
    order_by: "p.name ASC, p.id ASC",
};

#[derive(Clone)]
pub struct PublishersRepository {
    pool: Pool<Postgres>,
}

impl PublishersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store<Publisher> for PublishersRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Publisher>> {
        let publisher = sqlx::query_as::<_, Publisher>("SELECT id, name FROM publishers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(publisher)
    }

    async fn find_all(&self) -> AppResult<Vec<Publisher>> {
        let publishers = sqlx::query_as::<_, Publisher>("SELECT id, name FROM publishers ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(publishers)
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        let exists = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM publishers WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn save(&self, publisher: Publisher) -> AppResult<Publisher> {
        match publisher.id {
            None => {
                let created = sqlx::query_as::<_, Publisher>(
                    "INSERT INTO publishers (name) VALUES ($1) RETURNING id, name",
                )
                .bind(&publisher.name)
                .fetch_one(&self.pool)
                .await?;
                Ok(created)
            }
            Some(id) => sqlx::query_as::<_, Publisher>(
                "UPDATE publishers SET name = $1 WHERE id = $2 RETURNING id, name",
            )
            .bind(&publisher.name)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(EntityKind::Publisher, id)),
        }
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM publishers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        let total = sqlx::query_scalar("SELECT COUNT(*) FROM publishers")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}

#[async_trait]
impl PagedStore<Publisher> for PublishersRepository {
    async fn find_page(&self, page: PageRequest) -> AppResult<Page<Publisher>> {
        PUBLISHERS_PAGE.fetch(&self.pool, &Predicate::always(), page).await
    }

    async fn query(&self, predicate: &Predicate, page: PageRequest) -> AppResult<Page<Publisher>> {
        PUBLISHERS_PAGE.fetch(&self.pool, predicate, page).await
    }
}
