//! Authors repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{PagedSelect, PagedStore, Store};
use crate::{
    error::{AppError, AppResult},
    models::{Author, EntityKind},
    pagination::{Page, PageRequest},
    query::Predicate,
};

const AUTHORS_PAGE: PagedSelect = PagedSelect {
    columns: "a.id, a.firstname, a.lastname",
    from: "authors a",
    order_by: "a.lastname ASC, a.id ASC",
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store<Author> for AuthorsRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(
            "SELECT id, firstname, lastname FROM authors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(author)
    }

    async fn find_all(&self) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(
            "SELECT id, firstname, lastname FROM authors ORDER BY lastname, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(authors)
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        let exists = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn save(&self, author: Author) -> AppResult<Author> {
        match author.id {
            None => {
                let created = sqlx::query_as::<_, Author>(
                    r#"
                    INSERT INTO authors (firstname, lastname)
                    VALUES ($1, $2)
                    RETURNING id, firstname, lastname
                    "#,
                )
                .bind(&author.firstname)
                .bind(&author.lastname)
                .fetch_one(&self.pool)
                .await?;
                Ok(created)
            }
            Some(id) => sqlx::query_as::<_, Author>(
                r#"
                UPDATE authors SET firstname = $1, lastname = $2
                WHERE id = $3
                RETURNING id, firstname, lastname
                "#,
            )
            .bind(&author.firstname)
            .bind(&author.lastname)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(EntityKind::Author, id)),
        }
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        let total = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}

#[async_trait]
impl PagedStore<Author> for AuthorsRepository {
    async fn find_page(&self, page: PageRequest) -> AppResult<Page<Author>> {
        AUTHORS_PAGE.fetch(&self.pool, &Predicate::always(), page).await
    }

    async fn query(&self, predicate: &Predicate, page: PageRequest) -> AppResult<Page<Author>> {
        AUTHORS_PAGE.fetch(&self.pool, predicate, page).await
    }
}
