//! Books repository.
//!
//! A book row is joined with its publisher; authors and tags live in the
//! `book_authors` and `book_tags` join tables and are loaded in one batch per
//! result set.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, Pool, Postgres, Transaction};

use super::{PagedSelect, PagedStore, Store};
use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, Entity, EntityKind, Publisher, Tag},
    pagination::{Page, PageRequest},
    query::Predicate,
};

const BOOK_COLUMNS: &str = "b.id, b.title, b.edition, b.genre, b.publishing_year, b.page_count, \
     b.isbn, b.notes, b.shelf, b.ledge, p.id AS publisher_id, p.name AS publisher_name";

const BOOKS_FROM: &str = "books b JOIN publishers p ON p.id = b.publisher_id";

const BOOKS_PAGE: PagedSelect = PagedSelect {
    columns: BOOK_COLUMNS,
    from: BOOKS_FROM,
    order_by: "b.title ASC, b.id ASC",
};

/// Book joined with its publisher, before authors and tags are attached
#[derive(Debug, FromRow)]
struct BookRow {
    id: i64,
    title: Option<String>,
    edition: Option<String>,
    genre: Option<String>,
    publishing_year: Option<i32>,
    page_count: Option<i32>,
    isbn: Option<String>,
    notes: Option<String>,
    shelf: Option<String>,
    ledge: Option<String>,
    publisher_id: i64,
    publisher_name: Option<String>,
}

impl BookRow {
    fn into_book(self, authors: Vec<Author>, tags: Vec<Tag>) -> Book {
        Book {
            id: Some(self.id),
            title: self.title,
            edition: self.edition,
            genre: self.genre,
            authors,
            publishing_year: self.publishing_year,
            page_count: self.page_count,
            isbn: self.isbn,
            notes: self.notes,
            publisher: Some(Publisher {
                id: Some(self.publisher_id),
                name: self.publisher_name,
            }),
            tags,
            shelf: self.shelf,
            ledge: self.ledge,
        }
    }
}

/// Ids of saved related records, rejecting records that were never stored
fn relation_ids<T: Entity>(records: &[T]) -> AppResult<Vec<i64>> {
    records
        .iter()
        .map(|record| {
            record.id().ok_or_else(|| {
                AppError::MalformedRequest(format!("{} must be saved before it is referenced", T::KIND))
            })
        })
        .collect()
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Attach authors and tags to a batch of book rows
    async fn hydrate(&self, rows: Vec<BookRow>) -> AppResult<Vec<Book>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();

        let author_rows = sqlx::query_as::<_, (i64, i64, Option<String>, Option<String>)>(
            r#"
            SELECT ba.book_id, a.id, a.firstname, a.lastname
            FROM book_authors ba
            JOIN authors a ON a.id = ba.author_id
            WHERE ba.book_id = ANY($1)
            ORDER BY a.id
            "#,
        )
        .bind(ids.as_slice())
        .fetch_all(&self.pool)
        .await?;

        let tag_rows = sqlx::query_as::<_, (i64, i64, Option<String>)>(
            r#"
            SELECT bt.book_id, t.id, t.name
            FROM book_tags bt
            JOIN tags t ON t.id = bt.tag_id
            WHERE bt.book_id = ANY($1)
            ORDER BY t.id
            "#,
        )
        .bind(ids.as_slice())
        .fetch_all(&self.pool)
        .await?;

        let mut authors: HashMap<i64, Vec<Author>> = HashMap::new();
        for (book_id, id, firstname, lastname) in author_rows {
            authors.entry(book_id).or_default().push(Author {
                id: Some(id),
                firstname,
                lastname,
            });
        }

        let mut tags: HashMap<i64, Vec<Tag>> = HashMap::new();
        for (book_id, id, name) in tag_rows {
            tags.entry(book_id).or_default().push(Tag { id: Some(id), name });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let book_authors = authors.remove(&row.id).unwrap_or_default();
                let book_tags = tags.remove(&row.id).unwrap_or_default();
                row.into_book(book_authors, book_tags)
            })
            .collect())
    }

    async fn hydrate_page(&self, page: Page<BookRow>) -> AppResult<Page<Book>> {
        let Page { content, total_elements, request } = page;
        let books = self.hydrate(content).await?;
        Ok(Page::new(books, total_elements, request))
    }

    /// Replace the join-table rows of one book
    async fn sync_relations(
        tx: &mut Transaction<'_, Postgres>,
        book_id: i64,
        author_ids: &[i64],
        tag_ids: &[i64],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM book_authors WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut **tx)
            .await?;
        sqlx::query(
            r#"
            INSERT INTO book_authors (book_id, author_id)
            SELECT $1, UNNEST($2::BIGINT[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(book_id)
        .bind(author_ids)
        .execute(&mut **tx)
        .await?;

        sqlx::query("DELETE FROM book_tags WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut **tx)
            .await?;
        sqlx::query(
            r#"
            INSERT INTO book_tags (book_id, tag_id)
            SELECT $1, UNNEST($2::BIGINT[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(book_id)
        .bind(tag_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl Store<Book> for BooksRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {} FROM {} WHERE b.id = $1",
            BOOK_COLUMNS, BOOKS_FROM
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {} FROM {} ORDER BY b.title, b.id",
            BOOK_COLUMNS, BOOKS_FROM
        ))
        .fetch_all(&self.pool)
        .await?;
        self.hydrate(rows).await
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        let exists = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn save(&self, book: Book) -> AppResult<Book> {
        let publisher_id = book.publisher_id().ok_or_else(|| {
            AppError::MalformedRequest("publisher: Must reference a stored publisher".to_string())
        })?;
        let author_ids = relation_ids(&book.authors)?;
        let tag_ids = relation_ids(&book.tags)?;

        let mut tx = self.pool.begin().await?;

        let id: i64 = match book.id {
            None => {
                sqlx::query_scalar(
                    r#"
                    INSERT INTO books (title, edition, genre, publishing_year, page_count,
                                       isbn, notes, publisher_id, shelf, ledge)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                    RETURNING id
                    "#,
                )
                .bind(&book.title)
                .bind(&book.edition)
                .bind(&book.genre)
                .bind(book.publishing_year)
                .bind(book.page_count)
                .bind(&book.isbn)
                .bind(&book.notes)
                .bind(publisher_id)
                .bind(&book.shelf)
                .bind(&book.ledge)
                .fetch_one(&mut *tx)
                .await?
            }
            Some(id) => sqlx::query_scalar(
                r#"
                UPDATE books SET title = $1, edition = $2, genre = $3, publishing_year = $4,
                                 page_count = $5, isbn = $6, notes = $7, publisher_id = $8,
                                 shelf = $9, ledge = $10
                WHERE id = $11
                RETURNING id
                "#,
            )
            .bind(&book.title)
            .bind(&book.edition)
            .bind(&book.genre)
            .bind(book.publishing_year)
            .bind(book.page_count)
            .bind(&book.isbn)
            .bind(&book.notes)
            .bind(publisher_id)
            .bind(&book.shelf)
            .bind(&book.ledge)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found(EntityKind::Book, id))?,
        };

        Self::sync_relations(&mut tx, id, &author_ids, &tag_ids).await?;
        tx.commit().await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(EntityKind::Book, id))
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM book_authors WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM book_tags WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        let total = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}

#[async_trait]
impl PagedStore<Book> for BooksRepository {
    async fn find_page(&self, page: PageRequest) -> AppResult<Page<Book>> {
        self.query(&Predicate::always(), page).await
    }

    async fn query(&self, predicate: &Predicate, page: PageRequest) -> AppResult<Page<Book>> {
        let rows: Page<BookRow> = BOOKS_PAGE.fetch(&self.pool, predicate, page).await?;
        self.hydrate_page(rows).await
    }
}
