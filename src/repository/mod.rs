//! Repository layer: store traits plus the Postgres and in-memory backends

pub mod authors;
pub mod books;
pub mod memory;
pub mod publishers;
pub mod store;
pub mod tags;

use sqlx::{postgres::PgRow, FromRow, Pool, Postgres, QueryBuilder};

use crate::{
    error::AppResult,
    pagination::{Page, PageRequest},
    query::{sql::push_where, Predicate},
};

pub use memory::MemoryStore;
pub use store::{PagedStore, Store};

/// Main repository struct holding the database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub authors: authors::AuthorsRepository,
    pub publishers: publishers::PublishersRepository,
    pub tags: tags::TagsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            authors: authors::AuthorsRepository::new(pool.clone()),
            publishers: publishers::PublishersRepository::new(pool.clone()),
            tags: tags::TagsRepository::new(pool.clone()),
            pool,
        }
    }
}

/// Shape of a paged `SELECT`: columns, source relation and fixed ordering
pub(crate) struct PagedSelect {
    pub columns: &'static str,
    pub from: &'static str,
    pub order_by: &'static str,
}

impl PagedSelect {
    /// Count every row matching `predicate`, then fetch the requested page
    pub async fn fetch<T>(
        &self,
        pool: &Pool<Postgres>,
        predicate: &Predicate,
        page: PageRequest,
    ) -> AppResult<Page<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let (limit, offset) = page.limit_offset()?;

        let mut count = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {}", self.from));
        push_where(&mut count, predicate);
        let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM {}", self.columns, self.from));
        push_where(&mut select, predicate);
        select
            .push(format!(" ORDER BY {} LIMIT ", self.order_by))
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        tracing::debug!("Paged query: {}", select.sql());

        let rows = select.build_query_as::<T>().fetch_all(pool).await?;
        Ok(Page::new(rows, total.max(0) as u64, page))
    }
}
