//! Store traits implemented by every persistence backend

use async_trait::async_trait;

use crate::{
    error::AppResult,
    pagination::{Page, PageRequest},
    query::Predicate,
};

/// Basic record persistence for one entity kind
#[async_trait]
pub trait Store<E>: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<E>>;

    /// Every record, unpaged
    async fn find_all(&self) -> AppResult<Vec<E>>;

    async fn exists_by_id(&self, id: i64) -> AppResult<bool>;

    /// Insert when `record` has no id, otherwise replace the stored record
    async fn save(&self, record: E) -> AppResult<E>;

    async fn delete_by_id(&self, id: i64) -> AppResult<()>;

    async fn count(&self) -> AppResult<i64>;
}

/// Paged listing and filtered queries in the kind's fixed order
#[async_trait]
pub trait PagedStore<E>: Store<E> {
    async fn find_page(&self, page: PageRequest) -> AppResult<Page<E>>;

    async fn query(&self, predicate: &Predicate, page: PageRequest) -> AppResult<Page<E>>;
}
