//! Entity lifecycle service.
//!
//! One generic [`EntityService`] drives every record kind: validation before
//! any write, existence checks for updates and deletes, paged listing and
//! filtering for the kinds that support it.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, Entity, Listing, Publisher, Tag},
    pagination::{PagedResponse, PagingConfig},
    query::Criteria,
    repository::{PagedStore, Store},
    validation::ensure_valid,
};
use validator::Validate;

pub type BookService = EntityService<Book, dyn PagedStore<Book>>;
pub type AuthorService = EntityService<Author, dyn PagedStore<Author>>;
pub type PublisherService = EntityService<Publisher, dyn PagedStore<Publisher>>;
pub type TagService = EntityService<Tag, dyn Store<Tag>>;

pub struct EntityService<E, S: ?Sized> {
    store: Arc<S>,
    paging: PagingConfig,
    _kind: PhantomData<fn() -> E>,
}

impl<E, S: ?Sized> Clone for EntityService<E, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            paging: self.paging,
            _kind: PhantomData,
        }
    }
}

impl<E, S: ?Sized> EntityService<E, S> {
    pub fn new(store: Arc<S>, paging: PagingConfig) -> Self {
        Self {
            store,
            paging,
            _kind: PhantomData,
        }
    }

    /// Page-size policy used by listings
    pub fn paging(&self) -> PagingConfig {
        self.paging
    }
}

impl<E, S> EntityService<E, S>
where
    E: Entity + Validate,
    S: Store<E> + ?Sized,
{
    /// Get a record by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<E> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(E::KIND, id))
    }

    /// Every stored record, unpaged
    pub async fn list_all_unpaged(&self) -> AppResult<Vec<E>> {
        self.store.find_all().await
    }

    /// Validate, then insert (no id) or replace (existing id) the record.
    ///
    /// Every rule violation is reported at once and nothing is written when
    /// any rule fails. An id that does not exist is never reassigned.
    pub async fn save_or_update(&self, mut record: E) -> AppResult<E> {
        record.normalize();
        ensure_valid(&record)?;

        if let Some(id) = record.id() {
            if !self.store.exists_by_id(id).await? {
                return Err(AppError::not_found(E::KIND, id));
            }
        }

        let saved = self.store.save(record).await?;
        tracing::info!("Saved {} id={:?}", E::KIND, saved.id());
        Ok(saved)
    }

    /// Delete a record, failing with `NotFound` when it is absent
    pub async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        if !self.store.exists_by_id(id).await? {
            return Err(AppError::not_found(E::KIND, id));
        }
        self.store.delete_by_id(id).await?;
        tracing::info!("Deleted {} id={}", E::KIND, id);
        Ok(())
    }

    pub async fn count(&self) -> AppResult<i64> {
        self.store.count().await
    }
}

impl<E, S> EntityService<E, S>
where
    E: Listing + Validate,
    S: PagedStore<E> + ?Sized,
{
    /// One page of every record in the kind's listing order
    pub async fn list_all(&self, page: i64, size: i64) -> AppResult<PagedResponse<E>> {
        let request = self.paging.request(page, size)?;
        let page = self.store.find_page(request).await?;
        Ok(page.keyed(E::ITEMS_KEY))
    }

    /// One page of the records matching every present criterion
    pub async fn filter(
        &self,
        criteria: &E::Criteria,
        page: i64,
        size: i64,
    ) -> AppResult<PagedResponse<E>> {
        let request = self.paging.request(page, size)?;
        let predicate = criteria.predicate();
        tracing::debug!("Filtering {} with {:?}", E::KIND, predicate);
        let page = self.store.query(&predicate, request).await?;
        Ok(page.keyed(E::ITEMS_KEY))
    }
}
