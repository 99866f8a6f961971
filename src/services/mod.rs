//! Business logic services

pub mod catalog;

use std::sync::Arc;

use crate::{pagination::PagingConfig, repository::{MemoryStore, Repository}};

pub use catalog::{AuthorService, BookService, EntityService, PublisherService, TagService};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: BookService,
    pub authors: AuthorService,
    pub publishers: PublisherService,
    pub tags: TagService,
}

impl Services {
    /// Create all services over the Postgres repositories
    pub fn new(repository: Repository, paging: PagingConfig) -> Self {
        Self {
            books: BookService::new(Arc::new(repository.books), paging),
            authors: AuthorService::new(Arc::new(repository.authors), paging),
            publishers: PublisherService::new(Arc::new(repository.publishers), paging),
            tags: TagService::new(Arc::new(repository.tags), paging),
        }
    }

    /// Create all services over one shared in-memory store
    pub fn in_memory(store: MemoryStore, paging: PagingConfig) -> Self {
        let store = Arc::new(store);
        Self {
            books: BookService::new(store.clone(), paging),
            authors: AuthorService::new(store.clone(), paging),
            publishers: PublisherService::new(store.clone(), paging),
            tags: TagService::new(store, paging),
        }
    }
}
