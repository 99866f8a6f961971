//! In-memory store.
//!
//! Keeps every table in one [`Tables`] value behind a lock. Books hold only
//! the ids of their authors, tags and publisher and are hydrated on read, so
//! updates to shared records are visible through every book referencing
//! them. Filtering evaluates the same [`Predicate`] trees the SQL store
//! compiles.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use super::store::{PagedStore, Store};
use crate::{
    error::{AppError, AppResult},
    models::{Author, Book, Entity, EntityKind, Listing, Publisher, Tag},
    pagination::{Page, PageRequest},
    query::Predicate,
};

/// Stored book with its relations reduced to ids
#[derive(Debug, Clone)]
struct BookRow {
    book: Book,
    publisher_id: i64,
    author_ids: BTreeSet<i64>,
    tag_ids: BTreeSet<i64>,
}

#[derive(Debug, Default)]
struct Tables {
    authors: BTreeMap<i64, Author>,
    publishers: BTreeMap<i64, Publisher>,
    tags: BTreeMap<i64, Tag>,
    books: BTreeMap<i64, BookRow>,
    sequences: HashMap<EntityKind, i64>,
}

impl Tables {
    fn next_id(&mut self, kind: EntityKind) -> i64 {
        let seq = self.sequences.entry(kind).or_insert(0);
        *seq += 1;
        *seq
    }

    fn hydrate(&self, row: &BookRow) -> Book {
        let mut book = row.book.clone();
        book.publisher = self.publishers.get(&row.publisher_id).cloned();
        book.authors = row
            .author_ids
            .iter()
            .filter_map(|id| self.authors.get(id).cloned())
            .collect();
        book.tags = row
            .tag_ids
            .iter()
            .filter_map(|id| self.tags.get(id).cloned())
            .collect();
        book
    }

    fn books(&self) -> Vec<Book> {
        self.books.values().map(|row| self.hydrate(row)).collect()
    }

    /// Reduce a book to a row, checking that every referenced record exists
    fn book_row(&self, mut book: Book) -> AppResult<BookRow> {
        let publisher_id = book
            .publisher_id()
            .ok_or_else(|| AppError::MalformedRequest("publisher: Must reference a stored publisher".to_string()))?;
        if !self.publishers.contains_key(&publisher_id) {
            return Err(missing_reference(EntityKind::Publisher, publisher_id));
        }

        let author_ids = referenced_ids(&book.authors, &self.authors, EntityKind::Author)?;
        let tag_ids = referenced_ids(&book.tags, &self.tags, EntityKind::Tag)?;

        book.publisher = None;
        book.authors.clear();
        book.tags.clear();
        Ok(BookRow { book, publisher_id, author_ids, tag_ids })
    }
}

fn missing_reference(kind: EntityKind, id: i64) -> AppError {
    AppError::MalformedRequest(format!("{} with id {} does not exist", kind, id))
}

fn still_referenced(kind: EntityKind, id: i64) -> AppError {
    AppError::MalformedRequest(format!("{} with id {} is still referenced by a book", kind, id))
}

fn referenced_ids<T: Entity>(
    records: &[T],
    table: &BTreeMap<i64, T>,
    kind: EntityKind,
) -> AppResult<BTreeSet<i64>> {
    records
        .iter()
        .map(|record| {
            let id = record.id().ok_or_else(|| {
                AppError::MalformedRequest(format!("{} must be saved before it is referenced", kind))
            })?;
            if table.contains_key(&id) {
                Ok(id)
            } else {
                Err(missing_reference(kind, id))
            }
        })
        .collect()
}

fn filtered_page<E: Listing>(mut records: Vec<E>, predicate: &Predicate, page: PageRequest) -> Page<E> {
    records.retain(|r| predicate.matches(r));
    records.sort_by(E::listing_order);
    Page::slice(records, page)
}

/// Shared in-memory store; clones share the same tables
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| AppError::StoreUnavailable("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| AppError::StoreUnavailable("memory store lock poisoned".to_string()))
    }
}

/// Kinds stored as plain records in their own table
trait PlainTable: Entity {
    fn table(tables: &Tables) -> &BTreeMap<i64, Self>;

    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self>;

    fn is_referenced(tables: &Tables, id: i64) -> bool;
}

impl PlainTable for Author {
    fn table(tables: &Tables) -> &BTreeMap<i64, Self> {
        &tables.authors
    }

    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self> {
        &mut tables.authors
    }

    fn is_referenced(tables: &Tables, id: i64) -> bool {
        tables.books.values().any(|row| row.author_ids.contains(&id))
    }
}

impl PlainTable for Publisher {
    fn table(tables: &Tables) -> &BTreeMap<i64, Self> {
        &tables.publishers
    }

    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self> {
        &mut tables.publishers
    }

    fn is_referenced(tables: &Tables, id: i64) -> bool {
        tables.books.values().any(|row| row.publisher_id == id)
    }
}

impl PlainTable for Tag {
    fn table(tables: &Tables) -> &BTreeMap<i64, Self> {
        &tables.tags
    }

    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<i64, Self> {
        &mut tables.tags
    }

    fn is_referenced(tables: &Tables, id: i64) -> bool {
        tables.books.values().any(|row| row.tag_ids.contains(&id))
    }
}

#[async_trait]
impl<E: PlainTable> Store<E> for MemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<E>> {
        Ok(E::table(&*self.read()?).get(&id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<E>> {
        Ok(E::table(&*self.read()?).values().cloned().collect())
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        Ok(E::table(&*self.read()?).contains_key(&id))
    }

    async fn save(&self, mut record: E) -> AppResult<E> {
        let mut tables = self.write()?;
        let id = match record.id() {
            Some(id) if E::table(&tables).contains_key(&id) => id,
            Some(id) => return Err(AppError::not_found(E::KIND, id)),
            None => tables.next_id(E::KIND),
        };
        record.set_id(id);
        E::table_mut(&mut tables).insert(id, record.clone());
        Ok(record)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        let mut tables = self.write()?;
        if E::is_referenced(&tables, id) {
            return Err(still_referenced(E::KIND, id));
        }
        E::table_mut(&mut tables).remove(&id);
        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(E::table(&*self.read()?).len() as i64)
    }
}

#[async_trait]
impl<E: PlainTable + Listing> PagedStore<E> for MemoryStore {
    async fn find_page(&self, page: PageRequest) -> AppResult<Page<E>> {
        PagedStore::<E>::query(self, &Predicate::always(), page).await
    }

    async fn query(&self, predicate: &Predicate, page: PageRequest) -> AppResult<Page<E>> {
        let records: Vec<E> = E::table(&*self.read()?).values().cloned().collect();
        Ok(filtered_page(records, predicate, page))
    }
}

#[async_trait]
impl Store<Book> for MemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let tables = self.read()?;
        Ok(tables.books.get(&id).map(|row| tables.hydrate(row)))
    }

    async fn find_all(&self) -> AppResult<Vec<Book>> {
        Ok(self.read()?.books())
    }

    async fn exists_by_id(&self, id: i64) -> AppResult<bool> {
        Ok(self.read()?.books.contains_key(&id))
    }

    async fn save(&self, book: Book) -> AppResult<Book> {
        let mut tables = self.write()?;
        let mut row = tables.book_row(book)?;
        let id = match row.book.id {
            Some(id) if tables.books.contains_key(&id) => id,
            Some(id) => return Err(AppError::not_found(EntityKind::Book, id)),
            None => tables.next_id(EntityKind::Book),
        };
        row.book.id = Some(id);
        let saved = tables.hydrate(&row);
        tables.books.insert(id, row);
        Ok(saved)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        self.write()?.books.remove(&id);
        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.read()?.books.len() as i64)
    }
}

#[async_trait]
impl PagedStore<Book> for MemoryStore {
    async fn find_page(&self, page: PageRequest) -> AppResult<Page<Book>> {
        PagedStore::<Book>::query(self, &Predicate::always(), page).await
    }

    async fn query(&self, predicate: &Predicate, page: PageRequest) -> AppResult<Page<Book>> {
        let books = self.read()?.books();
        Ok(filtered_page(books, predicate, page))
    }
}
