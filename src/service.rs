use crate::domain::{Book, BookId, BookRecord, Shelf};
use crate::error::{BookstoreError, BookstoreResult};
use crate::import::{self, ImportReport};
use crate::search::{InventorySummary, Query, ShelfDetail};
use crate::store::BookStore;
use crate::validation::{self, BookInput, Clock, SystemClock};
use std::path::Path;
use tracing::warn;

/// The operations a front end (web routes, the CLI) performs on the inventory.
///
/// Owns a [`BookStore`] handle and the [`Clock`] used by validation; construct
/// one per application and hand it to whatever dispatches requests.
pub struct BookService<C = SystemClock> {
    store: BookStore,
    query: Query,
    clock: C,
}

impl BookService<SystemClock> {
    pub fn new(store: BookStore) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<C: Clock> BookService<C> {
    pub fn with_clock(store: BookStore, clock: C) -> Self {
        BookService {
            query: Query::new(&store),
            store,
            clock,
        }
    }

    pub fn store(&self) -> &BookStore {
        &self.store
    }

    /// Validates `input` and stores it as a new book.
    ///
    /// # Errors
    /// [`BookstoreError::Validation`] when any rule fails; nothing is written then.
    pub async fn create_book(&self, input: &BookInput) -> BookstoreResult<BookRecord> {
        let book = self.validate(input)?;
        let id = self.store.create(&book).await?;
        self.store.get(id).await
    }

    /// Validates `input` and replaces every field of book `id` with it.
    ///
    /// # Errors
    /// [`BookstoreError::NotFound`] if `id` does not exist, or
    /// [`BookstoreError::Validation`] when any rule fails.
    pub async fn edit_book(&self, id: BookId, input: &BookInput) -> BookstoreResult<BookRecord> {
        // An unknown id wins over invalid input.
        self.store.get(id).await?;
        let book = self.validate(input)?;
        self.store.update(id, &book).await
    }

    pub async fn delete_book(&self, id: BookId) -> BookstoreResult<()> {
        self.store.delete(id).await
    }

    pub async fn get_book(&self, id: BookId) -> BookstoreResult<BookRecord> {
        self.store.get(id).await
    }

    pub async fn list_all_books(&self) -> BookstoreResult<Vec<BookRecord>> {
        self.store.list_all().await
    }

    pub async fn search_books(&self, query: &str) -> BookstoreResult<Vec<BookRecord>> {
        self.query.search(query).await
    }

    pub async fn list_shelves(&self) -> BookstoreResult<Vec<Shelf>> {
        self.query.distinct_shelves().await
    }

    pub async fn shelf_detail(&self, shelf: Shelf) -> BookstoreResult<ShelfDetail> {
        self.query.shelf_detail(shelf).await
    }

    pub async fn inventory_summary(&self) -> BookstoreResult<InventorySummary> {
        self.query.inventory_summary().await
    }

    pub async fn import_csv_file(&self, path: &Path) -> BookstoreResult<ImportReport> {
        import::import_csv_file(&self.store, path).await
    }

    fn validate(&self, input: &BookInput) -> BookstoreResult<Book> {
        validation::validate(input, self.clock.current_year()).map_err(|errors| {
            warn!(%errors, "rejected book input");
            BookstoreError::Validation(errors)
        })
    }
}
