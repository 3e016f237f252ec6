//! # bookstore_core
//!
//! Inventory records for a bookstore: validated create/edit/delete of book
//! entries kept in SQLite, substring search, and per-shelf stock summaries.
//!
//! ## Features
//!
//! - **Book Records**: one row per stocked title, on one of shelves `A`..`H`
//! - **Validation**: pure field checks returning every failing field at once
//! - **Queries**: case-insensitive search over title and authors, shelf listings
//!   and per-shelf copy totals grouped by title and authors
//! - **Bulk Import**: row-by-row CSV loading
//! - **Robust Error Handling**: one error type with automatic conversions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bookstore_core::{BookService, BookstoreResult};
//! use bookstore_core::store::BookStore;
//! use bookstore_core::validation::BookInput;
//! use rust_decimal::Decimal;
//! use std::path::Path;
//!
//! # async fn run() -> BookstoreResult<()> {
//! let store = BookStore::open(Path::new("books.db")).await?;
//! let service = BookService::new(store);
//!
//! let dune = service
//!     .create_book(&BookInput {
//!         title: "Dune".into(),
//!         authors: "Frank Herbert".into(),
//!         original_language: "English".into(),
//!         first_published: 1965,
//!         sales_millions: Decimal::new(20, 0),
//!         genre: "Science fiction".into(),
//!         shelves: "A".into(),
//!         number_of_books: 3,
//!         price: Decimal::new(1499, 2),
//!     })
//!     .await?;
//!
//! let hits = service.search_books("herbert").await?;
//! assert_eq!(hits[0].id, dune.id);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **[`domain`]**: `Book`, `BookRecord`, `BookId`, `Shelf`
//! - **[`validation`]**: field rules, `Clock` for the current year
//! - **[`store`]**: SQLite persistence via `sqlx`
//! - **[`search`]**: search and shelf aggregation queries
//! - **[`import`]**: CSV bulk import
//! - **[`service`]**: the operations a front end calls
//! - **[`config`]**: environment-driven settings for the binary
//! - **[`error`]**: unified error handling
//!
//! ## Error Handling
//!
//! All operations return [`BookstoreResult<T>`], wrapping [`BookstoreError`].
//! Rejected input comes back as `BookstoreError::Validation` carrying a
//! field → message map; unknown ids as `BookstoreError::NotFound`; database
//! failures as `BookstoreError::Storage` and are not retried.

pub mod config;
pub mod domain;
pub mod error;
pub mod import;
pub mod search;
pub mod service;
pub mod store;
pub mod validation;

/// Re-exports the most commonly used types for convenience.
pub use error::{BookstoreError, BookstoreResult};
pub use service::BookService;
