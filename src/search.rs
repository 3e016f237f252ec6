//! Read-side queries over the book store.
//!
//! Everything here is recomputed from the database on each call:
//!
//! - **[`query::Query::search`]**: case-insensitive substring match on title or authors
//! - **[`query::Query::distinct_shelves`]**: which shelves currently hold any book
//! - **[`query::Query::shelf_detail`]**: per-shelf copies summed by `(title, authors)`
//! - **[`query::Query::inventory_summary`]**: the shelf listing used for drill-down
//!
//! ```rust,no_run
//! use bookstore_core::domain::Shelf;
//! use bookstore_core::search::Query;
//! use bookstore_core::store::BookStore;
//! use std::path::Path;
//!
//! # async fn run() -> bookstore_core::BookstoreResult<()> {
//! let store = BookStore::open(Path::new("books.db")).await?;
//! let query = Query::new(&store);
//!
//! let hits = query.search("tolkien").await?;
//! let detail = query.shelf_detail(Shelf::A).await?;
//! println!("{} hits, {} titles on shelf A", hits.len(), detail.distinct_books_count);
//! # Ok(())
//! # }
//! ```

pub mod query;

pub use query::{InventorySummary, Query, ShelfDetail, ShelfEntry};
