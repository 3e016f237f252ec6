use crate::domain::{Book, BookId, BookRecord, Shelf};
use crate::error::{BookstoreError, BookstoreResult};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

pub(crate) const BOOK_COLUMNS: &str = "id, title, authors, original_language, first_published, \
     sales_millions, genre, shelves, number_of_books, price";

/// Persistent collection of [`BookRecord`]s backed by SQLite.
///
/// Cloning is cheap and shares the underlying connection pool. Every call
/// goes straight to the database; nothing is cached in memory.
#[derive(Clone)]
pub struct BookStore {
    pub(crate) pool: SqlitePool,
}

impl BookStore {
    /// Opens (creating if missing) the database file at `db_path` and brings
    /// its schema up to date.
    pub async fn open(db_path: &Path) -> BookstoreResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        Self::from_pool(pool).await
    }

    /// Connects to an explicit sqlx SQLite URL and runs the embedded migrations.
    pub async fn connect(url: &str) -> BookstoreResult<Self> {
        let pool = SqlitePool::connect(url).await?;
        Self::from_pool(pool).await
    }

    /// A private in-memory database.
    ///
    /// Pinned to a single connection that is never recycled, since each
    /// SQLite memory connection is its own database.
    pub async fn in_memory() -> BookstoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> BookstoreResult<Self> {
        sqlx::migrate!().run(&pool).await?;
        debug!("book store ready");
        Ok(BookStore { pool })
    }

    /// Inserts a new row and returns its generated id.
    ///
    /// Text fields longer than their column are truncated and decimals are
    /// quantized to two places first; a decimal too wide for its column fails
    /// with [`BookstoreError::DecimalOverflow`].
    pub async fn create(&self, book: &Book) -> BookstoreResult<BookId> {
        let book = book.truncated().quantized()?;
        let res = sqlx::query(
            "INSERT INTO books (title, authors, original_language, first_published,
                sales_millions, genre, shelves, number_of_books, price)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&book.title)
        .bind(&book.authors)
        .bind(&book.original_language)
        .bind(book.first_published)
        .bind(book.sales_millions.to_string())
        .bind(&book.genre)
        .bind(book.shelves.as_str())
        .bind(book.number_of_books)
        .bind(book.price.to_string())
        .execute(&self.pool)
        .await?;

        let id = BookId(res.last_insert_rowid());
        info!(%id, title = %book.title, "created book");
        Ok(id)
    }

    pub async fn get(&self, id: BookId) -> BookstoreResult<BookRecord> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => decode_record(&row),
            None => Err(BookstoreError::NotFound(id)),
        }
    }

    /// Replaces every field of the row `id` and returns the stored result.
    pub async fn update(&self, id: BookId, book: &Book) -> BookstoreResult<BookRecord> {
        let book = book.truncated().quantized()?;
        let res = sqlx::query(
            "UPDATE books SET title = ?, authors = ?, original_language = ?,
                first_published = ?, sales_millions = ?, genre = ?, shelves = ?,
                number_of_books = ?, price = ?
             WHERE id = ?",
        )
        .bind(&book.title)
        .bind(&book.authors)
        .bind(&book.original_language)
        .bind(book.first_published)
        .bind(book.sales_millions.to_string())
        .bind(&book.genre)
        .bind(book.shelves.as_str())
        .bind(book.number_of_books)
        .bind(book.price.to_string())
        .bind(id.get())
        .execute(&self.pool)
        .await?;

        if res.rows_affected() == 0 {
            return Err(BookstoreError::NotFound(id));
        }

        info!(%id, "updated book");
        Ok(BookRecord { id, book })
    }

    /// Permanently removes the row `id`.
    pub async fn delete(&self, id: BookId) -> BookstoreResult<()> {
        let res = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id.get())
            .execute(&self.pool)
            .await?;

        if res.rows_affected() == 0 {
            return Err(BookstoreError::NotFound(id));
        }

        info!(%id, "deleted book");
        Ok(())
    }

    /// Every stored book, oldest first.
    pub async fn list_all(&self) -> BookstoreResult<Vec<BookRecord>> {
        let sql = format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        debug!(count = rows.len(), "listed books");

        rows.iter().map(decode_record).collect()
    }

    pub async fn count(&self) -> BookstoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

/// Decodes a row selected with [`BOOK_COLUMNS`].
pub(crate) fn decode_record(row: &SqliteRow) -> BookstoreResult<BookRecord> {
    let id: i64 = row.try_get("id")?;
    let corrupt = |reason: String| BookstoreError::CorruptRecord { id, reason };

    let sales: String = row.try_get("sales_millions")?;
    let price: String = row.try_get("price")?;
    let shelves: String = row.try_get("shelves")?;

    Ok(BookRecord {
        id: BookId(id),
        book: Book {
            title: row.try_get("title")?,
            authors: row.try_get("authors")?,
            original_language: row.try_get("original_language")?,
            first_published: row.try_get("first_published")?,
            sales_millions: Decimal::from_str(&sales)
                .map_err(|e| corrupt(format!("sales_millions {sales:?}: {e}")))?,
            genre: row.try_get("genre")?,
            shelves: Shelf::from_str(&shelves).map_err(|e| corrupt(e.to_string()))?,
            number_of_books: row.try_get("number_of_books")?,
            price: Decimal::from_str(&price)
                .map_err(|e| corrupt(format!("price {price:?}: {e}")))?,
        },
    })
}
