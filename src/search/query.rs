use crate::domain::{BookRecord, Shelf};
use crate::error::{BookstoreError, BookstoreResult};
use crate::store::{BOOK_COLUMNS, BookStore, decode_record};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::debug;

pub struct Query {
    pool: SqlitePool,
}

/// One `(title, authors)` group on a shelf with its summed copy count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfEntry {
    pub title: String,
    pub authors: String,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfDetail {
    pub shelf: Shelf,
    pub books: Vec<ShelfEntry>,
    pub distinct_books_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventorySummary {
    pub shelves: Vec<Shelf>,
}

impl Query {
    pub fn new(store: &BookStore) -> Self {
        Self {
            pool: store.pool.clone(),
        }
    }

    /// Books whose title or authors contain `query`, ignoring case.
    ///
    /// The query is trimmed first. A blank query matches nothing rather than
    /// everything. `%` and `_` are matched literally.
    pub async fn search(&self, query: &str) -> BookstoreResult<Vec<BookRecord>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let pattern = format!("%{}%", escape_like(query));
        let sql = format!(
            r#"
            SELECT {BOOK_COLUMNS}
            FROM books
            WHERE title LIKE ? ESCAPE '\' OR authors LIKE ? ESCAPE '\'
            ORDER BY id
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await?;
        debug!(query, hits = rows.len(), "searched books");

        rows.iter().map(decode_record).collect()
    }

    /// Shelves that hold at least one book, in letter order.
    pub async fn distinct_shelves(&self) -> BookstoreResult<Vec<Shelf>> {
        let rows = sqlx::query(
            "SELECT shelves, MIN(id) AS first_id FROM books GROUP BY shelves ORDER BY shelves",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut shelves = Vec::with_capacity(rows.len());
        for row in rows {
            let value: String = row.try_get("shelves")?;
            let first_id: i64 = row.try_get("first_id")?;
            let shelf = Shelf::from_str(&value).map_err(|e| BookstoreError::CorruptRecord {
                id: first_id,
                reason: e.to_string(),
            })?;
            shelves.push(shelf);
        }

        Ok(shelves)
    }

    /// Groups the books on `shelf` by `(title, authors)` and sums their copies.
    ///
    /// Groups are ordered by title, then authors. An empty shelf yields no groups.
    pub async fn shelf_detail(&self, shelf: Shelf) -> BookstoreResult<ShelfDetail> {
        let rows = sqlx::query(
            r#"
            SELECT title, authors, SUM(number_of_books) AS total
            FROM books
            WHERE shelves = ?
            GROUP BY title, authors
            ORDER BY title, authors
            "#,
        )
        .bind(shelf.as_str())
        .fetch_all(&self.pool)
        .await?;

        let mut books = Vec::with_capacity(rows.len());
        for row in rows {
            books.push(ShelfEntry {
                title: row.try_get("title")?,
                authors: row.try_get("authors")?,
                total: row.try_get("total")?,
            });
        }
        debug!(%shelf, groups = books.len(), "computed shelf detail");

        Ok(ShelfDetail {
            shelf,
            distinct_books_count: books.len(),
            books,
        })
    }

    pub async fn inventory_summary(&self) -> BookstoreResult<InventorySummary> {
        Ok(InventorySummary {
            shelves: self.distinct_shelves().await?,
        })
    }
}

fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
