//! Bulk loading of books from CSV.
//!
//! Each row is written with its own [`BookStore::create`] call. There is no
//! surrounding transaction: the first row that cannot be read or stored
//! aborts the import, and rows written before it stay in the store.
//!
//! Rows bypass [`crate::validation`]; values only have to parse into the
//! typed fields. Decimals are rounded half to even at two places and must
//! fit their column's digit limit.

use crate::domain::{Book, BookId, PRICE_MAX_DIGITS, SALES_MAX_DIGITS, Shelf, quantize};
use crate::error::BookstoreResult;
use crate::store::BookStore;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("CSV row {row}: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("CSV row {row}: invalid {column:?} value {value:?}")]
    InvalidField {
        row: usize,
        column: &'static str,
        value: String,
    },
}

impl ImportError {
    /// 1-based data row (header excluded) that aborted the import.
    pub fn row(&self) -> usize {
        match self {
            ImportError::Csv { row, .. } | ImportError::InvalidField { row, .. } => *row,
        }
    }
}

/// Outcome of a completed import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub ids: Vec<BookId>,
}

impl ImportReport {
    pub fn imported(&self) -> usize {
        self.ids.len()
    }
}

/// Column layout of the bookstore CSV export.
#[derive(Debug, Deserialize)]
struct ImportRow {
    #[serde(rename = "Book")]
    title: String,
    #[serde(rename = "Author(s)")]
    authors: String,
    #[serde(rename = "Original language")]
    original_language: String,
    #[serde(rename = "First published")]
    first_published: String,
    #[serde(rename = "Approximate sales in millions")]
    sales_millions: String,
    #[serde(rename = "Genre", default)]
    genre: String,
    #[serde(rename = "Shelves")]
    shelves: String,
    #[serde(rename = "Number of Books")]
    number_of_books: String,
    #[serde(rename = "Price")]
    price: String,
}

impl ImportRow {
    fn into_book(self, row: usize) -> Result<Book, ImportError> {
        Ok(Book {
            first_published: parse_field(row, "First published", &self.first_published)?,
            sales_millions: parse_decimal(
                row,
                "Approximate sales in millions",
                &self.sales_millions,
                SALES_MAX_DIGITS,
            )?,
            shelves: parse_field::<Shelf>(row, "Shelves", &self.shelves)?,
            number_of_books: parse_field(row, "Number of Books", &self.number_of_books)?,
            price: parse_decimal(row, "Price", &self.price, PRICE_MAX_DIGITS)?,
            title: self.title,
            authors: self.authors,
            original_language: self.original_language,
            genre: self.genre,
        })
    }
}

/// Parses a decimal cell and quantizes it to two places; a value wider than
/// `max_digits` is rejected like an unparseable one.
fn parse_decimal(
    row: usize,
    column: &'static str,
    value: &str,
    max_digits: u32,
) -> Result<Decimal, ImportError> {
    let parsed: Decimal = parse_field(row, column, value)?;
    quantize(column, parsed, max_digits).map_err(|_| ImportError::InvalidField {
        row,
        column,
        value: value.to_owned(),
    })
}

fn parse_field<T: FromStr>(row: usize, column: &'static str, value: &str) -> Result<T, ImportError> {
    value.parse().map_err(|_| ImportError::InvalidField {
        row,
        column,
        value: value.to_owned(),
    })
}

/// Imports every row of the CSV file at `path`.
pub async fn import_csv_file(store: &BookStore, path: &Path) -> BookstoreResult<ImportReport> {
    let file = File::open(path)?;
    info!(path = %path.display(), "importing books");
    import_csv(store, file).await
}

/// Imports every row read from `reader`, which must start with a header line.
pub async fn import_csv<R: Read>(store: &BookStore, reader: R) -> BookstoreResult<ImportReport> {
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut report = ImportReport::default();

    for (idx, result) in csv.deserialize::<ImportRow>().enumerate() {
        let row = idx + 1;
        let book = match result
            .map_err(|source| ImportError::Csv { row, source })
            .and_then(|parsed| parsed.into_book(row))
        {
            Ok(book) => book,
            Err(e) => {
                warn!(row, written = report.imported(), "import aborted: {e}");
                return Err(e.into());
            }
        };

        let id = store.create(&book).await.inspect_err(|e| {
            warn!(row, written = report.imported(), "import aborted: {e}");
        })?;
        report.ids.push(id);
    }

    info!(imported = report.imported(), "import finished");
    Ok(report)
}
