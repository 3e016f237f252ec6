use crate::domain::BookId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookstoreError {
    #[error(transparent)]
    Validation(#[from] crate::validation::ValidationErrors),

    #[error("book not found: {0}")]
    NotFound(BookId),

    #[error(transparent)]
    DecimalOverflow(#[from] crate::domain::DecimalOverflow),

    #[error(transparent)]
    Import(#[from] crate::import::ImportError),

    #[error("Storage unavailable: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("stored book {id} is corrupt: {reason}")]
    CorruptRecord { id: i64, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type BookstoreResult<T> = Result<T, BookstoreError>;
