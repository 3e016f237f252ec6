use crate::error::{BookstoreError, BookstoreResult};
use std::path::PathBuf;

pub const DATABASE_ENV: &str = "BOOKSTORE_DATABASE";
pub const LOG_ENV: &str = "BOOKSTORE_LOG";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime settings for the `bookstore` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    pub log_filter: String,
}

impl Config {
    /// Resolves settings from the process environment.
    ///
    /// - `BOOKSTORE_DATABASE`: database file, else [`Config::default_database_path`]
    /// - `BOOKSTORE_LOG`, then `RUST_LOG`: tracing filter, else `info`
    pub fn from_env() -> BookstoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Config::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> BookstoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = match lookup(DATABASE_ENV).filter(|v| !v.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => Self::default_database_path()?,
        };

        let log_filter = lookup(LOG_ENV)
            .or_else(|| lookup("RUST_LOG"))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned());

        Ok(Config {
            database_path,
            log_filter,
        })
    }

    /// `{data_dir}/bookstore/books.db`, e.g. `~/.local/share/bookstore/books.db` on Linux.
    ///
    /// # Errors
    /// [`BookstoreError::Config`] if the platform data directory cannot be determined.
    pub fn default_database_path() -> BookstoreResult<PathBuf> {
        let data = dirs::data_dir()
            .ok_or_else(|| BookstoreError::Config("data directory not found".into()))?;
        Ok(data.join("bookstore").join("books.db"))
    }
}
