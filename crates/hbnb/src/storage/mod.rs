//! Storage backend implementations.
//!
//! This module provides concrete implementations of the `Storage` trait
//! defined in `hbnb_core::storage`. Backends are compiled in via feature
//! flags and selected at runtime from [`Config`].
//!
//! # Feature Flags
//!
//! - `file` (default): JSON file backend
//! - `sqlite` (default): SQLite backend using `rusqlite` and `tokio-rusqlite`

#[cfg(not(any(feature = "file", feature = "sqlite")))]
compile_error!(
    "No storage backend selected. Enable 'file' or 'sqlite' feature. \
    Example: cargo build -p hbnb --features sqlite"
);

#[cfg(feature = "file")]
pub mod file;

#[cfg(feature = "sqlite")]
pub mod sqlite;

use std::sync::Arc;

use hbnb_core::storage::{Backend, Result, Storage};

use crate::config::Config;

#[cfg(feature = "file")]
pub use file::FileRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;

/// Opens the backend selected by `config`.
pub async fn open_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage: Arc<dyn Storage> = match config.storage {
        #[cfg(feature = "file")]
        Backend::File => Arc::new(FileRepository::open(&config.file_path).await?),
        #[cfg(feature = "sqlite")]
        Backend::Db => Arc::new(SqliteRepository::new(&config.sqlite_path).await?),
        #[allow(unreachable_patterns)]
        other => {
            return Err(hbnb_core::storage::RepositoryError::ConnectionFailed(format!(
                "storage backend '{other}' is not compiled in"
            )))
        }
    };

    tracing::info!(backend = %storage.backend(), "Opened storage");
    Ok(storage)
}
