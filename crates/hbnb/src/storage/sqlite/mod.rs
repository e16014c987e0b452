//! SQLite storage backend implementation.
//!
//! This module provides a SQLite-based implementation of the `Storage` trait
//! using `rusqlite` for synchronous operations and `tokio-rusqlite` for async wrapping.
//!
//! Foreign keys are enforced per connection and cascade on delete, so this
//! backend reports `enforces_cascade() == true`.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
