//! File-backed object store.
//!
//! Keeps every record in a map owned by a [`FileRepository`] instance and
//! flushes the whole map to a single JSON file on `save()`. The file holds
//! one object keyed `"<Class>.<id>"`, each value tagged with `__class__`.
//!
//! There is no referential integrity engine here: callers cascade deletes
//! through `hbnb_core::storage::relations::delete_with_dependents`.
//!
//! # Example
//!
//! ```rust,ignore
//! use hbnb::storage::file::FileRepository;
//!
//! let repo = FileRepository::open("file.json").await?;
//! ```

mod repository;

pub use repository::FileRepository;
