//! Functional core for hbnb.
//!
//! Holds the entity model, the storage contract both backends implement,
//! and the place search engine. Nothing in this crate performs I/O on its
//! own; everything that touches a disk or a database lives behind the
//! [`storage::Storage`] trait.

pub mod models;
pub mod search;
pub mod storage;
