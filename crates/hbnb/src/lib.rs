//! Storage backends, configuration and entity operations for hbnb.
//!
//! The functional core (entity model, storage contract, place search)
//! lives in `hbnb_core`; this crate supplies the I/O around it.

pub mod api;
pub mod config;
pub mod state;
pub mod storage;
