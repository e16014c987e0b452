//! Place search across location and amenity constraints.

mod engine;
mod filter;

pub use engine::search_places;
pub use filter::PlaceSearchFilter;
