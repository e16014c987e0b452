//! Place search over states, cities and amenities.

use serde_json::Value;

use hbnb_core::search::{search_places, PlaceSearchFilter};
use hbnb_core::storage::Result;

use super::{records, Record};
use crate::state::AppState;

/// Runs a place search from a JSON body.
///
/// `{}` returns every place. Returned records omit amenity links.
pub async fn places_search(app: &AppState, body: &Value) -> Result<Vec<Record>> {
    let filter = PlaceSearchFilter::from_body(body)?;
    let places = search_places(app.storage.as_ref(), &filter).await?;

    Ok(records(places)
        .into_iter()
        .map(|mut record| {
            record.remove("amenity_ids");
            record.remove("amenities");
            record
        })
        .collect())
}
