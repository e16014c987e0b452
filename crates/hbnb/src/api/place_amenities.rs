//! Links between places and amenities.

use hbnb_core::models::{Amenity, Model, Place};
use hbnb_core::storage::relations::amenities_of_place;
use hbnb_core::storage::{RepositoryError, Result};

use super::{fetch, persist, record, records, Record};
use crate::state::AppState;

/// Result of linking an amenity to a place.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkOutcome {
    /// The linked amenity.
    pub record: Record,
    /// `false` when the link already existed and nothing changed.
    pub created: bool,
}

/// Lists the amenities of a place in link order.
pub async fn list_place_amenities(app: &AppState, place_id: &str) -> Result<Vec<Record>> {
    let place = fetch::<Place>(app, place_id).await?;
    Ok(records(amenities_of_place(app.storage.as_ref(), place.id).await?))
}

/// Links an amenity to a place. Linking twice is a no-op.
pub async fn link_place_amenity(
    app: &AppState,
    place_id: &str,
    amenity_id: &str,
) -> Result<LinkOutcome> {
    let _guard = app.write_lock().await;
    let mut place = fetch::<Place>(app, place_id).await?;
    let amenity = fetch::<Amenity>(app, amenity_id).await?;

    if !place.link_amenity(amenity.id) {
        return Ok(LinkOutcome {
            record: record(amenity),
            created: false,
        });
    }

    let mut entity = place.into_entity();
    entity.touch();
    persist(app, entity).await?;

    tracing::debug!(place_id = %place_id, amenity_id = %amenity.id, "Linked amenity");
    Ok(LinkOutcome {
        record: record(amenity),
        created: true,
    })
}

/// Unlinks an amenity from a place. Fails with `NotFound` when the two are
/// not linked.
pub async fn unlink_place_amenity(
    app: &AppState,
    place_id: &str,
    amenity_id: &str,
) -> Result<Record> {
    let _guard = app.write_lock().await;
    let mut place = fetch::<Place>(app, place_id).await?;
    let amenity = fetch::<Amenity>(app, amenity_id).await?;

    if !place.unlink_amenity(amenity.id) {
        return Err(RepositoryError::not_found("Amenity", amenity_id));
    }

    let mut entity = place.into_entity();
    entity.touch();
    persist(app, entity).await?;
    Ok(Record::new())
}
