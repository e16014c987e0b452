use std::collections::HashSet;

use uuid::Uuid;

use crate::models::{Amenity, City, Place, State};
use crate::storage::relations::{all_as, cities_of_state, get_as, places_of_city};
use crate::storage::{Result, Storage};

use super::PlaceSearchFilter;

/// Finds the places matching a filter.
///
/// Location constraints are OR-ed: a place qualifies if its city is listed
/// or belongs to a listed state. With no location constraint every place is
/// a candidate. Amenity constraints are AND-ed: a place must offer every
/// listed amenity that exists. Unknown IDs are skipped, never errors.
///
/// Results keep first-seen order and contain each place once.
pub async fn search_places(storage: &dyn Storage, filter: &PlaceSearchFilter) -> Result<Vec<Place>> {
    let candidates = if filter.has_no_location() {
        all_as::<Place>(storage).await?
    } else {
        location_candidates(storage, filter).await?
    };

    let required = resolve_amenities(storage, filter).await?;
    let total = candidates.len();

    let places: Vec<Place> = if required.is_empty() {
        candidates
    } else {
        candidates
            .into_iter()
            .filter(|place| required.iter().all(|id| place.has_amenity(*id)))
            .collect()
    };

    tracing::debug!(
        backend = %storage.backend(),
        candidates = total,
        required_amenities = required.len(),
        matched = places.len(),
        "Place search finished"
    );

    Ok(places)
}

async fn location_candidates(
    storage: &dyn Storage,
    filter: &PlaceSearchFilter,
) -> Result<Vec<Place>> {
    let mut seen = HashSet::new();
    let mut places = Vec::new();

    for state_id in filter.state_ids() {
        if get_as::<State>(storage, state_id).await?.is_none() {
            continue;
        }
        for city in cities_of_state(storage, state_id).await? {
            let found = places_of_city(storage, city.id).await?;
            extend_unique(&mut places, &mut seen, found);
        }
    }

    for city_id in filter.city_ids() {
        if get_as::<City>(storage, city_id).await?.is_none() {
            continue;
        }
        let found = places_of_city(storage, city_id).await?;
        extend_unique(&mut places, &mut seen, found);
    }

    Ok(places)
}

/// Existing amenity IDs from the filter, deduplicated in request order.
async fn resolve_amenities(storage: &dyn Storage, filter: &PlaceSearchFilter) -> Result<Vec<Uuid>> {
    let mut resolved = Vec::new();
    for amenity_id in filter.amenity_ids() {
        if resolved.contains(&amenity_id) {
            continue;
        }
        if get_as::<Amenity>(storage, amenity_id).await?.is_some() {
            resolved.push(amenity_id);
        }
    }
    Ok(resolved)
}

fn extend_unique(places: &mut Vec<Place>, seen: &mut HashSet<Uuid>, found: Vec<Place>) {
    for place in found {
        if seen.insert(place.id) {
            places.push(place);
        }
    }
}
