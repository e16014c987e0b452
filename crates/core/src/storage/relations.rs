//! Relationship traversal and cascade helpers built on [`Storage`].
//!
//! Backends with a join engine answer [`Storage::related`] directly; for the
//! others these helpers scan `all(child_kind)` and match the foreign key.

use uuid::Uuid;

use crate::models::{Amenity, City, Entity, EntityKind, Model, Place, Relation, Review};

use super::{Result, Storage};

/// Gets a record and narrows it to a concrete model type.
pub async fn get_as<M: Model>(storage: &dyn Storage, id: Uuid) -> Result<Option<M>> {
    Ok(storage.get(M::KIND, id).await?.and_then(M::from_entity))
}

/// Gets every record of a model type, oldest first.
pub async fn all_as<M: Model>(storage: &dyn Storage) -> Result<Vec<M>> {
    let mut entities: Vec<Entity> = storage.all(M::KIND).await?.into_values().collect();
    sort_by_creation(&mut entities);
    Ok(entities.into_iter().filter_map(M::from_entity).collect())
}

/// Resolves the children of `parent_id` along `relation`.
///
/// Amenities come back in link order. Every other relation is ordered by
/// creation time, then ID. Both hold on every backend.
pub async fn children(
    storage: &dyn Storage,
    relation: Relation,
    parent_id: Uuid,
) -> Result<Vec<Entity>> {
    if let Some(found) = storage.related(relation, parent_id).await? {
        return Ok(found);
    }

    if relation == Relation::PlaceAmenities {
        let Some(place) = get_as::<Place>(storage, parent_id).await? else {
            return Ok(Vec::new());
        };
        let mut amenities = Vec::with_capacity(place.amenity_ids.len());
        for amenity_id in place.amenity_ids {
            if let Some(amenity) = storage.get(EntityKind::Amenity, amenity_id).await? {
                amenities.push(amenity);
            }
        }
        return Ok(amenities);
    }

    let mut found: Vec<Entity> = storage
        .all(relation.child())
        .await?
        .into_values()
        .filter(|child| relation.foreign_key(child) == Some(parent_id))
        .collect();
    sort_by_creation(&mut found);
    Ok(found)
}

async fn children_as<M: Model>(
    storage: &dyn Storage,
    relation: Relation,
    parent_id: Uuid,
) -> Result<Vec<M>> {
    Ok(children(storage, relation, parent_id)
        .await?
        .into_iter()
        .filter_map(M::from_entity)
        .collect())
}

pub async fn cities_of_state(storage: &dyn Storage, state_id: Uuid) -> Result<Vec<City>> {
    children_as(storage, Relation::StateCities, state_id).await
}

pub async fn places_of_city(storage: &dyn Storage, city_id: Uuid) -> Result<Vec<Place>> {
    children_as(storage, Relation::CityPlaces, city_id).await
}

pub async fn reviews_of_place(storage: &dyn Storage, place_id: Uuid) -> Result<Vec<Review>> {
    children_as(storage, Relation::PlaceReviews, place_id).await
}

pub async fn amenities_of_place(storage: &dyn Storage, place_id: Uuid) -> Result<Vec<Amenity>> {
    children_as(storage, Relation::PlaceAmenities, place_id).await
}

/// Relations whose children are deleted together with their parent.
fn dependent_relations(kind: EntityKind) -> &'static [Relation] {
    match kind {
        EntityKind::State => &[Relation::StateCities],
        EntityKind::City => &[Relation::CityPlaces],
        EntityKind::Place => &[Relation::PlaceReviews],
        EntityKind::User => &[Relation::UserPlaces, Relation::UserReviews],
        EntityKind::Review | EntityKind::Amenity => &[],
    }
}

/// Stages the deletion of `entity` and, on backends that do not cascade on
/// their own, of everything that depends on it.
///
/// Deleting an amenity by hand also unlinks it from every place. Nothing is
/// persisted; the caller still has to `save()`. Returns the number of
/// records staged for deletion.
pub async fn delete_with_dependents(storage: &dyn Storage, entity: &Entity) -> Result<usize> {
    storage.delete(entity).await?;
    if storage.enforces_cascade() {
        return Ok(1);
    }

    let mut removed = 1;
    let mut parents = vec![entity.clone()];
    while let Some(parent) = parents.pop() {
        for relation in dependent_relations(parent.kind()) {
            for child in children(storage, *relation, parent.id()).await? {
                storage.delete(&child).await?;
                removed += 1;
                parents.push(child);
            }
        }

        if let Entity::Amenity(amenity) = &parent {
            unlink_amenity_everywhere(storage, amenity.id).await?;
        }
    }

    tracing::debug!(
        entity = %entity.kind(),
        entity_id = %entity.id(),
        removed,
        "Cascaded delete"
    );
    Ok(removed)
}

async fn unlink_amenity_everywhere(storage: &dyn Storage, amenity_id: Uuid) -> Result<()> {
    for mut place in all_as::<Place>(storage).await? {
        if place.unlink_amenity(amenity_id) {
            let mut entity = place.into_entity();
            entity.touch();
            storage.new(entity).await?;
        }
    }
    Ok(())
}

fn sort_by_creation(entities: &mut [Entity]) {
    entities.sort_by_key(|entity| (entity.created_at(), entity.id()));
}
