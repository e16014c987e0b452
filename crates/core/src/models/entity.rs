//! Type-erased entity records shared by every storage backend.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::types::{Amenity, City, Place, Review, State, User};

/// Discriminant for the six entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    State,
    City,
    Place,
    User,
    Review,
    Amenity,
}

impl EntityKind {
    /// Every kind, parents before children.
    pub const ALL: [EntityKind; 6] = [
        EntityKind::State,
        EntityKind::City,
        EntityKind::User,
        EntityKind::Amenity,
        EntityKind::Place,
        EntityKind::Review,
    ];

    /// Class name used in records (`__class__`) and file storage keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::State => "State",
            EntityKind::City => "City",
            EntityKind::Place => "Place",
            EntityKind::User => "User",
            EntityKind::Review => "Review",
            EntityKind::Amenity => "Amenity",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown entity kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown entity kind: {0}")]
pub struct UnknownEntityKind(pub String);

impl FromStr for EntityKind {
    type Err = UnknownEntityKind;

    /// Accepts class names (`City`) and their lowercase plurals (`cities`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "state" | "states" => Ok(EntityKind::State),
            "city" | "cities" => Ok(EntityKind::City),
            "place" | "places" => Ok(EntityKind::Place),
            "user" | "users" => Ok(EntityKind::User),
            "review" | "reviews" => Ok(EntityKind::Review),
            "amenity" | "amenities" => Ok(EntityKind::Amenity),
            _ => Err(UnknownEntityKind(s.to_string())),
        }
    }
}

/// A record of any entity type.
///
/// Serializes as the record itself tagged with `__class__`, which is also the
/// on-disk shape of the file backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__class__")]
pub enum Entity {
    State(State),
    City(City),
    Place(Place),
    User(User),
    Review(Review),
    Amenity(Amenity),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::State(_) => EntityKind::State,
            Entity::City(_) => EntityKind::City,
            Entity::Place(_) => EntityKind::Place,
            Entity::User(_) => EntityKind::User,
            Entity::Review(_) => EntityKind::Review,
            Entity::Amenity(_) => EntityKind::Amenity,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Entity::State(e) => e.id,
            Entity::City(e) => e.id,
            Entity::Place(e) => e.id,
            Entity::User(e) => e.id,
            Entity::Review(e) => e.id,
            Entity::Amenity(e) => e.id,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            Entity::State(e) => e.created_at,
            Entity::City(e) => e.created_at,
            Entity::Place(e) => e.created_at,
            Entity::User(e) => e.created_at,
            Entity::Review(e) => e.created_at,
            Entity::Amenity(e) => e.created_at,
        }
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        match self {
            Entity::State(e) => e.updated_at,
            Entity::City(e) => e.updated_at,
            Entity::Place(e) => e.updated_at,
            Entity::User(e) => e.updated_at,
            Entity::Review(e) => e.updated_at,
            Entity::Amenity(e) => e.updated_at,
        }
    }

    /// Refreshes `updated_at`. Every mutation path calls this before saving.
    pub fn touch(&mut self) {
        let now = Utc::now();
        match self {
            Entity::State(e) => e.updated_at = now,
            Entity::City(e) => e.updated_at = now,
            Entity::Place(e) => e.updated_at = now,
            Entity::User(e) => e.updated_at = now,
            Entity::Review(e) => e.updated_at = now,
            Entity::Amenity(e) => e.updated_at = now,
        }
    }

    /// Key used by the file backend: `<Class>.<id>`.
    pub fn storage_key(&self) -> String {
        storage_key(self.kind(), self.id())
    }

    /// Outward JSON shape: every field, both timestamps and `__class__`.
    ///
    /// User passwords are stripped.
    pub fn to_record(&self) -> Map<String, Value> {
        let mut record = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        if matches!(self, Entity::User(_)) {
            record.remove("password");
        }
        record
    }
}

/// Builds the file backend key for a kind and ID.
pub fn storage_key(kind: EntityKind, id: Uuid) -> String {
    format!("{kind}.{id}")
}

/// Conversion between concrete entity structs and [`Entity`].
pub trait Model: Sized + Clone {
    const KIND: EntityKind;

    fn into_entity(self) -> Entity;

    /// Returns `None` when the entity is of another kind.
    fn from_entity(entity: Entity) -> Option<Self>;
}

macro_rules! impl_model {
    ($ty:ident) => {
        impl Model for $ty {
            const KIND: EntityKind = EntityKind::$ty;

            fn into_entity(self) -> Entity {
                Entity::$ty(self)
            }

            fn from_entity(entity: Entity) -> Option<Self> {
                match entity {
                    Entity::$ty(inner) => Some(inner),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Entity {
            fn from(value: $ty) -> Self {
                Entity::$ty(value)
            }
        }
    };
}

impl_model!(State);
impl_model!(City);
impl_model!(Place);
impl_model!(User);
impl_model!(Review);
impl_model!(Amenity);

/// A one-to-many or many-to-many edge between two entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    StateCities,
    CityPlaces,
    PlaceReviews,
    PlaceAmenities,
    UserPlaces,
    UserReviews,
}

impl Relation {
    pub fn parent(&self) -> EntityKind {
        match self {
            Relation::StateCities => EntityKind::State,
            Relation::CityPlaces => EntityKind::City,
            Relation::PlaceReviews | Relation::PlaceAmenities => EntityKind::Place,
            Relation::UserPlaces | Relation::UserReviews => EntityKind::User,
        }
    }

    pub fn child(&self) -> EntityKind {
        match self {
            Relation::StateCities => EntityKind::City,
            Relation::CityPlaces | Relation::UserPlaces => EntityKind::Place,
            Relation::PlaceReviews | Relation::UserReviews => EntityKind::Review,
            Relation::PlaceAmenities => EntityKind::Amenity,
        }
    }

    /// The parent ID stored on `child` for foreign-key relations.
    ///
    /// Returns `None` for [`Relation::PlaceAmenities`], which is a link
    /// table rather than a foreign key, and for children of the wrong kind.
    pub fn foreign_key(&self, child: &Entity) -> Option<Uuid> {
        match (self, child) {
            (Relation::StateCities, Entity::City(c)) => Some(c.state_id),
            (Relation::CityPlaces, Entity::Place(p)) => Some(p.city_id),
            (Relation::UserPlaces, Entity::Place(p)) => Some(p.user_id),
            (Relation::PlaceReviews, Entity::Review(r)) => Some(r.place_id),
            (Relation::UserReviews, Entity::Review(r)) => Some(r.user_id),
            _ => None,
        }
    }
}
