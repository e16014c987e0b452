use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A top-level administrative region that owns cities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl State {
    /// Creates a new state with a fresh ID and equal timestamps.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A city inside a [`State`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: Uuid,
    pub state_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl City {
    /// Creates a new city belonging to the given state.
    pub fn new(state_id: Uuid, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            state_id,
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A registered user. Owns places and writes reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Never exposed through [`crate::models::Entity::to_record`].
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with the given credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password: password.into(),
            first_name: None,
            last_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the first and last name.
    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }
}

/// A rentable listing inside a [`City`], owned by a [`User`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: Uuid,
    pub city_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub number_rooms: i64,
    #[serde(default)]
    pub number_bathrooms: i64,
    #[serde(default)]
    pub max_guest: i64,
    #[serde(default)]
    pub price_by_night: i64,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Linked amenities, kept in link order without duplicates.
    #[serde(default)]
    pub amenity_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Place {
    /// Creates a new place with zeroed capacity fields and no amenities.
    pub fn new(city_id: Uuid, user_id: Uuid, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            city_id,
            user_id,
            name: name.into(),
            description: None,
            number_rooms: 0,
            number_bathrooms: 0,
            max_guest: 0,
            price_by_night: 0,
            latitude: None,
            longitude: None,
            amenity_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Links an amenity. Returns `false` if it was already linked.
    pub fn link_amenity(&mut self, amenity_id: Uuid) -> bool {
        if self.amenity_ids.contains(&amenity_id) {
            return false;
        }
        self.amenity_ids.push(amenity_id);
        true
    }

    /// Unlinks an amenity. Returns `false` if it was not linked.
    pub fn unlink_amenity(&mut self, amenity_id: Uuid) -> bool {
        let before = self.amenity_ids.len();
        self.amenity_ids.retain(|id| *id != amenity_id);
        self.amenity_ids.len() != before
    }

    pub fn has_amenity(&self, amenity_id: Uuid) -> bool {
        self.amenity_ids.contains(&amenity_id)
    }
}

/// A user's review of a [`Place`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub place_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    /// Creates a new review of `place_id` written by `user_id`.
    pub fn new(place_id: Uuid, user_id: Uuid, text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            place_id,
            user_id,
            text: text.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A feature a place can offer (wifi, pool, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Amenity {
    /// Creates a new amenity.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entities_have_equal_timestamps() {
        let state = State::new("California");
        assert_eq!(state.created_at, state.updated_at);

        let city = City::new(state.id, "San Francisco");
        assert_eq!(city.state_id, state.id);
        assert_eq!(city.created_at, city.updated_at);
    }

    #[test]
    fn test_new_entities_get_distinct_ids() {
        let a = Amenity::new("Wifi");
        let b = Amenity::new("Wifi");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_builders_fill_optional_fields() {
        let user = User::new("ada@example.com", "pw").with_name("Ada", "Lovelace");
        assert_eq!(user.first_name.as_deref(), Some("Ada"));
        assert_eq!(user.last_name.as_deref(), Some("Lovelace"));

        let place = Place::new(Uuid::new_v4(), user.id, "Loft").with_description("Top floor");
        assert_eq!(place.description.as_deref(), Some("Top floor"));
        assert_eq!(place.created_at, place.updated_at);
    }

    #[test]
    fn test_place_link_amenity_is_idempotent() {
        let mut place = Place::new(Uuid::new_v4(), Uuid::new_v4(), "Loft");
        let amenity_id = Uuid::new_v4();

        assert!(place.link_amenity(amenity_id));
        assert!(!place.link_amenity(amenity_id));
        assert_eq!(place.amenity_ids, vec![amenity_id]);
        assert!(place.has_amenity(amenity_id));
    }

    #[test]
    fn test_place_unlink_amenity() {
        let mut place = Place::new(Uuid::new_v4(), Uuid::new_v4(), "Loft");
        let amenity_id = Uuid::new_v4();
        place.link_amenity(amenity_id);

        assert!(place.unlink_amenity(amenity_id));
        assert!(!place.unlink_amenity(amenity_id));
        assert!(place.amenity_ids.is_empty());
    }

    #[test]
    fn test_place_deserializes_with_missing_optional_fields() {
        let json = serde_json::json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "city_id": "550e8400-e29b-41d4-a716-446655440001",
            "user_id": "550e8400-e29b-41d4-a716-446655440002",
            "name": "Cabin",
            "created_at": "2024-06-15T10:30:00Z",
            "updated_at": "2024-06-15T10:30:00Z"
        });

        let place: Place = serde_json::from_value(json).unwrap();
        assert_eq!(place.name, "Cabin");
        assert_eq!(place.price_by_night, 0);
        assert!(place.amenity_ids.is_empty());
        assert!(place.latitude.is_none());
    }
}
