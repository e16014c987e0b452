//! Request payloads for creating and updating entities.
//!
//! Create requests are read from a decoded JSON object after the caller has
//! checked required fields in its own order. Update requests are allow-lists:
//! protected keys are dropped, anything else that is not a mutable field of
//! the entity is rejected.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::error::RequestError;
use super::types::{Amenity, City, Place, Review, State, User};

/// Keys no update may overwrite, regardless of entity type.
const BASE_PROTECTED: [&str; 4] = ["id", "created_at", "updated_at", "__class__"];

/// Returns the body as a JSON object.
pub fn as_object(body: &Value) -> Result<&Map<String, Value>, RequestError> {
    body.as_object().ok_or(RequestError::NotAnObject)
}

/// Returns the value of a required key.
pub fn require_field<'a>(
    body: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, RequestError> {
    body.get(field).ok_or(RequestError::MissingField(field))
}

/// Deserializes a create request from a JSON object. Unknown keys are ignored.
pub fn parse_create<T: DeserializeOwned>(body: &Map<String, Value>) -> Result<T, RequestError> {
    serde_json::from_value(Value::Object(body.clone()))
        .map_err(|e| RequestError::InvalidBody(e.to_string()))
}

/// An allow-listed partial update of one entity type.
pub trait UpdateRequest: DeserializeOwned {
    type Target;

    /// Entity specific keys dropped before parsing, on top of the id,
    /// timestamps and class tag.
    const PROTECTED: &'static [&'static str];

    fn apply_to(self, target: &mut Self::Target);

    fn is_protected(key: &str) -> bool {
        BASE_PROTECTED.contains(&key) || Self::PROTECTED.contains(&key)
    }
}

/// Parses an update body, silently dropping protected keys.
pub fn parse_update<R: UpdateRequest>(body: &Value) -> Result<R, RequestError> {
    let body = as_object(body)?;
    let allowed: Map<String, Value> = body
        .iter()
        .filter(|(key, _)| !R::is_protected(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    serde_json::from_value(Value::Object(allowed))
        .map_err(|e| RequestError::InvalidBody(e.to_string()))
}

// ============================================================================
// State
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStateRequest {
    pub name: String,
}

impl CreateStateRequest {
    pub fn into_state(self) -> State {
        State::new(self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateStateRequest {
    #[serde(default)]
    pub name: Option<String>,
}

impl UpdateRequest for UpdateStateRequest {
    type Target = State;
    const PROTECTED: &'static [&'static str] = &[];

    fn apply_to(self, state: &mut State) {
        if let Some(name) = self.name {
            state.name = name;
        }
    }
}

// ============================================================================
// City
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCityRequest {
    pub name: String,
}

impl CreateCityRequest {
    /// The state comes from the request path, never from the body.
    pub fn into_city(self, state_id: Uuid) -> City {
        City::new(state_id, self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCityRequest {
    #[serde(default)]
    pub name: Option<String>,
}

impl UpdateRequest for UpdateCityRequest {
    type Target = City;
    const PROTECTED: &'static [&'static str] = &["state_id"];

    fn apply_to(self, city: &mut City) {
        if let Some(name) = self.name {
            city.name = name;
        }
    }
}

// ============================================================================
// Amenity
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAmenityRequest {
    pub name: String,
}

impl CreateAmenityRequest {
    pub fn into_amenity(self) -> Amenity {
        Amenity::new(self.name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateAmenityRequest {
    #[serde(default)]
    pub name: Option<String>,
}

impl UpdateRequest for UpdateAmenityRequest {
    type Target = Amenity;
    const PROTECTED: &'static [&'static str] = &[];

    fn apply_to(self, amenity: &mut Amenity) {
        if let Some(name) = self.name {
            amenity.name = name;
        }
    }
}

// ============================================================================
// User
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl CreateUserRequest {
    pub fn into_user(self) -> User {
        let mut user = User::new(self.email, self.password);
        user.first_name = self.first_name;
        user.last_name = self.last_name;
        user
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl UpdateRequest for UpdateUserRequest {
    type Target = User;
    const PROTECTED: &'static [&'static str] = &["email"];

    fn apply_to(self, user: &mut User) {
        if let Some(password) = self.password {
            user.password = password;
        }
        if let Some(first_name) = self.first_name {
            user.first_name = Some(first_name);
        }
        if let Some(last_name) = self.last_name {
            user.last_name = Some(last_name);
        }
    }
}

// ============================================================================
// Place
// ============================================================================

/// `user_id` stays a string: an unparsable ID is reported as a missing user,
/// not as a malformed body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaceRequest {
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub number_rooms: Option<i64>,
    #[serde(default)]
    pub number_bathrooms: Option<i64>,
    #[serde(default)]
    pub max_guest: Option<i64>,
    #[serde(default)]
    pub price_by_night: Option<i64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl CreatePlaceRequest {
    /// Builds the place once the caller has resolved the owning user.
    pub fn into_place(self, city_id: Uuid, user_id: Uuid) -> Place {
        let mut place = Place::new(city_id, user_id, self.name);
        place.description = self.description;
        place.number_rooms = self.number_rooms.unwrap_or_default();
        place.number_bathrooms = self.number_bathrooms.unwrap_or_default();
        place.max_guest = self.max_guest.unwrap_or_default();
        place.price_by_night = self.price_by_night.unwrap_or_default();
        place.latitude = self.latitude;
        place.longitude = self.longitude;
        place
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdatePlaceRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub number_rooms: Option<i64>,
    #[serde(default)]
    pub number_bathrooms: Option<i64>,
    #[serde(default)]
    pub max_guest: Option<i64>,
    #[serde(default)]
    pub price_by_night: Option<i64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl UpdateRequest for UpdatePlaceRequest {
    type Target = Place;
    // Amenity links change only through the link/unlink operations.
    const PROTECTED: &'static [&'static str] = &["user_id", "city_id", "amenity_ids", "amenities"];

    fn apply_to(self, place: &mut Place) {
        if let Some(name) = self.name {
            place.name = name;
        }
        if let Some(description) = self.description {
            place.description = Some(description);
        }
        if let Some(number_rooms) = self.number_rooms {
            place.number_rooms = number_rooms;
        }
        if let Some(number_bathrooms) = self.number_bathrooms {
            place.number_bathrooms = number_bathrooms;
        }
        if let Some(max_guest) = self.max_guest {
            place.max_guest = max_guest;
        }
        if let Some(price_by_night) = self.price_by_night {
            place.price_by_night = price_by_night;
        }
        if let Some(latitude) = self.latitude {
            place.latitude = Some(latitude);
        }
        if let Some(longitude) = self.longitude {
            place.longitude = Some(longitude);
        }
    }
}

// ============================================================================
// Review
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReviewRequest {
    pub user_id: String,
    pub text: String,
}

impl CreateReviewRequest {
    pub fn into_review(self, place_id: Uuid, user_id: Uuid) -> Review {
        Review::new(place_id, user_id, self.text)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateReviewRequest {
    #[serde(default)]
    pub text: Option<String>,
}

impl UpdateRequest for UpdateReviewRequest {
    type Target = Review;
    const PROTECTED: &'static [&'static str] = &["user_id", "place_id"];

    fn apply_to(self, review: &mut Review) {
        if let Some(text) = self.text {
            review.text = text;
        }
    }
}
