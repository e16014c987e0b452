use serde_json::Value;
use uuid::Uuid;

use crate::models::{as_object, RequestError};

/// Location and amenity constraints for a place search.
///
/// Each list holds raw ID strings as received; entries that are not valid
/// IDs simply never resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceSearchFilter {
    pub states: Vec<String>,
    pub cities: Vec<String>,
    pub amenities: Vec<String>,
}

impl PlaceSearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(mut self, id: impl ToString) -> Self {
        self.states.push(id.to_string());
        self
    }

    pub fn with_city(mut self, id: impl ToString) -> Self {
        self.cities.push(id.to_string());
        self
    }

    pub fn with_amenity(mut self, id: impl ToString) -> Self {
        self.amenities.push(id.to_string());
        self
    }

    /// Reads a filter from a decoded request body.
    ///
    /// The body must be an object. A key whose value is not an array is
    /// treated as absent. Array entries are kept even when they are not
    /// strings, so a list of unusable IDs still counts as a constraint that
    /// matches nothing.
    pub fn from_body(body: &Value) -> Result<Self, RequestError> {
        let body = as_object(body)?;
        let list = |key: &str| -> Vec<String> {
            match body.get(key) {
                Some(Value::Array(items)) => items
                    .iter()
                    .map(|item| match item {
                        Value::String(id) => id.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
                _ => Vec::new(),
            }
        };

        Ok(Self {
            states: list("states"),
            cities: list("cities"),
            amenities: list("amenities"),
        })
    }

    /// True when neither states nor cities constrain the location.
    pub fn has_no_location(&self) -> bool {
        self.states.is_empty() && self.cities.is_empty()
    }

    pub(crate) fn state_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        parse_ids(&self.states)
    }

    pub(crate) fn city_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        parse_ids(&self.cities)
    }

    pub(crate) fn amenity_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        parse_ids(&self.amenities)
    }
}

fn parse_ids(raw: &[String]) -> impl Iterator<Item = Uuid> + '_ {
    raw.iter().filter_map(|id| Uuid::parse_str(id).ok())
}
