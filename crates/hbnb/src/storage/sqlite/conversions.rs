//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use chrono::{DateTime, SecondsFormat, Utc};
use hbnb_core::models::{Amenity, City, Entity, EntityKind, Place, Review, State, User};
use rusqlite::Row;
use uuid::Uuid;

// ============================================================================
// Entity conversions
// ============================================================================

/// Converts a row selected with the column list for `kind`.
pub fn row_to_entity(kind: EntityKind, row: &Row) -> rusqlite::Result<Entity> {
    Ok(match kind {
        EntityKind::State => Entity::State(row_to_state(row)?),
        EntityKind::City => Entity::City(row_to_city(row)?),
        EntityKind::Place => Entity::Place(row_to_place(row)?),
        EntityKind::User => Entity::User(row_to_user(row)?),
        EntityKind::Review => Entity::Review(row_to_review(row)?),
        EntityKind::Amenity => Entity::Amenity(row_to_amenity(row)?),
    })
}

/// Expected columns: id, name, created_at, updated_at
pub fn row_to_state(row: &Row) -> rusqlite::Result<State> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let created_at: String = row.get(2)?;
    let updated_at: String = row.get(3)?;

    Ok(State {
        id: parse_uuid(&id)?,
        name,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Expected columns: id, state_id, name, created_at, updated_at
pub fn row_to_city(row: &Row) -> rusqlite::Result<City> {
    let id: String = row.get(0)?;
    let state_id: String = row.get(1)?;
    let name: String = row.get(2)?;
    let created_at: String = row.get(3)?;
    let updated_at: String = row.get(4)?;

    Ok(City {
        id: parse_uuid(&id)?,
        state_id: parse_uuid(&state_id)?,
        name,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Expected columns: id, email, password, first_name, last_name, created_at, updated_at
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let id: String = row.get(0)?;
    let email: String = row.get(1)?;
    let password: String = row.get(2)?;
    let first_name: Option<String> = row.get(3)?;
    let last_name: Option<String> = row.get(4)?;
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;

    Ok(User {
        id: parse_uuid(&id)?,
        email,
        password,
        first_name,
        last_name,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Expected columns: id, name, created_at, updated_at
pub fn row_to_amenity(row: &Row) -> rusqlite::Result<Amenity> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let created_at: String = row.get(2)?;
    let updated_at: String = row.get(3)?;

    Ok(Amenity {
        id: parse_uuid(&id)?,
        name,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Convert a SQLite row to a Place.
///
/// Expected columns: id, city_id, user_id, name, description, number_rooms,
/// number_bathrooms, max_guest, price_by_night, latitude, longitude,
/// created_at, updated_at
///
/// `amenity_ids` is left empty; links live in `place_amenity` and are
/// attached by the repository.
pub fn row_to_place(row: &Row) -> rusqlite::Result<Place> {
    let id: String = row.get(0)?;
    let city_id: String = row.get(1)?;
    let user_id: String = row.get(2)?;
    let name: String = row.get(3)?;
    let description: Option<String> = row.get(4)?;
    let number_rooms: i64 = row.get(5)?;
    let number_bathrooms: i64 = row.get(6)?;
    let max_guest: i64 = row.get(7)?;
    let price_by_night: i64 = row.get(8)?;
    let latitude: Option<f64> = row.get(9)?;
    let longitude: Option<f64> = row.get(10)?;
    let created_at: String = row.get(11)?;
    let updated_at: String = row.get(12)?;

    Ok(Place {
        id: parse_uuid(&id)?,
        city_id: parse_uuid(&city_id)?,
        user_id: parse_uuid(&user_id)?,
        name,
        description,
        number_rooms,
        number_bathrooms,
        max_guest,
        price_by_night,
        latitude,
        longitude,
        amenity_ids: Vec::new(),
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Expected columns: id, place_id, user_id, text, created_at, updated_at
pub fn row_to_review(row: &Row) -> rusqlite::Result<Review> {
    let id: String = row.get(0)?;
    let place_id: String = row.get(1)?;
    let user_id: String = row.get(2)?;
    let text: String = row.get(3)?;
    let created_at: String = row.get(4)?;
    let updated_at: String = row.get(5)?;

    Ok(Review {
        id: parse_uuid(&id)?,
        place_id: parse_uuid(&place_id)?,
        user_id: parse_uuid(&user_id)?,
        text,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

// ============================================================================
// Helper functions
// ============================================================================

/// Parse a UUID from string.
pub fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Format a DateTime for SQLite storage.
///
/// Fixed-width nanosecond precision, so text order is time order and values
/// round-trip exactly.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_datetime_round_trip() {
        let dt = Utc::now();
        let formatted = format_datetime(&dt);
        let parsed = parse_datetime(&formatted).unwrap();
        assert_eq!(dt, parsed);
    }

    #[test]
    fn test_format_datetime_is_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let fractional = whole + Duration::nanoseconds(1);

        let a = format_datetime(&whole);
        let b = format_datetime(&fractional);
        assert_eq!(a, "2024-01-15T10:30:00.000000000Z");
        assert_eq!(a.len(), b.len());
        assert!(a < b);
    }

    #[test]
    fn test_parse_datetime_invalid() {
        assert!(parse_datetime("not-a-date").is_err());
    }

    #[test]
    fn test_parse_uuid_valid() {
        let uuid = Uuid::new_v4();
        let parsed = parse_uuid(&uuid.to_string()).unwrap();
        assert_eq!(uuid, parsed);
    }

    #[test]
    fn test_parse_uuid_invalid() {
        assert!(parse_uuid("not-a-uuid").is_err());
    }
}
