//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. Every foreign key cascades on delete and is deferred
//! to commit time, so the order in which a unit of work stages its changes
//! does not matter. Upserts use `ON CONFLICT ... DO UPDATE` rather than
//! `INSERT OR REPLACE`, which would delete the row and fire the cascades.

use hbnb_core::models::{EntityKind, Relation};

/// Pragmas applied to every connection before the schema.
pub const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- States table
CREATE TABLE IF NOT EXISTS states (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Cities table
CREATE TABLE IF NOT EXISTS cities (
    id TEXT PRIMARY KEY,
    state_id TEXT NOT NULL,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (state_id) REFERENCES states(id)
        ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED
);

-- Users table
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL,
    password TEXT NOT NULL,
    first_name TEXT,
    last_name TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Amenities table
CREATE TABLE IF NOT EXISTS amenities (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Places table
CREATE TABLE IF NOT EXISTS places (
    id TEXT PRIMARY KEY,
    city_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    number_rooms INTEGER NOT NULL DEFAULT 0,
    number_bathrooms INTEGER NOT NULL DEFAULT 0,
    max_guest INTEGER NOT NULL DEFAULT 0,
    price_by_night INTEGER NOT NULL DEFAULT 0,
    latitude REAL,
    longitude REAL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (city_id) REFERENCES cities(id)
        ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED,
    FOREIGN KEY (user_id) REFERENCES users(id)
        ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED
);

-- Reviews table
CREATE TABLE IF NOT EXISTS reviews (
    id TEXT PRIMARY KEY,
    place_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    text TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (place_id) REFERENCES places(id)
        ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED,
    FOREIGN KEY (user_id) REFERENCES users(id)
        ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED
);

-- Place/amenity links
CREATE TABLE IF NOT EXISTS place_amenity (
    place_id TEXT NOT NULL,
    amenity_id TEXT NOT NULL,
    position INTEGER NOT NULL,
    PRIMARY KEY (place_id, amenity_id),
    FOREIGN KEY (place_id) REFERENCES places(id)
        ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED,
    FOREIGN KEY (amenity_id) REFERENCES amenities(id)
        ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED
);

-- Indexes for relationship traversal
CREATE INDEX IF NOT EXISTS idx_cities_state_id ON cities(state_id);
CREATE INDEX IF NOT EXISTS idx_places_city_id ON places(city_id);
CREATE INDEX IF NOT EXISTS idx_places_user_id ON places(user_id);
CREATE INDEX IF NOT EXISTS idx_reviews_place_id ON reviews(place_id);
CREATE INDEX IF NOT EXISTS idx_reviews_user_id ON reviews(user_id);
CREATE INDEX IF NOT EXISTS idx_place_amenity_amenity_id ON place_amenity(amenity_id);
"#;

// Column lists, in the order the row converters expect.
const STATE_COLUMNS: &str = "id, name, created_at, updated_at";
const CITY_COLUMNS: &str = "id, state_id, name, created_at, updated_at";
const USER_COLUMNS: &str = "id, email, password, first_name, last_name, created_at, updated_at";
const AMENITY_COLUMNS: &str = "id, name, created_at, updated_at";
const PLACE_COLUMNS: &str = "id, city_id, user_id, name, description, number_rooms, \
    number_bathrooms, max_guest, price_by_night, latitude, longitude, created_at, updated_at";
const REVIEW_COLUMNS: &str = "id, place_id, user_id, text, created_at, updated_at";

// Upserts
pub const UPSERT_STATE: &str = r#"
INSERT INTO states (id, name, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT(id) DO UPDATE SET name = excluded.name, updated_at = excluded.updated_at
"#;

pub const UPSERT_CITY: &str = r#"
INSERT INTO cities (id, state_id, name, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT(id) DO UPDATE SET
    state_id = excluded.state_id,
    name = excluded.name,
    updated_at = excluded.updated_at
"#;

pub const UPSERT_USER: &str = r#"
INSERT INTO users (id, email, password, first_name, last_name, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
ON CONFLICT(id) DO UPDATE SET
    email = excluded.email,
    password = excluded.password,
    first_name = excluded.first_name,
    last_name = excluded.last_name,
    updated_at = excluded.updated_at
"#;

pub const UPSERT_AMENITY: &str = r#"
INSERT INTO amenities (id, name, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT(id) DO UPDATE SET name = excluded.name, updated_at = excluded.updated_at
"#;

pub const UPSERT_PLACE: &str = r#"
INSERT INTO places (id, city_id, user_id, name, description, number_rooms, number_bathrooms,
    max_guest, price_by_night, latitude, longitude, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
ON CONFLICT(id) DO UPDATE SET
    city_id = excluded.city_id,
    user_id = excluded.user_id,
    name = excluded.name,
    description = excluded.description,
    number_rooms = excluded.number_rooms,
    number_bathrooms = excluded.number_bathrooms,
    max_guest = excluded.max_guest,
    price_by_night = excluded.price_by_night,
    latitude = excluded.latitude,
    longitude = excluded.longitude,
    updated_at = excluded.updated_at
"#;

pub const UPSERT_REVIEW: &str = r#"
INSERT INTO reviews (id, place_id, user_id, text, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
ON CONFLICT(id) DO UPDATE SET
    place_id = excluded.place_id,
    user_id = excluded.user_id,
    text = excluded.text,
    updated_at = excluded.updated_at
"#;

// Place/amenity links
pub const DELETE_PLACE_AMENITIES: &str = r#"
DELETE FROM place_amenity
WHERE place_id = ?1
"#;

pub const INSERT_PLACE_AMENITY: &str = r#"
INSERT INTO place_amenity (place_id, amenity_id, position)
VALUES (?1, ?2, ?3)
"#;

pub const SELECT_PLACE_AMENITY_IDS: &str = r#"
SELECT amenity_id
FROM place_amenity
WHERE place_id = ?1
ORDER BY position ASC
"#;

/// Table holding records of `kind`.
pub fn table(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::State => "states",
        EntityKind::City => "cities",
        EntityKind::Place => "places",
        EntityKind::User => "users",
        EntityKind::Review => "reviews",
        EntityKind::Amenity => "amenities",
    }
}

fn columns(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::State => STATE_COLUMNS,
        EntityKind::City => CITY_COLUMNS,
        EntityKind::Place => PLACE_COLUMNS,
        EntityKind::User => USER_COLUMNS,
        EntityKind::Review => REVIEW_COLUMNS,
        EntityKind::Amenity => AMENITY_COLUMNS,
    }
}

pub fn select_by_id(kind: EntityKind) -> String {
    format!(
        "SELECT {} FROM {} WHERE id = ?1",
        columns(kind),
        table(kind)
    )
}

pub fn select_all(kind: EntityKind) -> String {
    format!(
        "SELECT {} FROM {} ORDER BY created_at ASC, id ASC",
        columns(kind),
        table(kind)
    )
}

pub fn delete_by_id(kind: EntityKind) -> String {
    format!("DELETE FROM {} WHERE id = ?1", table(kind))
}

/// Query returning the children of `?1` along `relation`, in the same
/// columns as [`select_all`] for the child kind.
pub fn select_related(relation: Relation) -> String {
    let child = relation.child();
    match relation {
        Relation::PlaceAmenities => format!(
            "SELECT {} FROM amenities a \
             INNER JOIN place_amenity pa ON a.id = pa.amenity_id \
             WHERE pa.place_id = ?1 \
             ORDER BY pa.position ASC",
            prefixed("a", AMENITY_COLUMNS)
        ),
        _ => format!(
            "SELECT {} FROM {} WHERE {} = ?1 ORDER BY created_at ASC, id ASC",
            columns(child),
            table(child),
            foreign_key_column(relation)
        ),
    }
}

fn foreign_key_column(relation: Relation) -> &'static str {
    match relation {
        Relation::StateCities => "state_id",
        Relation::CityPlaces => "city_id",
        Relation::UserPlaces | Relation::UserReviews => "user_id",
        Relation::PlaceReviews => "place_id",
        Relation::PlaceAmenities => "amenity_id",
    }
}

fn prefixed(alias: &str, columns: &str) -> String {
    columns
        .split(',')
        .map(|column| format!("{alias}.{}", column.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}
