//! SQLite repository implementation.
//!
//! Implements the `Storage` trait from `hbnb_core::storage` using SQLite.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use hbnb_core::models::{Entity, EntityKind, Relation};
use hbnb_core::storage::{Backend, RepositoryError, Result, Storage};

use super::conversions::{format_datetime, parse_uuid, row_to_entity};
use super::error::{map_save_error, map_tokio_rusqlite_error};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// A change staged by `new`/`delete` and applied on `save`.
#[derive(Debug, Clone)]
enum PendingChange {
    Upsert(Entity),
    Delete(EntityKind, Uuid),
}

/// SQLite-based repository implementation.
///
/// Staged changes are kept in memory. Reads replay them inside a
/// transaction that is rolled back afterwards, so they observe the unit of
/// work without committing it. `save` replays them once more and commits.
pub struct SqliteRepository {
    conn: Connection,
    pending: Mutex<Vec<PendingChange>>,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self {
            conn,
            pending: Mutex::new(Vec::new()),
        })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self {
            conn,
            pending: Mutex::new(Vec::new()),
        })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CONNECTION_PRAGMAS)
                .map_err(wrap_err)?;
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    /// Runs `query` against the committed data plus the pending changes.
    async fn read<T, F>(&self, entity_type: &'static str, query: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&rusqlite::Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let pending = self.pending.lock().await.clone();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                apply_changes(&tx, &pending).map_err(wrap_err)?;
                let value = query(&*tx).map_err(wrap_err)?;
                // Dropping the transaction rolls the replay back.
                drop(tx);
                Ok(value)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, entity_type))
    }

    async fn stage(&self, change: PendingChange) {
        self.pending.lock().await.push(change);
    }
}

#[async_trait]
impl Storage for SqliteRepository {
    fn backend(&self) -> Backend {
        Backend::Db
    }

    fn enforces_cascade(&self) -> bool {
        true
    }

    async fn get(&self, kind: EntityKind, id: Uuid) -> Result<Option<Entity>> {
        let sql = schema::select_by_id(kind);
        let id_str = id.to_string();

        self.read(kind.as_str(), move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let entity = match stmt.query_row([&id_str], |row| row_to_entity(kind, row)) {
                Ok(entity) => entity,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(e) => return Err(e),
            };
            let mut found = vec![entity];
            attach_amenity_ids(conn, &mut found)?;
            Ok(found.pop())
        })
        .await
    }

    async fn all(&self, kind: EntityKind) -> Result<HashMap<Uuid, Entity>> {
        let sql = schema::select_all(kind);

        let entities = self
            .read(kind.as_str(), move |conn| {
                let mut entities = query_entities(conn, &sql, kind, rusqlite::params![])?;
                attach_amenity_ids(conn, &mut entities)?;
                Ok(entities)
            })
            .await?;

        Ok(entities
            .into_iter()
            .map(|entity| (entity.id(), entity))
            .collect())
    }

    async fn new(&self, entity: Entity) -> Result<()> {
        self.stage(PendingChange::Upsert(entity)).await;
        Ok(())
    }

    async fn delete(&self, entity: &Entity) -> Result<()> {
        self.stage(PendingChange::Delete(entity.kind(), entity.id()))
            .await;
        Ok(())
    }

    async fn save(&self) -> Result<()> {
        // Held for the whole commit so nothing is staged mid-flight.
        let mut pending = self.pending.lock().await;
        if pending.is_empty() {
            return Ok(());
        }

        let changes = pending.clone();
        let count = changes.len();
        let result = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                apply_changes(&tx, &changes).map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await;

        match result {
            Ok(()) => {
                pending.clear();
                tracing::info!(changes = count, "Committed database storage");
                Ok(())
            }
            Err(e) => {
                tracing::error!(changes = count, error = %e, "Database storage save failed");
                Err(map_save_error(e))
            }
        }
    }

    async fn rollback(&self) -> Result<()> {
        let mut pending = self.pending.lock().await;
        if !pending.is_empty() {
            tracing::debug!(changes = pending.len(), "Discarded pending database changes");
            pending.clear();
        }
        Ok(())
    }

    async fn related(&self, relation: Relation, parent_id: Uuid) -> Result<Option<Vec<Entity>>> {
        let sql = schema::select_related(relation);
        let child = relation.child();
        let parent_id_str = parent_id.to_string();

        let entities = self
            .read(child.as_str(), move |conn| {
                let mut entities = query_entities(conn, &sql, child, [&parent_id_str])?;
                attach_amenity_ids(conn, &mut entities)?;
                Ok(entities)
            })
            .await?;

        Ok(Some(entities))
    }
}

fn query_entities<P: rusqlite::Params>(
    conn: &rusqlite::Connection,
    sql: &str,
    kind: EntityKind,
    params: P,
) -> rusqlite::Result<Vec<Entity>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, |row| row_to_entity(kind, row))?;

    let mut entities = Vec::new();
    for row_result in rows {
        entities.push(row_result?);
    }
    Ok(entities)
}

/// Fills `amenity_ids` on every place from the link table.
fn attach_amenity_ids(
    conn: &rusqlite::Connection,
    entities: &mut [Entity],
) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare(schema::SELECT_PLACE_AMENITY_IDS)?;
    for entity in entities.iter_mut() {
        if let Entity::Place(place) = entity {
            let rows = stmt.query_map([place.id.to_string()], |row| row.get::<_, String>(0))?;
            let mut amenity_ids = Vec::new();
            for row_result in rows {
                amenity_ids.push(parse_uuid(&row_result?)?);
            }
            place.amenity_ids = amenity_ids;
        }
    }
    Ok(())
}

fn apply_changes(conn: &rusqlite::Connection, changes: &[PendingChange]) -> rusqlite::Result<()> {
    for change in changes {
        match change {
            PendingChange::Upsert(entity) => upsert_entity(conn, entity)?,
            PendingChange::Delete(kind, id) => {
                conn.execute(&schema::delete_by_id(*kind), [id.to_string()])?;
            }
        }
    }
    Ok(())
}

fn upsert_entity(conn: &rusqlite::Connection, entity: &Entity) -> rusqlite::Result<()> {
    match entity {
        Entity::State(state) => {
            conn.execute(
                schema::UPSERT_STATE,
                rusqlite::params![
                    state.id.to_string(),
                    state.name,
                    format_datetime(&state.created_at),
                    format_datetime(&state.updated_at)
                ],
            )?;
        }
        Entity::City(city) => {
            conn.execute(
                schema::UPSERT_CITY,
                rusqlite::params![
                    city.id.to_string(),
                    city.state_id.to_string(),
                    city.name,
                    format_datetime(&city.created_at),
                    format_datetime(&city.updated_at)
                ],
            )?;
        }
        Entity::User(user) => {
            conn.execute(
                schema::UPSERT_USER,
                rusqlite::params![
                    user.id.to_string(),
                    user.email,
                    user.password,
                    user.first_name,
                    user.last_name,
                    format_datetime(&user.created_at),
                    format_datetime(&user.updated_at)
                ],
            )?;
        }
        Entity::Amenity(amenity) => {
            conn.execute(
                schema::UPSERT_AMENITY,
                rusqlite::params![
                    amenity.id.to_string(),
                    amenity.name,
                    format_datetime(&amenity.created_at),
                    format_datetime(&amenity.updated_at)
                ],
            )?;
        }
        Entity::Place(place) => {
            let place_id = place.id.to_string();
            conn.execute(
                schema::UPSERT_PLACE,
                rusqlite::params![
                    place_id,
                    place.city_id.to_string(),
                    place.user_id.to_string(),
                    place.name,
                    place.description,
                    place.number_rooms,
                    place.number_bathrooms,
                    place.max_guest,
                    place.price_by_night,
                    place.latitude,
                    place.longitude,
                    format_datetime(&place.created_at),
                    format_datetime(&place.updated_at)
                ],
            )?;

            conn.execute(schema::DELETE_PLACE_AMENITIES, [&place_id])?;
            for (position, amenity_id) in place.amenity_ids.iter().enumerate() {
                conn.execute(
                    schema::INSERT_PLACE_AMENITY,
                    rusqlite::params![place_id, amenity_id.to_string(), position as i64],
                )?;
            }
        }
        Entity::Review(review) => {
            conn.execute(
                schema::UPSERT_REVIEW,
                rusqlite::params![
                    review.id.to_string(),
                    review.place_id.to_string(),
                    review.user_id.to_string(),
                    review.text,
                    format_datetime(&review.created_at),
                    format_datetime(&review.updated_at)
                ],
            )?;
        }
    }
    Ok(())
}
