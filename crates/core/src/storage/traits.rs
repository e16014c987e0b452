use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Entity, EntityKind, Relation};

use super::Result;

/// Which persistence medium a [`Storage`] writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// In-process record set flushed to a JSON file.
    File,
    /// Relational database.
    Db,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::File => f.write_str("file"),
            Backend::Db => f.write_str("db"),
        }
    }
}

/// Unit-of-work storage contract shared by every backend.
///
/// `new` and `delete` only stage changes; `save` makes every staged change
/// durable at once or none of them. Reads observe staged changes.
///
/// A failed `save` leaves the staged changes in place. Callers that give up
/// on them must call `rollback`, or the next `save` will try them again.
#[async_trait]
pub trait Storage: Send + Sync {
    fn backend(&self) -> Backend;

    /// Whether deleting a record also removes its dependents.
    ///
    /// Callers must cascade by hand when this is `false`, and must not
    /// when it is `true`.
    fn enforces_cascade(&self) -> bool;

    /// Gets a record by kind and ID. Absent is not an error.
    async fn get(&self, kind: EntityKind, id: Uuid) -> Result<Option<Entity>>;

    /// Gets every record of a kind, keyed by ID.
    async fn all(&self, kind: EntityKind) -> Result<HashMap<Uuid, Entity>>;

    /// Registers a new or modified record. Does not persist.
    async fn new(&self, entity: Entity) -> Result<()>;

    /// Removes a record from the active set. Does not persist.
    async fn delete(&self, entity: &Entity) -> Result<()>;

    /// Persists every staged change. A no-op when nothing is staged.
    async fn save(&self) -> Result<()>;

    /// Discards every staged change, so reads see the last saved state again.
    async fn rollback(&self) -> Result<()>;

    /// Resolves a relationship with a live query.
    ///
    /// Backends without a join engine return `Ok(None)`; use
    /// [`super::relations::children`] to fall back to a scan.
    async fn related(&self, relation: Relation, parent_id: Uuid) -> Result<Option<Vec<Entity>>> {
        let _ = (relation, parent_id);
        Ok(None)
    }
}
