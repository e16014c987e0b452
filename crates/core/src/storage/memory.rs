//! Minimal in-memory [`Storage`] for unit tests of the helpers in this crate.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Entity, EntityKind};

use super::{Backend, Result, Storage};

#[derive(Default)]
pub struct MemoryStorage {
    objects: RwLock<HashMap<(EntityKind, Uuid), Entity>>,
    saved: RwLock<HashMap<(EntityKind, Uuid), Entity>>,
}

impl MemoryStorage {
    /// Stores every entity as already saved.
    pub async fn with(entities: impl IntoIterator<Item = Entity>) -> Self {
        let storage = Self::default();
        for entity in entities {
            storage.new(entity).await.unwrap();
        }
        storage.save().await.unwrap();
        storage
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    fn backend(&self) -> Backend {
        Backend::File
    }

    fn enforces_cascade(&self) -> bool {
        false
    }

    async fn get(&self, kind: EntityKind, id: Uuid) -> Result<Option<Entity>> {
        Ok(self.objects.read().await.get(&(kind, id)).cloned())
    }

    async fn all(&self, kind: EntityKind) -> Result<HashMap<Uuid, Entity>> {
        Ok(self
            .objects
            .read()
            .await
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|((_, id), entity)| (*id, entity.clone()))
            .collect())
    }

    async fn new(&self, entity: Entity) -> Result<()> {
        self.objects
            .write()
            .await
            .insert((entity.kind(), entity.id()), entity);
        Ok(())
    }

    async fn delete(&self, entity: &Entity) -> Result<()> {
        self.objects
            .write()
            .await
            .remove(&(entity.kind(), entity.id()));
        Ok(())
    }

    async fn save(&self) -> Result<()> {
        *self.saved.write().await = self.objects.read().await.clone();
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        *self.objects.write().await = self.saved.read().await.clone();
        Ok(())
    }
}
