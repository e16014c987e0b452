//! File-backed repository implementation.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use hbnb_core::models::{Entity, EntityKind};
use hbnb_core::storage::{Backend, RepositoryError, Result, Storage};

type RecordKey = (EntityKind, Uuid);

#[derive(Debug, Default)]
struct Records {
    objects: HashMap<RecordKey, Entity>,
    /// What the file holds as of the last load or successful `save`.
    saved: HashMap<RecordKey, Entity>,
    /// Set by `new`/`delete`, cleared by a successful `save`.
    dirty: bool,
}

/// Object store persisted to a JSON file.
///
/// All records live in memory behind `Arc<RwLock<_>>`; clones share the
/// same record set. `save` holds the write lock for the whole flush so no
/// mutation can slip in between serializing and renaming the file.
#[derive(Debug, Clone)]
pub struct FileRepository {
    path: PathBuf,
    records: Arc<RwLock<Records>>,
}

impl FileRepository {
    /// Opens the store at `path`, loading existing records.
    ///
    /// A missing file is an empty store; it is created on the first save.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let repo = Self {
            path: path.into(),
            records: Arc::new(RwLock::new(Records::default())),
        };
        repo.reload().await?;
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the in-memory records with the file contents, dropping any
    /// unsaved changes.
    pub async fn reload(&self) -> Result<()> {
        let objects = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => decode(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(RepositoryError::Persistence(format!(
                    "cannot read {}: {e}",
                    self.path.display()
                )))
            }
        };

        let mut records = self.records.write().await;
        records.saved = objects.clone();
        records.objects = objects;
        records.dirty = false;

        tracing::info!(
            path = %self.path.display(),
            records = records.objects.len(),
            "Loaded file storage"
        );
        Ok(())
    }
}

#[async_trait]
impl Storage for FileRepository {
    fn backend(&self) -> Backend {
        Backend::File
    }

    fn enforces_cascade(&self) -> bool {
        false
    }

    async fn get(&self, kind: EntityKind, id: Uuid) -> Result<Option<Entity>> {
        let records = self.records.read().await;
        Ok(records.objects.get(&(kind, id)).cloned())
    }

    async fn all(&self, kind: EntityKind) -> Result<HashMap<Uuid, Entity>> {
        let records = self.records.read().await;
        Ok(records
            .objects
            .iter()
            .filter(|((record_kind, _), _)| *record_kind == kind)
            .map(|((_, id), entity)| (*id, entity.clone()))
            .collect())
    }

    async fn new(&self, entity: Entity) -> Result<()> {
        let mut records = self.records.write().await;
        records.objects.insert((entity.kind(), entity.id()), entity);
        records.dirty = true;
        Ok(())
    }

    async fn delete(&self, entity: &Entity) -> Result<()> {
        let mut records = self.records.write().await;
        if records
            .objects
            .remove(&(entity.kind(), entity.id()))
            .is_some()
        {
            records.dirty = true;
        } else {
            tracing::debug!(
                entity = %entity.kind(),
                entity_id = %entity.id(),
                "Delete of unknown record ignored"
            );
        }
        Ok(())
    }

    async fn save(&self) -> Result<()> {
        let mut records = self.records.write().await;
        if !records.dirty {
            return Ok(());
        }

        let contents = encode(&records.objects)?;
        if let Err(e) = write_atomically(&self.path, &contents).await {
            tracing::error!(path = %self.path.display(), error = %e, "File storage save failed");
            return Err(RepositoryError::Persistence(format!(
                "cannot write {}: {e}",
                self.path.display()
            )));
        }
        records.saved = records.objects.clone();
        records.dirty = false;

        tracing::info!(
            path = %self.path.display(),
            records = records.objects.len(),
            "Saved file storage"
        );
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        let mut records = self.records.write().await;
        if records.dirty {
            records.objects = records.saved.clone();
            records.dirty = false;
            tracing::debug!(path = %self.path.display(), "Discarded unsaved changes");
        }
        Ok(())
    }
}

fn decode(contents: &str) -> Result<HashMap<RecordKey, Entity>> {
    if contents.trim().is_empty() {
        return Ok(HashMap::new());
    }
    let keyed: HashMap<String, Entity> =
        serde_json::from_str(contents).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
    Ok(keyed
        .into_values()
        .map(|entity| ((entity.kind(), entity.id()), entity))
        .collect())
}

fn encode(objects: &HashMap<RecordKey, Entity>) -> Result<String> {
    // BTreeMap keeps the file stable between saves.
    let keyed: BTreeMap<String, &Entity> = objects
        .values()
        .map(|entity| (entity.storage_key(), entity))
        .collect();
    serde_json::to_string(&keyed).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

/// Writes to a sibling temp file then renames it over `path`, so readers see
/// either the old file or the new one.
async fn write_atomically(path: &Path, contents: &str) -> std::io::Result<()> {
    let tmp = tmp_path(path);
    let result = match tokio::fs::write(&tmp, contents).await {
        Ok(()) => tokio::fs::rename(&tmp, path).await,
        Err(e) => Err(e),
    };
    if result.is_err() {
        let _ = tokio::fs::remove_file(&tmp).await;
    }
    result
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
