use std::sync::Arc;

use hbnb_core::storage::{Result, Storage};
use tokio::sync::{Mutex, MutexGuard};

use crate::config::Config;
use crate::storage::open_storage;

/// Shared handles for every API operation.
#[derive(Clone)]
pub struct AppState {
    /// Active storage backend.
    pub storage: Arc<dyn Storage>,
    /// Serializes mutate + save sequences across requests.
    write_gate: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Opens the configured backend.
    pub async fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(open_storage(config).await?))
    }

    /// Held by every mutating operation until its `save()` returns.
    pub async fn write_lock(&self) -> MutexGuard<'_, ()> {
        self.write_gate.lock().await
    }
}
