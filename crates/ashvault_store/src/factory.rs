//! Builds the configured [`DocumentStore`].

use crate::client::DocumentStore;
use crate::error::StoreError;
use crate::firestore::FirestoreStore;
use crate::memory::MemoryStore;
use ashvault_config::{StoreBackend, StoreConfig};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct StoreFactory;

impl StoreFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn from_config(&self, config: &StoreConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
        match config.backend {
            StoreBackend::Firestore => {
                let store = FirestoreStore::from_config(config)?;
                info!(
                    project_id = config.project_id.as_deref().unwrap_or_default(),
                    emulator = config.emulator,
                    "Using Firestore document store"
                );
                Ok(Arc::new(store))
            }
            StoreBackend::Memory => {
                warn!("Using in-memory document store; data is lost on restart");
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }
}
