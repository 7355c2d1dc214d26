use super::{decode, decode_all, encode};
use crate::client::DocumentStore;
use crate::error::StoreError;
use crate::query::{Direction, Query};
use ashvault_common::models::{collections::LOCATIONS, Location};
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct LocationRepository {
    store: Arc<dyn DocumentStore>,
}

impl LocationRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, mut location: Location) -> Result<Location, StoreError> {
        location.id = self.store.create(LOCATIONS, None, encode(&location)?).await?;
        Ok(location)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Location>, StoreError> {
        self.store.get(LOCATIONS, id).await?.map(decode).transpose()
    }

    /// All locations by venue name, optionally only the active ones.
    pub async fn list(&self, active_only: bool) -> Result<Vec<Location>, StoreError> {
        let mut query = Query::new();
        if active_only {
            query = query.eq("isActive", true);
        }
        let docs = self
            .store
            .query(LOCATIONS, query.order_by("venueName", Direction::Ascending))
            .await?;
        decode_all(docs)
    }

    pub async fn update(&self, id: &str, fields: Value) -> Result<(), StoreError> {
        self.store.update(LOCATIONS, id, fields).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.store.delete(LOCATIONS, id).await
    }
}
