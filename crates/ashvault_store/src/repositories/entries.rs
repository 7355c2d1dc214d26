use super::{decode, decode_all, encode};
use crate::client::DocumentStore;
use crate::error::StoreError;
use crate::query::{Direction, Query};
use ashvault_common::models::{collections::ENTRIES, Entry, EntryStatus};
use serde_json::Value;
use std::sync::Arc;

/// Filters for listing entries; unset fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Entries at any of these locations.
    pub location_ids: Option<Vec<String>>,
    pub status: Option<EntryStatus>,
    pub customer_id: Option<String>,
}

#[derive(Clone)]
pub struct EntryRepository {
    store: Arc<dyn DocumentStore>,
}

impl EntryRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, mut entry: Entry) -> Result<Entry, StoreError> {
        entry.id = self.store.create(ENTRIES, None, encode(&entry)?).await?;
        Ok(entry)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Entry>, StoreError> {
        self.store.get(ENTRIES, id).await?.map(decode).transpose()
    }

    pub async fn list(&self, filter: &EntryFilter) -> Result<Vec<Entry>, StoreError> {
        let mut query = Query::new();
        if let Some(location_ids) = &filter.location_ids {
            query = query.any_of("locationId", location_ids);
        }
        if let Some(status) = filter.status {
            query = query.eq("status", status.as_str());
        }
        if let Some(customer_id) = &filter.customer_id {
            query = query.eq("customerId", customer_id.as_str());
        }
        let docs = self
            .store
            .query(ENTRIES, query.order_by("entryDate", Direction::Descending))
            .await?;
        decode_all(docs)
    }

    /// Every entry with `status`, in document order. No paging.
    pub async fn list_by_status(&self, status: EntryStatus) -> Result<Vec<Entry>, StoreError> {
        let docs = self
            .store
            .query(ENTRIES, Query::new().eq("status", status.as_str()))
            .await?;
        decode_all(docs)
    }

    pub async fn list_by_locker(
        &self,
        location_id: &str,
        locker_number: u32,
    ) -> Result<Vec<Entry>, StoreError> {
        let docs = self
            .store
            .query(
                ENTRIES,
                Query::new()
                    .eq("locationId", location_id)
                    .eq("lockerNumber", locker_number),
            )
            .await?;
        decode_all(docs)
    }

    /// Overwrite the whole entry document.
    pub async fn save(&self, entry: &Entry) -> Result<(), StoreError> {
        self.store.set(ENTRIES, &entry.id, encode(entry)?).await
    }

    pub async fn update(&self, id: &str, fields: Value) -> Result<(), StoreError> {
        self.store.update(ENTRIES, id, fields).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.store.delete(ENTRIES, id).await
    }
}
