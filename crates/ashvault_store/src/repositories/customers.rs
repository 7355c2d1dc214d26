use super::{decode, decode_all, encode};
use crate::client::DocumentStore;
use crate::error::StoreError;
use crate::query::{Direction, Query};
use ashvault_common::models::{collections::CUSTOMERS, Customer};
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct CustomerRepository {
    store: Arc<dyn DocumentStore>,
}

impl CustomerRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, mut customer: Customer) -> Result<Customer, StoreError> {
        customer.id = self.store.create(CUSTOMERS, None, encode(&customer)?).await?;
        Ok(customer)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Customer>, StoreError> {
        self.store.get(CUSTOMERS, id).await?.map(decode).transpose()
    }

    /// First customer with this mobile number. Mobiles are not unique.
    pub async fn find_by_mobile(&self, mobile: &str) -> Result<Option<Customer>, StoreError> {
        let docs = self
            .store
            .query(CUSTOMERS, Query::new().eq("mobile", mobile).limit(1))
            .await?;
        docs.into_iter().next().map(decode).transpose()
    }

    /// Customers registered at any of `location_ids`, or all when unset.
    pub async fn list(&self, location_ids: Option<&[String]>) -> Result<Vec<Customer>, StoreError> {
        let mut query = Query::new();
        if let Some(location_ids) = location_ids {
            query = query.any_of("locationId", location_ids);
        }
        let docs = self
            .store
            .query(CUSTOMERS, query.order_by("createdAt", Direction::Descending))
            .await?;
        decode_all(docs)
    }

    pub async fn update(&self, id: &str, fields: Value) -> Result<(), StoreError> {
        self.store.update(CUSTOMERS, id, fields).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        self.store.delete(CUSTOMERS, id).await
    }
}
