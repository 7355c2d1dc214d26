use super::{decode, decode_all, encode};
use crate::client::DocumentStore;
use crate::error::StoreError;
use crate::query::{Direction, Query};
use ashvault_common::models::{collections::USERS, User};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

/// Users are keyed by their auth uid.
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Store a new sign-up under `user.id`. Fails if the uid is taken.
    pub async fn create(&self, user: User) -> Result<User, StoreError> {
        self.store
            .create(USERS, Some(&user.id), encode(&user)?)
            .await?;
        Ok(user)
    }

    pub async fn get(&self, id: &str) -> Result<Option<User>, StoreError> {
        self.store.get(USERS, id).await?.map(decode).transpose()
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let docs = self
            .store
            .query(USERS, Query::new().eq("email", email).limit(1))
            .await?;
        docs.into_iter().next().map(decode).transpose()
    }

    pub async fn list(&self) -> Result<Vec<User>, StoreError> {
        let docs = self
            .store
            .query(USERS, Query::new().order_by("createdAt", Direction::Descending))
            .await?;
        decode_all(docs)
    }

    /// Sign-ups that were neither approved nor rejected yet.
    ///
    /// Deactivated users are inactive too; they are told apart by `approvedBy`.
    pub async fn list_pending(&self) -> Result<Vec<User>, StoreError> {
        let docs = self
            .store
            .query(
                USERS,
                Query::new().eq("isActive", false).eq("isRejected", false),
            )
            .await?;
        Ok(decode_all::<User>(docs)?
            .into_iter()
            .filter(|u| u.approved_by.is_none())
            .collect())
    }

    pub async fn approve(
        &self,
        id: &str,
        location_ids: &[String],
        approved_by: &str,
    ) -> Result<(), StoreError> {
        let now = Utc::now();
        self.update(
            id,
            json!({
                "isActive": true,
                "isRejected": false,
                "locationIds": location_ids,
                "approvedBy": approved_by,
                "approvedAt": now,
                "updatedAt": now,
            }),
        )
        .await
    }

    pub async fn reject(&self, id: &str, rejected_by: &str, reason: &str) -> Result<(), StoreError> {
        let now = Utc::now();
        self.update(
            id,
            json!({
                "isActive": false,
                "isRejected": true,
                "rejectedBy": rejected_by,
                "rejectedAt": now,
                "rejectionReason": reason,
                "updatedAt": now,
            }),
        )
        .await
    }

    /// Deactivate or reactivate an approved user.
    pub async fn set_active(&self, id: &str, active: bool) -> Result<(), StoreError> {
        self.update(id, json!({ "isActive": active, "updatedAt": Utc::now() }))
            .await
    }

    pub async fn update(&self, id: &str, fields: Value) -> Result<(), StoreError> {
        self.store.update(USERS, id, fields).await
    }
}
