//! The document store seam.
//!
//! Everything above this trait (repositories, workflows, the reminder job)
//! only sees collections of JSON documents. [`crate::FirestoreStore`] talks to
//! Firestore over REST, [`crate::MemoryStore`] keeps everything in-process.

use crate::error::StoreError;
use crate::query::Query;
use ashvault_common::BoxFuture;
use serde_json::Value;

/// A document as read from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    /// Always a JSON object.
    pub data: Value,
}

pub trait DocumentStore: Send + Sync {
    /// Read one document; `None` if it does not exist.
    fn get<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
    ) -> BoxFuture<'a, Option<Document>, StoreError>;

    /// Create a document, with a generated id when `id` is `None`.
    ///
    /// Fails with [`StoreError::AlreadyExists`] if an explicit id is taken.
    fn create<'a>(
        &'a self,
        collection: &'a str,
        id: Option<&'a str>,
        data: Value,
    ) -> BoxFuture<'a, String, StoreError>;

    /// Create or overwrite a document.
    fn set<'a>(&'a self, collection: &'a str, id: &'a str, data: Value)
        -> BoxFuture<'a, (), StoreError>;

    /// Merge top-level fields into an existing document.
    ///
    /// Fails with [`StoreError::NotFound`] if the document is missing.
    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        fields: Value,
    ) -> BoxFuture<'a, (), StoreError>;

    /// Delete a document; returns whether it existed.
    fn delete<'a>(&'a self, collection: &'a str, id: &'a str) -> BoxFuture<'a, bool, StoreError>;

    /// Run a structured query against one collection.
    fn query<'a>(
        &'a self,
        collection: &'a str,
        query: Query,
    ) -> BoxFuture<'a, Vec<Document>, StoreError>;
}
