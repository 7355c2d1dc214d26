//! In-process [`DocumentStore`], used for local development and tests.
//!
//! Query semantics follow Firestore closely enough for the repositories:
//! default order is by document id, an `order_by` drops documents missing
//! the field, numbers compare numerically and RFC 3339 strings compare as
//! instants.

use crate::client::{Document, DocumentStore};
use crate::error::StoreError;
use crate::query::{Direction, Filter, FilterOp, Query};
use ashvault_common::BoxFuture;
use chrono::DateTime;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }
}

fn ensure_object(data: &Value) -> Result<(), StoreError> {
    if data.is_object() {
        Ok(())
    } else {
        Err(StoreError::InvalidValue(
            "document data must be an object".into(),
        ))
    }
}

/// Resolve a dotted field path inside a document.
fn field<'v>(data: &'v Value, path: &str) -> Option<&'v Value> {
    path.split('.').try_fold(data, |current, part| current.get(part))
}

pub(crate) fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => {
            match (DateTime::parse_from_rfc3339(x), DateTime::parse_from_rfc3339(y)) {
                (Ok(dx), Ok(dy)) => Some(dx.cmp(&dy)),
                _ => Some(x.cmp(y)),
            }
        }
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match compare_values(a, b) {
        Some(ordering) => ordering == Ordering::Equal,
        None => a == b,
    }
}

fn filter_matches(data: &Value, filter: &Filter) -> bool {
    let Some(actual) = field(data, &filter.field) else {
        return false;
    };

    match filter.op {
        FilterOp::Eq => values_equal(actual, &filter.value),
        FilterOp::Lt => compare_values(actual, &filter.value) == Some(Ordering::Less),
        FilterOp::Le => matches!(
            compare_values(actual, &filter.value),
            Some(Ordering::Less | Ordering::Equal)
        ),
        FilterOp::Gt => compare_values(actual, &filter.value) == Some(Ordering::Greater),
        FilterOp::Ge => matches!(
            compare_values(actual, &filter.value),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        FilterOp::In => filter
            .value
            .as_array()
            .is_some_and(|options| options.iter().any(|o| values_equal(actual, o))),
        FilterOp::ArrayContains => actual
            .as_array()
            .is_some_and(|items| items.iter().any(|i| values_equal(i, &filter.value))),
    }
}

fn run_query(docs: &BTreeMap<String, Value>, query: &Query) -> Vec<Document> {
    let mut selected: Vec<Document> = docs
        .iter()
        .filter(|(_, data)| query.filters.iter().all(|f| filter_matches(data, f)))
        .map(|(id, data)| Document {
            id: id.clone(),
            data: data.clone(),
        })
        .collect();

    if let Some(order) = &query.order_by {
        selected.retain(|doc| field(&doc.data, &order.field).is_some());
        selected.sort_by(|a, b| {
            let ordering = match (field(&a.data, &order.field), field(&b.data, &order.field)) {
                (Some(x), Some(y)) => compare_values(x, y).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            };
            match order.direction {
                Direction::Ascending => ordering,
                Direction::Descending => ordering.reverse(),
            }
        });
    }

    if let Some(limit) = query.limit {
        selected.truncate(limit as usize);
    }
    selected
}

impl DocumentStore for MemoryStore {
    fn get<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
    ) -> BoxFuture<'a, Option<Document>, StoreError> {
        Box::pin(async move {
            let collections = self.collections.read().await;
            Ok(collections
                .get(collection)
                .and_then(|docs| docs.get(id))
                .map(|data| Document {
                    id: id.to_string(),
                    data: data.clone(),
                }))
        })
    }

    fn create<'a>(
        &'a self,
        collection: &'a str,
        id: Option<&'a str>,
        data: Value,
    ) -> BoxFuture<'a, String, StoreError> {
        Box::pin(async move {
            ensure_object(&data)?;
            let mut collections = self.collections.write().await;
            let docs = collections.entry(collection.to_string()).or_default();
            let id = match id {
                Some(id) if docs.contains_key(id) => {
                    return Err(StoreError::AlreadyExists {
                        collection: collection.to_string(),
                        id: id.to_string(),
                    })
                }
                Some(id) => id.to_string(),
                None => Uuid::new_v4().simple().to_string(),
            };
            docs.insert(id.clone(), data);
            Ok(id)
        })
    }

    fn set<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        data: Value,
    ) -> BoxFuture<'a, (), StoreError> {
        Box::pin(async move {
            ensure_object(&data)?;
            let mut collections = self.collections.write().await;
            collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.to_string(), data);
            Ok(())
        })
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        fields: Value,
    ) -> BoxFuture<'a, (), StoreError> {
        Box::pin(async move {
            let Value::Object(fields) = fields else {
                return Err(StoreError::InvalidValue(
                    "update fields must be an object".into(),
                ));
            };
            let mut collections = self.collections.write().await;
            let doc = collections
                .get_mut(collection)
                .and_then(|docs| docs.get_mut(id))
                .and_then(Value::as_object_mut)
                .ok_or_else(|| StoreError::not_found(collection, id))?;
            for (key, value) in fields {
                doc.insert(key, value);
            }
            Ok(())
        })
    }

    fn delete<'a>(&'a self, collection: &'a str, id: &'a str) -> BoxFuture<'a, bool, StoreError> {
        Box::pin(async move {
            let mut collections = self.collections.write().await;
            Ok(collections
                .get_mut(collection)
                .and_then(|docs| docs.remove(id))
                .is_some())
        })
    }

    fn query<'a>(
        &'a self,
        collection: &'a str,
        query: Query,
    ) -> BoxFuture<'a, Vec<Document>, StoreError> {
        Box::pin(async move {
            let collections = self.collections.read().await;
            Ok(collections
                .get(collection)
                .map(|docs| run_query(docs, &query))
                .unwrap_or_default())
        })
    }
}
