//! Firestore REST v1 implementation of [`DocumentStore`].

use crate::auth::TokenProvider;
use crate::client::{Document, DocumentStore};
use crate::error::StoreError;
use crate::query::{Direction, Filter, Query};
use crate::value::{from_firestore_fields, to_firestore_fields, to_firestore_value};
use ashvault_common::BoxFuture;
use ashvault_config::StoreConfig;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, instrument};

pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// How requests are authorized.
enum Credentials {
    ServiceAccount(TokenProvider),
    /// The emulator accepts the fixed `owner` bearer and skips security rules.
    Emulator,
    None,
}

pub struct FirestoreStore {
    client: Client,
    documents_url: String,
    credentials: Credentials,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RunQueryItem {
    document: Option<FirestoreDocument>,
}

impl FirestoreStore {
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let project_id = config
            .project_id
            .as_deref()
            .ok_or_else(|| StoreError::Config("store.project_id is required for firestore".into()))?;
        let base_url = config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);

        let credentials = if config.emulator {
            Credentials::Emulator
        } else {
            let key_path = config.key_path.as_deref().ok_or_else(|| {
                StoreError::Config("store.key_path is required outside the emulator".into())
            })?;
            Credentials::ServiceAccount(TokenProvider::new(key_path))
        };

        Ok(Self::with_credentials(
            Client::new(),
            base_url,
            project_id,
            credentials,
        ))
    }

    /// A store without any authorization header, for tests against a mock server.
    pub fn unauthenticated(client: Client, base_url: &str, project_id: &str) -> Self {
        Self::with_credentials(client, base_url, project_id, Credentials::None)
    }

    fn with_credentials(
        client: Client,
        base_url: &str,
        project_id: &str,
        credentials: Credentials,
    ) -> Self {
        Self {
            client,
            documents_url: format!(
                "{}/projects/{}/databases/(default)/documents",
                base_url.trim_end_matches('/'),
                project_id
            ),
            credentials,
        }
    }

    fn doc_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.documents_url, collection, id)
    }

    async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, StoreError> {
        Ok(match &self.credentials {
            Credentials::ServiceAccount(tokens) => request.bearer_auth(tokens.token().await?),
            Credentials::Emulator => request.bearer_auth("owner"),
            Credentials::None => request,
        })
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        Ok(self.authorize(request).await?.send().await?)
    }

    async fn api_error(response: Response) -> StoreError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
        StoreError::Api { status, message }
    }

    fn into_document(doc: FirestoreDocument) -> Result<Document, StoreError> {
        let id = doc
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Ok(Document {
            id,
            data: Value::Object(from_firestore_fields(&doc.fields)?),
        })
    }

    fn body_fields(data: &Value) -> Result<Value, StoreError> {
        let map = data
            .as_object()
            .ok_or_else(|| StoreError::InvalidValue("document data must be an object".into()))?;
        Ok(json!({ "fields": to_firestore_fields(map) }))
    }

    async fn get_impl(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let response = self
            .send(self.client.get(self.doc_url(collection, id)))
            .await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => {
                let doc: FirestoreDocument = response.json().await?;
                Self::into_document(doc).map(Some)
            }
            _ => Err(Self::api_error(response).await),
        }
    }

    async fn create_impl(
        &self,
        collection: &str,
        id: Option<&str>,
        data: Value,
    ) -> Result<String, StoreError> {
        let mut request = self
            .client
            .post(format!("{}/{}", self.documents_url, collection))
            .json(&Self::body_fields(&data)?);
        if let Some(id) = id {
            request = request.query(&[("documentId", id)]);
        }

        let response = self.send(request).await?;
        match response.status() {
            StatusCode::CONFLICT => Err(StoreError::AlreadyExists {
                collection: collection.to_string(),
                id: id.unwrap_or_default().to_string(),
            }),
            s if s.is_success() => {
                let doc: FirestoreDocument = response.json().await?;
                Ok(Self::into_document(doc)?.id)
            }
            _ => Err(Self::api_error(response).await),
        }
    }

    async fn set_impl(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        let request = self
            .client
            .patch(self.doc_url(collection, id))
            .json(&Self::body_fields(&data)?);
        let response = self.send(request).await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::api_error(response).await)
        }
    }

    async fn update_impl(&self, collection: &str, id: &str, fields: Value) -> Result<(), StoreError> {
        let body = Self::body_fields(&fields)?;
        let mut params: Vec<(&str, String)> = fields
            .as_object()
            .map(|m| {
                m.keys()
                    .map(|k| ("updateMask.fieldPaths", quote_field_path(k)))
                    .collect()
            })
            .unwrap_or_default();
        params.push(("currentDocument.exists", "true".to_string()));

        let request = self
            .client
            .patch(self.doc_url(collection, id))
            .query(&params)
            .json(&body);
        let response = self.send(request).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(StoreError::not_found(collection, id)),
            s if s.is_success() => Ok(()),
            _ => Err(Self::api_error(response).await),
        }
    }

    async fn delete_impl(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let request = self
            .client
            .delete(self.doc_url(collection, id))
            .query(&[("currentDocument.exists", "true")]);
        let response = self.send(request).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            s if s.is_success() => Ok(true),
            _ => Err(Self::api_error(response).await),
        }
    }

    #[instrument(skip(self, query), fields(filters = query.filters.len()))]
    async fn query_impl(&self, collection: &str, query: Query) -> Result<Vec<Document>, StoreError> {
        let body = json!({ "structuredQuery": structured_query(collection, &query) });
        debug!(body = %body, "Running Firestore query");

        let request = self
            .client
            .post(format!("{}:runQuery", self.documents_url))
            .json(&body);
        let response = self.send(request).await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let items: Vec<RunQueryItem> = response.json().await?;
        items
            .into_iter()
            .filter_map(|item| item.document)
            .map(Self::into_document)
            .collect()
    }
}

/// Backtick-quote field paths that are not plain identifiers.
fn quote_field_path(field: &str) -> String {
    let simple = field
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        field.to_string()
    } else {
        format!("`{}`", field.replace('`', "\\`"))
    }
}

fn field_filter(filter: &Filter) -> Value {
    json!({
        "fieldFilter": {
            "field": { "fieldPath": quote_field_path(&filter.field) },
            "op": filter.op.firestore_name(),
            "value": to_firestore_value(&filter.value),
        }
    })
}

/// Build the `StructuredQuery` JSON for a collection query.
pub(crate) fn structured_query(collection: &str, query: &Query) -> Value {
    let mut structured = json!({ "from": [ { "collectionId": collection } ] });

    match query.filters.as_slice() {
        [] => {}
        [single] => structured["where"] = field_filter(single),
        many => {
            structured["where"] = json!({
                "compositeFilter": {
                    "op": "AND",
                    "filters": many.iter().map(field_filter).collect::<Vec<_>>(),
                }
            })
        }
    }

    if let Some(order) = &query.order_by {
        let direction = match order.direction {
            Direction::Ascending => "ASCENDING",
            Direction::Descending => "DESCENDING",
        };
        structured["orderBy"] = json!([
            { "field": { "fieldPath": quote_field_path(&order.field) }, "direction": direction }
        ]);
    }

    if let Some(limit) = query.limit {
        structured["limit"] = json!(limit);
    }

    structured
}

impl DocumentStore for FirestoreStore {
    fn get<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
    ) -> BoxFuture<'a, Option<Document>, StoreError> {
        Box::pin(self.get_impl(collection, id))
    }

    fn create<'a>(
        &'a self,
        collection: &'a str,
        id: Option<&'a str>,
        data: Value,
    ) -> BoxFuture<'a, String, StoreError> {
        Box::pin(self.create_impl(collection, id, data))
    }

    fn set<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        data: Value,
    ) -> BoxFuture<'a, (), StoreError> {
        Box::pin(self.set_impl(collection, id, data))
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        fields: Value,
    ) -> BoxFuture<'a, (), StoreError> {
        Box::pin(self.update_impl(collection, id, fields))
    }

    fn delete<'a>(&'a self, collection: &'a str, id: &'a str) -> BoxFuture<'a, bool, StoreError> {
        Box::pin(self.delete_impl(collection, id))
    }

    fn query<'a>(
        &'a self,
        collection: &'a str,
        query: Query,
    ) -> BoxFuture<'a, Vec<Document>, StoreError> {
        Box::pin(self.query_impl(collection, query))
    }
}
