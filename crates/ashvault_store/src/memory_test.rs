#[cfg(test)]
mod tests {
    use crate::client::DocumentStore;
    use crate::error::StoreError;
    use crate::memory::MemoryStore;
    use crate::query::{Direction, FilterOp, Query};
    use serde_json::json;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        for (id, locker, status, expiry) in [
            ("a", 1, "active", "2025-09-24T04:30:00Z"),
            ("b", 2, "active", "2025-09-21T18:30:00Z"),
            ("c", 2, "dispatched", "2025-10-01T00:00:00+05:30"),
        ] {
            store
                .create(
                    "entries",
                    Some(id),
                    json!({ "lockerNumber": locker, "status": status, "expiryDate": expiry, "tags": [status] }),
                )
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_create_with_generated_id_and_get() {
        let store = MemoryStore::new();
        let id = store
            .create("customers", None, json!({ "name": "Asha" }))
            .await
            .unwrap();
        assert!(!id.is_empty());
        let doc = store.get("customers", &id).await.unwrap().unwrap();
        assert_eq!(doc.data["name"], "Asha");
        assert!(store.get("customers", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_with_taken_id_fails() {
        let store = seeded().await;
        let err = store
            .create("entries", Some("a"), json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_update_merges_and_requires_existing() {
        let store = seeded().await;
        store
            .update("entries", "a", json!({ "status": "expired", "note": "x" }))
            .await
            .unwrap();
        let doc = store.get("entries", "a").await.unwrap().unwrap();
        assert_eq!(doc.data["status"], "expired");
        assert_eq!(doc.data["lockerNumber"], 1);
        assert_eq!(doc.data["note"], "x");

        let err = store
            .update("entries", "zzz", json!({ "status": "expired" }))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = seeded().await;
        store
            .set("entries", "a", json!({ "status": "disposed" }))
            .await
            .unwrap();
        let doc = store.get("entries", "a").await.unwrap().unwrap();
        assert_eq!(doc.data, json!({ "status": "disposed" }));
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let store = seeded().await;
        assert!(store.delete("entries", "a").await.unwrap());
        assert!(!store.delete("entries", "a").await.unwrap());
        assert_eq!(store.count("entries").await, 2);
    }

    #[tokio::test]
    async fn test_query_equality_filters_are_anded() {
        let store = seeded().await;
        let docs = store
            .query(
                "entries",
                Query::new().eq("status", "active").eq("lockerNumber", 2),
            )
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "b");
    }

    #[tokio::test]
    async fn test_query_timestamps_compare_as_instants() {
        let store = seeded().await;
        // "c" is 2025-09-30T18:30:00Z once the offset is applied.
        let docs = store
            .query(
                "entries",
                Query::new()
                    .filter("expiryDate", FilterOp::Lt, "2025-09-30T20:00:00Z")
                    .order_by("expiryDate", Direction::Descending),
            )
            .await
            .unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_query_in_array_contains_and_limit() {
        let store = seeded().await;
        let docs = store
            .query(
                "entries",
                Query::new().filter("status", FilterOp::In, json!(["dispatched", "disposed"])),
            )
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);

        let docs = store
            .query(
                "entries",
                Query::new()
                    .filter("tags", FilterOp::ArrayContains, "active")
                    .limit(1),
            )
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "a");
    }

    #[tokio::test]
    async fn test_order_by_drops_documents_without_field() {
        let store = seeded().await;
        store
            .create("entries", Some("d"), json!({ "status": "active" }))
            .await
            .unwrap();
        let docs = store
            .query(
                "entries",
                Query::new().order_by("lockerNumber", Direction::Ascending),
            )
            .await
            .unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].id, "a");
    }
}
