#[cfg(test)]
mod tests {
    use crate::bulk_import::{BulkImportRequest, BulkImportRow};
    use crate::error::EntryError;
    use crate::test_support::harness;
    use ashvault_common::models::EntryStatus;
    use ashvault_common::testing::{admin, entry, operator};
    use chrono::{Duration, TimeZone, Utc};

    fn row(name: &str, mobile: &str, deceased: &str, locker: u32) -> BulkImportRow {
        BulkImportRow {
            customer_name: name.to_string(),
            customer_mobile: mobile.to_string(),
            customer_city: "Pune".to_string(),
            deceased_person_name: deceased.to_string(),
            number_of_pots: 1,
            locker_number: locker,
            entry_date: None,
            months: 1,
            amount: 500.0,
            payment_method: "cash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_imports_valid_rows_and_reports_the_rest() {
        let h = harness();
        let loc = h.location("North Hall", 10).await;

        let mut zero_pots = row("Dev", "9876543213", "Mohan", 6);
        zero_pots.number_of_pots = 0;
        let request = BulkImportRequest {
            location_id: loc.id.clone(),
            rows: vec![
                row("Asha", "+91 98765 43210", "Ravi", 1),
                row("Asha", "9876543210", "Sita", 2),
                row("Asha", "9876543210", "ravi ", 3),
                row("Bala", "12345", "Gopal", 4),
                row("Chitra", "9876543212", "Lakshmi", 2),
                row("", "9876543214", "Hari", 5),
                zero_pots,
                row("Esha", "9876543215", "Arun", 11),
            ],
        };

        let report = h.service.bulk_import(&admin(), request).await.unwrap();

        assert_eq!(report.total, 8);
        assert_eq!(report.imported, 2);
        assert_eq!(report.skipped, 6);
        assert_eq!(report.entry_ids.len(), 2);
        assert_eq!(report.customers_created, 1);
        assert_eq!(report.customers_reused, 1);

        let failed_rows: Vec<usize> = report.errors.iter().map(|e| e.row).collect();
        assert_eq!(failed_rows, vec![3, 4, 5, 6, 7, 8]);
        assert!(report.errors[0].message.contains("duplicate"));
        assert!(report.errors[2].message.contains("locker 2 already used"));
        assert!(report.errors[5].message.contains("locker 11 does not exist"));

        assert_eq!(h.store.count("customers").await, 1);
        let stored = h.repos.entries.get(&report.entry_ids[0]).await.unwrap().unwrap();
        assert_eq!(stored.customer_mobile, "9876543210");
        assert_eq!(stored.payments.len(), 1);
        assert_eq!(stored.status, EntryStatus::Active);
    }

    #[tokio::test]
    async fn test_rejects_lockers_held_by_active_entries() {
        let h = harness();
        let loc = h.location("North Hall", 5).await;
        let cust = h.customer("Asha", "9876543210", &loc.id).await;
        h.repos
            .entries
            .create(entry(&cust, &loc, 3, Utc::now() + Duration::days(10)))
            .await
            .unwrap();

        let report = h
            .service
            .bulk_import(
                &admin(),
                BulkImportRequest {
                    location_id: loc.id.clone(),
                    rows: vec![row("Bala", "9876543211", "Gopal", 3)],
                },
            )
            .await
            .unwrap();

        assert_eq!(report.imported, 0);
        assert!(report.errors[0].message.contains("occupied"));
    }

    #[tokio::test]
    async fn test_existing_customers_are_reused() {
        let h = harness();
        let loc = h.location("North Hall", 5).await;
        let cust = h.customer("Asha", "9876543210", &loc.id).await;

        let report = h
            .service
            .bulk_import(
                &operator(&[loc.id.as_str()]),
                BulkImportRequest {
                    location_id: loc.id.clone(),
                    rows: vec![row("Asha K", "9876543210", "Ravi", 1)],
                },
            )
            .await
            .unwrap();

        assert_eq!(report.customers_created, 0);
        assert_eq!(report.customers_reused, 1);
        let stored = h.repos.entries.get(&report.entry_ids[0]).await.unwrap().unwrap();
        assert_eq!(stored.customer_id, cust.id);
        assert_eq!(stored.operator_id, "op1");
    }

    #[tokio::test]
    async fn test_old_register_rows_come_in_expired() {
        let h = harness();
        let loc = h.location("North Hall", 5).await;
        let mut old = row("Asha", "9876543210", "Ravi", 1);
        old.entry_date = Some(Utc.with_ymd_and_hms(2020, 1, 10, 0, 0, 0).unwrap());
        old.months = 6;

        let report = h
            .service
            .bulk_import(
                &admin(),
                BulkImportRequest {
                    location_id: loc.id.clone(),
                    rows: vec![old],
                },
            )
            .await
            .unwrap();

        let stored = h.repos.entries.get(&report.entry_ids[0]).await.unwrap().unwrap();
        assert_eq!(stored.status, EntryStatus::Expired);
        assert_eq!(
            stored.expiry_date,
            Utc.with_ymd_and_hms(2020, 7, 10, 0, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_whole_batch_needs_location_access() {
        let h = harness();
        let loc = h.location("North Hall", 5).await;
        let err = h
            .service
            .bulk_import(
                &operator(&["elsewhere"]),
                BulkImportRequest {
                    location_id: loc.id.clone(),
                    rows: vec![row("Asha", "9876543210", "Ravi", 1)],
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EntryError::Access(_)));
    }
}
