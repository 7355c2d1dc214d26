#[cfg(test)]
mod tests {
    use crate::error::StoreError;
    use crate::memory::MemoryStore;
    use ashvault_common::{AshvaultError, HttpStatusCode};
    use crate::repositories::{EntryFilter, Repositories, SmsLogFilter};
    use ashvault_common::models::{
        Customer, Entry, EntryStatus, SmsLog, SmsStatus, SmsSystemStats, User, UserRole,
    };
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;

    fn repos() -> Repositories {
        Repositories::new(Arc::new(MemoryStore::new()))
    }

    fn sign_up(id: &str, email: &str) -> User {
        let now = Utc::now();
        User {
            id: id.into(),
            email: email.into(),
            name: id.into(),
            mobile: None,
            role: UserRole::Operator,
            is_active: false,
            is_rejected: false,
            location_ids: vec![],
            approved_by: None,
            approved_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn entry(location: &str, locker: u32, status: EntryStatus) -> Entry {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 5, 0, 0).unwrap();
        Entry {
            id: String::new(),
            customer_id: "c1".into(),
            customer_name: "Asha".into(),
            customer_mobile: "9876543210".into(),
            customer_city: "Pune".into(),
            deceased_person_name: "Ravi".into(),
            number_of_pots: 1,
            locker_number: locker,
            location_id: location.into(),
            location_name: "North Hall".into(),
            operator_id: "u1".into(),
            payment_method: "cash".into(),
            entry_date: now,
            expiry_date: now + Duration::days(30),
            status,
            payments: vec![],
            renewals: vec![],
            dispatches: vec![],
            delivery_date: None,
            delivered_by: None,
            handover_person_name: None,
            handover_person_mobile: None,
            delivery_notes: None,
            disposal_date: None,
            disposed_by: None,
            disposal_notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn log(template: &str, status: SmsStatus, age_days: i64) -> SmsLog {
        SmsLog {
            id: String::new(),
            recipient: "9876543210".into(),
            template_key: template.into(),
            template_id: "1001".into(),
            message: "A|B".into(),
            status,
            error_message: None,
            message_id: None,
            retry_count: 0,
            attempt: 1,
            entry_id: None,
            customer_id: None,
            location_id: Some("l1".into()),
            operator_id: None,
            timestamp: Utc::now() - Duration::days(age_days),
        }
    }

    #[tokio::test]
    async fn test_user_approval_lifecycle() {
        let repos = repos();
        repos.users.create(sign_up("u1", "one@example.com")).await.unwrap();
        repos.users.create(sign_up("u2", "two@example.com")).await.unwrap();

        let pending = repos.users.list_pending().await.unwrap();
        assert_eq!(pending.len(), 2);

        repos
            .users
            .approve("u1", &["l1".to_string()], "admin")
            .await
            .unwrap();
        repos.users.reject("u2", "admin", "unknown person").await.unwrap();
        assert!(repos.users.list_pending().await.unwrap().is_empty());

        let approved = repos.users.get("u1").await.unwrap().unwrap();
        assert!(approved.is_active);
        assert_eq!(approved.location_ids, vec!["l1".to_string()]);
        assert_eq!(approved.approved_by.as_deref(), Some("admin"));

        // A deactivated user is inactive but not pending.
        repos.users.set_active("u1", false).await.unwrap();
        assert!(repos.users.list_pending().await.unwrap().is_empty());

        let by_email = repos.users.get_by_email("two@example.com").await.unwrap().unwrap();
        assert!(by_email.is_rejected);
        assert_eq!(by_email.rejection_reason.as_deref(), Some("unknown person"));
    }

    #[tokio::test]
    async fn test_customer_lookup_by_mobile() {
        let repos = repos();
        let now = Utc::now();
        let created = repos
            .customers
            .create(Customer {
                id: String::new(),
                name: "Asha".into(),
                mobile: "9876543210".into(),
                city: "Pune".into(),
                additional_details: None,
                created_by: "u1".into(),
                location_id: "l1".into(),
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        let found = repos
            .customers
            .find_by_mobile("9876543210")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);
        assert!(repos.customers.find_by_mobile("9000000000").await.unwrap().is_none());
        assert_eq!(repos.customers.list(Some(&["l2".to_string()])).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_entry_filters() {
        let repos = repos();
        repos.entries.create(entry("l1", 1, EntryStatus::Active)).await.unwrap();
        repos.entries.create(entry("l1", 2, EntryStatus::Dispatched)).await.unwrap();
        repos.entries.create(entry("l2", 1, EntryStatus::Active)).await.unwrap();

        let l1_active = repos
            .entries
            .list(&EntryFilter {
                location_ids: Some(vec!["l1".into()]),
                status: Some(EntryStatus::Active),
                customer_id: None,
            })
            .await
            .unwrap();
        assert_eq!(l1_active.len(), 1);
        assert_eq!(l1_active[0].locker_number, 1);

        let both = repos
            .entries
            .list(&EntryFilter {
                location_ids: Some(vec!["l1".into(), "l2".into()]),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(both.len(), 3);

        assert_eq!(repos.entries.list_by_status(EntryStatus::Active).await.unwrap().len(), 2);
        assert_eq!(repos.entries.list_by_locker("l1", 2).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_entry_round_trips_through_store() {
        let repos = repos();
        let created = repos.entries.create(entry("l1", 4, EntryStatus::Active)).await.unwrap();
        let loaded = repos.entries.get(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, created.id);
        assert_eq!(loaded.expiry_date, created.expiry_date);
        assert_eq!(loaded.status, EntryStatus::Active);
    }

    #[tokio::test]
    async fn test_sms_log_purge_and_statistics() {
        let repos = repos();
        repos.sms_logs.append(log("threeDayReminder", SmsStatus::Sent, 1)).await.unwrap();
        repos.sms_logs.append(log("threeDayReminder", SmsStatus::Failed, 1)).await.unwrap();
        repos.sms_logs.append(log("lastdayRenewal", SmsStatus::Sent, 2)).await.unwrap();
        repos.sms_logs.append(log("lastdayRenewal", SmsStatus::Sent, 120)).await.unwrap();

        let stats = repos.sms_logs.statistics(&SmsLogFilter::default()).await.unwrap();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.sent, 3);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.by_template["threeDayReminder"].failed, 1);
        assert!((stats.success_rate - 75.0).abs() < f64::EPSILON);

        assert_eq!(repos.sms_logs.delete_older_than(90).await.unwrap(), 1);

        let failed = repos
            .sms_logs
            .list(&SmsLogFilter {
                status: Some(SmsStatus::Failed),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(failed.len(), 1);

        let recent = repos
            .sms_logs
            .list(&SmsLogFilter {
                limit: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].template_key, "threeDayReminder");
    }

    #[tokio::test]
    async fn test_sms_log_purge_rejects_out_of_range_retention() {
        let repos = repos();
        repos.sms_logs.append(log("lastdayRenewal", SmsStatus::Sent, 120)).await.unwrap();

        let err = repos.sms_logs.delete_older_than(1_000_000_000_000).await.unwrap_err();
        assert!(matches!(err, StoreError::OutOfRange(_)));
        assert_eq!(AshvaultError::from(err).status_code(), 400);

        let remaining = repos.sms_logs.list(&SmsLogFilter::default()).await.unwrap();
        assert_eq!(remaining.len(), 1);
    }

    #[tokio::test]
    async fn test_system_stats_default_then_set() {
        let repos = repos();
        assert_eq!(repos.system_stats.get_sms().await.unwrap().last_expiry_check_sent, 0);

        repos
            .system_stats
            .set_sms(&SmsSystemStats {
                last_expiry_check: Some(Utc::now()),
                last_expiry_check_sent: 4,
                last_expiry_check_failed: 1,
            })
            .await
            .unwrap();
        let stats = repos.system_stats.get_sms().await.unwrap();
        assert_eq!(stats.last_expiry_check_sent, 4);
        assert!(stats.last_expiry_check.is_some());
    }
}
