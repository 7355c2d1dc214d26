#[cfg(test)]
mod tests {
    use crate::error::AdminError;
    use crate::service::AdminService;
    use crate::users::{ApproveUserRequest, RejectUserRequest, SignUpRequest};
    use ashvault_common::models::UserRole;
    use ashvault_common::testing::{admin, location, operator};
    use ashvault_store::{MemoryStore, Repositories};
    use std::sync::Arc;

    fn service() -> AdminService {
        AdminService::new(Repositories::new(Arc::new(MemoryStore::new())))
    }

    fn sign_up(uid: &str, email: &str) -> SignUpRequest {
        SignUpRequest {
            uid: uid.into(),
            email: email.into(),
            name: "Meera".into(),
            mobile: Some("98765 43210".into()),
        }
    }

    async fn location_id(svc: &AdminService) -> String {
        svc.repos
            .locations
            .create(location("North Hall", 10))
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_sign_up_is_pending_until_approved() {
        let svc = service();
        let loc = location_id(&svc).await;

        let user = svc.sign_up(sign_up("u1", "Meera@Example.com")).await.unwrap();
        assert!(!user.is_active);
        assert_eq!(user.role, UserRole::Operator);
        assert_eq!(user.email, "meera@example.com");
        assert_eq!(user.mobile.as_deref(), Some("9876543210"));

        let pending = svc.list_pending_users(&admin()).await.unwrap();
        assert_eq!(pending.len(), 1);

        let approved = svc
            .approve_user(
                &admin(),
                "u1",
                ApproveUserRequest {
                    location_ids: vec![loc.clone()],
                    role: None,
                },
            )
            .await
            .unwrap();
        assert!(approved.is_active);
        assert_eq!(approved.approved_by.as_deref(), Some("admin1"));

        let stored = svc.repos.users.get("u1").await.unwrap().unwrap();
        assert!(stored.is_active);
        assert_eq!(stored.location_ids, vec![loc]);
        assert!(svc.list_pending_users(&admin()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email_or_uid_conflicts() {
        let svc = service();
        svc.sign_up(sign_up("u1", "meera@example.com")).await.unwrap();

        assert!(matches!(
            svc.sign_up(sign_up("u2", "MEERA@example.com")).await,
            Err(AdminError::Conflict(_))
        ));
        assert!(svc.sign_up(sign_up("u1", "other@example.com")).await.is_err());
    }

    #[tokio::test]
    async fn test_sign_up_checks_its_fields() {
        let svc = service();
        assert!(matches!(
            svc.sign_up(sign_up("u1", "not-an-email")).await,
            Err(AdminError::InvalidInput(_))
        ));
        let mut bad_mobile = sign_up("u1", "meera@example.com");
        bad_mobile.mobile = Some("123".into());
        assert!(matches!(svc.sign_up(bad_mobile).await, Err(AdminError::Mobile(_))));

        let mut no_mobile = sign_up("u1", "meera@example.com");
        no_mobile.mobile = Some("  ".into());
        assert_eq!(svc.sign_up(no_mobile).await.unwrap().mobile, None);
    }

    #[tokio::test]
    async fn test_approval_needs_existing_locations_for_operators() {
        let svc = service();
        svc.sign_up(sign_up("u1", "meera@example.com")).await.unwrap();

        let none = ApproveUserRequest {
            location_ids: Vec::new(),
            role: None,
        };
        assert!(matches!(
            svc.approve_user(&admin(), "u1", none).await,
            Err(AdminError::InvalidInput(_))
        ));

        let ghost = ApproveUserRequest {
            location_ids: vec!["ghost".into()],
            role: None,
        };
        assert!(matches!(
            svc.approve_user(&admin(), "u1", ghost).await,
            Err(AdminError::NotFound(_))
        ));

        let as_admin = ApproveUserRequest {
            location_ids: Vec::new(),
            role: Some(UserRole::Admin),
        };
        let user = svc.approve_user(&admin(), "u1", as_admin).await.unwrap();
        assert_eq!(user.role, UserRole::Admin);
        let stored = svc.repos.users.get("u1").await.unwrap().unwrap();
        assert!(stored.is_admin());
    }

    #[tokio::test]
    async fn test_rejection_records_reason() {
        let svc = service();
        svc.sign_up(sign_up("u1", "meera@example.com")).await.unwrap();

        let blank = RejectUserRequest { reason: " ".into() };
        assert!(svc.reject_user(&admin(), "u1", blank).await.is_err());

        let user = svc
            .reject_user(
                &admin(),
                "u1",
                RejectUserRequest {
                    reason: "unknown applicant".into(),
                },
            )
            .await
            .unwrap();
        assert!(user.is_rejected);

        let stored = svc.repos.users.get("u1").await.unwrap().unwrap();
        assert_eq!(stored.rejection_reason.as_deref(), Some("unknown applicant"));
        assert!(svc.list_pending_users(&admin()).await.unwrap().is_empty());
        assert!(matches!(
            svc.reactivate_user(&admin(), "u1").await,
            Err(AdminError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_deactivate_and_reactivate() {
        let svc = service();
        let loc = location_id(&svc).await;
        svc.sign_up(sign_up("u1", "meera@example.com")).await.unwrap();

        assert!(matches!(
            svc.deactivate_user(&admin(), "u1").await,
            Err(AdminError::Conflict(_))
        ));

        svc.approve_user(
            &admin(),
            "u1",
            ApproveUserRequest {
                location_ids: vec![loc],
                role: None,
            },
        )
        .await
        .unwrap();

        let off = svc.deactivate_user(&admin(), "u1").await.unwrap();
        assert!(!off.is_active);
        assert!(!svc.repos.users.get("u1").await.unwrap().unwrap().is_active);
        assert!(svc.list_pending_users(&admin()).await.unwrap().is_empty());

        let on = svc.reactivate_user(&admin(), "u1").await.unwrap();
        assert!(on.is_active);

        assert!(matches!(
            svc.deactivate_user(&admin(), "admin1").await,
            Err(AdminError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_operators_cannot_manage_users() {
        let svc = service();
        svc.sign_up(sign_up("u1", "meera@example.com")).await.unwrap();
        let op = operator(&["l1"]);

        assert!(matches!(svc.list_users(&op).await, Err(AdminError::Access(_))));
        assert!(matches!(svc.list_pending_users(&op).await, Err(AdminError::Access(_))));
        assert!(matches!(
            svc.deactivate_user(&op, "u1").await,
            Err(AdminError::Access(_))
        ));
        assert!(matches!(svc.get_user(&op, "u1").await, Err(AdminError::Access(_))));
        assert!(matches!(svc.get_user(&op, "op1").await, Err(AdminError::NotFound(_))));
    }
}
