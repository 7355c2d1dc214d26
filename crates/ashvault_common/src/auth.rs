// --- File: crates/ashvault_common/src/auth.rs ---
//! The authenticated caller, as placed into request extensions by the
//! backend's auth middleware.

use crate::error::{permission_denied, AshvaultError};
use crate::models::User;

/// Header carrying the uid of the signed-in operator or admin.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the shared API secret.
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Clone)]
pub struct Caller {
    pub user: User,
}

impl Caller {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn id(&self) -> &str {
        &self.user.id
    }

    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }

    /// Fails with permission denied unless the caller is an admin.
    pub fn require_admin(&self) -> Result<(), AshvaultError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(permission_denied("admin role required"))
        }
    }

    /// Fails with permission denied unless the caller may act on `location_id`.
    pub fn require_location(&self, location_id: &str) -> Result<(), AshvaultError> {
        if self.user.can_access_location(location_id) {
            Ok(())
        } else {
            Err(permission_denied(format!(
                "not assigned to location {}",
                location_id
            )))
        }
    }

    /// Narrows an optional location filter to the locations the caller may see.
    ///
    /// `None` means every location. Admins keep the requested filter;
    /// operators asking for no location get all of their assigned ones.
    pub fn scope_locations(
        &self,
        requested: Option<String>,
    ) -> Result<Option<Vec<String>>, AshvaultError> {
        match requested {
            Some(location_id) => {
                self.require_location(&location_id)?;
                Ok(Some(vec![location_id]))
            }
            None if self.is_admin() => Ok(None),
            None if self.user.location_ids.is_empty() => {
                Err(permission_denied("no location assigned"))
            }
            None => Ok(Some(self.user.location_ids.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use chrono::Utc;

    fn caller(role: UserRole, locations: &[&str]) -> Caller {
        Caller::new(User {
            id: "u1".into(),
            email: "u1@example.com".into(),
            name: "U1".into(),
            mobile: None,
            role,
            is_active: true,
            is_rejected: false,
            location_ids: locations.iter().map(|s| s.to_string()).collect(),
            approved_by: None,
            approved_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    #[test]
    fn test_operator_is_scoped_to_assigned_location() {
        let op = caller(UserRole::Operator, &["l1"]);
        assert!(op.require_admin().is_err());
        assert!(op.require_location("l1").is_ok());
        assert!(matches!(
            op.require_location("l2"),
            Err(AshvaultError::PermissionDenied(_))
        ));
        assert_eq!(op.scope_locations(None).unwrap(), Some(vec!["l1".to_string()]));
    }

    #[test]
    fn test_operator_with_several_locations_sees_all_of_them() {
        let op = caller(UserRole::Operator, &["l1", "l2"]);
        assert_eq!(
            op.scope_locations(None).unwrap(),
            Some(vec!["l1".to_string(), "l2".to_string()])
        );
        assert_eq!(
            op.scope_locations(Some("l2".into())).unwrap(),
            Some(vec!["l2".to_string()])
        );
        assert!(op.scope_locations(Some("l3".into())).is_err());
    }

    #[test]
    fn test_admin_sees_everything() {
        let admin = caller(UserRole::Admin, &[]);
        assert!(admin.require_admin().is_ok());
        assert!(admin.require_location("anywhere").is_ok());
        assert_eq!(admin.scope_locations(None).unwrap(), None);
    }

    #[test]
    fn test_operator_without_locations_is_denied() {
        let op = caller(UserRole::Operator, &[]);
        assert!(op.scope_locations(None).is_err());
    }
}
