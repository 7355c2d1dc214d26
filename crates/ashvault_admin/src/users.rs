//! Operator sign-up and the admin approval queue.
//!
//! A sign-up is stored inactive. An admin then approves it (activating the
//! user and assigning locations) or rejects it with a reason. Approved users
//! can later be deactivated and reactivated.

use crate::error::AdminError;
use crate::service::AdminService;
use ashvault_common::models::{User, UserRole};
use ashvault_common::Caller;
use ashvault_sms::mobile::clean_and_validate;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    /// Uid issued by the identity provider.
    pub uid: String,
    pub email: String,
    pub name: String,
    pub mobile: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveUserRequest {
    #[serde(default)]
    pub location_ids: Vec<String>,
    pub role: Option<UserRole>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize)]
pub struct RejectUserRequest {
    pub reason: String,
}

impl AdminService {
    async fn load_user(&self, id: &str) -> Result<User, AdminError> {
        self.repos
            .users
            .get(id)
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("User {}", id)))
    }

    /// Register a new operator awaiting approval.
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<User, AdminError> {
        let uid = request.uid.trim();
        let email = request.email.trim().to_lowercase();
        let name = request.name.trim();
        if uid.is_empty() || name.is_empty() {
            return Err(AdminError::InvalidInput("uid and name are required".into()));
        }
        if !email.contains('@') {
            return Err(AdminError::InvalidInput(format!("invalid email: {}", email)));
        }
        if self.repos.users.get_by_email(&email).await?.is_some() {
            return Err(AdminError::Conflict(format!("{} is already registered", email)));
        }
        let mobile = request
            .mobile
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .map(clean_and_validate)
            .transpose()?;

        let now = Utc::now();
        let user = User {
            id: uid.to_string(),
            email,
            name: name.to_string(),
            mobile,
            role: UserRole::Operator,
            is_active: false,
            is_rejected: false,
            location_ids: Vec::new(),
            approved_by: None,
            approved_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        };
        let user = self.repos.users.create(user).await?;
        info!(user = %user.id, email = %user.email, "Sign-up awaiting approval");
        Ok(user)
    }

    pub async fn list_users(&self, caller: &Caller) -> Result<Vec<User>, AdminError> {
        caller.require_admin()?;
        Ok(self.repos.users.list().await?)
    }

    pub async fn list_pending_users(&self, caller: &Caller) -> Result<Vec<User>, AdminError> {
        caller.require_admin()?;
        Ok(self.repos.users.list_pending().await?)
    }

    /// Any caller may read their own record; other users need an admin.
    pub async fn get_user(&self, caller: &Caller, id: &str) -> Result<User, AdminError> {
        if caller.id() != id {
            caller.require_admin()?;
        }
        self.load_user(id).await
    }

    /// Activate a sign-up. Operators need at least one existing location.
    pub async fn approve_user(
        &self,
        caller: &Caller,
        id: &str,
        request: ApproveUserRequest,
    ) -> Result<User, AdminError> {
        caller.require_admin()?;
        let mut user = self.load_user(id).await?;
        let role = request.role.unwrap_or(user.role);

        if role == UserRole::Operator && request.location_ids.is_empty() {
            return Err(AdminError::InvalidInput(
                "operators need at least one location".into(),
            ));
        }
        for location_id in &request.location_ids {
            if self.repos.locations.get(location_id).await?.is_none() {
                return Err(AdminError::NotFound(format!("Location {}", location_id)));
            }
        }

        self.repos
            .users
            .approve(id, &request.location_ids, caller.id())
            .await?;
        if role != user.role {
            self.repos.users.update(id, json!({ "role": role })).await?;
        }

        let now = Utc::now();
        user.role = role;
        user.is_active = true;
        user.is_rejected = false;
        user.location_ids = request.location_ids;
        user.approved_by = Some(caller.id().to_string());
        user.approved_at = Some(now);
        user.updated_at = now;
        info!(user = %id, approved_by = %caller.id(), ?role, "User approved");
        Ok(user)
    }

    pub async fn reject_user(
        &self,
        caller: &Caller,
        id: &str,
        request: RejectUserRequest,
    ) -> Result<User, AdminError> {
        caller.require_admin()?;
        let reason = request.reason.trim();
        if reason.is_empty() {
            return Err(AdminError::InvalidInput("a rejection reason is required".into()));
        }
        let mut user = self.load_user(id).await?;
        if user.is_active {
            return Err(AdminError::Conflict(format!(
                "user {} is active; deactivate instead",
                id
            )));
        }

        self.repos.users.reject(id, caller.id(), reason).await?;
        let now = Utc::now();
        user.is_rejected = true;
        user.rejected_by = Some(caller.id().to_string());
        user.rejected_at = Some(now);
        user.rejection_reason = Some(reason.to_string());
        user.updated_at = now;
        warn!(user = %id, rejected_by = %caller.id(), reason, "User rejected");
        Ok(user)
    }

    pub async fn deactivate_user(&self, caller: &Caller, id: &str) -> Result<User, AdminError> {
        caller.require_admin()?;
        if caller.id() == id {
            return Err(AdminError::Conflict("admins cannot deactivate themselves".into()));
        }
        self.set_active(id, false).await
    }

    /// Only previously approved users can come back.
    pub async fn reactivate_user(&self, caller: &Caller, id: &str) -> Result<User, AdminError> {
        caller.require_admin()?;
        self.set_active(id, true).await
    }

    async fn set_active(&self, id: &str, active: bool) -> Result<User, AdminError> {
        let mut user = self.load_user(id).await?;
        if user.approved_by.is_none() || user.is_rejected {
            return Err(AdminError::Conflict(format!("user {} was never approved", id)));
        }
        self.repos.users.set_active(id, active).await?;
        user.is_active = active;
        user.updated_at = Utc::now();
        info!(user = %id, active, "User activation changed");
        Ok(user)
    }
}
