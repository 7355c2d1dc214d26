// --- File: crates/ashvault_common/src/models.rs ---
//! Domain documents shared by every Ashvault crate.
//!
//! Field names are camelCase on the wire so they match the existing
//! Firestore documents. `id` is the document id; it is filled in when a
//! document is read and stripped before a document is written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Collection names.
pub mod collections {
    pub const LOCATIONS: &str = "locations";
    pub const USERS: &str = "users";
    pub const CUSTOMERS: &str = "customers";
    pub const ENTRIES: &str = "entries";
    pub const OTP_VERIFICATIONS: &str = "otpVerifications";
    pub const SMS_LOGS: &str = "smsLogs";
    pub const SMS_FUNCTION_CALLS: &str = "smsFunctionCalls";
    pub const DAILY_EXPIRY_CHECKS: &str = "dailyExpiryChecks";
    pub const SYSTEM_STATS: &str = "systemStats";
}

// --- Users ---

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    Operator,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_rejected: bool,
    #[serde(default)]
    pub location_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Admins see every location; operators only their assigned ones.
    pub fn can_access_location(&self, location_id: &str) -> bool {
        self.is_admin() || self.location_ids.iter().any(|id| id == location_id)
    }
}

// --- Locations ---

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub venue_name: String,
    pub address: String,
    pub contact_number: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub number_of_lockers: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

// --- Customers ---

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub mobile: String,
    #[serde(default)]
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_details: Option<String>,
    pub created_by: String,
    pub location_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Entries ---

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    #[default]
    Active,
    Expired,
    Delivered,
    Dispatched,
    Disposed,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Active => "active",
            EntryStatus::Expired => "expired",
            EntryStatus::Delivered => "delivered",
            EntryStatus::Dispatched => "dispatched",
            EntryStatus::Disposed => "disposed",
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Entry,
    Renewal,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub method: String,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    pub months: u32,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Renewal {
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub method: String,
    pub months: u32,
    pub previous_expiry_date: DateTime<Utc>,
    pub new_expiry_date: DateTime<Utc>,
    pub renewed_by: String,
}

/// One handover of pots back to the family. A full delivery is a single
/// record covering every remaining pot.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRecord {
    pub date: DateTime<Utc>,
    pub pots: u32,
    pub handover_person_name: String,
    pub handover_person_mobile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub dispatched_by: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub customer_mobile: String,
    #[serde(default)]
    pub customer_city: String,
    #[serde(default)]
    pub deceased_person_name: String,
    pub number_of_pots: u32,
    pub locker_number: u32,
    pub location_id: String,
    #[serde(default)]
    pub location_name: String,
    pub operator_id: String,
    #[serde(default)]
    pub payment_method: String,
    pub entry_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    #[serde(default)]
    pub status: EntryStatus,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub renewals: Vec<Renewal>,
    #[serde(default)]
    pub dispatches: Vec<DispatchRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handover_person_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handover_person_mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposal_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposal_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// Pots already handed back across all dispatch records.
    pub fn dispatched_pots(&self) -> u32 {
        self.dispatches.iter().map(|d| d.pots).sum()
    }

    /// Pots still in the locker.
    pub fn remaining_pots(&self) -> u32 {
        self.number_of_pots.saturating_sub(self.dispatched_pots())
    }
}

// --- OTP ---

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpType {
    Renewal,
    Delivery,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpVerification {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub mobile: String,
    pub otp: String,
    #[serde(rename = "type")]
    pub otp_type: OtpType,
    pub entry_id: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub attempts: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
    /// Set once a workflow has consumed the verified code.
    #[serde(default)]
    pub is_used: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_at: Option<DateTime<Utc>>,
}

// --- SMS audit trail ---

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsStatus {
    Sent,
    Failed,
    Pending,
}

impl SmsStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SmsStatus::Sent => "sent",
            SmsStatus::Failed => "failed",
            SmsStatus::Pending => "pending",
        }
    }
}

/// One document per gateway attempt.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsLog {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub recipient: String,
    pub template_key: String,
    pub template_id: String,
    /// Pipe-delimited variables as sent to the gateway.
    pub message: String,
    pub status: SmsStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default)]
    pub retry_count: u32,
    #[serde(default)]
    pub attempt: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// One document per `POST /sms/send` call.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsFunctionCall {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub caller_id: String,
    pub template_key: String,
    pub recipient: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

// --- Reminder job ---

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunTrigger {
    Scheduled,
    Manual,
    Retry,
}

/// Summary of one reminder-job run.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyExpiryCheck {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub run_at: DateTime<Utc>,
    pub trigger: RunTrigger,
    pub timezone: String,
    /// Calendar date of the run in the job timezone, `YYYY-MM-DD`.
    pub run_date: String,
    pub entries_checked: u32,
    pub three_day_matches: u32,
    pub last_day_matches: u32,
    pub sms_sent: u32,
    pub sms_failed: u32,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// The `systemStats/sms` document.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SmsSystemStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_expiry_check: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_expiry_check_sent: u32,
    #[serde(default)]
    pub last_expiry_check_failed: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn entry_with_dispatches(pots: u32, dispatched: &[u32]) -> Entry {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Entry {
            id: "e1".into(),
            customer_id: "c1".into(),
            customer_name: "Asha".into(),
            customer_mobile: "9876543210".into(),
            customer_city: String::new(),
            deceased_person_name: "Ravi".into(),
            number_of_pots: pots,
            locker_number: 1,
            location_id: "l1".into(),
            location_name: "North Hall".into(),
            operator_id: "u1".into(),
            payment_method: "cash".into(),
            entry_date: now,
            expiry_date: now,
            status: EntryStatus::Active,
            payments: vec![],
            renewals: vec![],
            dispatches: dispatched
                .iter()
                .map(|p| DispatchRecord {
                    date: now,
                    pots: *p,
                    handover_person_name: "Kin".into(),
                    handover_person_mobile: "9876500000".into(),
                    notes: None,
                    dispatched_by: "u1".into(),
                })
                .collect(),
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

    #[test]
    fn test_remaining_pots() {
        assert_eq!(entry_with_dispatches(3, &[]).remaining_pots(), 3);
        assert_eq!(entry_with_dispatches(3, &[1]).remaining_pots(), 2);
        assert_eq!(entry_with_dispatches(3, &[2, 1]).remaining_pots(), 0);
    }

    #[test]
    fn test_entry_serializes_camel_case_without_empty_options() {
        let value = serde_json::to_value(entry_with_dispatches(2, &[])).unwrap();
        assert_eq!(value["numberOfPots"], 2);
        assert_eq!(value["status"], "active");
        assert!(value.get("deliveryDate").is_none());
        assert!(value.get("customerMobile").is_some());
    }

    #[test]
    fn test_user_location_access() {
        let user: User = serde_json::from_value(json!({
            "email": "op@example.com",
            "name": "Op",
            "role": "operator",
            "isActive": true,
            "locationIds": ["l1"],
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(user.can_access_location("l1"));
        assert!(!user.can_access_location("l2"));
        assert!(!user.is_admin());
    }
}
