// --- File: crates/ashvault_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8086,
        }
    }
}

/// Which document store implementation backs the repositories.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Firestore,
    #[default]
    Memory,
}

// --- Document Store Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    pub project_id: Option<String>,
    /// Path to the service account JSON. Not needed against the emulator.
    pub key_path: Option<String>,
    /// Overrides the Firestore REST endpoint, e.g. `http://localhost:8080/v1` for the emulator.
    pub base_url: Option<String>,
    #[serde(default)]
    pub emulator: bool,
}

// --- SMS Gateway Config ---
// api_key is normally "secret_from_env" in the file and injected at load time.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SmsConfig {
    #[serde(default = "default_sms_base_url")]
    pub base_url: String,
    pub api_key: String,
    pub sender_id: String,
    #[serde(default = "default_sms_route")]
    pub route: String,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_sms_base_url() -> String {
    "https://www.fast2sms.com/dev/bulkV2".to_string()
}

fn default_sms_route() -> String {
    "dlt".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    5000
}

fn default_timeout_secs() -> u64 {
    30
}

// --- Reminder Job Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReminderConfig {
    #[serde(default = "default_reminder_hour")]
    pub hour: u32,
    #[serde(default)]
    pub minute: u32,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_days_before")]
    pub days_before: i64,
}

fn default_reminder_hour() -> u32 {
    10
}

fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}

fn default_days_before() -> i64 {
    3
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            hour: default_reminder_hour(),
            minute: 0,
            timezone: default_timezone(),
            days_before: default_days_before(),
        }
    }
}

// --- API Auth Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AuthConfig {
    pub shared_secret: Option<String>, // Secret key loaded from env var: AUTH_SHARED_SECRET
    /// Serve `/api` without an API key. Local development only.
    #[serde(default)]
    pub allow_missing_secret: bool,
}

// --- OTP Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OtpConfig {
    #[serde(default = "default_otp_validity")]
    pub validity_minutes: i64,
    #[serde(default = "default_otp_attempts")]
    pub max_attempts: u32,
}

fn default_otp_validity() -> i64 {
    10
}

fn default_otp_attempts() -> u32 {
    3
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            validity_minutes: default_otp_validity(),
            max_attempts: default_otp_attempts(),
        }
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_sms: bool,
    #[serde(default)]
    pub use_reminders: bool,

    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub sms: Option<SmsConfig>,
    #[serde(default)]
    pub reminders: Option<ReminderConfig>,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub otp: OtpConfig,
}
