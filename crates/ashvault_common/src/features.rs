//! Runtime feature switches.
//!
//! A feature is on when its `use_*` flag is set and its config section is
//! present. Routers for disabled features are still mounted but answer 503.

use ashvault_config::AppConfig;

/// Check if a feature is enabled at runtime based on configuration.
pub fn is_feature_enabled<T>(use_feature: bool, feature_config: Option<&T>) -> bool {
    use_feature && feature_config.is_some()
}

/// SMS sending needs `use_sms` and an `[sms]` section.
pub fn is_sms_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_sms, config.sms.as_ref())
}

/// The daily reminder job needs `use_reminders`, `[reminders]` and working SMS.
pub fn is_reminders_enabled(config: &AppConfig) -> bool {
    is_feature_enabled(config.use_reminders, config.reminders.as_ref()) && is_sms_enabled(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ashvault_config::{ReminderConfig, SmsConfig};

    fn sms_config() -> SmsConfig {
        SmsConfig {
            base_url: "http://localhost".into(),
            api_key: "k".into(),
            sender_id: "ASHVLT".into(),
            route: "dlt".into(),
            max_attempts: 3,
            retry_delay_ms: 0,
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_flag_and_section_both_required() {
        let mut config = AppConfig::default();
        assert!(!is_sms_enabled(&config));
        config.use_sms = true;
        assert!(!is_sms_enabled(&config));
        config.sms = Some(sms_config());
        assert!(is_sms_enabled(&config));
    }

    #[test]
    fn test_reminders_depend_on_sms() {
        let mut config = AppConfig {
            use_reminders: true,
            reminders: Some(ReminderConfig::default()),
            ..Default::default()
        };
        assert!(!is_reminders_enabled(&config));
        config.use_sms = true;
        config.sms = Some(sms_config());
        assert!(is_reminders_enabled(&config));
    }
}
