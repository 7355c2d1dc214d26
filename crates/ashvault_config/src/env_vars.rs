//! Environment variable handling for the Ashvault backend.
//!
//! Configuration values use the `ASHVAULT__SECTION__KEY` pattern (read by the
//! `config` crate), secrets use `ASHVAULT_SECRET_SECTION_KEY` with a fallback to
//! the legacy `SECTION_KEY` form (e.g. `SMS_API_KEY`).

use serde_json::Value;
use std::env;
use tracing::warn;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "ASHVAULT";

/// The prefix for secret environment variables
pub const SECRET_PREFIX: &str = "ASHVAULT_SECRET";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Marker used in config files for values that must come from the environment.
pub const SECRET_MARKER: &str = "secret_from_env";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a configuration path to an environment variable name
///
/// `"server.host"` becomes `"ASHVAULT__SERVER__HOST"`.
pub fn config_path_to_env_var(path: &str) -> String {
    let prefix = get_config_prefix();
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to an environment variable name
///
/// `"sms.api_key"` becomes `"ASHVAULT_SECRET_SMS_API_KEY"`.
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to its legacy environment variable name
///
/// `"sms.api_key"` becomes `"SMS_API_KEY"`.
pub fn legacy_secret_path_to_env_var(path: &str) -> String {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() < 2 {
        return path.to_uppercase();
    }

    let service = parts[0];
    let key = parts[1..].join(SECRET_SEPARATOR);
    format!("{}_{}", service, key).to_uppercase()
}

/// Get an environment variable for a configuration path
pub fn get_config_env_var(path: &str) -> Option<String> {
    env::var(config_path_to_env_var(path)).ok()
}

/// Get an environment variable for a secret path, trying the prefixed name first
pub fn get_secret_env_var(path: &str) -> Option<String> {
    if let Ok(value) = env::var(secret_path_to_env_var(path)) {
        return Some(value);
    }

    env::var(legacy_secret_path_to_env_var(path)).ok()
}

/// Paths containing "secret", "key", "password" or "token" are treated as secrets.
pub fn is_secret_path(path: &str) -> bool {
    let path_lower = path.to_lowercase();
    path_lower.contains("secret")
        || path_lower.contains("key")
        || path_lower.contains("password")
        || path_lower.contains("token")
}

/// Get an environment variable for a path, secret or not
pub fn get_env_var(path: &str) -> Option<String> {
    if is_secret_path(path) {
        get_secret_env_var(path)
    } else {
        get_config_env_var(path)
    }
}

/// Replace every `"secret_from_env"` string in `value` with its environment variable.
///
/// Returns `true` if any value was replaced. Markers without a matching
/// variable are left in place and logged.
pub fn inject_env_vars(value: &mut Value) -> bool {
    fn walk(path: Vec<String>, obj: &mut Value) -> bool {
        let mut replaced = false;

        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    replaced |= walk(new_path, v);
                }
            }
            Value::Array(arr) => {
                for (i, v) in arr.iter_mut().enumerate() {
                    let mut new_path = path.clone();
                    new_path.push(i.to_string());
                    replaced |= walk(new_path, v);
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let path_str = path.join(".");
                if let Some(env_val) = get_env_var(&path_str) {
                    *s = env_val;
                    replaced = true;
                } else {
                    warn!("env var for {} not found", path_str);
                }
            }
            _ => {}
        }

        replaced
    }

    walk(vec![], value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_path_to_env_var() {
        assert_eq!(
            config_path_to_env_var("server.host"),
            "ASHVAULT__SERVER__HOST"
        );
        assert_eq!(
            config_path_to_env_var("reminders.timezone"),
            "ASHVAULT__REMINDERS__TIMEZONE"
        );
    }

    #[test]
    fn test_secret_path_to_env_var() {
        assert_eq!(
            secret_path_to_env_var("sms.api_key"),
            "ASHVAULT_SECRET_SMS_API_KEY"
        );
        assert_eq!(
            secret_path_to_env_var("auth.shared_secret"),
            "ASHVAULT_SECRET_AUTH_SHARED_SECRET"
        );
    }

    #[test]
    fn test_legacy_secret_path_to_env_var() {
        assert_eq!(legacy_secret_path_to_env_var("sms.api_key"), "SMS_API_KEY");
        assert_eq!(legacy_secret_path_to_env_var("standalone"), "STANDALONE");
    }

    #[test]
    fn test_is_secret_path() {
        assert!(is_secret_path("sms.api_key"));
        assert!(is_secret_path("auth.shared_secret"));
        assert!(!is_secret_path("server.host"));
        assert!(!is_secret_path("sms.sender_id"));
    }

    #[test]
    fn test_inject_env_vars_replaces_marker() {
        env::set_var("ASHVAULT_SECRET_TESTSVC_API_KEY", "injected");
        let mut value = json!({ "testsvc": { "api_key": "secret_from_env", "other": "plain" } });

        assert!(inject_env_vars(&mut value));
        assert_eq!(value["testsvc"]["api_key"], "injected");
        assert_eq!(value["testsvc"]["other"], "plain");
        env::remove_var("ASHVAULT_SECRET_TESTSVC_API_KEY");
    }

    #[test]
    fn test_inject_env_vars_leaves_unknown_marker() {
        let mut value = json!({ "nosuchsvc": { "api_key": "secret_from_env" } });
        assert!(!inject_env_vars(&mut value));
        assert_eq!(value["nosuchsvc"]["api_key"], SECRET_MARKER);
    }
}
