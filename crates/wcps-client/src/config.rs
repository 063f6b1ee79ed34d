//! Connection configuration.
//!
//! Loaded from a YAML file, from `WCPS_*` environment variables, or built
//! directly. Environment values override file values.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};
use wcps_common::{WcpsError, WcpsResult};

pub const ENV_ENDPOINT: &str = "WCPS_ENDPOINT";
pub const ENV_ACCEPT_INVALID_CERTS: &str = "WCPS_ACCEPT_INVALID_CERTS";
pub const ENV_TIMEOUT_SECS: &str = "WCPS_TIMEOUT_SECS";

/// Settings used to build a [`Connection`](crate::Connection).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionConfig {
    /// Endpoint URL of the WCPS server.
    #[serde(default)]
    pub endpoint: String,
    /// Skip TLS certificate verification. Enabled by default so that
    /// deployments with self-signed certificates are reachable.
    #[serde(default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,
    /// Request timeout. `None` leaves the HTTP client's default in place.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_accept_invalid_certs() -> bool {
    true
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            accept_invalid_certs: default_accept_invalid_certs(),
            timeout_secs: None,
            user_agent: None,
        }
    }
}

impl ConnectionConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> WcpsResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| WcpsError::Config(format!("invalid YAML: {}", e)))
    }

    /// Load a configuration from a YAML file.
    pub fn from_yaml_file(path: &Path) -> WcpsResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            WcpsError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "Loaded connection config");
        Self::from_yaml_str(&contents)
    }

    /// Build a configuration from the process environment alone.
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }

    /// Override fields with any `WCPS_*` environment variables that are set.
    pub fn merge_env(self) -> Self {
        self.merge_vars(|key| std::env::var(key).ok())
    }

    fn merge_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }

        if let Some(value) = lookup(ENV_ACCEPT_INVALID_CERTS) {
            match parse_bool(&value) {
                Some(flag) => self.accept_invalid_certs = flag,
                None => warn!(
                    key = ENV_ACCEPT_INVALID_CERTS,
                    value = %value,
                    "Ignoring invalid boolean"
                ),
            }
        }

        if let Some(value) = lookup(ENV_TIMEOUT_SECS) {
            match value.trim().parse::<u64>() {
                Ok(secs) => self.timeout_secs = Some(secs),
                Err(_) => warn!(
                    key = ENV_TIMEOUT_SECS,
                    value = %value,
                    "Ignoring invalid timeout"
                ),
            }
        }

        self
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConnectionConfig::default();
        assert!(config.endpoint.is_empty());
        assert!(config.accept_invalid_certs);
        assert_eq!(config.timeout_secs, None);
    }

    #[test]
    fn test_yaml_minimal() {
        let config =
            ConnectionConfig::from_yaml_str("endpoint: https://ows.rasdaman.org/rasdaman/ows\n")
                .unwrap();
        assert_eq!(config.endpoint, "https://ows.rasdaman.org/rasdaman/ows");
        assert!(config.accept_invalid_certs);
    }

    #[test]
    fn test_yaml_full() {
        let yaml = r#"
endpoint: http://localhost:8080/rasdaman/ows
accept_invalid_certs: false
timeout_secs: 45
user_agent: wcps-test
"#;
        let config = ConnectionConfig::from_yaml_str(yaml).unwrap();
        assert!(!config.accept_invalid_certs);
        assert_eq!(config.timeout_secs, Some(45));
        assert_eq!(config.user_agent.as_deref(), Some("wcps-test"));
    }

    #[test]
    fn test_yaml_invalid() {
        let err = ConnectionConfig::from_yaml_str("timeout_secs: [1, 2]").unwrap_err();
        assert!(matches!(err, WcpsError::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let config = ConnectionConfig::new("http://file-endpoint/ows").merge_vars(lookup_from(&[
            (ENV_ENDPOINT, "http://env-endpoint/ows"),
            (ENV_ACCEPT_INVALID_CERTS, "false"),
            (ENV_TIMEOUT_SECS, "10"),
        ]));
        assert_eq!(config.endpoint, "http://env-endpoint/ows");
        assert!(!config.accept_invalid_certs);
        assert_eq!(config.timeout_secs, Some(10));
    }

    #[test]
    fn test_env_invalid_values_ignored() {
        let config = ConnectionConfig::new("http://file-endpoint/ows").merge_vars(lookup_from(&[
            (ENV_ACCEPT_INVALID_CERTS, "maybe"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]));
        assert_eq!(config.endpoint, "http://file-endpoint/ows");
        assert!(config.accept_invalid_certs);
        assert_eq!(config.timeout_secs, None);
    }
}
