//! Serde data structures for the proxy configuration file.
//!
//! Contains [`Config`] (the root), [`ServiceInfo`] and [`Upstream`].
//! All types derive `Serialize` and `Deserialize` with
//! `deny_unknown_fields` for strict parsing. Every field has a default,
//! so an empty document is a valid config.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_UPSTREAM_URL: &str = "http://localhost:3000";
pub const DEFAULT_SERVICE_NAME: &str = "Wine Search Proxy API";

const fn default_search_timeout() -> u64 {
    30_000
}

const fn default_health_timeout() -> u64 {
    5_000
}

fn default_upstream_url() -> String {
    DEFAULT_UPSTREAM_URL.to_string()
}

fn default_service_name() -> String {
    DEFAULT_SERVICE_NAME.to_string()
}

fn default_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn is_default_service(v: &ServiceInfo) -> bool {
    v.name == default_service_name() && v.version == default_service_version()
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "is_default_service")]
    pub service: ServiceInfo,

    #[serde(default)]
    pub upstream: Upstream,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceInfo {
    #[serde(default = "default_service_name")]
    pub name: String,

    #[serde(default = "default_service_version")]
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            version: default_service_version(),
        }
    }
}

/// The single upstream every request is forwarded to.
///
/// Timeouts are in milliseconds. The health probe budget is meant to be
/// much shorter than the search budget so `/health` fails fast.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Upstream {
    #[serde(default = "default_upstream_url")]
    pub url: String,

    #[serde(default = "default_search_timeout")]
    pub search_timeout: u64,

    #[serde(default = "default_health_timeout")]
    pub health_timeout: u64,
}

impl Default for Upstream {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            search_timeout: default_search_timeout(),
            health_timeout: default_health_timeout(),
        }
    }
}

impl Upstream {
    #[must_use]
    pub const fn search_budget(&self) -> Duration {
        Duration::from_millis(self.search_timeout)
    }

    #[must_use]
    pub const fn health_budget(&self) -> Duration {
        Duration::from_millis(self.health_timeout)
    }

    /// Base URL without a trailing slash, as shown in `/` and `/health`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.upstream.url, DEFAULT_UPSTREAM_URL);
        assert_eq!(config.upstream.search_timeout, 30_000);
        assert_eq!(config.upstream.health_timeout, 5_000);
        assert_eq!(config.service.name, DEFAULT_SERVICE_NAME);
        assert_eq!(config.service.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_str::<Config>(r#"{"upstream": {"retries": 3}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn base_url_strips_trailing_slash() {
        let upstream = Upstream {
            url: "http://search:3000/".into(),
            ..Upstream::default()
        };
        assert_eq!(upstream.base_url(), "http://search:3000");
    }

    #[test]
    fn budgets_convert_from_millis() {
        let upstream = Upstream::default();
        assert_eq!(upstream.search_budget(), Duration::from_secs(30));
        assert_eq!(upstream.health_budget(), Duration::from_secs(5));
    }
}
