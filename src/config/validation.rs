//! Configuration validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`Config`] for an unusable
//! upstream URL, zero timeouts, a health budget longer than the search
//! budget, and an empty service name. Returns a list of
//! [`ValidationError`] values with per-field suggestions.

use url::Url;

use super::model::Config;
use crate::error::ValidationError;

/// Validate the upstream base URL. Returns `Ok(())` or a human-readable error.
pub fn validate_upstream_url(url: &str) -> Result<(), String> {
    match Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme != "http" && scheme != "https" {
                Err(format!(
                    "unsupported scheme '{scheme}' (expected http or https)"
                ))
            } else if parsed.host_str().map_or(true, str::is_empty) {
                Err(format!("'{url}' has no host"))
            } else if parsed.query().is_some() {
                Err(format!("'{url}' must not carry a query string"))
            } else {
                Ok(())
            }
        }
        Err(_) => Err(format!("'{url}' is not a valid URL")),
    }
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let upstream = &config.upstream;

    if let Err(message) = validate_upstream_url(&upstream.url) {
        let suggestion = if upstream.url.contains("://") {
            None
        } else {
            Some(format!("did you mean 'http://{}'?", upstream.url))
        };
        errors.push(ValidationError {
            field: "upstream.url".into(),
            message,
            suggestion,
        });
    }

    if upstream.search_timeout == 0 {
        errors.push(ValidationError {
            field: "upstream.search_timeout".into(),
            message: "timeout must be greater than 0".into(),
            suggestion: Some("the default is 30000 ms".into()),
        });
    }

    if upstream.health_timeout == 0 {
        errors.push(ValidationError {
            field: "upstream.health_timeout".into(),
            message: "timeout must be greater than 0".into(),
            suggestion: Some("the default is 5000 ms".into()),
        });
    } else if upstream.health_timeout > upstream.search_timeout && upstream.search_timeout > 0 {
        errors.push(ValidationError {
            field: "upstream.health_timeout".into(),
            message: format!(
                "health probe budget ({} ms) exceeds search budget ({} ms)",
                upstream.health_timeout, upstream.search_timeout
            ),
            suggestion: Some("health probes should fail fast".into()),
        });
    }

    if config.service.name.trim().is_empty() {
        errors.push(ValidationError {
            field: "service.name".into(),
            message: "service name cannot be empty".into(),
            suggestion: None,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Human-readable summary for a valid config, used by `validate`.
#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    format!(
        "{path} is valid\n  upstream:       {}\n  search timeout: {} ms\n  health timeout: {} ms",
        config.upstream.base_url(),
        config.upstream.search_timeout,
        config.upstream.health_timeout
    )
}
