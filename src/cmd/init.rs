//! `search-proxy init` - generate a starter configuration file.
//!
//! Writes a YAML, JSON, or TOML config with either the minimal template
//! or one documenting every option. Never overwrites an existing file.

use std::path::PathBuf;

use crate::cli::{ConfigFormat, InitArgs};
use crate::error::ProxyError;

pub fn execute(args: &InitArgs) -> Result<(), ProxyError> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("search-proxy.{}", args.format.extension())));

    if output.exists() {
        return Err(ProxyError::FileExists { path: output });
    }

    std::fs::write(&output, template(&args.format, args.full))?;
    println!("Created {}", output.display());
    Ok(())
}

#[must_use]
pub const fn template(format: &ConfigFormat, full: bool) -> &'static str {
    match (format, full) {
        (ConfigFormat::Yaml, false) => YAML_MINIMAL,
        (ConfigFormat::Yaml, true) => YAML_FULL,
        (ConfigFormat::Json, false) => JSON_MINIMAL,
        (ConfigFormat::Json, true) => JSON_FULL,
        (ConfigFormat::Toml, false) => TOML_MINIMAL,
        (ConfigFormat::Toml, true) => TOML_FULL,
    }
}

const YAML_MINIMAL: &str = r#"# search-proxy config

upstream:
  url: "http://localhost:3000"
"#;

const YAML_FULL: &str = r#"# search-proxy config
#
# All values shown are defaults. CLI flags and environment variables
# (UPSTREAM_URL, SEARCH_TIMEOUT_MS, HEALTH_TIMEOUT_MS) override them.

# Identity reported by GET / and GET /health
service:
  name: "Wine Search Proxy API"
  # version: defaults to the binary version

upstream:
  url: "http://localhost:3000"   # Base URL; /search and /health are appended
  search_timeout: 30000          # POST /search budget in ms
  health_timeout: 5000           # GET /health probe budget in ms
"#;

const JSON_MINIMAL: &str = r#"{
  "upstream": {
    "url": "http://localhost:3000"
  }
}
"#;

const JSON_FULL: &str = r#"{
  "service": {
    "name": "Wine Search Proxy API"
  },
  "upstream": {
    "url": "http://localhost:3000",
    "search_timeout": 30000,
    "health_timeout": 5000
  }
}
"#;

const TOML_MINIMAL: &str = r#"# search-proxy config

[upstream]
url = "http://localhost:3000"
"#;

const TOML_FULL: &str = r#"# search-proxy config
#
# All values shown are defaults. CLI flags and environment variables
# (UPSTREAM_URL, SEARCH_TIMEOUT_MS, HEALTH_TIMEOUT_MS) override them.

[service]
name = "Wine Search Proxy API"
# version = "1.0.0"

[upstream]
url = "http://localhost:3000"
search_timeout = 30000
health_timeout = 5000
"#;
