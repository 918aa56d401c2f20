//! Configuration loading, validation, and resolution.
//!
//! The proxy runs with built-in defaults when no file is present. A file
//! is picked from an explicit path or auto-detected in the working
//! directory, then CLI/env overrides are layered on top by
//! [`Overrides::apply`]. Submodules provide the data model, validation
//! logic, and the file-backed source.

pub mod model;
pub mod sources;
pub mod validation;

use std::path::{Path, PathBuf};

use crate::error::ProxyError;
use model::Config;

/// Files probed, in order, when no `--config` path is given.
pub const AUTO_DETECT_CANDIDATES: &[&str] = &[
    "search-proxy.yaml",
    "search-proxy.yml",
    "search-proxy.json",
    "search-proxy.toml",
];

/// A config together with a label describing where it came from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: Config,
    pub source_name: String,
}

/// Load the config from `explicit`, an auto-detected file, or defaults.
pub async fn resolve(explicit: Option<&Path>) -> Result<ResolvedConfig, ProxyError> {
    if let Some(path) = explicit {
        return load_file(path).await;
    }

    for name in AUTO_DETECT_CANDIDATES {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected config file");
            return load_file(&path).await;
        }
    }

    tracing::debug!("no config file found, using built-in defaults");
    Ok(ResolvedConfig {
        config: Config::default(),
        source_name: "defaults".into(),
    })
}

async fn load_file(path: &Path) -> Result<ResolvedConfig, ProxyError> {
    let source = sources::for_path(path)?;
    let config = source.load().await?;
    Ok(ResolvedConfig {
        config,
        source_name: format!("{} ({})", source.path().display(), source.name()),
    })
}

/// Values supplied on the command line or through the environment.
///
/// Each `Some` replaces the corresponding file value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub upstream_url: Option<String>,
    pub search_timeout: Option<u64>,
    pub health_timeout: Option<u64>,
}

impl Overrides {
    /// Layer the overrides onto `config` and re-validate the result.
    pub fn apply(&self, mut config: Config) -> Result<Config, ProxyError> {
        if let Some(ref url) = self.upstream_url {
            config.upstream.url.clone_from(url);
        }
        if let Some(ms) = self.search_timeout {
            config.upstream.search_timeout = ms;
        }
        if let Some(ms) = self.health_timeout {
            config.upstream.health_timeout = ms;
        }

        validation::validate(&config).map_err(|errors| ProxyError::ConfigValidation { errors })?;
        Ok(config)
    }
}
