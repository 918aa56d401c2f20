//! File-backed config sources.
//!
//! Provides the generic [`FileSource`](file_source::FileSource) and the
//! extension table [`deserializer_for`] (formats gated by feature flags)
//! shared by [`for_path`] and the [`parse_config_str`] helper used by
//! `validate`.

pub mod file_source;

use std::path::Path;

use crate::config::model::Config;
use crate::error::ProxyError;

use file_source::{Deserializer, FileSource};

fn boxed<E>(e: E) -> Box<dyn std::error::Error + Send + Sync>
where
    E: std::error::Error + Send + Sync + 'static,
{
    Box::new(e)
}

/// The single extension table: format name and deserializer for `ext`.
pub fn deserializer_for(ext: &str) -> Result<(&'static str, Deserializer), ProxyError> {
    let entry: (&'static str, Deserializer) = match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => ("yaml", |content| {
            serde_yml::from_str::<Config>(content).map_err(boxed)
        }),

        #[cfg(feature = "json")]
        "json" => ("json", |content| {
            serde_json::from_str::<Config>(content).map_err(boxed)
        }),

        #[cfg(feature = "toml")]
        "toml" => ("toml", |content| {
            toml::from_str::<Config>(content).map_err(boxed)
        }),

        other => return Err(ProxyError::UnsupportedFormat(other.to_string())),
    };
    Ok(entry)
}

/// Parse a config string based on file extension.
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Config, ProxyError> {
    let (_, deserialize) = deserializer_for(ext)?;
    deserialize(content).map_err(|e| ProxyError::ConfigParse {
        path: path_display.to_string(),
        source: e,
    })
}

/// Pick the [`FileSource`] matching the file extension.
pub fn for_path(path: &Path) -> Result<FileSource, ProxyError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let (name, deserialize) = deserializer_for(ext)?;
    Ok(FileSource::new(path.to_path_buf(), name, deserialize))
}
