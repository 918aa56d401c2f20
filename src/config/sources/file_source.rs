//! Generic async file-based config loader.
//!
//! [`FileSource`] reads a config file of any supported format by
//! accepting a deserialization function at construction time. It reads
//! the file asynchronously via Tokio and validates the result before
//! handing it out.

use std::path::{Path, PathBuf};

use crate::config::model::Config;
use crate::config::validation::validate;
use crate::error::ProxyError;

pub type Deserializer = fn(&str) -> Result<Config, Box<dyn std::error::Error + Send + Sync>>;

pub struct FileSource {
    path: PathBuf,
    name: &'static str,
    deserialize: Deserializer,
}

impl FileSource {
    #[must_use]
    pub fn new(path: PathBuf, name: &'static str, deserialize: Deserializer) -> Self {
        Self {
            path,
            name,
            deserialize,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_content(&self) -> Result<String, ProxyError> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ProxyError::ConfigFileNotFound {
                    path: self.path.clone(),
                }
            } else {
                ProxyError::Io(e)
            }
        })
    }

    pub async fn load(&self) -> Result<Config, ProxyError> {
        let content = self.read_content().await?;

        let config = (self.deserialize)(&content).map_err(|e| ProxyError::ConfigParse {
            path: self.path.display().to_string(),
            source: e,
        })?;

        if let Err(errors) = validate(&config) {
            return Err(ProxyError::ConfigValidation { errors });
        }

        Ok(config)
    }
}
