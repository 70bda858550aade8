//! Generic async file-based config source.
//!
//! [`FileSource`] implements [`ConfigSource`] for any file format by
//! accepting a deserialization function at construction time. It reads
//! the file through Tokio; validation happens later, once command-line
//! overrides have been applied.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::config::model::Config;
use crate::config::ConfigSource;
use crate::error::OpsQueryError;

type Deserialize = fn(&str) -> Result<Config, Box<dyn std::error::Error + Send + Sync>>;

pub struct FileSource {
    path: PathBuf,
    name: &'static str,
    deserialize: Deserialize,
}

impl FileSource {
    #[must_use]
    pub fn new(path: PathBuf, name: &'static str, deserialize: Deserialize) -> Self {
        Self {
            path,
            name,
            deserialize,
        }
    }

    async fn read_content(&self) -> Result<String, OpsQueryError> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                OpsQueryError::ConfigFileNotFound {
                    path: self.path.clone(),
                }
            } else {
                OpsQueryError::Io(e)
            }
        })
    }
}

#[async_trait]
impl ConfigSource for FileSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn load(&self) -> Result<Config, OpsQueryError> {
        let content = self.read_content().await?;

        let config = (self.deserialize)(&content).map_err(|e| OpsQueryError::ConfigParse {
            path: self.path.display().to_string(),
            source: e,
        })?;

        tracing::debug!(path = %self.path.display(), format = self.name, "config loaded");
        Ok(config)
    }
}
