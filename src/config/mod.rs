//! Configuration loading and validation.
//!
//! Defines the [`ConfigSource`] trait for file backends and [`load`],
//! which picks an explicit path, auto-detects `opsquery.{yaml,yml,json,toml}`
//! in the working directory, or falls back to built-in defaults when no
//! file exists. Submodules provide the data model, validation logic and
//! the concrete sources.

pub mod model;
pub mod sources;
pub mod validation;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::OpsQueryError;
use model::Config;

/// Files probed, in order, when no path is given.
pub const CANDIDATES: [&str; 4] = [
    "opsquery.yaml",
    "opsquery.yml",
    "opsquery.json",
    "opsquery.toml",
];

#[async_trait]
pub trait ConfigSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn load(&self) -> Result<Config, OpsQueryError>;
}

/// A parsed configuration together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source_name: String,
}

/// Load and validate the configuration.
///
/// Overrides from the command line should be applied with
/// [`LoadedConfig::map`] before calling [`LoadedConfig::validated`].
pub async fn load(explicit: Option<&Path>) -> Result<LoadedConfig, OpsQueryError> {
    match resolve_file_source(explicit).await? {
        Some(source) => {
            let config = source.load().await?;
            Ok(LoadedConfig {
                config,
                source_name: source.name().to_string(),
            })
        }
        None => {
            tracing::debug!("no config file found, using defaults");
            Ok(LoadedConfig {
                config: Config::default(),
                source_name: "defaults".to_string(),
            })
        }
    }
}

impl LoadedConfig {
    #[must_use]
    pub fn map(mut self, f: impl FnOnce(&mut Config)) -> Self {
        f(&mut self.config);
        self
    }

    pub fn validated(self) -> Result<Self, OpsQueryError> {
        validation::validate(&self.config)
            .map_err(|errors| OpsQueryError::ConfigValidation { errors })?;
        Ok(self)
    }
}

async fn resolve_file_source(
    explicit: Option<&Path>,
) -> Result<Option<Box<dyn ConfigSource>>, OpsQueryError> {
    if let Some(path) = explicit {
        return create_file_source(path).map(Some);
    }

    for name in &CANDIDATES {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected config file");
            return create_file_source(&path).map(Some);
        }
    }

    Ok(None)
}

pub fn create_file_source(path: &Path) -> Result<Box<dyn ConfigSource>, OpsQueryError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => Ok(Box::new(sources::yaml::new(path.to_path_buf()))),

        #[cfg(feature = "json")]
        "json" => Ok(Box::new(sources::json::new(path.to_path_buf()))),

        #[cfg(feature = "toml")]
        "toml" => Ok(Box::new(sources::toml_source::new(path.to_path_buf()))),

        other => Err(OpsQueryError::UnsupportedFormat(other.to_string())),
    }
}
