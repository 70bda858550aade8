//! Concrete [`ConfigSource`](super::ConfigSource) implementations.
//!
//! File-based sources (YAML, JSON, TOML) are gated by feature flags.
//! [`parse_config_str`] does the format-specific deserialization for
//! callers that already hold the file content.

pub mod file_source;

#[cfg(feature = "yaml")]
pub mod yaml;

#[cfg(feature = "json")]
pub mod json;

#[cfg(feature = "toml")]
pub mod toml_source;

use crate::config::model::Config;
use crate::error::OpsQueryError;

/// Parse a config string based on file extension.
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Config, OpsQueryError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| OpsQueryError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| OpsQueryError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| OpsQueryError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(OpsQueryError::UnsupportedFormat(other.to_string())),
    }
}
