//! Unified error types for opsquery.
//!
//! [`OpsQueryError`] is the fatal channel: anything returned through it
//! aborts the query or command that produced it. Recoverable per-line
//! parse problems never travel here; extractors report them as
//! [`SkippedLine`](crate::query::SkippedLine) values instead.
//! [`ValidationError`] describes a single config validation failure.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub section: String,
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}.{}: {}", self.section, self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum OpsQueryError {
    #[error("addr is required in WHERE to identify which socket to speak with")]
    MissingAddressConstraint,

    #[error("'{command}' against {endpoint} failed: {source}")]
    FetchFailure {
        endpoint: String,
        command: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Unknown table: '{0}'")]
    UnknownTable(String),

    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Unexpected response from {endpoint}: {source}")]
    ConsulDecode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Config file not found: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("Config parse error in {path}:\n  {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Config validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Unsupported config format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl OpsQueryError {
    /// Wrap a transport failure with the endpoint and command it concerned.
    pub fn fetch(
        endpoint: &str,
        command: &str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::FetchFailure {
            endpoint: endpoint.to_string(),
            command: command.to_string(),
            source: source.into(),
        }
    }
}
