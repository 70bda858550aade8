//! Configuration validation with detailed error reporting.
//!
//! [`validate`] checks a parsed [`Config`] for zero timeouts, an
//! unusable Consul address and unknown table names, collecting every
//! problem as a [`ValidationError`] with a suggestion where one helps.

use url::Url;

use super::model::Config;
use crate::error::ValidationError;
use crate::tables::known_table_names;

/// Validate the Consul agent address. Returns `Ok(())` or a human-readable error.
pub fn validate_consul_address(address: &str) -> Result<(), String> {
    match Url::parse(address) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme != "http" && scheme != "https" {
                Err(format!(
                    "unsupported scheme '{scheme}' (expected http or https)"
                ))
            } else if parsed.host_str().is_none() {
                Err(format!("'{address}' has no host"))
            } else {
                Ok(())
            }
        }
        Err(_) => Err(format!("'{address}' is not a valid URL")),
    }
}

/// Closest known table name, if any is near enough to be a typo.
#[must_use]
pub fn suggest_table(name: &str) -> Option<&'static str> {
    known_table_names()
        .into_iter()
        .map(|known| (known, strsim::levenshtein(name, known)))
        .filter(|(_, distance)| *distance <= 3)
        .min_by_key(|(_, distance)| *distance)
        .map(|(known, _)| known)
}

pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.haproxy.timeout == 0 {
        errors.push(ValidationError {
            section: "haproxy".into(),
            field: "timeout".into(),
            message: "must be greater than 0".into(),
            suggestion: Some("timeouts are in milliseconds, e.g. 5000".into()),
        });
    }

    if config.consul.timeout == 0 {
        errors.push(ValidationError {
            section: "consul".into(),
            field: "timeout".into(),
            message: "must be greater than 0".into(),
            suggestion: Some("timeouts are in milliseconds, e.g. 5000".into()),
        });
    }

    if let Err(msg) = validate_consul_address(&config.consul.address) {
        errors.push(ValidationError {
            section: "consul".into(),
            field: "address".into(),
            message: msg,
            suggestion: Some("e.g. http://127.0.0.1:8500".into()),
        });
    }

    if config.consul.token.as_deref() == Some("") {
        errors.push(ValidationError {
            section: "consul".into(),
            field: "token".into(),
            message: "token cannot be empty when set".into(),
            suggestion: Some("remove the field to send no token".into()),
        });
    }

    let known = known_table_names();
    let mut seen = std::collections::HashSet::new();
    for name in &config.tables.disabled {
        if !known.contains(&name.as_str()) {
            errors.push(ValidationError {
                section: "tables".into(),
                field: "disabled".into(),
                message: format!("unknown table '{name}'"),
                suggestion: suggest_table(name).map(|s| format!("did you mean '{s}'?")),
            });
        } else if !seen.insert(name) {
            errors.push(ValidationError {
                section: "tables".into(),
                field: "disabled".into(),
                message: format!("table '{name}' listed twice"),
                suggestion: None,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[must_use]
pub fn format_validation_report(path: &str, config: &Config) -> String {
    let known = known_table_names();
    let enabled = known.len() - config.tables.disabled.len().min(known.len());
    let mut lines = vec![format!("{path}\n"), format!("  {enabled} tables enabled")];

    for name in &known {
        let marker = if config.tables.disabled.iter().any(|d| d == name) {
            "\u{2717}"
        } else {
            "\u{2713}"
        };
        lines.push(format!("    {marker} {name}"));
    }

    lines.push(format!(
        "\n  haproxy: timeout {}ms, fan-out {}",
        config.haproxy.timeout, config.haproxy.fan_out
    ));
    lines.push(format!(
        "  consul:  {} (timeout {}ms{})",
        config.consul.address,
        config.consul.timeout,
        if config.consul.token.is_some() {
            ", token set"
        } else {
            ""
        }
    ));

    lines.join("\n")
}
