//! `opsquery validate` — check a configuration file for errors.
//!
//! Parses and validates the config file, reporting results in either
//! human-readable text or machine-readable JSON format.

use crate::cli::{OutputFormat, ValidateArgs};
use crate::config::sources::parse_config_str;
use crate::config::validation;
use crate::error::OpsQueryError;
use crate::tables::known_table_names;

pub fn execute(args: &ValidateArgs) -> Result<(), OpsQueryError> {
    let path = &args.config;

    if !path.exists() {
        return Err(OpsQueryError::ConfigFileNotFound { path: path.clone() });
    }

    let content = std::fs::read_to_string(path)?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let config = parse_config_str(ext, &content, &path.display().to_string())?;

    if let Err(errors) = validation::validate(&config) {
        match args.format {
            OutputFormat::Text => {
                eprintln!("\u{2717} {} has {} errors\n", path.display(), errors.len());
                for error in &errors {
                    eprintln!("{error}");
                }
            }
            OutputFormat::Json => {
                let json_errors: Vec<serde_json::Value> = errors
                    .iter()
                    .map(|e| {
                        serde_json::json!({
                            "section": e.section,
                            "field": e.field,
                            "message": e.message,
                            "suggestion": e.suggestion,
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "valid": false,
                        "errors": json_errors,
                    })
                );
            }
        }
        return Err(OpsQueryError::ConfigValidation { errors });
    }

    match args.format {
        OutputFormat::Text => {
            println!(
                "\u{2713} {}",
                validation::format_validation_report(&path.display().to_string(), &config)
            );
        }
        OutputFormat::Json => {
            let enabled: Vec<&str> = known_table_names()
                .into_iter()
                .filter(|name| !config.tables.disabled.iter().any(|d| d == name))
                .collect();
            println!(
                "{}",
                serde_json::json!({
                    "valid": true,
                    "tables": enabled,
                    "fan_out": config.haproxy.fan_out,
                })
            );
        }
    }

    Ok(())
}
