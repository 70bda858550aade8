//! `opsquery tables` — list enabled tables and their columns.

use crate::cli::{OutputFormat, TablesArgs};
use crate::error::OpsQueryError;
use crate::tables::{ColumnType, Tables};

pub async fn execute(args: TablesArgs) -> Result<(), OpsQueryError> {
    let loaded = super::prepare(&args.config).await?;
    let tables = Tables::from_config(&loaded.config);

    match args.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(tables.definitions()).unwrap_or_else(|_| "[]".into())
            );
        }
        OutputFormat::Text => {
            for def in tables.definitions() {
                let note = if def.requires_addr() {
                    " (requires addr)"
                } else {
                    ""
                };
                println!("{}{note}", def.name);
                for column in &def.columns {
                    let kind = match column.kind {
                        ColumnType::Text => "TEXT",
                        ColumnType::Integer => "INTEGER",
                    };
                    println!("    {:<32} {kind}", column.name);
                }
            }
        }
    }

    Ok(())
}
