//! `opsquery query` — run one query and print the rows.
//!
//! `--addr` values become `addr = <value>` constraints, exactly as a
//! host would pass them in a WHERE clause.

use crate::cli::{OutputFormat, QueryArgs};
use crate::error::OpsQueryError;
use crate::query::{QueryContext, Row, ADDR_FIELD};
use crate::tables::{TableDefinition, Tables};

pub async fn execute(args: QueryArgs) -> Result<(), OpsQueryError> {
    let loaded = super::prepare(&args.config).await?;
    let tables = Tables::from_config(&loaded.config);

    let ctx = if args.addrs.is_empty() {
        QueryContext::default()
    } else {
        QueryContext::with_equals(ADDR_FIELD, &args.addrs)
    };

    let rows = tables.generate(&args.table, &ctx).await?;

    match args.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".into())
            );
        }
        OutputFormat::Text => {
            // generate() succeeded, so the table is known
            if let Some(def) = tables.get(&args.table) {
                print!("{}", render_text(def, &rows));
            }
        }
    }

    Ok(())
}

/// Tab-separated header plus one line per row, in column order.
#[must_use]
pub fn render_text(def: &TableDefinition, rows: &[Row]) -> String {
    let mut out = def
        .columns
        .iter()
        .map(|c| c.name)
        .collect::<Vec<_>>()
        .join("\t");
    out.push('\n');

    for row in rows {
        let line = def
            .columns
            .iter()
            .map(|c| row.get(c.name).map_or("", String::as_str))
            .collect::<Vec<_>>()
            .join("\t");
        out.push_str(&line);
        out.push('\n');
    }
    out
}
