//! `key: value` block extraction for `show info` and `show activity`.
//!
//! ```text
//! Name: HAProxy
//! Version: 1.8.4-1deb90d
//! Release_date: 2018/02/08
//! Uptime: 0d 0h54m34s
//! ```
//!
//! The whole block is one snapshot, so it becomes a single row.

use super::{content_lines, Extraction, Row, SkipReason, SkippedLine, ADDR_FIELD};

/// Build one row from a colon-delimited block, tagged with `endpoint`.
///
/// Lines are split on the first `:` only, since values such as dates
/// and percentages may contain colons themselves. `addr` is written
/// before any line is applied, so a line keyed `addr` replaces it, and
/// a repeated key keeps its last value. Lines without a `:` are skipped.
#[must_use]
pub fn extract(text: &str, endpoint: &str) -> Extraction {
    let mut row = Row::new();
    row.insert(ADDR_FIELD.to_string(), endpoint.to_string());
    let mut skipped = Vec::new();

    for (line_number, line) in content_lines(text) {
        match line.split_once(':') {
            Some((key, value)) => {
                row.insert(key.trim().to_string(), value.trim().to_string());
            }
            None => skipped.push(SkippedLine {
                line_number,
                reason: SkipReason::MissingSeparator,
            }),
        }
    }

    Extraction {
        rows: vec![row],
        skipped,
    }
}
