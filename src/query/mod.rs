//! Query core: turning admin-socket text into rows.
//!
//! [`constraints`] resolves the target endpoints of a query,
//! [`matcher`] wraps a named-capture regex, [`kv`] and [`session`]
//! extract rows from `show info`/`show activity` and `show sess`
//! output, and [`fanout`] runs an extractor across the resolved
//! endpoints.
//!
//! Extraction never fails as a whole. Lines that cannot be parsed are
//! reported in [`Extraction::skipped`] and left out of the rows; only
//! transport problems and missing constraints are errors.

pub mod constraints;
pub mod fanout;
pub mod kv;
pub mod matcher;
pub mod session;

use std::collections::BTreeMap;

pub use constraints::{list_addresses, Constraint, ConstraintList, Operator, QueryContext};
pub use fanout::{FanOut, FanOutPolicy};
pub use matcher::NamedCaptureMatcher;

/// One output record: field name to raw field value.
pub type Row = BTreeMap<String, String>;

/// Field every HAProxy row carries, set to the endpoint it came from.
pub const ADDR_FIELD: &str = "addr";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `key: value` line without a `:` separator.
    MissingSeparator,
    /// Session line that does not match the `show sess` grammar.
    GrammarMismatch,
}

/// A line left out of an extraction. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number within the response.
    pub line_number: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub rows: Vec<Row>,
    pub skipped: Vec<SkippedLine>,
}

/// Which parser turns a command response into rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    /// One row per response, built from `key: value` lines.
    KeyValue,
    /// One row per `show sess` line.
    Sessions,
}

impl Extractor {
    #[must_use]
    pub fn extract(self, text: &str, endpoint: &str) -> Extraction {
        match self {
            Self::KeyValue => kv::extract(text, endpoint),
            Self::Sessions => session::extract(text, endpoint),
        }
    }
}

/// Non-blank lines of a response, numbered from 1.
fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_lines_skips_blank_and_keeps_numbering() {
        let lines: Vec<_> = content_lines("a: 1\n\n   \nb: 2\r\n").collect();
        assert_eq!(lines, vec![(1, "a: 1"), (4, "b: 2")]);
    }

    #[test]
    fn extractor_dispatches_to_parser() {
        let kv = Extractor::KeyValue.extract("Pid: 1\n", "a");
        assert_eq!(kv.rows.len(), 1);

        let sess = Extractor::Sessions.extract("Pid: 1\n", "a");
        assert!(sess.rows.is_empty());
        assert_eq!(sess.skipped[0].reason, SkipReason::GrammarMismatch);
    }
}
