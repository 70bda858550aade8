//! Named-capture line matcher.

use std::collections::BTreeMap;

use regex::Regex;

/// A compiled pattern whose named groups become row fields.
///
/// Build it once and reuse it for every line; matching borrows `self`
/// immutably, so one instance can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct NamedCaptureMatcher {
    regex: Regex,
}

impl NamedCaptureMatcher {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    /// Named groups of the pattern, in the order they appear.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.regex.capture_names().flatten()
    }

    /// Map each named group to the text it captured in `line`.
    ///
    /// A line that does not match yields an empty map. Groups that took
    /// no part in the match map to the empty string. Values are the raw
    /// captured text.
    #[must_use]
    pub fn extract(&self, line: &str) -> BTreeMap<String, String> {
        let mut fields = BTreeMap::new();
        let Some(caps) = self.regex.captures(line) else {
            return fields;
        };

        for name in self.field_names() {
            let value = caps.name(name).map_or("", |m| m.as_str());
            fields.insert(name.to_string(), value.to_string());
        }
        fields
    }
}
