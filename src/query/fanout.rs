//! Running one admin-socket command across the endpoints of a query.
//!
//! Endpoints are visited strictly in order, one exchange at a time. A
//! failed exchange aborts the whole query; nothing gathered so far is
//! returned. Lines the extractor cannot parse are logged and dropped.
//!
//! How many endpoints are visited is governed by [`FanOutPolicy`]. The
//! default, [`FanOutPolicy::First`], answers from the first endpoint
//! only, even when the query names several.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::{Extractor, Row};
use crate::error::OpsQueryError;
use crate::haproxy::CommandClient;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FanOutPolicy {
    /// Stop after the first endpoint and return its rows only.
    #[default]
    First,
    /// Query every endpoint and concatenate their rows.
    All,
}

impl FanOutPolicy {
    /// Lowercase name, as written in config files and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::All => "all",
        }
    }
}

impl std::fmt::Display for FanOutPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct FanOut<'a> {
    client: &'a dyn CommandClient,
    policy: FanOutPolicy,
}

impl<'a> FanOut<'a> {
    #[must_use]
    pub const fn new(client: &'a dyn CommandClient, policy: FanOutPolicy) -> Self {
        Self { client, policy }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub async fn run(
        &self,
        endpoints: &[String],
        command: &str,
        extractor: Extractor,
    ) -> Result<Vec<Row>, OpsQueryError> {
        if endpoints.is_empty() {
            return Err(OpsQueryError::MissingAddressConstraint);
        }

        let mut rows = Vec::new();

        for endpoint in endpoints {
            let start = Instant::now();
            let raw = match self.client.run_command(endpoint, command).await {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(
                        endpoint = %endpoint,
                        command,
                        error = %e,
                        latency_ms = start.elapsed().as_millis() as u64,
                        "admin socket command failed"
                    );
                    return Err(OpsQueryError::fetch(endpoint, command, e));
                }
            };

            let extraction = extractor.extract(&raw, endpoint);
            for skip in &extraction.skipped {
                tracing::debug!(
                    endpoint = %endpoint,
                    command,
                    line = skip.line_number,
                    reason = ?skip.reason,
                    "skipped unparseable line"
                );
            }
            tracing::debug!(
                endpoint = %endpoint,
                command,
                rows = extraction.rows.len(),
                skipped = extraction.skipped.len(),
                latency_ms = start.elapsed().as_millis() as u64,
                "endpoint answered"
            );
            rows.extend(extraction.rows);

            if self.policy == FanOutPolicy::First {
                if endpoints.len() > 1 {
                    tracing::debug!(
                        answered = %endpoint,
                        ignored = endpoints.len() - 1,
                        "fan-out policy 'first' stops after one endpoint"
                    );
                }
                break;
            }
        }

        Ok(rows)
    }
}
