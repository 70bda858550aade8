//! Table catalogue.
//!
//! Every table opsquery can answer is described by a
//! [`TableDefinition`]: its name, its column schema and the
//! [`Generator`] that produces rows. [`Tables`] is built once at start-up
//! from the configuration and is immutable afterwards; disabled tables
//! are simply left out.

pub mod consul;
pub mod haproxy;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::config::model::Config;
use crate::consul::{ConsulTransport, HttpTransport};
use crate::error::OpsQueryError;
use crate::haproxy::{commands, CommandClient, SocketClient};
use crate::query::{list_addresses, Extractor, FanOut, FanOutPolicy, QueryContext, Row};

pub use self::consul::ConsulTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Integer,
}

/// Column metadata. Row values are always strings; the type only tells
/// the host how to interpret them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDefinition {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: ColumnType,
}

#[must_use]
pub const fn text(name: &'static str) -> ColumnDefinition {
    ColumnDefinition {
        name,
        kind: ColumnType::Text,
    }
}

#[must_use]
pub const fn integer(name: &'static str) -> ColumnDefinition {
    ColumnDefinition {
        name,
        kind: ColumnType::Integer,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    /// Run `command` on every `addr` endpoint and parse with `extractor`.
    Haproxy {
        command: &'static str,
        extractor: Extractor,
    },
    Consul(ConsulTable),
}

#[derive(Debug, Clone, Serialize)]
pub struct TableDefinition {
    pub name: &'static str,
    pub columns: Vec<ColumnDefinition>,
    #[serde(skip)]
    pub generator: Generator,
}

impl TableDefinition {
    /// Whether queries must name target endpoints through `addr`.
    #[must_use]
    pub const fn requires_addr(&self) -> bool {
        matches!(self.generator, Generator::Haproxy { .. })
    }
}

/// Every table opsquery knows, in catalogue order.
#[must_use]
pub fn all_definitions() -> Vec<TableDefinition> {
    let mut defs = vec![
        TableDefinition {
            name: "haproxy_sessions",
            columns: haproxy::session_columns(),
            generator: Generator::Haproxy {
                command: commands::SHOW_SESS,
                extractor: Extractor::Sessions,
            },
        },
        TableDefinition {
            name: "haproxy_activity",
            columns: haproxy::activity_columns(),
            generator: Generator::Haproxy {
                command: commands::SHOW_ACTIVITY,
                extractor: Extractor::KeyValue,
            },
        },
        TableDefinition {
            name: "haproxy_info",
            columns: haproxy::info_columns(),
            generator: Generator::Haproxy {
                command: commands::SHOW_INFO,
                extractor: Extractor::KeyValue,
            },
        },
    ];

    defs.extend(ConsulTable::ALL.into_iter().map(|table| TableDefinition {
        name: table.name(),
        columns: table.columns(),
        generator: Generator::Consul(table),
    }));
    defs
}

#[must_use]
pub fn known_table_names() -> Vec<&'static str> {
    all_definitions().iter().map(|d| d.name).collect()
}

pub struct Tables {
    definitions: Vec<TableDefinition>,
    haproxy: Arc<dyn CommandClient>,
    consul: Arc<dyn ConsulTransport>,
    fan_out: FanOutPolicy,
}

impl Tables {
    /// Build the catalogue with the real socket and HTTP clients.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let haproxy = SocketClient::new(Duration::from_millis(config.haproxy.timeout));
        let consul = HttpTransport::new(
            &config.consul.address,
            config.consul.token.clone(),
            Duration::from_millis(config.consul.timeout),
        );
        Self::new(config, Arc::new(haproxy), Arc::new(consul))
    }

    #[must_use]
    pub fn new(
        config: &Config,
        haproxy: Arc<dyn CommandClient>,
        consul: Arc<dyn ConsulTransport>,
    ) -> Self {
        let disabled = &config.tables.disabled;
        let definitions = all_definitions()
            .into_iter()
            .filter(|def| {
                if disabled.iter().any(|d| d == def.name) {
                    tracing::info!(table = def.name, "table disabled");
                    false
                } else {
                    tracing::info!(table = def.name, "table enabled");
                    true
                }
            })
            .collect();

        Self {
            definitions,
            haproxy,
            consul,
            fan_out: config.haproxy.fan_out,
        }
    }

    #[must_use]
    pub fn definitions(&self) -> &[TableDefinition] {
        &self.definitions
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TableDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    /// Produce the rows of table `name` for one query.
    pub async fn generate(
        &self,
        name: &str,
        ctx: &QueryContext,
    ) -> Result<Vec<Row>, OpsQueryError> {
        let def = self
            .get(name)
            .ok_or_else(|| OpsQueryError::UnknownTable(name.to_string()))?;

        match def.generator {
            Generator::Haproxy { command, extractor } => {
                let endpoints = list_addresses(ctx)?;
                FanOut::new(self.haproxy.as_ref(), self.fan_out)
                    .run(&endpoints, command, extractor)
                    .await
            }
            Generator::Consul(table) => table.rows(self.consul.as_ref()).await,
        }
    }
}
