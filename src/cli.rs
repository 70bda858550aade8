//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (serve, query, tables, validate), and their associated
//! argument structs. Every tuning flag has an environment variable
//! equivalent for container deployments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::model::Config;
use crate::query::FanOutPolicy;

#[derive(Parser)]
#[command(
    name = "opsquery",
    version,
    about = "Live HAProxy and Consul state as queryable tables",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        opsquery tables                                        List available tables\n  \
        opsquery query haproxy_info --addr /run/haproxy.sock   Query one socket\n  \
        opsquery serve -p 8080                                 Serve tables over HTTP"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve table queries over HTTP
    Serve(Box<ServeArgs>),

    /// Run one query and print the rows
    Query(Box<QueryArgs>),

    /// List enabled tables and their columns
    Tables(Box<TablesArgs>),

    /// Validate a config file without starting
    Validate(ValidateArgs),
}

/// Config file location and overrides shared by every command that
/// builds the table catalogue.
#[derive(Args, Clone, Debug, Default)]
pub struct ConfigArgs {
    /// Config file path (.yaml, .json, .toml)
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Consul agent address
    #[arg(long, env = "CONSUL_HTTP_ADDR", help_heading = "Sources")]
    pub consul_address: Option<String>,

    /// Consul ACL token
    #[arg(long, env = "CONSUL_HTTP_TOKEN", help_heading = "Sources")]
    pub consul_token: Option<String>,

    /// Table to disable (repeatable, or comma separated)
    #[arg(
        long = "disable-table",
        env = "TABLES_DISABLED",
        value_delimiter = ',',
        help_heading = "Sources"
    )]
    pub disabled_tables: Vec<String>,

    /// Which endpoints of a multi-addr HAProxy query contribute rows
    #[arg(long, env = "FAN_OUT", help_heading = "Sources")]
    pub fan_out: Option<FanOutPolicy>,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,
}

impl ConfigArgs {
    /// Apply the command-line overrides on top of a file config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref address) = self.consul_address {
            config.consul.address.clone_from(address);
        }
        if let Some(ref token) = self.consul_token {
            config.consul.token = Some(token.clone());
        }
        for table in &self.disabled_tables {
            let table = table.trim();
            if !table.is_empty() && !config.tables.disabled.iter().any(|d| d == table) {
                config.tables.disabled.push(table.to_string());
            }
        }
        if let Some(policy) = self.fan_out {
            config.haproxy.fan_out = policy;
        }
    }
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        opsquery serve                                Auto-detect config\n  \
        opsquery serve -c opsquery.yaml -p 8080       Specific config file\n  \
        opsquery serve --disable-table haproxy_sessions")]
pub struct ServeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Max request body size in bytes
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = 65_536,
        help_heading = "Tuning"
    )]
    pub max_body: usize,
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        opsquery query haproxy_info --addr /run/haproxy/admin.sock\n  \
        opsquery query haproxy_sessions --addr lb1:9999 --addr lb2:9999\n  \
        opsquery query consul_agent_members --format text")]
pub struct QueryArgs {
    /// Table to query
    pub table: String,

    /// HAProxy admin socket to query (repeatable)
    #[arg(long = "addr")]
    pub addrs: Vec<String>,

    /// Output format
    #[arg(long, default_value = "json")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args)]
pub struct TablesArgs {
    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Config file to validate
    #[arg(default_value = "opsquery.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, Default, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
