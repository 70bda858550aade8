//! opsquery exposes live HAProxy and Consul state as queryable tables.
//!
//! A query names a table and carries the constraints of its WHERE clause.
//! HAProxy tables are answered by sending a runtime-API command to every
//! admin socket named by an `addr = ...` constraint and parsing the text
//! reply into rows; Consul tables are answered from the local agent's
//! HTTP API.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (serve, query, tables, validate).
//! - [`config`] -- Configuration loading and validation via the
//!   [`ConfigSource`](config::ConfigSource) trait.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`query`] -- Constraint resolution, line extractors, and the fan-out
//!   executor that turns socket replies into rows.
//! - [`haproxy`] -- Admin socket client (unix and TCP).
//! - [`consul`] -- Consul agent HTTP transport, response models, and row mapping.
//! - [`tables`] -- The table catalogue: schemas and generators.
//! - [`api`] / [`health`] -- HTTP handlers.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`server`] -- Axum router, shared application state, and graceful shutdown.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |
//! | `file-backends` | All file format backends |
//! | `full` | All features |

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod api;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod consul;
pub mod error;
pub mod haproxy;
pub mod health;
pub mod logging;
pub mod query;
pub mod server;
pub mod tables;
