//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`serve`], [`query`], [`tables`], or [`validate`].
//! Each handler lives in its own submodule.

pub mod query;
pub mod serve;
pub mod tables;
pub mod validate;

use crate::cli::{Cli, Commands, ConfigArgs};
use crate::config::{self, LoadedConfig};
use crate::error::OpsQueryError;
use crate::logging;

pub async fn dispatch(cli: Cli) -> Result<(), OpsQueryError> {
    match cli.command {
        Some(Commands::Serve(args)) => serve::execute(*args).await,
        Some(Commands::Query(args)) => query::execute(*args).await,
        Some(Commands::Tables(args)) => tables::execute(*args).await,
        Some(Commands::Validate(ref args)) => validate::execute(args),
        None => {
            print_welcome();
            Ok(())
        }
    }
}

/// Start logging, then load the config file, apply overrides and validate.
async fn prepare(args: &ConfigArgs) -> Result<LoadedConfig, OpsQueryError> {
    logging::init(
        &args.log_level,
        logging::resolve_format(args.pretty, args.json),
    );

    config::load(args.config.as_deref())
        .await?
        .map(|c| args.apply(c))
        .validated()
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  opsquery v{version}: live HAProxy and Consul state as tables\n\n  \
         No command provided. To get started:\n\n    \
         opsquery tables                                List available tables\n    \
         opsquery query haproxy_info --addr <socket>    Query an admin socket\n    \
         opsquery serve                                 Serve queries over HTTP\n    \
         opsquery --help                                See all commands and options\n"
    );
}
