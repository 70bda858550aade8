//! `opsquery serve` — answer table queries over HTTP.
//!
//! Loads configuration, builds the table catalogue once, and starts the
//! Axum HTTP server with graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::cli::ServeArgs;
use crate::error::OpsQueryError;
use crate::server::{self, AppState};
use crate::tables::Tables;

pub async fn execute(args: ServeArgs) -> Result<(), OpsQueryError> {
    let loaded = super::prepare(&args.config).await?;
    let tables = Tables::from_config(&loaded.config);
    let table_count = tables.definitions().len();

    let state = Arc::new(AppState::new(tables, loaded.source_name));
    let router = server::build_router(state, args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        tables = table_count,
        fan_out = %loaded.config.haproxy.fan_out,
        "opsquery started"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("opsquery stopped");
    Ok(())
}
