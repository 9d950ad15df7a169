use crate::commands::Out;
use crate::error::NOT_CONFIGURED;
use crate::ledger::Ledger;
use crate::server::router;
use crate::Result;
use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Runs the HTTP API on `bind` until the process receives Ctrl-C.
pub async fn serve(ledger: Ledger, bind: SocketAddr) -> Result<Out<()>> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Unable to listen on {bind}"))?;
    let addr = listener
        .local_addr()
        .context("Unable to get the listening address")?;

    if !ledger.is_configured() {
        warn!("{NOT_CONFIGURED}");
    }
    info!("Server listening on {addr}");
    info!("API Endpoints:");
    info!("  GET  /api/sheets[?type=expenses|debts|summary]");
    info!("  POST /api/sheets");
    info!("  GET  /health");

    axum::serve(listener, router(Arc::new(ledger)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("The server failed")?;

    Ok(Out::new_message("Server stopped"))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(e) => {
            warn!("Unable to listen for Ctrl-C, the server must be killed to stop it: {e}");
            std::future::pending::<()>().await
        }
    }
}
