//! HTTP server bootstrap.

use axum::Router;
use log::{info, warn};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Binds `address` and serves `router` until Ctrl-C.
pub async fn serve(address: &str, router: Router) -> std::io::Result<()> {
    let listener = TcpListener::bind(address).await?;
    let local: SocketAddr = listener.local_addr()?;
    info!("event=server_start module=http status=ok address={local}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=http status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=shutdown_signal module=http status=error error={err}");
        // Without a signal handler, keep serving until the process is killed.
        std::future::pending::<()>().await;
    }
}
