use std::sync::Arc;

use shelfwatch::{config::Config, db, http, telemetry};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    let config = Config::from_env()?;
    let store = Arc::new(db::connect_store(&config).await?);

    if config.ensure_indexes {
        db::ensure_indexes(&store).await?;
    }

    let app = http::router(http::AppState::new(store.clone()), &config.static_dir);

    let listener = TcpListener::bind(config.server_addr()).await?;
    tracing::info!(addr = %config.server_addr(), "shelfwatch listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await?;

    tracing::info!("server stopped, closing store");

    // Handlers are dropped with the server, leaving this the last reference
    match Arc::try_unwrap(store) {
        Ok(store) => store.shutdown().await?,
        Err(_) => tracing::warn!("store still shared at shutdown; skipping close"),
    }

    Ok(())
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot listen for SIGTERM, waiting for Ctrl-C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("shutdown signal received");
}
