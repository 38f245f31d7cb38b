//! Item request tracker HTTP server.

use item_requests_core::environment::SystemClock;
use item_requests_core::RequestService;
use item_requests_postgres::PostgresRequestStore;
use item_requests_server::config::Config;
use item_requests_server::{build_app, init_tracing, metrics};
use item_requests_web::AppState;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may be set directly.
    let _ = dotenvy::dotenv();
    init_tracing();

    info!("Starting item request server");

    let config = Config::from_env();
    info!(
        host = %config.server.host,
        port = config.server.port,
        page_size = config.requests.page_size,
        max_connections = config.database.max_connections,
        "Configuration loaded"
    );

    let metrics_handle = metrics::install_recorder()?;

    // Connects on the first request, not here.
    let store = PostgresRequestStore::new(config.database.connection_settings());
    let service = RequestService::new(
        Arc::new(store.clone()),
        Arc::new(SystemClock),
        config.requests.service_config(),
    );

    let app = build_app(AppState::new(service), metrics_handle);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Server listening");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_requested(shutdown_rx.clone()))
        .into_future();
    let deadline = drain_deadline(shutdown_rx, config.server.shutdown_timeout());

    tokio::select! {
        result = server => result?,
        () = deadline => warn!(
            timeout_secs = config.server.shutdown_timeout,
            "In-flight requests did not finish in time, shutting down anyway"
        ),
    }

    store.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_requested(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|&requested| requested).await;
}

async fn drain_deadline(rx: watch::Receiver<bool>, timeout: Duration) {
    shutdown_requested(rx).await;
    tokio::time::sleep(timeout).await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
