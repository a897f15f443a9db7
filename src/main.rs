use std::sync::Arc;

use clap::Parser;
use devotions::config::{Cli, Config, resolve_paths};
use devotions::db::Database;
use devotions::handler::AppState;
use devotions::routes::app;
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    devotions::init_tracing();
    tracing::info!("devotions.svc starting");

    let (config_path, data_dir) = resolve_paths(args.config_path.as_deref());

    let mut cfg = Config::load(&config_path).unwrap_or_else(|e| {
        tracing::error!(error = %e, path = ?config_path, "failed to load config");
        std::process::exit(1);
    });
    if let Some(port) = args.port {
        cfg.app.set_port(port);
    }

    if cfg.app.remote().is_none() {
        if let Err(e) = std::fs::create_dir_all(&data_dir) {
            tracing::error!(error = %e, dir = ?data_dir, "failed to create data directory");
            std::process::exit(1);
        }
    }

    let db = Arc::new(Database::new(&cfg, &data_dir).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup database");
        std::process::exit(1);
    }));

    let address = format!("0.0.0.0:{}", cfg.app.get_port());
    let listener = tokio::net::TcpListener::bind(&address).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup tcp listener");
        std::process::exit(1);
    });

    let cancellation_token = CancellationToken::new();
    let shutdown_token = cancellation_token.clone();
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl+c");
            return;
        }
        tracing::info!("ctrl+c signal received, preparing to shutdown");
        shutdown_token.cancel();
    });

    tracing::info!("devotions.svc running on http://{}", &address);
    let result = axum::serve(listener, app(AppState::new(db)))
        .with_graceful_shutdown(async move { cancellation_token.cancelled().await })
        .await;

    if let Err(err) = result {
        tracing::error!(error = %err, "server stopped unexpectedly");
        std::process::exit(1);
    }

    tracing::info!("devotions.svc going off, graceful shutdown complete");
}
