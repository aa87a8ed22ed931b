//! dbqa server binary.
//!
//! Loads configuration from the environment, assembles the
//! question-answering service, and serves the HTTP API until interrupted.

use std::net::SocketAddr;
use std::sync::Arc;

use dbqa_server::api::create_router;
use dbqa_server::config::AppConfig;
use dbqa_server::service::QaService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    let default_filter = if config.debug { "debug" } else { "info" };
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());
    tracing_subscriber::fmt().with_env_filter(rust_log).init();

    let service = QaService::from_config(&config).await?;
    tracing::info!("question-answering service initialized");

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let app = create_router(Arc::new(service));

    tracing::info!("starting dbqa server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("dbqa server shut down gracefully");
    Ok(())
}

/// Signal for graceful shutdown (Ctrl-C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL-C signal handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received CTRL-C signal, shutting down");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM signal, shutting down");
        }
    }
}
