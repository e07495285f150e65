//! mq-server: HTTP API, TMDB client, and catalog aggregation.
//!
//! - [`tmdb::TmdbClient`] talks to the movie provider behind the
//!   [`provider::MovieProvider`] trait
//! - [`normalize`] flattens provider payloads into [`mq_core::Movie`]
//! - [`catalog::Catalog`] builds listing pages and fans out by-id lookups
//! - [`favorites`] keeps the favorite id set
//! - Axum router with request ids, CORS, tracing, and graceful shutdown

pub mod catalog;
pub mod context;
pub mod error;
pub mod favorites;
pub mod middleware;
pub mod normalize;
pub mod provider;
pub mod router;
pub mod routes;
pub mod tmdb;

use mq_core::config::Config;

use crate::context::AppContext;

/// Start the marquee server and serve until a shutdown signal arrives.
pub async fn start(config: Config) -> mq_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let static_dir = config.server.static_dir.clone();

    let ctx = AppContext::from_config(config)?;
    let app = router::build_router(ctx, static_dir);

    let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
    tracing::info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}
