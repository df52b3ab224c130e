//! Web Proxy - A concurrent forwarding HTTP proxy with an object cache
//!
//! Usage: `web_proxy <port>`

use std::net::SocketAddr;
use std::process;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use web_proxy::{serve, spawn_stats_task, Config, ProxyState, SharedCache};

/// Main entry point for the proxy.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Read the listening port from the command line
/// 3. Load the remaining configuration from environment variables
/// 4. Create the shared cache and the stats task
/// 5. Accept connections until SIGINT/SIGTERM
/// 6. Log the final cache state and release the cache
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "web_proxy=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port = match Config::port_from_args(std::env::args()) {
        Ok(port) => port,
        Err(usage) => {
            eprintln!("{}", usage);
            process::exit(1);
        }
    };

    let config = Config::from_env().with_port(port);
    info!(
        "Configuration loaded: port={}, bind={}, max_connections={:?}, stats_interval={}s",
        config.listen_port, config.bind_addr, config.max_connections, config.stats_interval
    );

    let cache = SharedCache::new();
    let state = ProxyState::new(cache.clone());

    let stats_handle = (config.stats_interval > 0)
        .then(|| spawn_stats_task(cache.clone(), config.stats_interval));

    let addr = SocketAddr::new(config.bind_addr, config.listen_port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to listen on {}", addr))?;
    info!("Proxy listening on {}", addr);

    serve(listener, state, config.max_connections, shutdown_signal()).await;

    if let Some(handle) = stats_handle {
        handle.abort();
        warn!("Stats task aborted");
    }

    let snapshot = cache.snapshot().await;
    match serde_json::to_string(&snapshot) {
        Ok(json) => info!("Final cache state: {}", json),
        Err(e) => warn!("Could not serialize cache state: {}", e),
    }
    let stats = cache.stats().await;
    info!(
        "Cache totals: hits={}, misses={}, insertions={}, evictions={}",
        stats.hits, stats.misses, stats.insertions, stats.evictions
    );

    cache.destroy().await;
    info!("Proxy shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
