//! Connection Dispatcher
//!
//! Accept loop that gives every client connection its own task.

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, info_span, Instrument};

use crate::error::ProxyError;
use crate::proxy::handler::{handle_connection, ProxyState};

/// Pause after a failed accept (e.g. out of file descriptors) before retrying
pub const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Awaits `accept` until it succeeds, sleeping [`ACCEPT_RETRY_DELAY`] after
/// each failure.
async fn accept_with_retry<T, F, Fut>(mut accept: F) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<T>>,
{
    loop {
        match accept().await {
            Ok(accepted) => return accepted,
            Err(e) => {
                error!("Failed to accept connection: {}", e);
                tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
            }
        }
    }
}

/// Accepts connections until `shutdown` resolves.
///
/// Each accepted connection is handled on its own spawned task; the loop
/// never waits for a handler to finish. With `max_connections` set, the
/// loop waits for a free slot before accepting once that many handlers are
/// in flight. Without it the number of handlers is unbounded.
///
/// # Arguments
/// * `listener` - Bound listening socket
/// * `state` - Shared proxy state, cloned into every handler
/// * `max_connections` - Optional admission limit
/// * `shutdown` - Future that ends the accept loop when it completes
pub async fn serve<F>(
    listener: TcpListener,
    state: ProxyState,
    max_connections: Option<usize>,
    shutdown: F,
) where
    F: Future<Output = ()>,
{
    let limiter = max_connections.map(|n| Arc::new(Semaphore::new(n.max(1))));
    tokio::pin!(shutdown);

    loop {
        let permit = match &limiter {
            Some(limiter) => tokio::select! {
                permit = limiter.clone().acquire_owned() => match permit {
                    Ok(permit) => Some(permit),
                    Err(_) => break,
                },
                _ = &mut shutdown => break,
            },
            None => None,
        };

        let (stream, peer) = tokio::select! {
            accepted = accept_with_retry(|| listener.accept()) => accepted,
            _ = &mut shutdown => break,
        };

        let state = state.clone();
        let span = info_span!("conn", peer = %peer);
        tokio::spawn(
            async move {
                match handle_connection(stream, &state).await {
                    Ok(served) => debug!(?served, "Connection done"),
                    Err(ProxyError::Parse(msg)) => info!("Rejected request: {}", msg),
                    Err(e) => info!("Connection aborted: {}", e),
                }
                drop(permit);
            }
            .instrument(span),
        );
    }

    info!("Accept loop stopped");
}
