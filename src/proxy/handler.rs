//! Connection Handler
//!
//! Runs the per-connection pipeline: parse, cache probe, and on a miss
//! forward + relay + cache store.

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::cache::SharedCache;
use crate::error::{ProxyError, Result};
use crate::proxy::forward::{connect_origin, send_request};
use crate::proxy::relay::{is_cacheable, read_bounded, relay_response};
use crate::proxy::request::{drain_headers, read_request_line, ProxyRequest};
use crate::proxy::response;

/// State shared by every connection handler.
///
/// Cloning is cheap: the cache is a shared handle.
#[derive(Debug, Clone)]
pub struct ProxyState {
    /// The process-wide object cache
    pub cache: SharedCache,
    /// Upper bound on bytes read from an origin
    pub response_limit: usize,
}

impl ProxyState {
    /// Creates state whose response bound equals the cache capacity.
    pub fn new(cache: SharedCache) -> Self {
        Self {
            response_limit: cache.capacity(),
            cache,
        }
    }
}

impl Default for ProxyState {
    fn default() -> Self {
        Self::new(SharedCache::new())
    }
}

/// Where the bytes sent to the client came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Served {
    /// Served from the cache, no origin contact
    CacheHit,
    /// Fetched from the origin; `cached` tells whether it was stored
    Origin { cached: bool },
}

// == Handle Connection ==
/// Serves exactly one request on `client`, then closes it.
///
/// Parse and connect failures are answered with an error page; all failures
/// end only this connection. Errors are returned for logging.
pub async fn handle_connection<S>(client: S, state: &ProxyState) -> Result<Served>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut client = BufReader::new(client);

    let request = match read_and_parse(&mut client).await {
        Ok(request) => request,
        Err(err) => {
            respond_with_error(&mut client, &err).await;
            return Err(err);
        }
    };

    debug!(
        host = %request.host,
        port = %request.port,
        path = %request.path,
        "Parsed request"
    );

    let key = request.cache_key();
    if let Some(payload) = state.cache.lookup(&key).await {
        info!(key = %key, bytes = payload.len(), "Cache hit");
        relay_response(&mut client, &payload).await?;
        client.shutdown().await?;
        return Ok(Served::CacheHit);
    }
    debug!(key = %key, "Cache miss");

    let mut origin = match connect_origin(&request.host, &request.port).await {
        Ok(origin) => origin,
        Err(err) => {
            respond_with_error(&mut client, &err).await;
            return Err(err);
        }
    };

    send_request(&mut origin, &request.host, &request.path).await?;
    let response = read_bounded(&mut origin, state.response_limit).await?;
    drop(origin);

    relay_response(&mut client, &response).await?;
    client.shutdown().await?;

    let cached = if is_cacheable(response.len(), state.cache.max_object_size()) {
        state.cache.insert_if_absent(key, response).await
    } else {
        debug!(bytes = response.len(), "Response too large to cache");
        false
    };

    info!(
        origin = %request.origin_addr(),
        path = %request.path,
        cached,
        "Relayed origin response"
    );
    Ok(Served::Origin { cached })
}

async fn read_and_parse<R>(client: &mut BufReader<R>) -> Result<ProxyRequest>
where
    R: AsyncRead + Unpin,
{
    let request = match read_request_line(client).await {
        Ok(line) => ProxyRequest::parse(&line),
        Err(err @ ProxyError::Io(_)) => return Err(err),
        Err(e) => Err(e),
    };
    // Headers are consumed either way so an error page is not cut off by a reset
    drain_headers(client).await?;
    request
}

/// Best-effort error page; the connection is closing either way.
async fn respond_with_error<W>(client: &mut W, err: &ProxyError)
where
    W: AsyncWrite + Unpin,
{
    let page = response::for_error(err);
    if let Err(e) = relay_response(client, &page).await {
        warn!("Failed to send error response: {}", e);
        return;
    }
    let _ = client.shutdown().await;
}
