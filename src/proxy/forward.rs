//! Origin Forwarder
//!
//! Connects to the origin server and sends the rewritten HTTP/1.0 request.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use crate::error::{ProxyError, Result};

/// Protocol version always used toward the origin
pub const ORIGIN_VERSION: &str = "HTTP/1.0";

/// Fixed User-Agent header sent on every forwarded request
pub const USER_AGENT_HDR: &str =
    "User-Agent: Mozilla/5.0 (X11; Linux x86_64; rv:10.0.3) Gecko/20120305 Firefox/10.0.3\r\n";

// == Connect ==
/// Opens a TCP connection to `host:port`.
///
/// Name resolution and connection failures both surface as
/// [`ProxyError::Connect`].
pub async fn connect_origin(host: &str, port: &str) -> Result<TcpStream> {
    let addr = format!("{}:{}", host, port);
    let connected = TcpStream::connect(addr.as_str()).await;
    match connected {
        Ok(stream) => {
            debug!(origin = %addr, "Connected to origin");
            Ok(stream)
        }
        Err(source) => Err(ProxyError::Connect { addr, source }),
    }
}

// == Request Building ==
/// Builds the request sent to the origin.
///
/// The client's version and headers are dropped: the origin always receives
/// HTTP/1.0 with exactly these headers, in this order.
pub fn build_origin_request(host: &str, path: &str) -> String {
    let mut buf = String::with_capacity(160 + host.len() + path.len());
    buf.push_str("GET ");
    buf.push_str(path);
    buf.push(' ');
    buf.push_str(ORIGIN_VERSION);
    buf.push_str("\r\n");
    buf.push_str("Host: ");
    buf.push_str(host);
    buf.push_str("\r\n");
    buf.push_str(USER_AGENT_HDR);
    buf.push_str("Connection: close\r\n");
    buf.push_str("Proxy-Connection: close\r\n");
    buf.push_str("\r\n");
    buf
}

// == Send ==
/// Writes the rewritten request to the origin in a single write.
pub async fn send_request<W>(origin: &mut W, host: &str, path: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let request = build_origin_request(host, path);
    origin.write_all(request.as_bytes()).await?;
    origin.flush().await?;
    Ok(())
}
