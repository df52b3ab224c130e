//! Request Parser
//!
//! Reads a client's request line and decomposes its absolute URI into the
//! origin host, port and path.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::cache::CacheEntry;
use crate::error::{ProxyError, Result};

/// The only scheme the proxy forwards
const SCHEME: &str = "http://";

/// Port used when the URI does not name one
pub const DEFAULT_PORT: &str = "80";

/// Longest line read from a client in one piece
pub const MAX_LINE: usize = 8192;

// == Proxy Request ==
/// A parsed client request, ready to be forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRequest {
    pub method: String,
    pub uri: String,
    pub version: String,
    /// Origin host, never empty
    pub host: String,
    /// Origin port, non-empty and numeric
    pub port: String,
    /// Origin path, always starts with `/`
    pub path: String,
}

impl ProxyRequest {
    // == Parse ==
    /// Parses a request line such as `GET http://host:port/path HTTP/1.1`.
    ///
    /// Only `GET` with an `http://` absolute URI is accepted. Tokens after the
    /// version are ignored.
    pub fn parse(line: &str) -> Result<Self> {
        let mut tokens = line.split_whitespace();
        let (method, uri, version) = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(m), Some(u), Some(v)) => (m, u, v),
            _ => {
                return Err(ProxyError::parse(format!(
                    "malformed request line: {:?}",
                    line.trim_end()
                )))
            }
        };

        if method != "GET" {
            return Err(ProxyError::parse(format!("method not implemented: {}", method)));
        }

        let (host, port, path) = split_uri(uri)?;

        Ok(Self {
            method: method.to_string(),
            uri: uri.to_string(),
            version: version.to_string(),
            host,
            port,
            path,
        })
    }

    /// Returns the cache key for this request (`host + path`).
    pub fn cache_key(&self) -> String {
        CacheEntry::make_key(&self.host, &self.path)
    }

    /// Returns `host:port` for connecting to the origin.
    pub fn origin_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// == URI Decomposition ==
/// Splits an absolute `http://` URI into `(host, port, path)`.
fn split_uri(uri: &str) -> Result<(String, String, String)> {
    let rest = uri
        .strip_prefix(SCHEME)
        .ok_or_else(|| ProxyError::parse(format!("missing scheme: {}", uri)))?;

    if rest.matches(':').count() > 1 {
        return Err(ProxyError::parse(format!("more than one ':' in uri: {}", uri)));
    }

    let (authority, raw_path) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };

    let (host, port) = authority.split_once(':').unwrap_or((authority, DEFAULT_PORT));

    if host.is_empty() {
        return Err(ProxyError::parse(format!("missing host: {}", uri)));
    }
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProxyError::parse(format!("invalid port: {:?}", port)));
    }

    Ok((host.to_string(), port.to_string(), normalize_path(raw_path)))
}

/// Rejoins the non-empty path segments with single `/` separators.
///
/// A path that ends up empty, or that ended in `/` (a directory), gets a
/// trailing `/`.
fn normalize_path(raw: &str) -> String {
    let mut path = String::with_capacity(raw.len() + 1);
    for segment in raw.split('/').filter(|s| !s.is_empty()) {
        path.push('/');
        path.push_str(segment);
    }
    if path.is_empty() || raw.ends_with('/') {
        path.push('/');
    }
    path
}

// == Reading From The Client ==
/// Reads at most [`MAX_LINE`] bytes up to and including the next `\n`.
async fn read_chunk<R>(reader: &mut R, buf: &mut Vec<u8>) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let n = (&mut *reader).take(MAX_LINE as u64).read_until(b'\n', buf).await?;
    Ok(n)
}

/// Reads the CRLF-terminated request line.
///
/// A closed connection, a blank first line, a line longer than [`MAX_LINE`]
/// or one that is not UTF-8 is a parse failure.
pub async fn read_request_line<R>(reader: &mut R) -> Result<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let n = read_chunk(reader, &mut buf).await?;
    if n == MAX_LINE && !buf.ends_with(b"\n") {
        return Err(ProxyError::parse("request line too long"));
    }
    let line = String::from_utf8(buf)
        .map_err(|_| ProxyError::parse("request line is not valid UTF-8"))?;
    if n == 0 || line.trim().is_empty() {
        return Err(ProxyError::parse("empty request"));
    }
    Ok(line)
}

/// Reads and discards header lines up to the terminating blank line or EOF.
///
/// Client headers are never forwarded; they are consumed as raw bytes so the
/// client sees an orderly close. Long lines are read in [`MAX_LINE`] pieces.
/// Returns the number of header lines skipped.
pub async fn drain_headers<R>(reader: &mut R) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut count = 0;
    let mut buf = Vec::with_capacity(256);
    // Set while the current line has not yet reached its `\n`
    let mut continued = false;
    loop {
        let n = read_chunk(reader, &mut buf).await?;
        if n == 0 {
            return Ok(count);
        }
        if !continued {
            if buf == b"\r\n" || buf == b"\n" {
                return Ok(count);
            }
            count += 1;
        }
        continued = !buf.ends_with(b"\n");
    }
}
