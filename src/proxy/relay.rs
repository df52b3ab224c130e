//! Response Relay
//!
//! Reads the origin's response up to a fixed bound, passes it to the client
//! untouched, and decides whether it may be cached.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::Result;

// == Bounded Read ==
/// Reads the whole response, stopping at EOF or after `limit` bytes.
///
/// Anything the origin sends past `limit` is never read and never relayed.
pub async fn read_bounded<R>(origin: &mut R, limit: usize) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::with_capacity(limit.min(8 * 1024));
    origin.take(limit as u64).read_to_end(&mut buf).await?;
    Ok(buf)
}

// == Relay ==
/// Writes the response bytes to the client unmodified.
pub async fn relay_response<W>(client: &mut W, response: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    client.write_all(response).await?;
    client.flush().await?;
    Ok(())
}

/// True when a response of `len` bytes may be stored in the cache.
pub fn is_cacheable(len: usize, max_object_size: usize) -> bool {
    len <= max_object_size
}
