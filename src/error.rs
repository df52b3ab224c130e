//! Error types for the proxy
//!
//! Provides unified error handling using thiserror.

use std::io;

use thiserror::Error;

// == Proxy Error Enum ==
/// Unified error type for the proxy.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Malformed request line, unsupported method, missing scheme or bad authority
    #[error("Bad request: {0}")]
    Parse(String),

    /// Origin host could not be resolved or refused the connection
    #[error("Cannot connect to origin {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Read or write failure on the client or origin socket
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Internal cache invariant violation
    #[error("Cache error: {0}")]
    Cache(String),
}

impl ProxyError {
    // == Status Mapping ==
    /// Returns the HTTP status code and reason phrase reported to the client.
    pub fn status(&self) -> (u16, &'static str) {
        match self {
            ProxyError::Parse(_) => (400, "Bad Request"),
            ProxyError::Connect { .. } => (502, "Bad Gateway"),
            ProxyError::Io(_) | ProxyError::Cache(_) => (500, "Internal Server Error"),
        }
    }

    /// Shorthand for a parse failure.
    pub fn parse(msg: impl Into<String>) -> Self {
        ProxyError::Parse(msg.into())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ProxyError::parse("x").status().0, 400);
        let connect = ProxyError::Connect {
            addr: "nowhere:80".to_string(),
            source: io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
        };
        assert_eq!(connect.status(), (502, "Bad Gateway"));
        assert_eq!(ProxyError::Cache("gone".into()).status().0, 500);
    }

    #[test]
    fn test_io_conversion() {
        let err: ProxyError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe").into();
        assert!(matches!(err, ProxyError::Io(_)));
    }

    #[test]
    fn test_display_includes_address() {
        let err = ProxyError::Connect {
            addr: "example.com:8080".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such host"),
        };
        assert!(err.to_string().contains("example.com:8080"));
    }
}
