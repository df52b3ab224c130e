//! Configuration Module
//!
//! Handles loading proxy configuration from the command line and environment variables.

use std::env;
use std::net::{IpAddr, Ipv4Addr};

/// Proxy configuration parameters.
///
/// The listening port comes from the command line; everything else can be
/// set through environment variables with sensible defaults. Cache sizes are
/// fixed and not configurable.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the proxy listens on
    pub listen_port: u16,
    /// Address the proxy binds to
    pub bind_addr: IpAddr,
    /// Cap on concurrently handled connections, None = unbounded
    pub max_connections: Option<usize>,
    /// Seconds between cache statistics reports, 0 disables them
    pub stats_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PROXY_BIND_ADDR` - Bind address (default: 0.0.0.0)
    /// - `MAX_CONNECTIONS` - Admission limit (default: unset, unbounded)
    /// - `STATS_INTERVAL` - Stats report frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            listen_port: defaults.listen_port,
            bind_addr: env::var("PROXY_BIND_ADDR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.bind_addr),
            max_connections: env::var("MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0),
            stats_interval: env::var("STATS_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.stats_interval),
        }
    }

    /// Parses the command line: exactly one argument, the listening port.
    ///
    /// Returns a usage message on any other shape.
    pub fn port_from_args<I>(args: I) -> Result<u16, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let program = args.next().unwrap_or_else(|| "web_proxy".to_string());
        let usage = format!("usage: {} <port>", program);

        match (args.next(), args.next()) {
            (Some(port), None) => port.parse().map_err(|_| usage),
            _ => Err(usage),
        }
    }

    /// Sets the listening port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.listen_port = port;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_port: 8080,
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            max_connections: None,
            stats_interval: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.listen_port, 8080);
        assert_eq!(config.bind_addr, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.max_connections, None);
        assert_eq!(config.stats_interval, 60);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("PROXY_BIND_ADDR");
        env::remove_var("MAX_CONNECTIONS");
        env::remove_var("STATS_INTERVAL");

        let config = Config::from_env();
        assert_eq!(config.bind_addr, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.max_connections, None);
        assert_eq!(config.stats_interval, 60);
    }

    #[test]
    fn test_port_from_args() {
        assert_eq!(Config::port_from_args(args(&["proxy", "15213"])), Ok(15213));
    }

    #[test]
    fn test_port_from_args_wrong_count() {
        assert!(Config::port_from_args(args(&["proxy"])).is_err());
        assert!(Config::port_from_args(args(&["proxy", "1", "2"])).is_err());
    }

    #[test]
    fn test_port_from_args_not_a_number() {
        let err = Config::port_from_args(args(&["proxy", "http"])).unwrap_err();
        assert_eq!(err, "usage: proxy <port>");
    }

    #[test]
    fn test_with_port() {
        assert_eq!(Config::default().with_port(9000).listen_port, 9000);
    }
}
