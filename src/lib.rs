//! Web Proxy - A concurrent forwarding HTTP proxy with an object cache
//!
//! Forwards absolute-URI GET requests to origin servers over HTTP/1.0 and
//! caches small responses with a semi-LRU eviction policy.

pub mod cache;
pub mod config;
pub mod error;
pub mod proxy;
pub mod tasks;

pub use cache::SharedCache;
pub use config::Config;
pub use error::{ProxyError, Result};
pub use proxy::{serve, ProxyState};
pub use tasks::spawn_stats_task;
