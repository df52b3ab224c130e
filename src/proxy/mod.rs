//! Proxy Module
//!
//! The per-connection request/response pipeline and the accept loop.
//!
//! # Pipeline
//! - `request` - parse the client's absolute-URI request line
//! - cache probe by `host + path`
//! - `forward` - send a rewritten HTTP/1.0 request to the origin
//! - `relay` - pass the bounded response back and cache it if small enough

pub mod forward;
pub mod handler;
pub mod relay;
pub mod request;
pub mod response;
pub mod server;

pub use handler::{handle_connection, ProxyState, Served};
pub use request::ProxyRequest;
pub use server::serve;
