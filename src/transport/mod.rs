//! # Transport Layer
//!
//! Connection-level framing over any async byte stream, with optional
//! diagnostic taps.
//!
//! ## Components
//! - **Connection**: [`FramedConnection`], line input and reply output for one session
//! - **Tap**: transparent byte observers and the sinks they report to
//!
//! The stream itself (TCP, TLS, Unix socket, in-memory duplex) is supplied by
//! the caller; accepting connections and enforcing idle timeouts happen above
//! this layer.

pub mod connection;
pub mod tap;

pub use connection::FramedConnection;
pub use tap::{Direction, MemorySink, TraceSink, TracingSink};
