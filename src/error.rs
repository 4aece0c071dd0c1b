//! # Error Types
//!
//! Error handling for the line transport.
//!
//! Every read and write operation on a [`FramedConnection`](crate::transport::connection::FramedConnection)
//! returns its failure to the caller. Nothing is retried and nothing is swallowed;
//! the session driver decides what happens to the connection.
//!
//! ## Error Categories
//! - **End of stream**: the peer closed, either between lines or in the middle of one
//! - **I/O errors**: transport failures such as resets and broken pipes
//! - **Framing errors**: a line overran the configured bound or broke CRLF rules
//! - **Poisoned**: an operation was attempted after a fatal error on the same connection
//!
//! ## Example Usage
//! ```rust
//! use line_protocol::error::{ProtocolError, Result};
//! use tracing::{info, warn};
//!
//! fn classify(result: Result<String>) {
//!     match result {
//!         Ok(line) => info!(%line, "line received"),
//!         Err(e) if e.is_framing() => warn!(error = %e, "closing after framing overrun"),
//!         Err(e) => warn!(error = %e, "closing connection"),
//!     }
//! }
//!
//! classify(Err(ProtocolError::LineTooLong { limit: 512 }));
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    pub const ERR_END_OF_STREAM: &str = "Connection closed by peer";
    pub const ERR_LINE_TOO_LONG: &str = "Input caused buffer overrun";
    pub const ERR_BARE_LINE_FEED: &str = "Line terminated by bare LF";
    pub const ERR_POISONED: &str = "Connection framing is indeterminate after a fatal error";
    pub const ERR_EMPTY_REPLY: &str = "Multi-line reply requires at least one line";
}

// ProtocolError is the primary error type for all transport operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{}", constants::ERR_END_OF_STREAM)]
    EndOfStream,

    #[error("{} (limit {limit} octets)", constants::ERR_LINE_TOO_LONG)]
    LineTooLong { limit: usize },

    #[error("{}", constants::ERR_BARE_LINE_FEED)]
    BareLineFeed,

    #[error("{}", constants::ERR_POISONED)]
    Poisoned,

    #[error("{}", constants::ERR_EMPTY_REPLY)]
    EmptyReply,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ProtocolError {
    /// True for input that broke the line framing rules.
    pub fn is_framing(&self) -> bool {
        matches!(self, Self::LineTooLong { .. } | Self::BareLineFeed)
    }

    /// True when the connection can no longer be used.
    ///
    /// `EmptyReply` and `ConfigError` are caller mistakes that never touch the wire.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::EmptyReply | Self::ConfigError(_))
    }
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
