//! # line-protocol
//!
//! The line-oriented transport beneath SMTP-style request/response servers.
//!
//! A [`FramedConnection`] turns a raw byte stream into bounded CRLF lines and
//! parsed `VERB params` commands, and writes single-line and multi-line
//! status replies, each flushed as one unit. Optional diagnostic taps report
//! every byte exchanged to an injected [`TraceSink`].
//!
//! Session state, mail transactions, authentication, TLS negotiation and
//! connection timeouts are left to the caller.
//!
//! ## Modules
//! - [`core`]: line codec, reply codec, command parsing
//! - [`transport`]: framed connection and diagnostic taps
//! - [`config`]: framing bounds, tracing flag, logging settings
//! - [`error`]: the error taxonomy
//! - [`utils`]: logging setup and metrics
//!
//! ## Example
//! ```rust
//! use line_protocol::config::TransportConfig;
//! use line_protocol::FramedConnection;
//! use tokio::io::{AsyncReadExt, AsyncWriteExt};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> line_protocol::Result<()> {
//! let (mut client, server) = tokio::io::duplex(1024);
//! let mut conn = FramedConnection::plain(server, &TransportConfig::default());
//!
//! client.write_all(b"mail FROM:<a@b.com>\r\n").await?;
//! let cmd = conn.read_command().await?;
//! assert_eq!(cmd.verb, "MAIL");
//! assert_eq!(cmd.params, "FROM:<a@b.com>");
//!
//! line_protocol::reply!(conn, "{} {}", 250, "OK").await?;
//! let mut wire = [0u8; 8];
//! client.read_exact(&mut wire).await?;
//! assert_eq!(&wire, b"250 OK\r\n");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod transport;
pub mod utils;

pub use crate::core::command::Command;
pub use crate::core::reply::Reply;
pub use error::{ProtocolError, Result};
pub use transport::connection::FramedConnection;
pub use transport::tap::TraceSink;
