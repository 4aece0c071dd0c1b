//! # Core Protocol Components
//!
//! Line framing, command parsing and reply rendering.
//!
//! This module handles the wire format of SMTP-style text protocols and is
//! independent of any particular stream type.
//!
//! ## Components
//! - **Codec**: Tokio codecs that frame input lines and encode replies
//! - **Command**: A parsed `VERB params` tuple
//! - **Reply**: Single-line and multi-line status replies
//!
//! ## Wire Format
//! ```text
//! input:   VERB<SP>params<CRLF>
//! reply:   <content><CRLF>
//! multi:   <code>-<text><CRLF> ... <code><SP><text><CRLF>
//! ```
//!
//! ## Security
//! - Every line is bounded; an overrun is a fatal framing error
//! - No partial line is ever surfaced at end of stream

pub mod codec;
pub mod command;
pub mod reply;

#[cfg(test)]
mod tests;
