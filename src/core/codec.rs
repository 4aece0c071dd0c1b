use bytes::{BufMut, Bytes, BytesMut};
use std::fmt::Write as _;
use tokio_util::codec::{Decoder, Encoder};

use crate::config::{TransportConfig, MIN_LINE_LENGTH};
use crate::core::reply::Reply;
use crate::error::{ProtocolError, Result};

/// Line terminator
pub const CRLF: &[u8] = b"\r\n";

/// Bounded line decoder.
///
/// Yields each line without its terminator as an owned [`Bytes`]. A line
/// whose length including the terminator exceeds `max_length` is rejected
/// with [`ProtocolError::LineTooLong`] as soon as the overrun is visible;
/// nothing is truncated or stitched back together.
#[derive(Debug, Clone)]
pub struct LineCodec {
    max_length: usize,
    require_crlf: bool,
    // Bytes of the buffer already scanned for LF without a match.
    next_index: usize,
}

impl LineCodec {
    /// Bounds below [`MIN_LINE_LENGTH`] are raised to it; a legal SMTP
    /// command line always fits.
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length: max_length.max(MIN_LINE_LENGTH),
            require_crlf: false,
            next_index: 0,
        }
    }

    /// Reject lines that end in a bare LF.
    pub fn strict(mut self) -> Self {
        self.require_crlf = true;
        self
    }

    pub fn from_config(config: &TransportConfig) -> Self {
        let codec = Self::new(config.max_line_length);
        if config.require_crlf {
            codec.strict()
        } else {
            codec
        }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

impl Decoder for LineCodec {
    type Item = Bytes;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        // An LF at index i gives a framed length of i + 1, so only the first
        // max_length bytes can hold a legal terminator.
        let read_to = src.len().min(self.max_length);
        let found = src[self.next_index..read_to]
            .iter()
            .position(|b| *b == b'\n');

        match found {
            Some(offset) => {
                let newline = self.next_index + offset;
                self.next_index = 0;

                let mut line = src.split_to(newline + 1);
                line.truncate(newline);
                if line.last() == Some(&b'\r') {
                    line.truncate(newline - 1);
                } else if self.require_crlf {
                    return Err(ProtocolError::BareLineFeed);
                }
                Ok(Some(line.freeze()))
            }
            None if src.len() >= self.max_length => Err(ProtocolError::LineTooLong {
                limit: self.max_length,
            }),
            None => {
                self.next_index = read_to;
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None if src.is_empty() => Ok(None),
            // The peer closed in the middle of a line.
            None => Err(ProtocolError::EndOfStream),
        }
    }
}

/// Reply encoder.
///
/// Performs no validation of single-line content; multi-line replies must
/// carry at least one line so the final one can be marked terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplyCodec;

impl Encoder<Reply> for ReplyCodec {
    type Error = ProtocolError;

    fn encode(&mut self, reply: Reply, dst: &mut BytesMut) -> Result<()> {
        dst.reserve(reply.encoded_len());
        match reply {
            Reply::Line(content) => {
                dst.put_slice(content.as_bytes());
                dst.put_slice(CRLF);
            }
            Reply::MultiLine { code, lines } => {
                let Some((last, rest)) = lines.split_last() else {
                    return Err(ProtocolError::EmptyReply);
                };
                for line in rest {
                    // BytesMut's fmt::Write impl only fails on allocation.
                    let _ = write!(dst, "{code}-{line}");
                    dst.put_slice(CRLF);
                }
                let _ = write!(dst, "{code} {last}");
                dst.put_slice(CRLF);
            }
        }
        Ok(())
    }
}
