//! # Framed Connection
//!
//! Line input and reply output over one raw byte stream.
//!
//! The stream is split into halves. The read half feeds a bounded
//! [`LineCodec`], the write half is fed by a [`ReplyCodec`]. With tracing on,
//! a [`TapReader`] and a [`TapWriter`] are placed between each half and its
//! buffer; with tracing off the halves are used directly. Either way the
//! connection only sees a boxed byte source and byte sink.
//!
//! A connection is owned by one session and is not internally synchronized.
//! Timeouts belong to the caller, e.g. `tokio::time::timeout(d, conn.read_command())`.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use line_protocol::config::TransportConfig;
//! use line_protocol::transport::connection::FramedConnection;
//! use line_protocol::transport::tap::TracingSink;
//!
//! # async fn serve(stream: tokio::net::TcpStream) -> line_protocol::error::Result<()> {
//! let config = TransportConfig::default();
//! let mut conn = FramedConnection::from_tcp(stream, &config, Arc::new(TracingSink::new()));
//! conn.reply("220 mx.example.com ESMTP").await?;
//! let cmd = conn.read_command().await?;
//! if cmd.is("EHLO") {
//!     conn.multiline_reply(250, &["mx.example.com", "PIPELINING", "8BITMIME"]).await?;
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, warn};

use crate::config::TransportConfig;
use crate::core::codec::{LineCodec, ReplyCodec};
use crate::core::command::Command;
use crate::core::reply::Reply;
use crate::error::{ProtocolError, Result};
use crate::transport::tap::{ByteCounter, Tap, TapReader, TapWriter, TraceSink};
use crate::utils::metrics::{Metrics, Timer};

/// Read side of the raw stream, possibly tapped
pub type ByteSource = Box<dyn AsyncRead + Send + Unpin>;

/// Write side of the raw stream, possibly tapped
pub type ByteSink = Box<dyn AsyncWrite + Send + Unpin>;

/// A raw stream split into line input and reply output.
pub struct FramedConnection {
    reader: FramedRead<ByteSource, LineCodec>,
    writer: FramedWrite<ByteSink, ReplyCodec>,
    inbound: Option<ByteCounter>,
    metrics: Option<Arc<Metrics>>,
    poisoned: bool,
}

impl FramedConnection {
    /// Build a connection, tapping both directions when `config.trace` is set.
    pub fn new<S>(stream: S, config: &TransportConfig, sink: Arc<dyn TraceSink>) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        if config.trace {
            Self::traced(stream, config, sink)
        } else {
            Self::plain(stream, config)
        }
    }

    /// Build a connection with no observation on either direction.
    pub fn plain<S>(stream: S, config: &TransportConfig) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);
        Self::assemble(Box::new(read_half), Box::new(write_half), config, None)
    }

    /// Build a connection with diagnostic taps on both directions.
    pub fn traced<S>(stream: S, config: &TransportConfig, sink: Arc<dyn TraceSink>) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);
        let counter = ByteCounter::default();
        let source = TapReader::new(
            read_half,
            Tap::inbound(Arc::clone(&sink)).with_counter(counter.clone()),
        );
        let dest = TapWriter::new(write_half, Tap::outbound(sink));
        Self::assemble(Box::new(source), Box::new(dest), config, Some(counter))
    }

    /// Build a connection over an accepted TCP stream, logging both
    /// endpoints when tracing is enabled.
    pub fn from_tcp(stream: TcpStream, config: &TransportConfig, sink: Arc<dyn TraceSink>) -> Self {
        if config.trace {
            match (stream.peer_addr(), stream.local_addr()) {
                (Ok(peer), Ok(local)) => debug!(%peer, %local, "Connection from {peer} to {local}"),
                (Err(e), _) | (_, Err(e)) => debug!(error = %e, "Connection with unknown endpoints"),
            }
        }
        Self::new(stream, config, sink)
    }

    fn assemble(
        source: ByteSource,
        dest: ByteSink,
        config: &TransportConfig,
        inbound: Option<ByteCounter>,
    ) -> Self {
        let reader = FramedRead::with_capacity(
            source,
            LineCodec::from_config(config),
            config.read_buffer_capacity,
        );
        let writer = FramedWrite::new(dest, ReplyCodec);
        Self {
            reader,
            writer,
            inbound,
            metrics: None,
            poisoned: false,
        }
    }

    /// Report line and reply activity into a shared collector.
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        metrics.connection_attached();
        self.metrics = Some(metrics);
        self
    }

    /// Read the next line as exact octets, terminator stripped.
    ///
    /// Fails with [`ProtocolError::EndOfStream`] if the peer closes before a
    /// line completes and with a framing error on an overrun. After any error
    /// other than end of stream, every further call fails with
    /// [`ProtocolError::Poisoned`].
    pub async fn read_line_bytes(&mut self) -> Result<Bytes> {
        if self.poisoned {
            return Err(ProtocolError::Poisoned);
        }

        match self.reader.next().await {
            Some(Ok(line)) => {
                if let Some(m) = &self.metrics {
                    m.line_read();
                }
                Ok(line)
            }
            Some(Err(e)) => Err(self.fail(e)),
            None => Err(self.fail(ProtocolError::EndOfStream)),
        }
    }

    /// Read the next line as a string, terminator stripped.
    ///
    /// Invalid UTF-8 is replaced; use [`read_line_bytes`](Self::read_line_bytes)
    /// for the exact octets.
    pub async fn read_line(&mut self) -> Result<String> {
        let line = self.read_line_bytes().await?;
        Ok(String::from_utf8_lossy(&line).into_owned())
    }

    /// Read the next line and parse it as a [`Command`].
    pub async fn read_command(&mut self) -> Result<Command> {
        let line = self.read_line_bytes().await?;
        let command = Command::parse(&line);
        if let Some(m) = &self.metrics {
            m.command_read();
        }
        Ok(command)
    }

    /// Write `content` followed by CRLF and flush.
    ///
    /// The content is sent as given; the caller supplies the status code.
    pub async fn reply(&mut self, content: impl Into<String>) -> Result<()> {
        self.send(Reply::Line(content.into())).await
    }

    /// Format a reply line eagerly, then write and flush it.
    ///
    /// See also the [`reply!`](crate::reply!) macro.
    pub fn reply_fmt(&mut self, args: fmt::Arguments<'_>) -> impl Future<Output = Result<()>> + '_ {
        let content = fmt::format(args);
        self.send(Reply::Line(content))
    }

    /// Write a multi-line reply sharing one status code and flush once.
    ///
    /// Every line but the last is written as `<code>-<line>`, the last as
    /// `<code> <line>`. An empty `lines` fails with
    /// [`ProtocolError::EmptyReply`] without writing anything.
    pub async fn multiline_reply<S: AsRef<str>>(&mut self, code: u16, lines: &[S]) -> Result<()> {
        if lines.is_empty() {
            return Err(ProtocolError::EmptyReply);
        }
        let reply = Reply::multiline(code, lines.iter().map(|l| l.as_ref().to_owned()));
        self.send(reply).await
    }

    /// Encode and flush a reply as one unit.
    pub async fn send(&mut self, reply: Reply) -> Result<()> {
        if self.poisoned {
            return Err(ProtocolError::Poisoned);
        }
        if matches!(&reply, Reply::MultiLine { lines, .. } if lines.is_empty()) {
            return Err(ProtocolError::EmptyReply);
        }

        let lines = reply.line_count();
        // Only connections reporting metrics pay for the flush timer.
        let _timer = self.metrics.as_ref().map(|_| Timer::start("reply_flush"));
        match self.writer.send(reply).await {
            Ok(()) => {
                if let Some(m) = &self.metrics {
                    m.reply_sent(lines);
                }
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Bytes seen by the inbound tap, or `None` when untraced.
    pub fn inbound_bytes(&self) -> Option<u64> {
        self.inbound.as_ref().map(ByteCounter::get)
    }

    pub fn is_traced(&self) -> bool {
        self.inbound.is_some()
    }

    /// True once a fatal error has left the framing state indeterminate.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    pub fn max_line_length(&self) -> usize {
        self.reader.decoder().max_length()
    }

    fn fail(&mut self, error: ProtocolError) -> ProtocolError {
        match &error {
            ProtocolError::EndOfStream => {
                if let Some(m) = &self.metrics {
                    m.peer_closed();
                }
                debug!("Peer closed connection");
            }
            e if e.is_framing() => {
                self.poisoned = true;
                if let Some(m) = &self.metrics {
                    m.framing_error();
                }
                warn!(error = %e, "Framing error, connection is no longer usable");
            }
            e => {
                self.poisoned = true;
                if let Some(m) = &self.metrics {
                    m.transport_error();
                }
                debug!(error = %e, "Transport error");
            }
        }
        error
    }
}

impl fmt::Debug for FramedConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FramedConnection")
            .field("max_line_length", &self.max_line_length())
            .field("traced", &self.is_traced())
            .field("inbound_bytes", &self.inbound_bytes())
            .field("poisoned", &self.poisoned)
            .finish_non_exhaustive()
    }
}

/// Format and send a single reply line, like `format!`.
///
/// ```rust,no_run
/// # async fn demo(conn: &mut line_protocol::FramedConnection) -> line_protocol::Result<()> {
/// line_protocol::reply!(conn, "{} {}", 550, "No such user").await?;
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! reply {
    ($conn:expr, $($arg:tt)*) => {
        $conn.reply(::std::format!($($arg)*))
    };
}
