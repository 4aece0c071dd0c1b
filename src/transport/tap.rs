//! # Diagnostic Taps
//!
//! Transparent observers for the raw bytes of a connection.
//!
//! A [`TapReader`] sits between the stream and the input buffer and sees every
//! byte read; a [`TapWriter`] sits between the output buffer and the stream and
//! sees every byte the stream accepts. Neither buffers, alters, drops or
//! reorders anything. Observed chunks are split into CRLF-delimited records
//! and handed to an injected [`TraceSink`].
//!
//! Sinks are best-effort: [`TraceSink::record`] cannot fail, and nothing a sink
//! does is reported back to the stream.

use std::fmt;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{ready, Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tracing::debug;

/// Tracing target used by [`TracingSink`]
pub const TRACE_TARGET: &str = "line_protocol::trace";

/// Which way the observed bytes were flowing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Peer to server
    Inbound,
    /// Server to peer
    Outbound,
}

impl Direction {
    pub fn marker(self) -> &'static str {
        match self {
            Self::Inbound => "->",
            Self::Outbound => "<-",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Destination for trace records.
pub trait TraceSink: Send + Sync {
    /// Record one observed line. Must not block for long and cannot fail.
    fn record(&self, direction: Direction, line: &str);
}

/// Emits each record as a `tracing` debug event.
#[derive(Debug, Clone, Default)]
pub struct TracingSink {
    label: Option<Arc<str>>,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a label (typically the peer address) to every record.
    pub fn labeled(label: impl Into<Arc<str>>) -> Self {
        Self {
            label: Some(label.into()),
        }
    }
}

impl TraceSink for TracingSink {
    fn record(&self, direction: Direction, line: &str) {
        match &self.label {
            Some(label) => debug!(
                target: TRACE_TARGET,
                conn = %label,
                direction = direction.as_str(),
                "{} {}",
                direction.marker(),
                line
            ),
            None => debug!(
                target: TRACE_TARGET,
                direction = direction.as_str(),
                "{} {}",
                direction.marker(),
                line
            ),
        }
    }
}

/// A captured trace record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRecord {
    pub direction: Direction,
    pub line: String,
}

/// In-memory sink for asserting on trace output.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<TraceRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records captured so far, in arrival order.
    pub fn records(&self) -> Vec<TraceRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Lines captured for one direction.
    pub fn lines(&self, direction: Direction) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|r| r.direction == direction)
            .map(|r| r.line)
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
    }
}

impl TraceSink for MemorySink {
    fn record(&self, direction: Direction, line: &str) {
        // A poisoned lock only loses trace output.
        if let Ok(mut records) = self.records.lock() {
            records.push(TraceRecord {
                direction,
                line: line.to_owned(),
            });
        }
    }
}

/// Running total of observed bytes, shared between a tap and its owner.
#[derive(Debug, Clone, Default)]
pub struct ByteCounter(Arc<AtomicU64>);

impl ByteCounter {
    pub fn add(&self, n: usize) {
        self.0.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Split an observed chunk into trace records.
///
/// A single CRLF at the very end of the chunk is dropped first so a complete
/// line does not produce a trailing empty record.
pub fn split_trace_lines(chunk: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(chunk);
    let body = text.strip_suffix("\r\n").unwrap_or(&text);
    body.split("\r\n").map(str::to_owned).collect()
}

/// Observer shared by both tap adapters.
#[derive(Clone)]
pub struct Tap {
    direction: Direction,
    sink: Arc<dyn TraceSink>,
    counter: Option<ByteCounter>,
}

impl Tap {
    pub fn inbound(sink: Arc<dyn TraceSink>) -> Self {
        Self {
            direction: Direction::Inbound,
            sink,
            counter: None,
        }
    }

    pub fn outbound(sink: Arc<dyn TraceSink>) -> Self {
        Self {
            direction: Direction::Outbound,
            sink,
            counter: None,
        }
    }

    pub fn with_counter(mut self, counter: ByteCounter) -> Self {
        self.counter = Some(counter);
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Observe a chunk. Always consumes the whole chunk.
    pub fn observe(&self, chunk: &[u8]) -> usize {
        for line in split_trace_lines(chunk) {
            self.sink.record(self.direction, &line);
        }
        if let Some(counter) = &self.counter {
            counter.add(chunk.len());
        }
        chunk.len()
    }
}

impl fmt::Debug for Tap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tap")
            .field("direction", &self.direction)
            .field("counter", &self.counter)
            .finish_non_exhaustive()
    }
}

/// Read-side pass-through that shows every byte read to a [`Tap`].
#[derive(Debug)]
pub struct TapReader<R> {
    inner: R,
    tap: Tap,
}

impl<R> TapReader<R> {
    pub fn new(inner: R, tap: Tap) -> Self {
        Self { inner, tap }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for TapReader<R> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = &mut *self;
        let before = buf.filled().len();
        ready!(Pin::new(&mut this.inner).poll_read(cx, buf))?;

        let chunk = &buf.filled()[before..];
        if !chunk.is_empty() {
            this.tap.observe(chunk);
        }
        Poll::Ready(Ok(()))
    }
}

/// Write-side pass-through that shows every byte the inner writer accepts
/// to a [`Tap`].
#[derive(Debug)]
pub struct TapWriter<W> {
    inner: W,
    tap: Tap,
}

impl<W> TapWriter<W> {
    pub fn new(inner: W, tap: Tap) -> Self {
        Self { inner, tap }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: AsyncWrite + Unpin> AsyncWrite for TapWriter<W> {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = &mut *self;
        let written = ready!(Pin::new(&mut this.inner).poll_write(cx, buf))?;
        if written > 0 {
            this.tap.observe(&buf[..written]);
        }
        Poll::Ready(Ok(written))
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_shutdown(cx)
    }
}
