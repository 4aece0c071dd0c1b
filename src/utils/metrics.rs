//! Observability and Metrics
//!
//! Counters for line and reply traffic. A [`Metrics`] value is shared through
//! an `Arc` by whichever connections should report into it; there is no
//! process-wide instance.
//!
//! Uses atomic counters for thread-safe metrics collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Metrics collector for line transport operations
#[derive(Debug)]
pub struct Metrics {
    /// Connections that started reporting into this collector
    pub connections_total: AtomicU64,
    /// Lines handed to callers
    pub lines_read: AtomicU64,
    /// Lines parsed as commands
    pub commands_read: AtomicU64,
    /// Replies flushed to the wire
    pub replies_sent: AtomicU64,
    /// Wire lines across all replies
    pub reply_lines_sent: AtomicU64,
    /// Overruns and CRLF violations
    pub framing_errors: AtomicU64,
    /// Underlying transport failures
    pub transport_errors: AtomicU64,
    /// Peer closes observed by a read
    pub end_of_stream: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            connections_total: AtomicU64::new(0),
            lines_read: AtomicU64::new(0),
            commands_read: AtomicU64::new(0),
            replies_sent: AtomicU64::new(0),
            reply_lines_sent: AtomicU64::new(0),
            framing_errors: AtomicU64::new(0),
            transport_errors: AtomicU64::new(0),
            end_of_stream: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn connection_attached(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn line_read(&self) {
        self.lines_read.fetch_add(1, Ordering::Relaxed);
    }

    pub fn command_read(&self) {
        self.commands_read.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a flushed reply of `lines` wire lines
    pub fn reply_sent(&self, lines: usize) {
        self.replies_sent.fetch_add(1, Ordering::Relaxed);
        self.reply_lines_sent
            .fetch_add(lines as u64, Ordering::Relaxed);
    }

    pub fn framing_error(&self) {
        self.framing_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn transport_error(&self) {
        self.transport_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn peer_closed(&self) {
        self.end_of_stream.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            lines_read: self.lines_read.load(Ordering::Relaxed),
            commands_read: self.commands_read.load(Ordering::Relaxed),
            replies_sent: self.replies_sent.load(Ordering::Relaxed),
            reply_lines_sent: self.reply_lines_sent.load(Ordering::Relaxed),
            framing_errors: self.framing_errors.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
            end_of_stream: self.end_of_stream.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            connections_total = snapshot.connections_total,
            lines_read = snapshot.lines_read,
            commands_read = snapshot.commands_read,
            replies_sent = snapshot.replies_sent,
            reply_lines_sent = snapshot.reply_lines_sent,
            framing_errors = snapshot.framing_errors,
            transport_errors = snapshot.transport_errors,
            end_of_stream = snapshot.end_of_stream,
            uptime_seconds = snapshot.uptime_seconds,
            "Line transport metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub connections_total: u64,
    pub lines_read: u64,
    pub commands_read: u64,
    pub replies_sent: u64,
    pub reply_lines_sent: u64,
    pub framing_errors: u64,
    pub transport_errors: u64,
    pub end_of_stream: u64,
    pub uptime_seconds: u64,
}

/// Timer for measuring operation duration
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        debug!(
            operation = self.operation,
            duration_us = duration.as_micros() as u64,
            "Operation completed"
        );
    }
}
