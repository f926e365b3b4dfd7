//! Observability and Metrics
//!
//! Counters for field codec activity: how many fields were marshaled and
//! unmarshaled, how many bytes that produced or consumed, how many calls failed and
//! how many encodings were registered.
//!
//! Uses relaxed atomic counters for thread-safe metrics collection.

use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Global metrics collector for codec operations
#[derive(Debug)]
pub struct CodecMetrics {
    /// Successful marshal calls
    pub fields_marshaled: AtomicU64,
    /// Successful unmarshal calls
    pub fields_unmarshaled: AtomicU64,
    /// Failed marshal calls
    pub marshal_errors: AtomicU64,
    /// Failed unmarshal calls
    pub unmarshal_errors: AtomicU64,
    /// Wire bytes produced by marshal
    pub bytes_marshaled: AtomicU64,
    /// Wire bytes consumed by unmarshal
    pub bytes_unmarshaled: AtomicU64,
    /// Encoding registrations, replacements included
    pub encodings_registered: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl CodecMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            fields_marshaled: AtomicU64::new(0),
            fields_unmarshaled: AtomicU64::new(0),
            marshal_errors: AtomicU64::new(0),
            unmarshal_errors: AtomicU64::new(0),
            bytes_marshaled: AtomicU64::new(0),
            bytes_unmarshaled: AtomicU64::new(0),
            encodings_registered: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a successful marshal
    pub fn marshal_success(&self, byte_count: u64) {
        self.fields_marshaled.fetch_add(1, Ordering::Relaxed);
        self.bytes_marshaled.fetch_add(byte_count, Ordering::Relaxed);
    }

    pub fn marshal_failure(&self) {
        self.marshal_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful unmarshal
    pub fn unmarshal_success(&self, byte_count: u64) {
        self.fields_unmarshaled.fetch_add(1, Ordering::Relaxed);
        self.bytes_unmarshaled.fetch_add(byte_count, Ordering::Relaxed);
    }

    pub fn unmarshal_failure(&self) {
        self.unmarshal_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn encoding_registered(&self) {
        self.encodings_registered.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            fields_marshaled: self.fields_marshaled.load(Ordering::Relaxed),
            fields_unmarshaled: self.fields_unmarshaled.load(Ordering::Relaxed),
            marshal_errors: self.marshal_errors.load(Ordering::Relaxed),
            unmarshal_errors: self.unmarshal_errors.load(Ordering::Relaxed),
            bytes_marshaled: self.bytes_marshaled.load(Ordering::Relaxed),
            bytes_unmarshaled: self.bytes_unmarshaled.load(Ordering::Relaxed),
            encodings_registered: self.encodings_registered.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            fields_marshaled = snapshot.fields_marshaled,
            fields_unmarshaled = snapshot.fields_unmarshaled,
            marshal_errors = snapshot.marshal_errors,
            unmarshal_errors = snapshot.unmarshal_errors,
            bytes_marshaled = snapshot.bytes_marshaled,
            bytes_unmarshaled = snapshot.bytes_unmarshaled,
            encodings_registered = snapshot.encodings_registered,
            uptime_seconds = snapshot.uptime_seconds,
            "Codec metrics snapshot"
        );
    }
}

impl Default for CodecMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub fields_marshaled: u64,
    pub fields_unmarshaled: u64,
    pub marshal_errors: u64,
    pub unmarshal_errors: u64,
    pub bytes_marshaled: u64,
    pub bytes_unmarshaled: u64,
    pub encodings_registered: u64,
    pub uptime_seconds: u64,
}

static METRICS: Lazy<CodecMetrics> = Lazy::new(CodecMetrics::new);

/// Get the global metrics instance
pub fn global_metrics() -> &'static CodecMetrics {
    &METRICS
}
