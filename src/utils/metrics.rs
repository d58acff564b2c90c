//! Observability and Metrics
//!
//! Process-wide counters for token encoding and decoding.
//!
//! Uses atomic counters for thread-safe metrics collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Global metrics collector for token operations
#[derive(Debug)]
pub struct TokenMetrics {
    /// Tokens serialized to text
    pub tokens_encoded: AtomicU64,
    /// Total bytes of token text produced
    pub bytes_encoded: AtomicU64,
    /// Token texts decoded successfully (blank input excluded)
    pub tokens_decoded: AtomicU64,
    /// Blank token texts treated as "no cursor"
    pub empty_tokens: AtomicU64,
    /// Token texts rejected during decoding
    pub decode_failures: AtomicU64,
    /// Rejections caused by an integrity hash mismatch
    pub hash_mismatches: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl TokenMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            tokens_encoded: AtomicU64::new(0),
            bytes_encoded: AtomicU64::new(0),
            tokens_decoded: AtomicU64::new(0),
            empty_tokens: AtomicU64::new(0),
            decode_failures: AtomicU64::new(0),
            hash_mismatches: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a token serialized to `byte_count` bytes of text
    pub fn token_encoded(&self, byte_count: u64) {
        self.tokens_encoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_encoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a successful decode
    pub fn token_decoded(&self) {
        self.tokens_decoded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record blank input
    pub fn empty_token(&self) {
        self.empty_tokens.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejected token
    pub fn decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejected token whose hash did not match
    pub fn hash_mismatch(&self) {
        self.hash_mismatches.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            tokens_encoded: self.tokens_encoded.load(Ordering::Relaxed),
            bytes_encoded: self.bytes_encoded.load(Ordering::Relaxed),
            tokens_decoded: self.tokens_decoded.load(Ordering::Relaxed),
            empty_tokens: self.empty_tokens.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            hash_mismatches: self.hash_mismatches.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            tokens_encoded = snapshot.tokens_encoded,
            bytes_encoded = snapshot.bytes_encoded,
            tokens_decoded = snapshot.tokens_decoded,
            empty_tokens = snapshot.empty_tokens,
            decode_failures = snapshot.decode_failures,
            hash_mismatches = snapshot.hash_mismatches,
            uptime_seconds = snapshot.uptime_seconds,
            "Token metrics snapshot"
        );
    }
}

impl Default for TokenMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub tokens_encoded: u64,
    pub bytes_encoded: u64,
    pub tokens_decoded: u64,
    pub empty_tokens: u64,
    pub decode_failures: u64,
    pub hash_mismatches: u64,
    pub uptime_seconds: u64,
}

static METRICS: once_cell::sync::Lazy<TokenMetrics> = once_cell::sync::Lazy::new(TokenMetrics::new);

/// Get the global metrics instance
pub fn global_metrics() -> &'static TokenMetrics {
    &METRICS
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
