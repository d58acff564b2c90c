//! # Utility Modules
//!
//! Supporting utilities for compression, integrity hashing, logging, and metrics.
//!
//! ## Components
//! - **Compression**: Zstd and LZ4 streaming decorator for token streamers
//! - **Hash**: truncated BLAKE3 integrity hash
//! - **Logging**: Structured logging configuration
//! - **Metrics**: Thread-safe observability counters
//!
//! ## Security
//! - Decompression bomb protection (64 KiB limit)
//! - Hash verification before any payload parsing

pub mod compression;
pub mod hash;
pub mod logging;
pub mod metrics;

// Re-export public types for advanced users
pub use compression::{CompressingStreamer, CompressionKind};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{global_metrics, TokenMetrics};
