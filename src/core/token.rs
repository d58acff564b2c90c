//! # Continuation Tokens
//!
//! The decoded form of a cursor: a scan direction plus the anchor row's
//! sort-column values.
//!
//! "No cursor supplied" is represented as `Option::<ContinuationToken>::None`
//! at every decode call site, never as a special token value. A token whose
//! `values` are `None` is a real cursor: it asks for an unbounded scan in
//! `direction`, which is how the last page is fetched.

use crate::core::value::TokenValue;
use crate::utils::compression::CompressionKind;
use serde::{Deserialize, Serialize};

/// Scan direction a query must use to satisfy a cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaginationDirection {
    #[default]
    Forward,
    Backward,
}

impl PaginationDirection {
    /// Get the direction identifier byte for the wire format
    pub fn direction_byte(self) -> u8 {
        match self {
            PaginationDirection::Forward => 0x00,
            PaginationDirection::Backward => 0x01,
        }
    }

    /// Detect direction from identifier byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(PaginationDirection::Forward),
            0x01 => Some(PaginationDirection::Backward),
            _ => None,
        }
    }

    /// The opposite scan direction
    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            PaginationDirection::Forward => PaginationDirection::Backward,
            PaginationDirection::Backward => PaginationDirection::Forward,
        }
    }
}

/// An immutable cursor: direction plus one value per configured column.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuationToken {
    direction: PaginationDirection,
    values: Option<Vec<TokenValue>>,
}

impl ContinuationToken {
    /// A cursor anchored at a row, one value per column in column order.
    pub fn new(direction: PaginationDirection, values: Vec<TokenValue>) -> Self {
        Self {
            direction,
            values: Some(values),
        }
    }

    /// A cursor with no anchor row (unbounded scan in `direction`).
    pub fn unanchored(direction: PaginationDirection) -> Self {
        Self {
            direction,
            values: None,
        }
    }

    pub(crate) fn from_parts(direction: PaginationDirection, values: Option<Vec<TokenValue>>) -> Self {
        Self { direction, values }
    }

    pub fn direction(&self) -> PaginationDirection {
        self.direction
    }

    /// Anchor values, or `None` for an unanchored cursor.
    pub fn values(&self) -> Option<&[TokenValue]> {
        self.values.as_deref()
    }

    pub fn is_anchored(&self) -> bool {
        self.values.is_some()
    }

    pub fn into_parts(self) -> (PaginationDirection, Option<Vec<TokenValue>>) {
        (self.direction, self.values)
    }
}

/// Token wire options, fixed per serializer/encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContinuationTokenOptions {
    /// Append an integrity hash to the payload
    pub include_hash: bool,

    /// Compress the payload before hashing and text encoding
    pub use_compression: bool,

    /// Compression algorithm (when use_compression is enabled)
    pub compression: CompressionKind,
}

impl ContinuationTokenOptions {
    /// No hash, no compression.
    pub const DEFAULT: Self = Self {
        include_hash: false,
        use_compression: false,
        compression: CompressionKind::Deflate,
    };

    pub const fn new(include_hash: bool, use_compression: bool) -> Self {
        Self {
            include_hash,
            use_compression,
            compression: CompressionKind::Deflate,
        }
    }

    #[must_use]
    pub const fn with_hash(mut self, include_hash: bool) -> Self {
        self.include_hash = include_hash;
        self
    }

    #[must_use]
    pub const fn with_compression(mut self, use_compression: bool) -> Self {
        self.use_compression = use_compression;
        self
    }

    #[must_use]
    pub const fn with_compression_kind(mut self, compression: CompressionKind) -> Self {
        self.compression = compression;
        self
    }
}

impl Default for ContinuationTokenOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}
