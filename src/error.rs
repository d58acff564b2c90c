//! # Error Types
//!
//! Error handling for continuation token encoding and decoding.
//!
//! ## Error Categories
//! - **Configuration Errors**: invalid encoder setup or configuration files
//! - **Usage Errors**: a page was requested without a reference entity
//! - **Decode Failures**: malformed text, hash mismatch, truncated or corrupt
//!   payloads, decompression failures
//!
//! Decode failures come from untrusted input. Every public decode path has a
//! non-failing form (`try_deserialize`, `try_decode`, `is_valid_token`) that
//! folds them into a boolean or `None`.
//!
//! ## Example Usage
//! ```rust
//! use keyset_token::error::{Result, TokenError};
//! use keyset_token::pagination::serializer::TokenSerializer;
//! use keyset_token::core::token::ContinuationTokenOptions;
//!
//! fn cursor_is_usable(text: &str) -> Result<bool> {
//!     let serializer = TokenSerializer::new(ContinuationTokenOptions::DEFAULT);
//!     match serializer.deserialize(text) {
//!         Ok(token) => Ok(token.is_some()),
//!         Err(e) if e.is_decode_failure() => Ok(false),
//!         Err(e) => Err(e),
//!     }
//! }
//!
//! assert_eq!(cursor_is_usable("").ok(), Some(false));
//! assert!(matches!(
//!     TokenSerializer::new(ContinuationTokenOptions::DEFAULT).deserialize("!!"),
//!     Err(TokenError::InvalidEncoding(_))
//! ));
//! ```

use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Encoder usage errors
    pub const ERR_MISSING_REFERENCE: &str =
        "At least one reference entity is required to create a continuation token";
    pub const ERR_NO_COLUMNS: &str = "At least one column definition is required";
    pub const ERR_EMPTY_COLUMN_NAME: &str = "Column definitions must be named";
}

/// TokenError is the error type for all continuation token operations
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Invalid token encoding: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    #[error("Invalid pagination direction byte: {0}")]
    InvalidDirection(u8),

    #[error("Unexpected bytes after token payload")]
    TrailingBytes,

    #[error("Token is too short to carry an integrity hash")]
    MissingHash,

    #[error("Token integrity hash does not match its payload")]
    HashMismatch,

    #[error("Compression failed")]
    CompressionFailure,

    #[error("Decompression failed")]
    DecompressionFailure,

    #[error("Token too large: {0} bytes")]
    OversizedToken(usize),

    #[error("At least one reference entity is required to create a continuation token")]
    MissingReference,

    #[error("Token carries {actual} values but {expected} columns are configured")]
    ColumnCountMismatch { expected: usize, actual: usize },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl TokenError {
    /// Whether this error came from decoding external token text.
    ///
    /// `Io` and `Serialization` are counted as decode failures: decoding
    /// reports truncated or corrupt payloads through them. `serialize` can also
    /// return them when writing to its in-memory buffer fails or a value
    /// exceeds the payload limit, so classify only errors from a decode call.
    pub fn is_decode_failure(&self) -> bool {
        match self {
            TokenError::Io(_)
            | TokenError::Serialization(_)
            | TokenError::InvalidEncoding(_)
            | TokenError::InvalidDirection(_)
            | TokenError::TrailingBytes
            | TokenError::MissingHash
            | TokenError::HashMismatch
            | TokenError::DecompressionFailure
            | TokenError::OversizedToken(_)
            | TokenError::ColumnCountMismatch { .. } => true,
            TokenError::CompressionFailure
            | TokenError::MissingReference
            | TokenError::ConfigError(_) => false,
        }
    }
}

/// Type alias for Results using TokenError
pub type Result<T> = std::result::Result<T, TokenError>;
