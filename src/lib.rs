//! # keyset-token
//!
//! Compact, opaque, tamper-evident continuation tokens for keyset pagination.
//!
//! A continuation token records the scan direction and the sort-column values
//! of an anchor row, so a query can resume exactly after (or before) that row
//! without `OFFSET`. Tokens are binary, optionally compressed, optionally
//! hashed, and rendered as URL-safe base64 so they can travel in a query
//! string or header.
//!
//! ## Example
//! ```rust
//! use keyset_token::{Column, ContinuationTokenOptions, PaginationDirection, TokenEncoder};
//!
//! struct User { id: i64, name: String }
//!
//! let encoder = TokenEncoder::new(
//!     vec![
//!         Column::ascending("name", |u: &User| u.name.as_str().into()),
//!         Column::ascending("id", |u: &User| u.id.into()),
//!     ],
//!     PaginationDirection::Forward,
//!     ContinuationTokenOptions::new(true, false),
//! )?;
//!
//! let page = vec![
//!     User { id: 1, name: "ada".into() },
//!     User { id: 2, name: "grace".into() },
//! ];
//!
//! let next = encoder.encode_next_page(&page)?;
//! let token = encoder.decode(&next)?.expect("non-empty token");
//! assert_eq!(token.direction(), PaginationDirection::Forward);
//! assert_eq!(token.values().map(<[_]>::len), Some(2));
//! # Ok::<(), keyset_token::TokenError>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod pagination;
pub mod utils;

pub use crate::config::TokenConfig;
pub use crate::core::streamer::{BinaryTokenStreamer, TokenStreamer};
pub use crate::core::token::{ContinuationToken, ContinuationTokenOptions, PaginationDirection};
pub use crate::core::value::TokenValue;
pub use crate::error::{Result, TokenError};
pub use crate::pagination::{
    is_valid_token, Column, ColumnDefinition, SortOrder, TokenEncoder, TokenSerializer,
    TokenValidator,
};
pub use crate::utils::compression::CompressionKind;
