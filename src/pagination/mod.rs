//! # Keyset Pagination
//!
//! Page navigation on top of continuation tokens.
//!
//! ## Components
//! - **Column**: sort-column definitions that read anchor values from entities
//! - **Serializer**: token <-> opaque URL-safe text, with optional compression and hash
//! - **Encoder**: first/last/next/previous page tokens for a fixed column set
//! - **Validator**: options-only token checks for request middleware

pub mod column;
pub mod encoder;
pub mod serializer;
pub mod validator;

pub use column::{Column, ColumnDefinition, SortOrder};
pub use encoder::TokenEncoder;
pub use serializer::{DefaultSerializerFactory, SerializerFactory, TokenSerializer};
pub use validator::{is_valid_token, TokenValidator};
