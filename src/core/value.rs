//! # Token Values
//!
//! Heterogeneous column values carried inside a continuation token.
//!
//! Every value is written as a variant tag followed by its canonical bytes, so
//! a mixed tuple such as `(bool, i32, String)` decodes back to exactly the same
//! variants.
//!
//! ```text
//! [Presence(1)] [Count(u64)] ([Tag(u32)] [fixed-width value | Len(u64) bytes])*
//! ```
//!
//! Integers, tags and lengths are fixed width, little endian. The plain form
//! stays trivial to inspect; the zero padding this leaves in small values is
//! what the compressing streamer removes.

use crate::config::MAX_PAYLOAD_SIZE;
use crate::error::Result;
use bincode::Options;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// A single sort-column value.
///
/// `Enum` holds the underlying discriminant of a fieldless enum; the column
/// definition is responsible for mapping it back to the domain type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenValue {
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Char(char),
    String(String),
    Bytes(Vec<u8>),
    Enum(i64),
}

impl TokenValue {
    /// Get human-readable type name
    pub fn type_name(&self) -> &'static str {
        match self {
            TokenValue::Null => "null",
            TokenValue::Bool(_) => "bool",
            TokenValue::I8(_) => "i8",
            TokenValue::I16(_) => "i16",
            TokenValue::I32(_) => "i32",
            TokenValue::I64(_) => "i64",
            TokenValue::U8(_) => "u8",
            TokenValue::U16(_) => "u16",
            TokenValue::U32(_) => "u32",
            TokenValue::U64(_) => "u64",
            TokenValue::F32(_) => "f32",
            TokenValue::F64(_) => "f64",
            TokenValue::Char(_) => "char",
            TokenValue::String(_) => "string",
            TokenValue::Bytes(_) => "bytes",
            TokenValue::Enum(_) => "enum",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TokenValue::Null)
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for TokenValue {
                fn from(value: $ty) -> Self {
                    TokenValue::$variant(value)
                }
            }
        )*
    };
}

impl_from_primitive! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    char => Char,
    String => String,
    Vec<u8> => Bytes,
}

impl From<&str> for TokenValue {
    fn from(value: &str) -> Self {
        TokenValue::String(value.to_owned())
    }
}

impl<T: Into<TokenValue>> From<Option<T>> for TokenValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(TokenValue::Null, Into::into)
    }
}

/// Bincode options shared by every token read and write.
///
/// Fixed-width little-endian integers and a hard byte limit so a hostile
/// length prefix cannot trigger a large allocation.
pub(crate) fn codec_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(MAX_PAYLOAD_SIZE as u64)
}

/// Write an ordered value sequence, or the absence marker when `values` is `None`.
pub fn write_values<W: Write>(sink: W, values: Option<&[TokenValue]>) -> Result<()> {
    codec_options().serialize_into(sink, &values)?;
    Ok(())
}

/// Read a value sequence written by [`write_values`].
pub fn read_values<R: Read>(source: R) -> Result<Option<Vec<TokenValue>>> {
    Ok(codec_options().deserialize_from(source)?)
}
