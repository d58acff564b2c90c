//! # Token Streamers
//!
//! Serialization of a [`ContinuationToken`] to a byte sink and back.
//!
//! [`TokenStreamer`] is the seam the serializer composes over: the plain
//! [`BinaryTokenStreamer`] writes the wire format directly, and
//! [`CompressingStreamer`](crate::utils::compression::CompressingStreamer)
//! wraps any streamer with a compressing sink/source.
//!
//! ## Wire Format
//! ```text
//! [Direction(1)] [values-or-absence marker + value sequence]
//! ```

use crate::core::token::{ContinuationToken, PaginationDirection};
use crate::core::value::{read_values, write_values};
use crate::error::{Result, TokenError};
use std::io::{Read, Write};

/// Writes a token to a sink and reads it back from a source.
///
/// Implementations must consume the source completely: bytes after the token
/// are an error, not something to leave for the caller.
pub trait TokenStreamer: Send + Sync {
    fn serialize_to_stream(&self, token: &ContinuationToken, sink: &mut dyn Write) -> Result<()>;

    fn deserialize_from_stream(&self, source: &mut dyn Read) -> Result<ContinuationToken>;
}

impl<S: TokenStreamer + ?Sized> TokenStreamer for Box<S> {
    fn serialize_to_stream(&self, token: &ContinuationToken, sink: &mut dyn Write) -> Result<()> {
        (**self).serialize_to_stream(token, sink)
    }

    fn deserialize_from_stream(&self, source: &mut dyn Read) -> Result<ContinuationToken> {
        (**self).deserialize_from_stream(source)
    }
}

/// Plain binary streamer: direction byte, then the value sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryTokenStreamer;

impl BinaryTokenStreamer {
    pub fn new() -> Self {
        Self
    }
}

impl TokenStreamer for BinaryTokenStreamer {
    fn serialize_to_stream(&self, token: &ContinuationToken, sink: &mut dyn Write) -> Result<()> {
        sink.write_all(&[token.direction().direction_byte()])?;
        write_values(&mut *sink, token.values())?;
        Ok(())
    }

    fn deserialize_from_stream(&self, source: &mut dyn Read) -> Result<ContinuationToken> {
        let mut direction = [0u8; 1];
        source.read_exact(&mut direction)?;
        let direction = PaginationDirection::from_byte(direction[0])
            .ok_or(TokenError::InvalidDirection(direction[0]))?;

        let values = read_values(&mut *source)?;

        // The token must be the whole payload
        let mut extra = [0u8; 1];
        if source.read(&mut extra)? != 0 {
            return Err(TokenError::TrailingBytes);
        }

        Ok(ContinuationToken::from_parts(direction, values))
    }
}
