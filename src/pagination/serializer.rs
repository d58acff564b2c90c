//! Token text serialization.
//!
//! [`TokenSerializer`] is the single point where a [`ContinuationToken`]
//! becomes the opaque, URL-safe text handed to clients, and back.
//!
//! ```text
//! serialize:   token -> streamer [-> compress] -> payload [+ hash] -> base64url
//! deserialize: base64url -> payload [verify hash] [-> decompress] -> streamer -> token
//! ```
//!
//! The hash covers the bytes that are actually on the wire, so with
//! compression enabled it is computed over the compressed payload and checked
//! before anything is decompressed.

use crate::config::MAX_TOKEN_TEXT_LEN;
use crate::core::streamer::{BinaryTokenStreamer, TokenStreamer};
use crate::core::token::{ContinuationToken, ContinuationTokenOptions};
use crate::error::{Result, TokenError};
use crate::utils::compression::CompressingStreamer;
use crate::utils::hash;
use crate::utils::metrics::{global_metrics, Timer};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use std::fmt;
use tracing::{debug, instrument};

/// Converts tokens to and from transport text under fixed options.
pub struct TokenSerializer {
    options: ContinuationTokenOptions,
    streamer: Box<dyn TokenStreamer>,
    max_token_length: usize,
}

impl TokenSerializer {
    pub fn new(options: ContinuationTokenOptions) -> Self {
        let streamer: Box<dyn TokenStreamer> = if options.use_compression {
            Box::new(CompressingStreamer::new(
                BinaryTokenStreamer,
                options.compression,
            ))
        } else {
            Box::new(BinaryTokenStreamer)
        };

        Self {
            options,
            streamer,
            max_token_length: MAX_TOKEN_TEXT_LEN,
        }
    }

    /// Reject token text longer than `max_token_length` before decoding it.
    #[must_use]
    pub fn with_max_token_length(mut self, max_token_length: usize) -> Self {
        self.max_token_length = max_token_length;
        self
    }

    pub fn options(&self) -> ContinuationTokenOptions {
        self.options
    }

    pub fn max_token_length(&self) -> usize {
        self.max_token_length
    }

    /// Serialize a token to URL-safe text.
    ///
    /// # Errors
    /// Returns `TokenError::OversizedToken` if the text would exceed
    /// `max_token_length`, since it could not be deserialized again.
    #[instrument(skip_all, level = "debug", fields(direction = ?token.direction()))]
    pub fn serialize(&self, token: &ContinuationToken) -> Result<String> {
        let _timer = Timer::start("token_serialize");

        let mut payload = Vec::with_capacity(64);
        self.streamer.serialize_to_stream(token, &mut payload)?;

        if self.options.include_hash {
            hash::append_hash(&mut payload);
        }

        let text = URL_SAFE_NO_PAD.encode(&payload);
        // Never hand out text that deserialize would refuse
        if text.len() > self.max_token_length {
            debug!(len = text.len(), max = self.max_token_length, "Refused oversized token");
            return Err(TokenError::OversizedToken(text.len()));
        }

        global_metrics().token_encoded(text.len() as u64);
        debug!(len = text.len(), "Serialized continuation token");
        Ok(text)
    }

    /// Deserialize token text.
    ///
    /// Blank text (empty or whitespace only) means "no cursor" and yields
    /// `Ok(None)`. Anything else must be a valid token under this
    /// serializer's options.
    #[instrument(skip_all, level = "debug", fields(len = text.len()))]
    pub fn deserialize(&self, text: &str) -> Result<Option<ContinuationToken>> {
        let text = text.trim();
        if text.is_empty() {
            global_metrics().empty_token();
            return Ok(None);
        }

        let _timer = Timer::start("token_deserialize");
        match self.decode_text(text) {
            Ok(token) => {
                global_metrics().token_decoded();
                Ok(Some(token))
            }
            Err(e) => {
                let metrics = global_metrics();
                metrics.decode_failure();
                if matches!(e, TokenError::HashMismatch) {
                    metrics.hash_mismatch();
                }
                debug!(error = %e, "Rejected continuation token");
                Err(e)
            }
        }
    }

    /// Non-failing form of [`deserialize`](Self::deserialize).
    ///
    /// `None` when the text was rejected, `Some(None)` for blank text,
    /// `Some(Some(token))` otherwise.
    pub fn try_deserialize(&self, text: &str) -> Option<Option<ContinuationToken>> {
        self.deserialize(text).ok()
    }

    /// Whether `text` is blank or a valid token under these options.
    pub fn is_valid(&self, text: &str) -> bool {
        self.try_deserialize(text).is_some()
    }

    fn decode_text(&self, text: &str) -> Result<ContinuationToken> {
        if text.len() > self.max_token_length {
            return Err(TokenError::OversizedToken(text.len()));
        }

        let data = URL_SAFE_NO_PAD.decode(text)?;
        let mut payload = if self.options.include_hash {
            hash::verify_and_strip(&data)?
        } else {
            data.as_slice()
        };

        self.streamer.deserialize_from_stream(&mut payload)
    }
}

impl Default for TokenSerializer {
    fn default() -> Self {
        Self::new(ContinuationTokenOptions::DEFAULT)
    }
}

impl fmt::Debug for TokenSerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSerializer")
            .field("options", &self.options)
            .field("max_token_length", &self.max_token_length)
            .finish_non_exhaustive()
    }
}

/// Builds serializers from options alone, independent of any column setup.
pub trait SerializerFactory: Send + Sync {
    fn create(&self, options: ContinuationTokenOptions) -> TokenSerializer;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSerializerFactory;

impl SerializerFactory for DefaultSerializerFactory {
    fn create(&self, options: ContinuationTokenOptions) -> TokenSerializer {
        TokenSerializer::new(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::token::PaginationDirection;
    use crate::core::value::TokenValue;
    use crate::utils::compression::CompressionKind;

    fn all_options() -> Vec<ContinuationTokenOptions> {
        let mut out = Vec::new();
        for include_hash in [false, true] {
            for use_compression in [false, true] {
                for kind in [
                    CompressionKind::Deflate,
                    CompressionKind::Lz4,
                    CompressionKind::Zstd,
                ] {
                    out.push(
                        ContinuationTokenOptions::new(include_hash, use_compression)
                            .with_compression_kind(kind),
                    );
                }
            }
        }
        out
    }

    fn sample_token() -> ContinuationToken {
        ContinuationToken::new(
            PaginationDirection::Backward,
            vec![
                TokenValue::I32(17),
                TokenValue::String("delta".into()),
                TokenValue::Null,
            ],
        )
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_roundtrip_under_every_option_set() {
        let token = sample_token();
        for options in all_options() {
            let serializer = TokenSerializer::new(options);
            let text = serializer.serialize(&token).unwrap();
            let decoded = serializer.deserialize(&text).unwrap();
            assert_eq!(decoded, Some(token.clone()), "options: {options:?}");
        }
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_output_is_url_safe() {
        for options in all_options() {
            let text = TokenSerializer::new(options)
                .serialize(&sample_token())
                .unwrap();
            assert!(
                text.bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'),
                "unsafe character in {text}"
            );
        }
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_blank_text_is_no_cursor() {
        let serializer = TokenSerializer::default();
        assert_eq!(serializer.deserialize("").unwrap(), None);
        assert_eq!(serializer.deserialize(" ").unwrap(), None);
        assert_eq!(serializer.deserialize("\t\n").unwrap(), None);
        assert_eq!(serializer.try_deserialize(" "), Some(None));
    }

    #[test]
    fn test_garbage_text_rejected() {
        let serializer = TokenSerializer::default();
        assert!(matches!(
            serializer.deserialize("not a token!"),
            Err(TokenError::InvalidEncoding(_))
        ));
        assert_eq!(serializer.try_deserialize("not a token!"), None);
        assert!(!serializer.is_valid("not a token!"));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_hash_detects_edits() {
        let serializer = TokenSerializer::new(ContinuationTokenOptions::new(true, false));
        let text = serializer.serialize(&sample_token()).unwrap();

        // Flip one payload character to another alphabet character
        let mut chars: Vec<char> = text.chars().collect();
        chars[2] = if chars[2] == 'A' { 'B' } else { 'A' };
        let edited: String = chars.into_iter().collect();

        assert!(serializer.deserialize(&edited).is_err());
    }

    #[test]
    fn test_oversized_text_rejected_before_decoding() {
        let serializer = TokenSerializer::default().with_max_token_length(64);
        let long = "A".repeat(65);
        assert!(matches!(
            serializer.deserialize(&long),
            Err(TokenError::OversizedToken(65))
        ));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_factory_builds_matching_serializer() {
        let options = ContinuationTokenOptions::new(true, true);
        let serializer = DefaultSerializerFactory.create(options);
        assert_eq!(serializer.options(), options);

        let text = serializer.serialize(&sample_token()).unwrap();
        assert!(TokenSerializer::new(options).is_valid(&text));
    }
}
