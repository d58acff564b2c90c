//! Payload compression for token streamers.
//!
//! Deflate is the default: raw Deflate has no frame header or trailer, so it
//! still wins on the short payloads typical of keyset cursors. Zstd and LZ4
//! frames cost 12 to 20 bytes of framing and only pay off for large anchors.

use crate::config::MAX_PAYLOAD_SIZE;
use crate::core::streamer::TokenStreamer;
use crate::core::token::ContinuationToken;
use crate::error::{Result, TokenError};
use flate2::{Compression, Decompress, FlushDecompress, Status};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::str::FromStr;

/// Zstd level for token payloads; tokens are tiny so higher levels buy nothing
const ZSTD_LEVEL: i32 = 3;

/// Maximum output size for decompression (align with MAX_PAYLOAD_SIZE to prevent DoS)
const MAX_DECOMPRESSION_SIZE: u64 = MAX_PAYLOAD_SIZE as u64;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionKind {
    #[default]
    Deflate,
    Lz4,
    Zstd,
}

impl CompressionKind {
    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            CompressionKind::Deflate => "deflate",
            CompressionKind::Lz4 => "lz4",
            CompressionKind::Zstd => "zstd",
        }
    }
}

impl FromStr for CompressionKind {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deflate" => Ok(CompressionKind::Deflate),
            "lz4" => Ok(CompressionKind::Lz4),
            "zstd" => Ok(CompressionKind::Zstd),
            other => Err(TokenError::ConfigError(format!(
                "Unknown compression kind: '{other}' (expected 'deflate', 'lz4' or 'zstd')"
            ))),
        }
    }
}

/// Streamer decorator that compresses everything the inner streamer writes
/// and decompresses everything it reads.
///
/// The compressing sink and decompressing source live only for the duration
/// of one call. On success the compressed stream is finished before
/// returning; on failure the partially written stream is dropped.
///
/// Zstd is streamed both ways. Deflate and LZ4 input is decompressed into a
/// bounded buffer first: a raw Deflate stream cut before its final block, or an
/// LZ4 block cut at a sequence boundary, otherwise reads like a complete one.
#[derive(Debug, Clone, Default)]
pub struct CompressingStreamer<S> {
    inner: S,
    kind: CompressionKind,
}

impl<S: TokenStreamer> CompressingStreamer<S> {
    pub fn new(inner: S, kind: CompressionKind) -> Self {
        Self { inner, kind }
    }

    pub fn kind(&self) -> CompressionKind {
        self.kind
    }

    fn decode_with<R: Read>(&self, decoder: R) -> Result<ContinuationToken> {
        let mut limited = decoder.take(MAX_DECOMPRESSION_SIZE);
        self.inner
            .deserialize_from_stream(&mut limited)
            .map_err(|e| match e {
                TokenError::Io(_) => TokenError::DecompressionFailure,
                other => other,
            })
    }
}

/// Decompress a size-prepended LZ4 block, checking the claimed size against
/// the limit before allocating and against the output afterwards.
fn lz4_decompress(source: &mut dyn Read) -> Result<Vec<u8>> {
    let mut input = Vec::new();
    source
        .take(MAX_DECOMPRESSION_SIZE)
        .read_to_end(&mut input)
        .map_err(|_| TokenError::DecompressionFailure)?;

    if input.len() < 4 {
        return Err(TokenError::DecompressionFailure);
    }
    let claimed_size = u32::from_le_bytes([input[0], input[1], input[2], input[3]]) as u64;
    if claimed_size > MAX_DECOMPRESSION_SIZE {
        return Err(TokenError::DecompressionFailure);
    }

    let decompressed = lz4_flex::decompress_size_prepended(&input)
        .map_err(|_| TokenError::DecompressionFailure)?;
    if decompressed.len() as u64 != claimed_size {
        return Err(TokenError::DecompressionFailure);
    }

    Ok(decompressed)
}

/// Inflate a complete raw Deflate stream of at most `MAX_DECOMPRESSION_SIZE` bytes.
///
/// Fails on truncated streams, on bytes after the final block, and on output
/// past the limit.
fn inflate(source: &mut dyn Read) -> Result<Vec<u8>> {
    let mut input = Vec::new();
    source
        .take(MAX_DECOMPRESSION_SIZE)
        .read_to_end(&mut input)
        .map_err(|_| TokenError::DecompressionFailure)?;

    let mut inflater = Decompress::new(false);
    // One byte of headroom so output past the limit is observable
    let mut output = Vec::with_capacity(MAX_DECOMPRESSION_SIZE as usize + 1);

    loop {
        let progress = (inflater.total_in(), inflater.total_out());
        let consumed = inflater.total_in() as usize;
        let status = inflater
            .decompress_vec(&input[consumed..], &mut output, FlushDecompress::Finish)
            .map_err(|_| TokenError::DecompressionFailure)?;

        if status == Status::StreamEnd {
            break;
        }
        if output.len() as u64 > MAX_DECOMPRESSION_SIZE
            || (inflater.total_in(), inflater.total_out()) == progress
        {
            return Err(TokenError::DecompressionFailure);
        }
    }

    if inflater.total_in() as usize != input.len() {
        return Err(TokenError::DecompressionFailure);
    }

    Ok(output)
}

impl<S: TokenStreamer> TokenStreamer for CompressingStreamer<S> {
    fn serialize_to_stream(&self, token: &ContinuationToken, sink: &mut dyn Write) -> Result<()> {
        match self.kind {
            CompressionKind::Deflate => {
                let mut encoder = flate2::write::DeflateEncoder::new(sink, Compression::default());
                self.inner.serialize_to_stream(token, &mut encoder)?;
                encoder
                    .finish()
                    .map_err(|_| TokenError::CompressionFailure)?;
            }
            CompressionKind::Lz4 => {
                let mut raw = Vec::with_capacity(64);
                self.inner.serialize_to_stream(token, &mut raw)?;
                sink.write_all(&lz4_flex::compress_prepend_size(&raw))?;
            }
            CompressionKind::Zstd => {
                let mut encoder = zstd::stream::Encoder::new(sink, ZSTD_LEVEL)
                    .map_err(|_| TokenError::CompressionFailure)?;
                self.inner.serialize_to_stream(token, &mut encoder)?;
                encoder
                    .finish()
                    .map_err(|_| TokenError::CompressionFailure)?;
            }
        }
        Ok(())
    }

    fn deserialize_from_stream(&self, source: &mut dyn Read) -> Result<ContinuationToken> {
        match self.kind {
            CompressionKind::Deflate => {
                let inflated = inflate(source)?;
                self.decode_with(inflated.as_slice())
            }
            CompressionKind::Lz4 => {
                let decompressed = lz4_decompress(source)?;
                self.decode_with(decompressed.as_slice())
            }
            CompressionKind::Zstd => {
                let decoder = zstd::stream::Decoder::new(source)
                    .map_err(|_| TokenError::DecompressionFailure)?;
                self.decode_with(decoder)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::streamer::BinaryTokenStreamer;
    use crate::core::token::PaginationDirection;
    use crate::core::value::TokenValue;

    fn verbose_token() -> ContinuationToken {
        ContinuationToken::new(
            PaginationDirection::Forward,
            vec![
                TokenValue::String("north-east-region/warehouse-0001".into()),
                TokenValue::String("north-east-region/warehouse-0002".into()),
                TokenValue::I64(1_700_000_000_000),
            ],
        )
    }

    fn encode(streamer: &dyn TokenStreamer, token: &ContinuationToken) -> Vec<u8> {
        let mut buf = Vec::new();
        let result = streamer.serialize_to_stream(token, &mut buf);
        assert!(result.is_ok(), "serialize failed: {result:?}");
        buf
    }

    const ALL_KINDS: [CompressionKind; 3] = [
        CompressionKind::Deflate,
        CompressionKind::Lz4,
        CompressionKind::Zstd,
    ];

    /// Forward, present, one `Bytes` value of `len` zero bytes
    fn zero_bytes_payload(len: usize) -> Vec<u8> {
        let mut payload = vec![0x00, 0x01];
        payload.extend_from_slice(&1u64.to_le_bytes());
        payload.extend_from_slice(&14u32.to_le_bytes());
        payload.extend_from_slice(&(len as u64).to_le_bytes());
        payload.extend(std::iter::repeat(0u8).take(len));
        payload
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_decorator_roundtrip() {
        let token = verbose_token();
        for kind in ALL_KINDS {
            let streamer = CompressingStreamer::new(BinaryTokenStreamer, kind);
            let bytes = encode(&streamer, &token);
            let decoded = streamer.deserialize_from_stream(&mut bytes.as_slice()).unwrap();
            assert_eq!(decoded, token, "{}", kind.name());
        }
    }

    #[test]
    fn test_deflate_shrinks_short_payloads() {
        let token = verbose_token();
        let plain = encode(&BinaryTokenStreamer, &token);
        let deflated = encode(
            &CompressingStreamer::new(BinaryTokenStreamer, CompressionKind::Deflate),
            &token,
        );
        assert!(deflated.len() < plain.len());
    }

    #[test]
    fn test_uncompressed_bytes_rejected() {
        let token = verbose_token();
        let plain = encode(&BinaryTokenStreamer, &token);
        for kind in ALL_KINDS {
            let streamer = CompressingStreamer::new(BinaryTokenStreamer, kind);
            let result = streamer.deserialize_from_stream(&mut plain.as_slice());
            assert!(result.is_err(), "{} accepted raw payload", kind.name());
        }
    }

    #[test]
    fn test_truncated_compressed_data_rejected() {
        let token = verbose_token();
        for kind in ALL_KINDS {
            let streamer = CompressingStreamer::new(BinaryTokenStreamer, kind);
            let bytes = encode(&streamer, &token);
            for keep in [bytes.len() / 2, bytes.len() - 1] {
                let result = streamer.deserialize_from_stream(&mut &bytes[..keep]);
                assert!(
                    result.is_err(),
                    "{} accepted payload truncated to {keep} bytes",
                    kind.name()
                );
            }
        }
    }

    #[test]
    fn test_lz4_claimed_size_over_limit_rejected() {
        let payload = zero_bytes_payload(16);
        let mut block = lz4_flex::compress_prepend_size(&payload);
        block[..4].copy_from_slice(&(MAX_PAYLOAD_SIZE as u32 + 1).to_le_bytes());

        let streamer = CompressingStreamer::new(BinaryTokenStreamer, CompressionKind::Lz4);
        assert!(matches!(
            streamer.deserialize_from_stream(&mut block.as_slice()),
            Err(TokenError::DecompressionFailure)
        ));

        // Claimed size larger than what the block actually decodes to
        let mut block = lz4_flex::compress_prepend_size(&payload);
        block[..4].copy_from_slice(&(payload.len() as u32 + 8).to_le_bytes());
        assert!(streamer.deserialize_from_stream(&mut block.as_slice()).is_err());
    }

    #[test]
    fn test_bytes_after_deflate_stream_rejected() {
        let streamer = CompressingStreamer::new(BinaryTokenStreamer, CompressionKind::Deflate);
        let mut bytes = encode(&streamer, &verbose_token());
        bytes.extend_from_slice(&[0x00, 0x00]);
        assert!(matches!(
            streamer.deserialize_from_stream(&mut bytes.as_slice()),
            Err(TokenError::DecompressionFailure)
        ));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_zstd_decompression_bomb_rejected() {
        let payload = zero_bytes_payload(1_000_000);
        let bomb = zstd::stream::encode_all(payload.as_slice(), ZSTD_LEVEL).unwrap();
        assert!(bomb.len() < 4096);

        let streamer = CompressingStreamer::new(BinaryTokenStreamer, CompressionKind::Zstd);
        let result = streamer.deserialize_from_stream(&mut bomb.as_slice());
        assert!(result.is_err(), "Should reject payload larger than the decompression limit");
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_deflate_decompression_bomb_rejected() {
        let payload = zero_bytes_payload(1_000_000);
        let mut encoder = flate2::write::DeflateEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(&payload).unwrap();
        let bomb = encoder.finish().unwrap();
        assert!(bomb.len() < 4096);

        let streamer = CompressingStreamer::new(BinaryTokenStreamer, CompressionKind::Deflate);
        assert!(matches!(
            streamer.deserialize_from_stream(&mut bomb.as_slice()),
            Err(TokenError::DecompressionFailure)
        ));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_kind_parsing() {
        assert_eq!("lz4".parse::<CompressionKind>().unwrap(), CompressionKind::Lz4);
        assert_eq!(" ZSTD ".parse::<CompressionKind>().unwrap(), CompressionKind::Zstd);
        assert_eq!("Deflate".parse::<CompressionKind>().unwrap(), CompressionKind::Deflate);
        assert!(matches!(
            "brotli".parse::<CompressionKind>(),
            Err(TokenError::ConfigError(_))
        ));
        assert_eq!(CompressionKind::default(), CompressionKind::Deflate);
    }
}
