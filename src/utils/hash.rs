//! Integrity hash appended to token payloads.
//!
//! BLAKE3 digest of the payload bytes, truncated to [`HASH_LEN`] bytes and
//! appended. This detects corruption and edited tokens; it is unkeyed, so a
//! client that knows the format can still forge a consistent token.

use crate::error::{Result, TokenError};

/// Bytes of digest kept on the wire
pub const HASH_LEN: usize = 8;

fn digest(payload: &[u8]) -> [u8; HASH_LEN] {
    let hash = blake3::hash(payload);
    let mut out = [0u8; HASH_LEN];
    out.copy_from_slice(&hash.as_bytes()[..HASH_LEN]);
    out
}

/// Append the payload's hash to the end of the payload.
pub fn append_hash(payload: &mut Vec<u8>) {
    let hash = digest(payload);
    payload.extend_from_slice(&hash);
}

/// Split off and check the trailing hash, returning the payload.
pub fn verify_and_strip(data: &[u8]) -> Result<&[u8]> {
    if data.len() <= HASH_LEN {
        return Err(TokenError::MissingHash);
    }

    let (payload, expected) = data.split_at(data.len() - HASH_LEN);
    if digest(payload) != expected {
        return Err(TokenError::HashMismatch);
    }

    Ok(payload)
}
