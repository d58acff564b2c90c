//! # Core Token Components
//!
//! Token data types and the binary wire format.
//!
//! This module provides the foundation for continuation tokens: the value
//! codec, the token and option types, and the streamer that writes a token
//! to a byte sink.
//!
//! ## Components
//! - **Value**: self-describing tagged values (type tag + canonical bytes)
//! - **Token**: `ContinuationToken`, `PaginationDirection`, `ContinuationTokenOptions`
//! - **Streamer**: binary token serialization over `Write`/`Read`
//!
//! ## Wire Format
//! ```text
//! [Direction(1)] [Presence(1)] [Count(u64)] ([Tag(u32)] [Value])*
//! ```
//!
//! ## Security
//! - Payload reads are bounded by `MAX_PAYLOAD_SIZE`
//! - Unknown direction bytes and trailing bytes are rejected

pub mod streamer;
pub mod token;
pub mod value;
