#![no_main]

use keyset_token::{CompressionKind, ContinuationTokenOptions, TokenSerializer};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    for include_hash in [false, true] {
        for use_compression in [false, true] {
            for kind in [
                CompressionKind::Deflate,
                CompressionKind::Lz4,
                CompressionKind::Zstd,
            ] {
                let options = ContinuationTokenOptions::new(include_hash, use_compression)
                    .with_compression_kind(kind);
                let serializer = TokenSerializer::new(options);

                // Anything accepted must re-encode to a stable text
                if let Some(Some(token)) = serializer.try_deserialize(text) {
                    let Ok(first) = serializer.serialize(&token) else {
                        continue;
                    };
                    let Some(Some(reread)) = serializer.try_deserialize(&first) else {
                        panic!("re-encoded token rejected: {first}");
                    };
                    assert_eq!(serializer.serialize(&reread).ok(), Some(first));
                }
            }
        }
    }
});
