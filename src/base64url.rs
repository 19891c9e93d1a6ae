//! Unpadded base64url encoding (RFC 4648 §5).
//!
//! JWT compact serialization and VAPID key exchange both use the URL-safe
//! alphabet (`-`/`_`) with the `=` padding stripped. Every segment this
//! crate puts on the wire goes through these two functions.

// Rust guideline compliant 2026-02

use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD as BASE64URL;
use base64::Engine;

/// Encode bytes as unpadded base64url.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    BASE64URL.encode(bytes)
}

/// Decode an unpadded base64url string.
///
/// Rejects padded input and characters outside the URL-safe alphabet.
pub fn decode(input: &str) -> Result<Vec<u8>> {
    BASE64URL
        .decode(input)
        .with_context(|| format!("invalid base64url input ({} chars)", input.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_is_urlsafe_and_unpadded() {
        // 0xfb 0xff selects '-' and '_' in the URL-safe alphabet
        let encoded = encode([0xfb, 0xff, 0xfe]);
        assert_eq!(encoded, "-__-");
        assert!(!encoded.contains('='), "no padding expected");
        assert!(!encoded.contains('+') && !encoded.contains('/'));
    }

    #[test]
    fn test_roundtrip() {
        let bytes: Vec<u8> = (0..=255).collect();
        let decoded = decode(&encode(&bytes)).expect("decode");
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn test_decode_rejects_padding() {
        assert!(decode("aGVsbG8=").is_err());
    }

    #[test]
    fn test_decode_rejects_standard_alphabet() {
        assert!(decode("+/+/").is_err());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(encode([]), "");
        assert_eq!(decode("").expect("decode empty"), Vec::<u8>::new());
    }
}
