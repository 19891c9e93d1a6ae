//! VAPID key pair handling for Web Push (RFC 8292).
//!
//! A VAPID key pair is a P-256 ECDSA keypair. The private key is the raw
//! 32-byte scalar (base64url); the public key is the uncompressed SEC1
//! point (65 bytes, base64url) that browsers receive as the
//! `applicationServerKey` and that rides along in the `Authorization`
//! header of every push request.
//!
//! Keys arriving from configuration may be stored in older encodings
//! (SEC1 DER ~109 bytes, PKCS8 DER ~138 bytes); construction normalizes
//! them to the raw scalar so the rest of the crate only ever sees one
//! shape.

// Rust guideline compliant 2026-02

use anyhow::{Context, Result};
use p256::ecdsa::SigningKey;
use p256::elliptic_curve::rand_core::OsRng;
use serde::{Deserialize, Serialize};

use crate::base64url;

/// VAPID keypair for web push authentication.
///
/// Immutable once constructed. Cheap to clone and safe to share across
/// concurrent dispatches; nothing mutates it after resolution.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VapidKeys {
    /// Raw 32-byte P-256 private key scalar (base64url).
    private_key_b64: String,
    /// Uncompressed public key bytes (base64url, 65 bytes decoded).
    public_key_b64: String,
}

impl VapidKeys {
    /// Generate a fresh VAPID keypair.
    pub fn generate() -> Result<Self> {
        let signing_key = SigningKey::random(&mut OsRng);
        let verifying_key = signing_key.verifying_key();

        // SEC1 uncompressed public key (65 bytes: 0x04 || x || y)
        let public_bytes = verifying_key.to_encoded_point(false);
        let public_key_b64 = base64url::encode(public_bytes.as_bytes());

        let private_key_b64 = base64url::encode(signing_key.to_bytes().as_slice());

        Ok(Self {
            private_key_b64,
            public_key_b64,
        })
    }

    /// Reconstruct a keypair from base64url-encoded strings.
    ///
    /// Validates the public key shape and accepts the private key as a raw
    /// 32-byte scalar, SEC1 DER, or PKCS8 DER; DER inputs are normalized
    /// to the raw scalar.
    pub fn from_base64url(public_key_b64: &str, private_key_b64: &str) -> Result<Self> {
        // Validate public key: must be a 65-byte uncompressed P-256 point
        let pub_bytes =
            base64url::decode(public_key_b64).context("Invalid base64url for VAPID public key")?;
        anyhow::ensure!(
            pub_bytes.len() == 65 && pub_bytes[0] == 0x04,
            "VAPID public key must be 65-byte uncompressed P-256 point"
        );

        let priv_bytes = base64url::decode(private_key_b64)
            .context("Invalid base64url for VAPID private key")?;
        let signing_key = decode_private_key(&priv_bytes)?;

        Ok(Self {
            private_key_b64: base64url::encode(signing_key.to_bytes().as_slice()),
            public_key_b64: public_key_b64.to_string(),
        })
    }

    /// Base64url-encoded uncompressed public key (65 bytes decoded).
    ///
    /// Sent to browsers as the VAPID `applicationServerKey`, and appended
    /// as the `k=` parameter of the `Authorization` header.
    pub fn public_key_base64url(&self) -> &str {
        &self.public_key_b64
    }

    /// Base64url-encoded raw 32-byte private key scalar.
    ///
    /// For provisioning flows that copy an existing keypair into another
    /// process's configuration.
    pub fn private_key_base64url(&self) -> &str {
        &self.private_key_b64
    }

    /// Uncompressed public key bytes (65 bytes).
    pub fn public_key_bytes(&self) -> Result<Vec<u8>> {
        base64url::decode(&self.public_key_b64).context("Failed to decode VAPID public key")
    }

    /// The ECDSA signing key for VAPID token signatures.
    pub(crate) fn signing_key(&self) -> Result<SigningKey> {
        let priv_bytes = base64url::decode(&self.private_key_b64)
            .context("Failed to decode VAPID private key")?;
        anyhow::ensure!(
            priv_bytes.len() == 32,
            "VAPID private key must be 32-byte P-256 scalar, got {} bytes",
            priv_bytes.len()
        );
        SigningKey::from_bytes(priv_bytes.as_slice().into())
            .context("VAPID private key is not a valid P-256 scalar")
    }
}

/// Decode a private key from raw scalar, SEC1 DER, or PKCS8 DER bytes.
fn decode_private_key(priv_bytes: &[u8]) -> Result<SigningKey> {
    if priv_bytes.len() == 32 {
        return SigningKey::from_bytes(priv_bytes.into())
            .context("VAPID private key is not a valid P-256 scalar");
    }

    // Try SEC1 DER first (109 bytes typically), then PKCS8 DER (~138 bytes)
    let signing_key = if let Ok(sk) = p256::SecretKey::from_sec1_der(priv_bytes) {
        SigningKey::from(sk)
    } else {
        use p256::pkcs8::DecodePrivateKey;
        SigningKey::from_pkcs8_der(priv_bytes)
            .context("VAPID private key is not valid 32-byte scalar, SEC1 DER, or PKCS8 DER")?
    };

    log::info!(
        "[WebPush] Normalized VAPID private key from DER ({} bytes) to raw scalar",
        priv_bytes.len()
    );
    Ok(signing_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_vapid_keys() {
        let keys = VapidKeys::generate().expect("should generate keys");

        // Public key should be 65 bytes (uncompressed P-256 point)
        let pub_bytes = keys.public_key_bytes().expect("decode public key");
        assert_eq!(pub_bytes.len(), 65, "uncompressed P-256 public key is 65 bytes");
        assert_eq!(pub_bytes[0], 0x04, "uncompressed point starts with 0x04");

        // Private key should be raw 32-byte scalar
        let priv_bytes =
            base64url::decode(&keys.private_key_b64).expect("decode private key");
        assert_eq!(priv_bytes.len(), 32, "raw P-256 scalar is 32 bytes");
    }

    #[test]
    fn test_from_base64url_roundtrip() {
        let keys = VapidKeys::generate().expect("should generate keys");
        let reconstructed = VapidKeys::from_base64url(&keys.public_key_b64, &keys.private_key_b64)
            .expect("should reconstruct from base64url");

        assert_eq!(keys.public_key_b64, reconstructed.public_key_b64);
        assert_eq!(keys.private_key_b64, reconstructed.private_key_b64);
    }

    #[test]
    fn test_sec1_der_private_key_is_normalized() {
        // Keys from older deployments may be stored as SEC1 DER (~109
        // bytes); construction must accept them and store the 32-byte
        // scalar.
        let signing_key = SigningKey::random(&mut OsRng);
        let public_b64 =
            base64url::encode(signing_key.verifying_key().to_encoded_point(false).as_bytes());

        let secret_key: p256::SecretKey = signing_key.clone().into();
        let der = secret_key.to_sec1_der().expect("SEC1 DER");
        let der_b64 = base64url::encode(&*der);

        let keys = VapidKeys::from_base64url(&public_b64, &der_b64)
            .expect("SEC1 DER private key should be accepted");
        let normalized = keys.signing_key().expect("signing key");
        assert_eq!(normalized.to_bytes(), signing_key.to_bytes());
    }

    #[test]
    fn test_pkcs8_der_private_key_is_normalized() {
        use p256::pkcs8::EncodePrivateKey;

        let signing_key = SigningKey::random(&mut OsRng);
        let public_b64 =
            base64url::encode(signing_key.verifying_key().to_encoded_point(false).as_bytes());

        let der = signing_key.to_pkcs8_der().expect("PKCS8 DER");
        let der_b64 = base64url::encode(der.as_bytes());

        let keys = VapidKeys::from_base64url(&public_b64, &der_b64)
            .expect("PKCS8 DER private key should be accepted");
        let normalized = keys.signing_key().expect("signing key");
        assert_eq!(normalized.to_bytes(), signing_key.to_bytes());
    }

    #[test]
    fn test_from_base64url_rejects_invalid() {
        assert!(VapidKeys::from_base64url("not-valid-key", "also-bad").is_err());
    }

    #[test]
    fn test_from_base64url_rejects_compressed_point() {
        let keys = VapidKeys::generate().expect("generate");
        let signing_key = keys.signing_key().expect("signing key");
        let compressed =
            base64url::encode(signing_key.verifying_key().to_encoded_point(true).as_bytes());

        assert!(VapidKeys::from_base64url(&compressed, &keys.private_key_b64).is_err());
    }

    #[test]
    fn test_vapid_keys_roundtrip_serde() {
        let keys = VapidKeys::generate().expect("should generate keys");
        let json = serde_json::to_string(&keys).expect("serialize");
        let loaded: VapidKeys = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(keys.public_key_b64, loaded.public_key_b64);
        assert_eq!(keys.private_key_b64, loaded.private_key_b64);
    }
}
