//! Compact ES256 JWT assembly for VAPID (RFC 8292).
//!
//! Builds the three-segment `header.claims.signature` token by hand:
//! no JWT library, no push SDK. The header is fixed, the claims carry
//! the push service origin, a 12-hour expiry, and the operator contact,
//! and the signature is ECDSA P-256/SHA-256 over the first two segments,
//! emitted in the raw 64-byte form push services require.
//!
//! Tokens are never cached: a token is bound to one push service origin
//! via `aud`, so every dispatch builds a fresh one for its endpoint.

// Rust guideline compliant 2026-02

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use p256::ecdsa::signature::Signer;
use p256::ecdsa::Signature;
use serde::Serialize;

use crate::base64url;
use crate::signature::der_to_raw;
use crate::vapid::VapidKeys;

/// Token lifetime. RFC 8292 permits up to 24 hours; 12 keeps a healthy
/// margin against clock skew on the push service side.
pub const TOKEN_LIFETIME_SECS: u64 = 12 * 60 * 60;

/// Fixed JWT header: `{"typ":"JWT","alg":"ES256"}`.
#[derive(Serialize)]
struct Header {
    typ: &'static str,
    alg: &'static str,
}

/// VAPID claim set (RFC 8292 §2).
#[derive(Serialize)]
struct Claims<'a> {
    /// Push service origin this token is valid for.
    aud: &'a str,
    /// Expiry, unix seconds.
    exp: u64,
    /// Operator contact, `mailto:` form.
    sub: &'a str,
}

/// Build a signed VAPID token for one push service origin.
///
/// `audience` is the `scheme://host[:port]` origin of the subscription
/// endpoint and `subject` the `mailto:` contact address. `now` is taken
/// as a parameter so expiry is deterministic under test.
pub fn build_token(
    audience: &str,
    subject: &str,
    keys: &VapidKeys,
    now: SystemTime,
) -> Result<String> {
    let issued_at = now
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the unix epoch")?
        .as_secs();

    let header = serde_json::to_string(&Header {
        typ: "JWT",
        alg: "ES256",
    })?;
    let claims = serde_json::to_string(&Claims {
        aud: audience,
        exp: issued_at + TOKEN_LIFETIME_SECS,
        sub: subject,
    })?;

    let signing_input = format!("{}.{}", base64url::encode(header), base64url::encode(claims));

    let signing_key = keys.signing_key()?;
    let signature: Signature = signing_key
        .try_sign(signing_input.as_bytes())
        .context("ECDSA signing failed")?;

    // The backend hands back ASN.1 DER; the JWT wants fixed-width r || s.
    let raw = der_to_raw(signature.to_der().as_bytes())
        .context("ECDSA signature DER conversion failed")?;

    Ok(format!("{signing_input}.{}", base64url::encode(raw)))
}
