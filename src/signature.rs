//! ECDSA signature format conversion for the VAPID JWT.
//!
//! ES256 JWTs carry the signature as the raw concatenation `r || s`, each
//! integer exactly 32 bytes. Crypto backends commonly emit the ASN.1 DER
//! form instead: `SEQUENCE { INTEGER r, INTEGER s }`, where each INTEGER
//! is minimally encoded (leading zeros stripped) and grows a `0x00` sign
//! byte when its high bit is set. This module converts between the two.
//!
//! A push service rejects a DER-shaped signature with an opaque 401, so
//! this is the one place where an off-by-one fails remotely instead of
//! locally. Keep it boring and keep it tested.

// Rust guideline compliant 2026-02

use anyhow::{ensure, Result};

/// Byte width of each of `r` and `s` on the P-256 curve.
const INTEGER_LEN: usize = 32;

/// Total raw signature width (`r || s`).
const RAW_LEN: usize = 2 * INTEGER_LEN;

/// Convert an ECDSA P-256 signature to the raw 64-byte `r || s` form.
///
/// Accepts either encoding: a 64-byte input is already raw and is returned
/// unchanged; anything else must parse as a DER `SEQUENCE` of two
/// `INTEGER`s. Each integer has a `0x00` sign byte stripped when present
/// and is left-padded back to 32 bytes.
///
/// # Errors
///
/// Malformed DER input is a signing-backend contract violation, not a
/// runtime condition to recover from, and fails with a descriptive error.
pub fn der_to_raw(sig: &[u8]) -> Result<[u8; RAW_LEN]> {
    if let Ok(raw) = <[u8; RAW_LEN]>::try_from(sig) {
        // Backend already produces the fixed-width form
        return Ok(raw);
    }

    ensure!(
        sig.len() > 2,
        "ECDSA signature too short for DER ({} bytes)",
        sig.len()
    );
    ensure!(
        sig[0] == 0x30,
        "ECDSA signature is not a DER SEQUENCE (tag {:#04x})",
        sig[0]
    );

    // A P-256 signature is at most 72 bytes, so the SEQUENCE length is a
    // single byte. Its value is not needed to locate the integers.
    let mut cursor = 2;
    let r = read_integer(sig, &mut cursor)?;
    let s = read_integer(sig, &mut cursor)?;

    let mut raw = [0u8; RAW_LEN];
    raw[INTEGER_LEN - r.len()..INTEGER_LEN].copy_from_slice(r);
    raw[RAW_LEN - s.len()..].copy_from_slice(s);
    Ok(raw)
}

/// Read one DER `INTEGER`, advancing `cursor` past it.
///
/// Returns the value bytes with any sign byte removed, at most 32 bytes.
fn read_integer<'a>(der: &'a [u8], cursor: &mut usize) -> Result<&'a [u8]> {
    ensure!(
        der.len() >= *cursor + 2,
        "DER INTEGER header truncated at offset {cursor}"
    );
    ensure!(
        der[*cursor] == 0x02,
        "expected DER INTEGER tag at offset {cursor}, got {:#04x}",
        der[*cursor]
    );

    let len = der[*cursor + 1] as usize;
    *cursor += 2;
    ensure!(
        (1..=INTEGER_LEN + 1).contains(&len),
        "DER INTEGER length {len} out of range for P-256"
    );
    ensure!(
        der.len() >= *cursor + len,
        "DER INTEGER value truncated (need {len} bytes at offset {cursor})"
    );

    let mut value = &der[*cursor..*cursor + len];
    *cursor += len;

    // 33 bytes means DER prepended a sign byte to keep the integer
    // non-negative; it must be zero and is not part of the value.
    if value.len() == INTEGER_LEN + 1 {
        ensure!(
            value[0] == 0x00,
            "33-byte DER INTEGER without a leading zero sign byte"
        );
        value = &value[1..];
    }

    Ok(value)
}
