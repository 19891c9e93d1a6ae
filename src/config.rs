//! VAPID key resolution from process configuration.
//!
//! Push delivery is an optional feature: a deployment without VAPID keys
//! (local development, CI) must behave as if push simply does not exist.
//! Resolution therefore never fails: any missing, empty, or undecodable
//! configuration resolves to `None`, and callers treat `None` as "push
//! disabled".
//!
//! The resolution core is a pure function over the two configured values;
//! [`resolve_from_env`] is the thin environment-variable wrapper used in
//! production.

// Rust guideline compliant 2026-02

use crate::vapid::VapidKeys;

/// Environment variable holding the base64url uncompressed P-256 public key.
pub const PUBLIC_KEY_ENV: &str = "VAPID_PUBLIC_KEY";

/// Environment variable holding the base64url private key (raw scalar or DER).
pub const PRIVATE_KEY_ENV: &str = "VAPID_PRIVATE_KEY";

/// Resolve a VAPID keypair from two configured values.
///
/// Returns `None` when either value is missing or empty, and `None` with
/// a warning log when the material is present but invalid. Never panics,
/// never errors: an unconfigured deployment is a valid state.
pub fn resolve(public_key: Option<String>, private_key: Option<String>) -> Option<VapidKeys> {
    let public = public_key.filter(|key| !key.is_empty())?;
    let private = private_key.filter(|key| !key.is_empty())?;

    match VapidKeys::from_base64url(&public, &private) {
        Ok(keys) => Some(keys),
        Err(e) => {
            log::warn!("[WebPush] Configured VAPID keys are invalid, push disabled: {e:#}");
            None
        }
    }
}

/// Resolve a VAPID keypair from `VAPID_PUBLIC_KEY` / `VAPID_PRIVATE_KEY`.
pub fn resolve_from_env() -> Option<VapidKeys> {
    resolve(
        std::env::var(PUBLIC_KEY_ENV).ok(),
        std::env::var(PRIVATE_KEY_ENV).ok(),
    )
}
