//! Direct-to-push-service Web Push delivery with VAPID authentication.
//!
//! This crate sends browser push notifications straight to the push
//! services browsers subscribe through (Google FCM, Mozilla autopush,
//! ...), authenticating per RFC 8292 with a self-signed short-lived JWT.
//! No push SDK is involved: the compact JWT is assembled by hand, signed
//! with a P-256 ECDSA key, and the DER signature is converted to the raw
//! fixed-width form the protocol requires.
//!
//! # Architecture
//!
//! ```text
//! notify_all(subscriptions, payload)
//!     ↓  one concurrent dispatch per subscription, settle all
//! PushDispatcher::dispatch
//!     ↓  audience = endpoint origin → fresh VAPID JWT → HTTP POST
//! push service (FCM, autopush, ...)
//!     ↓  response classified: Delivered / Expired / Failed
//! caller deletes subscriptions reported Expired
//! ```
//!
//! # Configuration
//!
//! Keys come from `VAPID_PUBLIC_KEY` / `VAPID_PRIVATE_KEY` (base64url).
//! Both absent means push is disabled: every dispatch is skipped and the
//! fan-out is a silent no-op, so unconfigured environments (local dev,
//! CI) work without special-casing.
//!
//! # What callers own
//!
//! Subscription storage and pruning, retry policy, and notification
//! content all live with the caller. This crate takes subscriptions and
//! a payload, performs exactly one delivery attempt each, and reports
//! per-subscription outcomes.

// Library modules
pub mod base64url;
pub mod config;
pub mod dispatch;
pub mod fanout;
pub mod jwt;
pub mod signature;
pub mod vapid;

// Re-export commonly used types
pub use dispatch::{DispatchOutcome, PushDispatcher, PushPayload, PushSubscription};
pub use fanout::notify_all;
pub use vapid::VapidKeys;
