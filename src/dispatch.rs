//! Single-subscription web push dispatch (RFC 8030) with VAPID auth.
//!
//! One dispatch is one HTTP POST to one browser push service endpoint,
//! authenticated by a freshly signed VAPID token, with the response
//! classified into a [`DispatchOutcome`]. Dispatch is total: it logs and
//! classifies every failure instead of raising, because a single bad
//! subscription must never abort a batch or crash the calling handler.

// Rust guideline compliant 2026-02

use std::time::SystemTime;

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::jwt;
use crate::vapid::VapidKeys;

/// Push message time-to-live advertised to the push service, in seconds.
const TTL_SECS: u64 = 86_400; // 24 hours

/// A browser's push subscription, as handed over by the caller.
///
/// Contains everything needed to reach one subscribed browser/device.
/// `p256dh` and `auth` are the browser's encryption parameters; they are
/// part of the subscription's identity for callers but unused here, since
/// payloads travel as plaintext JSON under a same-origin trust model.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PushSubscription {
    /// Push service endpoint URL (opaque, per-device).
    pub endpoint: String,
    /// Browser's P-256 ECDH public key (base64url).
    pub p256dh: String,
    /// Shared auth secret (base64url).
    pub auth: String,
}

/// Notification content, serialized verbatim as the push message body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PushPayload {
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub body: String,
    /// Click destination, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Classified result of a single dispatch attempt.
///
/// Exactly one outcome per call; no retry state is modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Push service accepted the message (HTTP 200/201).
    Delivered,
    /// Subscription is dead (HTTP 404/410); the caller should delete it.
    Expired,
    /// Network error, malformed endpoint, or unexpected status.
    Failed,
    /// No VAPID keys configured; nothing was attempted.
    Skipped,
}

impl DispatchOutcome {
    /// Returns the string representation used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchOutcome::Delivered => "delivered",
            DispatchOutcome::Expired => "expired",
            DispatchOutcome::Failed => "failed",
            DispatchOutcome::Skipped => "skipped",
        }
    }

    /// Whether the push service accepted the message.
    #[must_use]
    pub fn is_delivered(self) -> bool {
        self == DispatchOutcome::Delivered
    }

    /// Whether the caller should delete this subscription from its store.
    ///
    /// True only for [`DispatchOutcome::Expired`]: the push service has
    /// said the subscription will never work again.
    #[must_use]
    pub fn should_remove_subscription(self) -> bool {
        self == DispatchOutcome::Expired
    }
}

impl std::fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derive the JWT audience from a subscription endpoint.
///
/// The audience is the endpoint's origin, `scheme://host[:port]`, with
/// the port present only when it is not the scheme default. A token
/// signed for one push service origin is invalid for every other, so
/// this is recomputed per endpoint.
pub fn audience_for_endpoint(endpoint: &str) -> Result<String> {
    let url = Url::parse(endpoint).with_context(|| format!("invalid push endpoint: {endpoint}"))?;
    let host = url
        .host_str()
        .with_context(|| format!("push endpoint has no host: {endpoint}"))?;

    let mut audience = format!("{}://{host}", url.scheme());
    if let Some(port) = url.port() {
        audience.push_str(&format!(":{port}"));
    }
    Ok(audience)
}

/// Sends web push messages to individual subscriptions.
///
/// Holds the resolved VAPID keys (or `None` when push is unconfigured),
/// the operator contact address, and a single `reqwest::Client` reused
/// across dispatches for connection pooling.
#[derive(Clone, Debug)]
pub struct PushDispatcher {
    client: reqwest::Client,
    keys: Option<VapidKeys>,
    contact: String,
}

impl PushDispatcher {
    /// Creates a dispatcher from an already-resolved keypair.
    ///
    /// `contact` is the operator's contact address (without the `mailto:`
    /// prefix); push services use it to reach someone when a sender
    /// misbehaves. Pass `keys: None` to get a dispatcher that skips every
    /// send, which is the correct behavior for unconfigured deployments.
    pub fn new(keys: Option<VapidKeys>, contact: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            keys,
            contact: contact.into(),
        }
    }

    /// Creates a dispatcher from `VAPID_PUBLIC_KEY` / `VAPID_PRIVATE_KEY`.
    pub fn from_env(contact: impl Into<String>) -> Self {
        Self::new(config::resolve_from_env(), contact)
    }

    /// Whether VAPID keys are configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.keys.is_some()
    }

    /// The configured public key, for serving as `applicationServerKey`.
    pub fn public_key_base64url(&self) -> Option<&str> {
        self.keys.as_ref().map(VapidKeys::public_key_base64url)
    }

    /// Send one push message to one subscription and classify the result.
    ///
    /// Never returns an error and never panics; every failure mode maps
    /// to an outcome and a log line:
    /// - no keys configured → [`DispatchOutcome::Skipped`], no network I/O
    /// - endpoint fails to parse → [`DispatchOutcome::Failed`] (warn)
    /// - HTTP 200/201 → [`DispatchOutcome::Delivered`] (info)
    /// - HTTP 404/410 → [`DispatchOutcome::Expired`] (info)
    /// - other statuses → [`DispatchOutcome::Failed`] (warn)
    /// - network errors → [`DispatchOutcome::Failed`] (error)
    pub async fn dispatch(
        &self,
        subscription: &PushSubscription,
        payload: &PushPayload,
    ) -> DispatchOutcome {
        let Some(keys) = &self.keys else {
            log::debug!("[WebPush] No VAPID keys configured, skipping push");
            return DispatchOutcome::Skipped;
        };

        let audience = match audience_for_endpoint(&subscription.endpoint) {
            Ok(audience) => audience,
            Err(e) => {
                log::warn!("[WebPush] Malformed push endpoint, subscription skipped: {e:#}");
                return DispatchOutcome::Failed;
            }
        };

        let token = match self.build_token(keys, &audience) {
            Ok(token) => token,
            Err(e) => {
                log::error!("[WebPush] Failed to build VAPID token for {audience}: {e:#}");
                return DispatchOutcome::Failed;
            }
        };

        let body = match serde_json::to_vec(payload) {
            Ok(body) => body,
            Err(e) => {
                log::error!("[WebPush] Failed to serialize push payload: {e:#}");
                return DispatchOutcome::Failed;
            }
        };

        let request = self
            .client
            .post(subscription.endpoint.clone())
            .header("Content-Type", "application/json")
            .header("Content-Length", body.len().to_string())
            .header("TTL", TTL_SECS.to_string())
            .header("Urgency", "high")
            .header(
                "Authorization",
                format!("vapid t={token}, k={}", keys.public_key_base64url()),
            )
            .body(body);

        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                match status {
                    200 | 201 => {
                        log::info!("[WebPush] Push delivered via {audience} (HTTP {status})");
                        DispatchOutcome::Delivered
                    }
                    404 | 410 => {
                        log::info!(
                            "[WebPush] Subscription expired at {audience} (HTTP {status}), caller should remove it"
                        );
                        DispatchOutcome::Expired
                    }
                    _ => {
                        let body = response.text().await.unwrap_or_default();
                        log::warn!(
                            "[WebPush] Push service {audience} rejected the request (HTTP {status}): {body}"
                        );
                        DispatchOutcome::Failed
                    }
                }
            }
            Err(e) => {
                log::error!("[WebPush] Push request to {audience} failed: {e}");
                DispatchOutcome::Failed
            }
        }
    }

    fn build_token(&self, keys: &VapidKeys, audience: &str) -> Result<String> {
        let subject = format!("mailto:{}", self.contact);
        jwt::build_token(audience, &subject, keys, SystemTime::now())
    }
}
