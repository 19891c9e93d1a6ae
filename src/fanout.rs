//! Concurrent fan-out of one payload to many subscriptions.
//!
//! Launches every dispatch at once and settles them all: a subscription
//! that times out, errors, or points at a dead endpoint never cancels or
//! delays its siblings. Each dispatch is already total (it classifies
//! instead of raising), so the join needs no error handling of its own.

// Rust guideline compliant 2026-02

use futures_util::future::join_all;

use crate::dispatch::{DispatchOutcome, PushDispatcher, PushPayload, PushSubscription};

/// Send `payload` to every subscription concurrently.
///
/// Returns one outcome per subscription, in input order, so callers can
/// map outcomes back to subscriptions and delete the ones reported
/// [`DispatchOutcome::Expired`].
///
/// Short-circuits to an empty vec, with no network calls and no log
/// noise, when the list is empty or the dispatcher has no VAPID keys.
pub async fn notify_all(
    dispatcher: &PushDispatcher,
    subscriptions: &[PushSubscription],
    payload: &PushPayload,
) -> Vec<DispatchOutcome> {
    if subscriptions.is_empty() || !dispatcher.is_configured() {
        return Vec::new();
    }

    let outcomes = join_all(
        subscriptions
            .iter()
            .map(|subscription| dispatcher.dispatch(subscription, payload)),
    )
    .await;

    let delivered = outcomes.iter().filter(|o| o.is_delivered()).count();
    log::info!(
        "[WebPush] Fan-out complete: {delivered}/{} delivered",
        outcomes.len()
    );

    outcomes
}
