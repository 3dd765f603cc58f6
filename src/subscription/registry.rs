// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pattern subscriptions multiplexed over one transport connection.
//!
//! # Architecture
//!
//! ```text
//! Transport message: kitchen/light/on/set → 1
//!                     ↓
//!         SubscriptionRegistry.dispatch()
//!                     ↓
//!     every Subscription whose pattern matches
//!                     ↓
//!       callbacks in registration order
//! ```
//!
//! Each distinct pattern owns exactly one [`Subscription`], and therefore at
//! most one transport-level subscribe request at a time, no matter how many
//! listeners share it.

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use crate::error::ProtocolError;
use crate::protocol::topic;
use crate::protocol::{Grant, QoS, SubscribeAck, Transport};

use super::callback::{CallbackList, MessageCallback, invoke_guarded};

/// Activation state of a [`Subscription`].
///
/// ```text
/// NotStarted ──first callback──▶ Starting ──granted──▶ Active
///                                   │
///                                   └──denied/error──▶ Failed ──next callback──▶ Starting
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionState {
    /// No subscribe request has been issued.
    NotStarted,
    /// A subscribe request is in flight.
    Starting,
    /// The broker granted the pattern.
    Active,
    /// The broker denied the pattern, or the request failed.
    Failed,
}

impl SubscriptionState {
    /// Returns `true` once a subscribe request has been issued and not failed.
    #[must_use]
    pub const fn is_started(self) -> bool {
        matches!(self, Self::Starting | Self::Active)
    }

    /// Returns `true` if the broker acknowledged the subscription.
    #[must_use]
    pub const fn is_successful(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// A single pattern and the callbacks listening on it.
pub struct Subscription {
    pattern: String,
    state: Mutex<SubscriptionState>,
    callbacks: CallbackList<dyn Fn(&str, &[u8]) + Send + Sync>,
}

impl Subscription {
    fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            state: Mutex::new(SubscriptionState::NotStarted),
            callbacks: CallbackList::new(),
        }
    }

    /// Returns the subscription pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the current activation state.
    #[must_use]
    pub fn state(&self) -> SubscriptionState {
        *self.state.lock()
    }

    /// Returns the number of callbacks listening on this pattern.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    /// Issues the transport subscribe request unless one is already started.
    fn activate(self: &Arc<Self>, transport: &dyn Transport) {
        {
            let mut state = self.state.lock();
            if state.is_started() {
                return;
            }
            *state = SubscriptionState::Starting;
        }

        tracing::debug!(pattern = %self.pattern, "Subscribing");

        let weak: Weak<Self> = Arc::downgrade(self);
        let on_ack: SubscribeAck = Box::new(move |result| {
            if let Some(subscription) = weak.upgrade() {
                subscription.acknowledge(result);
            }
        });

        if let Err(e) = transport.subscribe(&self.pattern, QoS::AtLeastOnce, on_ack) {
            tracing::warn!(pattern = %self.pattern, error = %e, "Failed to subscribe");
            *self.state.lock() = SubscriptionState::Failed;
        }
    }

    fn acknowledge(&self, result: Result<Vec<Grant>, ProtocolError>) {
        match check_grant(&self.pattern, result) {
            Ok(()) => {
                tracing::debug!(pattern = %self.pattern, "Subscription acknowledged");
                *self.state.lock() = SubscriptionState::Active;
            }
            Err(e) => {
                tracing::warn!(pattern = %self.pattern, error = %e, "Subscription failed");
                *self.state.lock() = SubscriptionState::Failed;
            }
        }
    }

    /// Invokes every callback if `topic` matches the pattern.
    ///
    /// Returns the number of callbacks invoked.
    fn deliver(&self, topic: &str, payload: &[u8]) -> usize {
        if !topic::matches(&self.pattern, topic) {
            return 0;
        }

        let callbacks = self.callbacks.snapshot();
        for callback in &callbacks {
            invoke_guarded(topic, || callback(topic, payload));
        }
        callbacks.len()
    }
}

/// Succeeds only if the acknowledgment grants `pattern`.
fn check_grant(
    pattern: &str,
    result: Result<Vec<Grant>, ProtocolError>,
) -> Result<(), ProtocolError> {
    let grants = result?;
    if grants.iter().any(|grant| grant.topic == pattern) {
        Ok(())
    } else {
        Err(ProtocolError::SubscriptionRejected(pattern.to_string()))
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("pattern", &self.pattern)
            .field("state", &self.state())
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

/// Maps each distinct pattern to its [`Subscription`].
///
/// Subscriptions are kept in creation order and never removed.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    subscriptions: RwLock<Vec<Arc<Subscription>>>,
}

impl SubscriptionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `callback` to the subscription for `pattern`, creating it if needed.
    ///
    /// Adding a callback activates the subscription if it is not started,
    /// which issues one subscribe request on `transport`. A subscription that
    /// previously failed is retried this way.
    pub fn subscribe(&self, transport: &dyn Transport, pattern: &str, callback: MessageCallback) {
        let subscription = {
            let mut subscriptions = self.subscriptions.write();
            let existing = subscriptions
                .iter()
                .find(|s| s.pattern == pattern)
                .map(Arc::clone);
            existing.unwrap_or_else(|| {
                let created = Arc::new(Subscription::new(pattern));
                subscriptions.push(Arc::clone(&created));
                created
            })
        };

        subscription.callbacks.push(callback);
        // Activation may deliver retained messages synchronously, so no
        // registry lock may be held here.
        subscription.activate(transport);
    }

    /// Delivers a message to every subscription whose pattern matches `topic`.
    ///
    /// Returns the number of callbacks invoked. A panicking callback is
    /// logged and does not stop the others.
    pub fn dispatch(&self, topic: &str, payload: &[u8]) -> usize {
        let subscriptions = self.subscriptions.read().clone();
        let delivered: usize = subscriptions
            .iter()
            .map(|subscription| subscription.deliver(topic, payload))
            .sum();

        if delivered == 0 {
            tracing::trace!(topic = %topic, "No subscription matched");
        }
        delivered
    }

    /// Returns the activation state of the subscription for `pattern`.
    #[must_use]
    pub fn state(&self, pattern: &str) -> Option<SubscriptionState> {
        self.get(pattern).map(|s| s.state())
    }

    /// Returns the subscription for `pattern`.
    #[must_use]
    pub fn get(&self, pattern: &str) -> Option<Arc<Subscription>> {
        self.subscriptions
            .read()
            .iter()
            .find(|s| s.pattern == pattern)
            .map(Arc::clone)
    }

    /// Returns the number of distinct patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Returns `true` if no pattern is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.read().is_empty()
    }
}
