// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription multiplexing.
//!
//! A single transport connection carries every subscription of a
//! [`Manager`](crate::Manager). This module provides:
//!
//! - [`SubscriptionRegistry`] - one [`Subscription`] per distinct pattern,
//!   re-validating each delivery against the pattern before fanning it out
//! - [`SubscriptionState`] - the activation state machine of a subscription
//! - [`CallbackList`] - the ordered callback storage shared by subscriptions,
//!   features and servers
//!
//! Callbacks are invoked synchronously, in registration order, without any
//! lock held, so a callback may publish, subscribe or attach devices.

mod callback;
mod registry;

pub(crate) use callback::invoke_guarded;
pub use callback::{CallbackList, MessageCallback};
pub use registry::{Subscription, SubscriptionRegistry, SubscriptionState};
