// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ordered callback storage and guarded invocation.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;

/// Callback receiving a raw message: the concrete topic and its payload.
pub type MessageCallback = Arc<dyn Fn(&str, &[u8]) + Send + Sync>;

/// An append-only list of callbacks, invoked in registration order.
///
/// The list is never locked while callbacks run: [`snapshot`](Self::snapshot)
/// clones the `Arc`s out so a callback may register further callbacks on the
/// same list without deadlocking.
pub struct CallbackList<F: ?Sized> {
    callbacks: RwLock<Vec<Arc<F>>>,
}

impl<F: ?Sized> CallbackList<F> {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            callbacks: RwLock::new(Vec::new()),
        }
    }

    /// Appends a callback. Duplicates are kept.
    pub fn push(&self, callback: Arc<F>) {
        self.callbacks.write().push(callback);
    }

    /// Returns the callbacks in registration order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Arc<F>> {
        self.callbacks.read().clone()
    }

    /// Returns the number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.read().len()
    }

    /// Returns `true` if no callback is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.read().is_empty()
    }
}

impl<F: ?Sized> Default for CallbackList<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ?Sized> std::fmt::Debug for CallbackList<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackList")
            .field("len", &self.len())
            .finish()
    }
}

/// Runs a user callback, containing any panic it raises.
///
/// Returns `false` if the callback panicked. The panic is logged with
/// `topic` for context and does not propagate to the caller, so the
/// remaining callbacks of a dispatch still run.
pub(crate) fn invoke_guarded(topic: &str, callback: impl FnOnce()) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(callback)) {
        Ok(()) => true,
        Err(payload) => {
            tracing::error!(
                topic = %topic,
                panic = %panic_message(payload.as_ref()),
                "Callback panicked"
            );
            false
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
