// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A single device capability and its listeners.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::subscription::CallbackList;

use super::{Device, FeatureMeta};

/// Callback invoked with the device, the canonical feature name and the raw
/// value received on the feature's topic.
pub type ValueCallback = Arc<dyn Fn(&Device, &str, &str) + Send + Sync>;

/// A capability of a [`Device`].
///
/// A feature keeps two independent callback lists:
///
/// - *set* callbacks run when a command arrives on the feature's set topic
///   (the device implementation is asked to change state)
/// - *update* callbacks run when a value arrives on the feature's get topic
///   (an observer learns about a state change)
///
/// Which list is fed depends on the role of the manager the device is
/// attached to. Callbacks run in registration order; duplicates are kept.
pub struct Feature {
    opts: RwLock<FeatureMeta>,
    set_callbacks: CallbackList<dyn Fn(&Device, &str, &str) + Send + Sync>,
    update_callbacks: CallbackList<dyn Fn(&Device, &str, &str) + Send + Sync>,
}

impl Feature {
    pub(crate) fn new(opts: FeatureMeta) -> Self {
        Self {
            opts: RwLock::new(opts),
            set_callbacks: CallbackList::new(),
            update_callbacks: CallbackList::new(),
        }
    }

    /// Returns the feature options.
    #[must_use]
    pub fn opts(&self) -> FeatureMeta {
        self.opts.read().clone()
    }

    pub(crate) fn set_opts(&self, opts: FeatureMeta) {
        *self.opts.write() = opts;
    }

    pub(crate) fn set_topic_override(&self) -> Option<String> {
        self.opts.read().set_topic.clone().filter(|t| !t.is_empty())
    }

    pub(crate) fn get_topic_override(&self) -> Option<String> {
        self.opts.read().get_topic.clone().filter(|t| !t.is_empty())
    }

    /// Registers a callback for set commands.
    pub fn on_set<F>(&self, callback: F)
    where
        F: Fn(&Device, &str, &str) + Send + Sync + 'static,
    {
        self.set_callbacks.push(Arc::new(callback));
    }

    /// Registers a callback for value updates.
    pub fn on_update<F>(&self, callback: F)
    where
        F: Fn(&Device, &str, &str) + Send + Sync + 'static,
    {
        self.update_callbacks.push(Arc::new(callback));
    }

    pub(crate) fn set_callbacks(&self) -> Vec<ValueCallback> {
        self.set_callbacks.snapshot()
    }

    pub(crate) fn update_callbacks(&self) -> Vec<ValueCallback> {
        self.update_callbacks.snapshot()
    }

    /// Returns the number of set callbacks.
    #[must_use]
    pub fn set_callback_count(&self) -> usize {
        self.set_callbacks.len()
    }

    /// Returns the number of update callbacks.
    #[must_use]
    pub fn update_callback_count(&self) -> usize {
        self.update_callbacks.len()
    }
}

impl std::fmt::Debug for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Feature")
            .field("opts", &*self.opts.read())
            .field("set_callbacks", &self.set_callback_count())
            .field("update_callbacks", &self.update_callback_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_lists_are_independent() {
        let feature = Feature::new(FeatureMeta::new());
        feature.on_set(|_, _, _| {});
        feature.on_set(|_, _, _| {});
        feature.on_update(|_, _, _| {});

        assert_eq!(feature.set_callback_count(), 2);
        assert_eq!(feature.update_callback_count(), 1);
    }

    #[test]
    fn opts_are_replaced_in_place() {
        let feature = Feature::new(FeatureMeta::new().with_range(0.0, 1.0));
        feature.on_set(|_, _, _| {});

        feature.set_opts(FeatureMeta::new().with_step(5.0));

        assert_eq!(feature.opts(), FeatureMeta::new().with_step(5.0));
        assert_eq!(feature.set_callback_count(), 1);
    }

    #[test]
    fn empty_topic_override_is_ignored() {
        let feature = Feature::new(FeatureMeta::new().with_set_topic("").with_get_topic("x/y"));
        assert!(feature.set_topic_override().is_none());
        assert_eq!(feature.get_topic_override().as_deref(), Some("x/y"));
    }
}
