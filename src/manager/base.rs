// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The transport-owning core shared by both roles.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::device::Device;
use crate::error::Result;
use crate::protocol::{PublishOptions, Transport};
use crate::subscription::{SubscriptionRegistry, SubscriptionState};

use super::Role;

/// Owns a transport connection, its subscriptions and a set of devices.
///
/// A manager is created in one [`Role`] and is normally used through a
/// [`Client`](super::Client) or a [`Server`](super::Server). Every inbound
/// message is handed to the [`SubscriptionRegistry`]; the manager itself does
/// not interpret topics.
pub struct Manager {
    transport: Arc<dyn Transport>,
    role: Role,
    registry: SubscriptionRegistry,
    devices: RwLock<Vec<Arc<Device>>>,
    announcing: AtomicBool,
}

impl Manager {
    /// Creates a manager on `transport` and starts receiving its messages.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, role: Role) -> Arc<Self> {
        let manager = Arc::new(Self {
            transport,
            role,
            registry: SubscriptionRegistry::new(),
            devices: RwLock::new(Vec::new()),
            announcing: AtomicBool::new(false),
        });

        let weak = Arc::downgrade(&manager);
        manager
            .transport
            .on_message(Arc::new(move |topic: &str, payload: &[u8]| {
                if let Some(manager) = weak.upgrade() {
                    manager.handle_message(topic, payload);
                }
            }));

        manager
    }

    /// Returns the role of this manager.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Publishes `payload` to `topic`.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if the transport refuses the message.
    pub fn publish(
        &self,
        topic: &str,
        payload: impl AsRef<[u8]>,
        options: PublishOptions,
    ) -> Result<()> {
        tracing::debug!(topic = %topic, qos = %options.qos, retain = options.retain, "Publishing");
        self.transport.publish(topic, payload.as_ref(), options)?;
        Ok(())
    }

    /// Adds a callback for messages matching `pattern`.
    ///
    /// The first callback on a pattern issues the transport subscription.
    pub fn subscribe<F>(&self, pattern: &str, callback: F)
    where
        F: Fn(&str, &[u8]) + Send + Sync + 'static,
    {
        self.registry
            .subscribe(self.transport.as_ref(), pattern, Arc::new(callback));
    }

    /// Returns the activation state of the subscription for `pattern`.
    #[must_use]
    pub fn subscription_state(&self, pattern: &str) -> Option<SubscriptionState> {
        self.registry.state(pattern)
    }

    /// Hands an inbound message to the matching subscriptions.
    ///
    /// Returns the number of callbacks invoked.
    pub fn handle_message(&self, topic: &str, payload: &[u8]) -> usize {
        self.registry.dispatch(topic, payload)
    }

    // =========================================================================
    // Devices
    // =========================================================================

    /// Validates, attaches and registers `device`.
    ///
    /// Returns `Ok(false)` if this exact device is already registered. A
    /// client manager that already answered a discovery request announces
    /// the device right away; a failed announcement is logged and the device
    /// stays registered.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the device is invalid, or
    /// `DeviceError::ManagerAlreadySet` if it belongs to another manager.
    pub fn add_device(self: &Arc<Self>, device: Arc<Device>) -> Result<bool> {
        if self.devices.read().iter().any(|d| Arc::ptr_eq(d, &device)) {
            return Ok(false);
        }

        device.validate()?;
        device.set_manager(self, self.role)?;
        self.register_device(Arc::clone(&device));

        if self.role == Role::Client && self.is_announcing() {
            if let Err(e) = device.announce() {
                tracing::warn!(device = %device.topic(), error = %e, "Failed to announce device");
            }
        }
        Ok(true)
    }

    /// Registers an attached device without validating it.
    pub(crate) fn register_device(&self, device: Arc<Device>) {
        tracing::debug!(device = %device.topic(), role = ?self.role, "Registered device");
        self.devices.write().push(device);
    }

    /// Returns the device registered under `topic`.
    #[must_use]
    pub fn get_device(&self, topic: &str) -> Option<Arc<Device>> {
        self.devices
            .read()
            .iter()
            .find(|d| d.topic() == topic)
            .map(Arc::clone)
    }

    /// Returns every registered device, in registration order.
    #[must_use]
    pub fn devices(&self) -> Vec<Arc<Device>> {
        self.devices.read().clone()
    }

    /// Returns the number of registered devices.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.read().len()
    }

    // =========================================================================
    // Announcing
    // =========================================================================

    /// Returns `true` once a discovery request has been answered.
    #[must_use]
    pub fn is_announcing(&self) -> bool {
        self.announcing.load(Ordering::SeqCst)
    }

    /// Announces every registered device.
    ///
    /// A device that fails to announce is logged and skipped.
    pub(crate) fn announce_devices(&self) {
        self.announcing.store(true, Ordering::SeqCst);

        let devices = self.devices();
        tracing::info!(count = devices.len(), "Announcing devices");
        for device in &devices {
            if let Err(e) = device.announce() {
                tracing::warn!(device = %device.topic(), error = %e, "Skipping device announcement");
            }
        }
    }
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("role", &self.role)
            .field("subscriptions", &self.registry.len())
            .field("devices", &self.device_count())
            .field("announcing", &self.is_announcing())
            .finish_non_exhaustive()
    }
}
