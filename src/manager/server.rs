// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The role of a process that discovers and mirrors remote devices.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::device::{Device, DeviceMeta};
use crate::error::{ParseError, Result};
use crate::event::{DeviceEvent, EventBus};
use crate::protocol::{
    ANNOUNCE_PATTERN, ANNOUNCE_PREFIX, DISCOVER_TOPIC, LEAVE_TOPIC, PublishOptions, Transport,
};
use crate::subscription::{CallbackList, invoke_guarded};

use super::{Manager, Role, ServerConfig};

type DeviceCallback = dyn Fn(&Arc<Device>) + Send + Sync;

/// Discovers remote devices and keeps a mirror of each.
///
/// The discovery handshake has two steps:
///
/// 1. [`listen`](Self::listen) subscribes to `announce/#` and `leave`
/// 2. [`discover`](Self::discover) broadcasts a request on `discover`,
///    asking every client to announce its devices
///
/// [`start`](Self::start) runs both on a timer. Each announcement creates a
/// [`Device`] attached in the server role, or updates the existing one. The
/// mirror's update callbacks fire on every value the client reports, and
/// [`Device::set`] sends commands back.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use hemtjanst::{MqttBroker, Server};
///
/// #[tokio::main]
/// async fn main() -> hemtjanst::Result<()> {
///     let broker = MqttBroker::builder().host("192.168.1.50").build().await?;
///     let server = Server::new(Arc::new(broker));
///
///     server.on_device(|device| {
///         println!("found {} ({})", device.name(), device.topic());
///         let _ = device.on_update("on", |device, _feature, value| {
///             println!("{} is now {value}", device.topic());
///         });
///     });
///
///     server.start().await.ok();
///
///     if let Some(light) = server.get_device("kitchen/light") {
///         light.set("on", true)?;
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Server {
    inner: Arc<ServerInner>,
}

struct ServerInner {
    manager: Arc<Manager>,
    config: ServerConfig,
    listening: AtomicBool,
    discover_sent: AtomicBool,
    device_callbacks: CallbackList<DeviceCallback>,
    events: EventBus,
}

impl Server {
    /// Creates a server on `transport` with the default configuration.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_config(transport, ServerConfig::default())
    }

    /// Creates a server on `transport`.
    #[must_use]
    pub fn with_config(transport: Arc<dyn Transport>, config: ServerConfig) -> Self {
        let events = EventBus::with_capacity(config.event_capacity);
        Self {
            inner: Arc::new(ServerInner {
                manager: Manager::new(transport, Role::Server),
                config,
                listening: AtomicBool::new(false),
                discover_sent: AtomicBool::new(false),
                device_callbacks: CallbackList::new(),
                events,
            }),
        }
    }

    /// Returns the underlying manager.
    #[must_use]
    pub fn manager(&self) -> &Arc<Manager> {
        &self.inner.manager
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    // =========================================================================
    // Handshake
    // =========================================================================

    /// Runs the discovery handshake on a background task.
    ///
    /// The task waits `listen_delay`, calls [`listen`](Self::listen), waits
    /// until `discover_delay` has elapsed, then calls
    /// [`discover`](Self::discover). It stops early if every handle to the
    /// server is dropped.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start(&self) -> JoinHandle<()> {
        let weak = Arc::downgrade(&self.inner);
        let config = self.inner.config.clone();

        tokio::spawn(async move {
            tokio::time::sleep(config.listen_delay).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.listen();
            drop(inner);

            tokio::time::sleep(config.discover_after_listen()).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if let Err(e) = inner.discover() {
                tracing::error!(error = %e, "Failed to send discovery request");
            }
        })
    }

    /// Subscribes to announcements and leave messages.
    ///
    /// Calling it again has no effect.
    pub fn listen(&self) {
        self.inner.listen();
    }

    /// Broadcasts a discovery request.
    ///
    /// Devices announced from now on are marked reachable.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if the request cannot be published.
    pub fn discover(&self) -> Result<()> {
        self.inner.discover()
    }

    /// Returns `true` once [`listen`](Self::listen) has run.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.inner.listening.load(Ordering::SeqCst)
    }

    /// Returns `true` once a discovery request has been sent.
    #[must_use]
    pub fn discover_sent(&self) -> bool {
        self.inner.discover_sent.load(Ordering::SeqCst)
    }

    // =========================================================================
    // Devices
    // =========================================================================

    /// Registers a callback for discovered devices.
    ///
    /// The callback runs once for each device already known, then once for
    /// every device discovered later. Re-announcements do not trigger it.
    pub fn on_device<F>(&self, callback: F)
    where
        F: Fn(&Arc<Device>) + Send + Sync + 'static,
    {
        let callback: Arc<DeviceCallback> = Arc::new(callback);
        self.inner.device_callbacks.push(Arc::clone(&callback));

        for device in self.inner.manager.devices() {
            invoke_guarded(device.topic(), || callback(&device));
        }
    }

    /// Subscribes to device events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.inner.events.subscribe()
    }

    /// Returns the mirror of the device under `topic`.
    #[must_use]
    pub fn get_device(&self, topic: &str) -> Option<Arc<Device>> {
        self.inner.manager.get_device(topic)
    }

    /// Returns every discovered device.
    #[must_use]
    pub fn devices(&self) -> Vec<Arc<Device>> {
        self.inner.manager.devices()
    }
}

impl ServerInner {
    fn listen(self: &Arc<Self>) {
        if self.listening.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::info!("Listening for announcements");

        let weak = Arc::downgrade(self);
        self.manager.subscribe(ANNOUNCE_PATTERN, move |topic, payload| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_announce(topic, payload);
            }
        });

        let weak = Arc::downgrade(self);
        self.manager.subscribe(LEAVE_TOPIC, move |_topic, payload| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_leave(payload);
            }
        });
    }

    fn discover(&self) -> Result<()> {
        self.discover_sent.store(true, Ordering::SeqCst);
        tracing::info!("Sending discovery request");
        self.manager
            .publish(DISCOVER_TOPIC, "1", PublishOptions::retained())
    }

    fn handle_announce(&self, topic: &str, payload: &[u8]) {
        let Some(device_topic) = topic.strip_prefix(ANNOUNCE_PREFIX) else {
            return;
        };
        if device_topic.is_empty() {
            return;
        }
        if payload.is_empty() {
            tracing::debug!(topic = %topic, "Ignoring empty announcement");
            return;
        }

        let mut meta: DeviceMeta = match serde_json::from_slice(payload) {
            Ok(meta) => meta,
            Err(e) => {
                let error = ParseError::from(e);
                tracing::warn!(topic = %topic, error = %error, "Ignoring malformed announcement");
                return;
            }
        };
        meta.reachable = Some(self.discover_sent.load(Ordering::SeqCst));

        if let Some(device) = self.manager.get_device(device_topic) {
            device.update_device(&meta);
            tracing::debug!(device = %device_topic, "Updated device");
            self.events.publish(DeviceEvent::updated(device_topic));
            return;
        }

        let device = Device::new(device_topic, meta);
        if let Err(e) = device.set_manager(&self.manager, Role::Server) {
            tracing::warn!(device = %device_topic, error = %e, "Failed to attach device");
            return;
        }
        self.manager.register_device(Arc::clone(&device));
        tracing::info!(device = %device_topic, name = %device.name(), "Discovered device");

        for callback in &self.device_callbacks.snapshot() {
            invoke_guarded(topic, || callback(&device));
        }
        self.events.publish(DeviceEvent::discovered(device_topic));
    }

    fn handle_leave(&self, payload: &[u8]) {
        let id = String::from_utf8_lossy(payload);
        if id.is_empty() {
            return;
        }

        for device in self.manager.devices() {
            if device.last_will_id().as_deref() == Some(id.as_ref()) {
                device.set_reachable(false);
                tracing::info!(device = %device.topic(), "Device unreachable");
                self.events.publish(DeviceEvent::unreachable(device.topic()));
            }
        }
    }
}

impl std::fmt::Debug for ServerInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerInner")
            .field("manager", &self.manager)
            .field("config", &self.config)
            .field("listening", &self.listening)
            .field("discover_sent", &self.discover_sent)
            .field("device_callbacks", &self.device_callbacks)
            .finish_non_exhaustive()
    }
}
