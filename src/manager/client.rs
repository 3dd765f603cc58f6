// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The role of a process that implements devices.

use std::sync::Arc;

use crate::device::Device;
use crate::error::Result;
use crate::protocol::{DISCOVER_TOPIC, Transport};

use super::{Manager, Role};

/// Owns local devices and announces them when discovery is requested.
///
/// Every message on the `discover` topic makes the client publish the
/// metadata of each of its devices on `announce/<device topic>`. Devices
/// added after the first discovery request are announced immediately.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use hemtjanst::{Client, MqttBroker};
/// use hemtjanst::device::{Device, DeviceMeta, FeatureMeta};
///
/// #[tokio::main]
/// async fn main() -> hemtjanst::Result<()> {
///     let broker = MqttBroker::builder()
///         .host("192.168.1.50")
///         .with_generated_last_will()
///         .build()
///         .await?;
///     let last_will = broker.last_will_id().map(str::to_string);
///     let client = Client::new(Arc::new(broker));
///
///     let mut meta = DeviceMeta::new("Kitchen Light", "lightbulb")
///         .with_feature("on", FeatureMeta::new());
///     meta.last_will_id = last_will;
///
///     let light = Device::new("kitchen/light", meta);
///     client.add_device(Arc::clone(&light))?;
///
///     light.on_set("on", |device, _feature, value| {
///         // Switch the lamp, then report the new state.
///         let _ = device.update("on", value == "1");
///     })?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    manager: Arc<Manager>,
}

impl Client {
    /// Creates a client on `transport` and starts listening for discovery
    /// requests.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let manager = Manager::new(transport, Role::Client);

        let weak = Arc::downgrade(&manager);
        manager.subscribe(DISCOVER_TOPIC, move |_topic, _payload| {
            if let Some(manager) = weak.upgrade() {
                tracing::info!("Discovery requested");
                manager.announce_devices();
            }
        });

        Self { manager }
    }

    /// Returns the underlying manager.
    #[must_use]
    pub fn manager(&self) -> &Arc<Manager> {
        &self.manager
    }

    /// Adds a local device.
    ///
    /// See [`Manager::add_device`].
    ///
    /// # Errors
    ///
    /// Returns an error if the device is invalid or belongs to another
    /// manager.
    pub fn add_device(&self, device: Arc<Device>) -> Result<bool> {
        self.manager.add_device(device)
    }

    /// Returns the local device registered under `topic`.
    #[must_use]
    pub fn get_device(&self, topic: &str) -> Option<Arc<Device>> {
        self.manager.get_device(topic)
    }

    /// Returns every local device.
    #[must_use]
    pub fn devices(&self) -> Vec<Arc<Device>> {
        self.manager.devices()
    }

    /// Returns `true` once a discovery request has been received.
    #[must_use]
    pub fn is_announcing(&self) -> bool {
        self.manager.is_announcing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceMeta, FeatureMeta};
    use crate::testing::LoopbackTransport;
    use parking_lot::Mutex;

    fn light() -> Arc<Device> {
        Device::new(
            "kitchen/light",
            DeviceMeta::new("Kitchen Light", "Lightbulb").with_feature("On", FeatureMeta::new()),
        )
    }

    #[test]
    fn subscribes_to_discover() {
        let transport = LoopbackTransport::new();
        let client = Client::new(transport.clone());

        assert_eq!(transport.patterns(), vec!["discover"]);
        assert!(!client.is_announcing());
    }

    #[test]
    fn discover_announces_every_device() {
        let transport = LoopbackTransport::new();
        let client = Client::new(transport.clone());
        client.add_device(light()).unwrap();

        transport.inject("discover", b"1");

        assert!(client.is_announcing());
        let announced = transport.published_to("announce/kitchen/light");
        assert_eq!(announced.len(), 1);
        assert!(announced[0].options.retain);

        let meta: DeviceMeta = serde_json::from_str(&announced[0].payload).unwrap();
        assert_eq!(meta.name, "Kitchen Light");
        assert_eq!(meta.device_type, "lightbulb");
        assert!(meta.feature.contains_key("on"));
    }

    #[test]
    fn every_discover_announces_again() {
        let transport = LoopbackTransport::new();
        let client = Client::new(transport.clone());
        client.add_device(light()).unwrap();

        transport.inject("discover", b"1");
        transport.inject("discover", b"1");

        assert_eq!(transport.published_to("announce/kitchen/light").len(), 2);
    }

    #[test]
    fn retained_discover_announces_on_subscribe() {
        let transport = LoopbackTransport::new();
        transport
            .publish("discover", b"1", crate::protocol::PublishOptions::retained())
            .unwrap();

        let client = Client::new(transport.clone());

        assert!(client.is_announcing());
    }

    #[test]
    fn set_commands_reach_callbacks() {
        let transport = LoopbackTransport::new();
        let client = Client::new(transport.clone());
        let device = light();
        client.add_device(Arc::clone(&device)).unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        device
            .on_set("on", move |device, feature, value| {
                sink.lock()
                    .push(format!("{} {feature} {value}", device.topic()));
            })
            .unwrap();

        transport.inject("kitchen/light/on/set", b"1");
        transport.inject("kitchen/light/on/get", b"0");

        assert_eq!(*seen.lock(), vec!["kitchen/light on 1"]);
    }

    #[test]
    fn update_publishes_retained_value() {
        let transport = LoopbackTransport::new();
        let client = Client::new(transport.clone());
        let device = light();
        client.add_device(Arc::clone(&device)).unwrap();

        device.update("on", false).unwrap();

        let published = transport.published_to("kitchen/light/on/get");
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].payload, "0");
        assert!(published[0].options.retain);
    }
}
