// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end discovery between a client and a server over an in-memory
//! broker.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use hemtjanst::device::{Device, DeviceMeta, FeatureMeta};
use hemtjanst::event::DeviceEvent;
use hemtjanst::protocol::topic;
use hemtjanst::protocol::{Grant, MessageHandler, PublishOptions, QoS, SubscribeAck, Transport};
use hemtjanst::subscription::SubscriptionState;
use hemtjanst::{Client, ProtocolError, Server, ServerConfig};
use parking_lot::Mutex;

// ============================================================================
// In-memory broker
// ============================================================================

/// A broker routing messages between connections in the same process.
#[derive(Default)]
struct MemoryBroker {
    connections: Mutex<Vec<Weak<MemoryConnection>>>,
    retained: Mutex<BTreeMap<String, Vec<u8>>>,
    log: Mutex<Vec<(String, String, bool)>>,
}

impl MemoryBroker {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn connect(self: &Arc<Self>) -> Arc<MemoryConnection> {
        let connection = Arc::new(MemoryConnection {
            broker: Arc::clone(self),
            patterns: Mutex::new(Vec::new()),
            handlers: Mutex::new(Vec::new()),
            denied: Mutex::new(Vec::new()),
        });
        self.connections.lock().push(Arc::downgrade(&connection));
        connection
    }

    fn route(&self, topic: &str, payload: &[u8]) {
        let connections: Vec<_> = self
            .connections
            .lock()
            .iter()
            .filter_map(Weak::upgrade)
            .collect();
        for connection in connections {
            connection.deliver(topic, payload);
        }
    }

    /// Every published message as `(topic, payload, retain)`.
    fn log(&self) -> Vec<(String, String, bool)> {
        self.log.lock().clone()
    }

    fn published_to(&self, topic: &str) -> Vec<String> {
        self.log()
            .into_iter()
            .filter(|(t, _, _)| t == topic)
            .map(|(_, payload, _)| payload)
            .collect()
    }
}

struct MemoryConnection {
    broker: Arc<MemoryBroker>,
    patterns: Mutex<Vec<String>>,
    handlers: Mutex<Vec<MessageHandler>>,
    denied: Mutex<Vec<String>>,
}

impl MemoryConnection {
    fn deny(&self, pattern: &str) {
        self.denied.lock().push(pattern.to_string());
    }

    fn deliver(&self, topic: &str, payload: &[u8]) {
        let subscribed = self
            .patterns
            .lock()
            .iter()
            .any(|pattern| topic::matches(pattern, topic));
        if subscribed {
            let handlers = self.handlers.lock().clone();
            for handler in &handlers {
                handler(topic, payload);
            }
        }
    }
}

impl Transport for MemoryConnection {
    fn publish(
        &self,
        topic: &str,
        payload: &[u8],
        options: PublishOptions,
    ) -> Result<(), ProtocolError> {
        self.broker.log.lock().push((
            topic.to_string(),
            String::from_utf8_lossy(payload).into_owned(),
            options.retain,
        ));
        if options.retain {
            self.broker
                .retained
                .lock()
                .insert(topic.to_string(), payload.to_vec());
        }
        self.broker.route(topic, payload);
        Ok(())
    }

    fn subscribe(&self, pattern: &str, qos: QoS, on_ack: SubscribeAck) -> Result<(), ProtocolError> {
        if self.denied.lock().iter().any(|p| p == pattern) {
            on_ack(Ok(Vec::new()));
            return Ok(());
        }

        self.patterns.lock().push(pattern.to_string());
        on_ack(Ok(vec![Grant {
            topic: pattern.to_string(),
            qos,
        }]));

        let retained: Vec<_> = self
            .broker
            .retained
            .lock()
            .iter()
            .filter(|(topic, _)| topic::matches(pattern, topic))
            .map(|(topic, payload)| (topic.clone(), payload.clone()))
            .collect();
        let handlers = self.handlers.lock().clone();
        for (topic, payload) in &retained {
            for handler in &handlers {
                handler(topic, payload);
            }
        }
        Ok(())
    }

    fn on_message(&self, handler: MessageHandler) {
        self.handlers.lock().push(handler);
    }
}

fn kitchen_light() -> Arc<Device> {
    Device::new(
        "kitchen/light",
        DeviceMeta::new("Kitchen Light", "Lightbulb").with_feature("On", FeatureMeta::new()),
    )
}

fn fast_config() -> ServerConfig {
    ServerConfig::default()
        .with_listen_delay(Duration::from_millis(100))
        .with_discover_delay(Duration::from_secs(3))
}

// ============================================================================
// Discovery handshake
// ============================================================================

mod handshake {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn server_discovers_client_device() {
        let broker = MemoryBroker::new();
        let client = Client::new(broker.connect());
        client.add_device(kitchen_light()).unwrap();

        let server = Server::with_config(broker.connect(), fast_config());
        let notified = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&notified);
        server.on_device(move |device| {
            assert_eq!(device.topic(), "kitchen/light");
            counter.fetch_add(1, Ordering::SeqCst);
        });

        server.start().await.unwrap();

        assert!(client.is_announcing());
        let device = server.get_device("kitchen/light").expect("discovered");
        assert_eq!(device.name(), "Kitchen Light");
        assert_eq!(device.type_name(), "lightbulb");
        assert_eq!(device.features(), vec!["on"]);
        assert!(device.reachable());
        assert_eq!(notified.load(Ordering::SeqCst), 1);

        let announcements = broker.published_to("announce/kitchen/light");
        assert_eq!(announcements.len(), 1);
        let meta: DeviceMeta = serde_json::from_str(&announcements[0]).unwrap();
        assert_eq!(meta.device_type, "lightbulb");
        assert!(meta.feature.contains_key("on"));
    }

    #[tokio::test(start_paused = true)]
    async fn announcement_before_discover_is_not_reachable() {
        let broker = MemoryBroker::new();
        let server = Server::with_config(broker.connect(), fast_config());
        let handshake = server.start();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(server.is_listening());

        // A client answering an earlier discovery request.
        let client = Client::new(broker.connect());
        client.add_device(kitchen_light()).unwrap();
        client
            .get_device("kitchen/light")
            .unwrap()
            .announce()
            .unwrap();

        assert!(!server.get_device("kitchen/light").unwrap().reachable());

        handshake.await.unwrap();
        // The discovery request makes the client announce again.
        assert!(server.get_device("kitchen/light").unwrap().reachable());
        assert_eq!(server.devices().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn late_client_answers_retained_discover() {
        let broker = MemoryBroker::new();
        let server = Server::with_config(broker.connect(), fast_config());
        server.start().await.unwrap();
        assert!(server.devices().is_empty());

        let client = Client::new(broker.connect());
        assert!(client.is_announcing());
        client.add_device(kitchen_light()).unwrap();

        assert!(server.get_device("kitchen/light").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn events_follow_device_lifecycle() {
        let broker = MemoryBroker::new();
        let server = Server::with_config(broker.connect(), fast_config());
        let mut events = server.subscribe();

        let client = Client::new(broker.connect());
        let light = Device::new(
            "kitchen/light",
            DeviceMeta::new("Kitchen Light", "lightbulb")
                .with_last_will_id("client-1")
                .with_feature("on", FeatureMeta::new()),
        );
        client.add_device(Arc::clone(&light)).unwrap();
        server.start().await.unwrap();

        light.add_feature("brightness", FeatureMeta::new()).unwrap();
        light.announce().unwrap();

        // What the broker publishes when the client connection drops.
        broker.connect().publish("leave", b"client-1", PublishOptions::default()).unwrap();

        assert_eq!(events.recv().await.unwrap(), DeviceEvent::discovered("kitchen/light"));
        assert_eq!(events.recv().await.unwrap(), DeviceEvent::updated("kitchen/light"));
        assert_eq!(events.recv().await.unwrap(), DeviceEvent::unreachable("kitchen/light"));

        let mirror = server.get_device("kitchen/light").unwrap();
        assert_eq!(mirror.features(), vec!["brightness", "on"]);
        assert!(!mirror.reachable());
    }
}

// ============================================================================
// State sync
// ============================================================================

mod state_sync {
    use super::*;

    async fn discovered() -> (Arc<MemoryBroker>, Arc<Device>, Arc<Device>) {
        let broker = MemoryBroker::new();
        let client = Client::new(broker.connect());
        let light = kitchen_light();
        client.add_device(Arc::clone(&light)).unwrap();

        let server = Server::with_config(broker.connect(), fast_config());
        server.start().await.unwrap();
        let mirror = server.get_device("kitchen/light").unwrap();
        (broker, light, mirror)
    }

    #[tokio::test(start_paused = true)]
    async fn command_and_report_round_trip() {
        let (broker, light, mirror) = discovered().await;

        light
            .on_set("on", |device, feature, value| {
                device.update(feature, value == "1").unwrap();
            })
            .unwrap();
        let reported = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reported);
        mirror
            .on_update("on", move |_, feature, value| {
                sink.lock().push(format!("{feature}={value}"));
            })
            .unwrap();

        mirror.set("on", true).unwrap();

        assert_eq!(*reported.lock(), vec!["on=1"]);
        let log = broker.log();
        assert!(log.contains(&("kitchen/light/on/set".to_string(), "1".to_string(), false)));
        assert!(log.contains(&("kitchen/light/on/get".to_string(), "1".to_string(), true)));
    }

    #[tokio::test(start_paused = true)]
    async fn topic_overrides_are_honored() {
        let broker = MemoryBroker::new();
        let client = Client::new(broker.connect());
        let thermostat = Device::new(
            "hall/thermostat",
            DeviceMeta::new("Hall", "thermostat").with_feature(
                "targetTemperature",
                FeatureMeta::new()
                    .with_range(10.0, 30.0)
                    .with_set_topic("hall/cmd/target")
                    .with_get_topic("hall/state/target"),
            ),
        );
        client.add_device(Arc::clone(&thermostat)).unwrap();
        let server = Server::with_config(broker.connect(), fast_config());
        server.start().await.unwrap();

        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        thermostat
            .on_set("targetTemperature", move |_, _, value| sink.lock().push(value.to_string()))
            .unwrap();

        let mirror = server.get_device("hall/thermostat").unwrap();
        assert_eq!(
            mirror.feature("targetTemperature").unwrap().opts().max,
            Some(30.0)
        );
        mirror.set("targetTemperature", 21.5).unwrap();

        assert_eq!(*received.lock(), vec!["21.5"]);
        assert_eq!(broker.published_to("hall/cmd/target"), vec!["21.5"]);
    }

    #[tokio::test(start_paused = true)]
    async fn reports_after_discovery_reach_mirror_callbacks() {
        let broker = MemoryBroker::new();
        let client = Client::new(broker.connect());
        let light = kitchen_light();
        client.add_device(Arc::clone(&light)).unwrap();
        light.update("on", true).unwrap();

        let server = Server::with_config(broker.connect(), fast_config());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        server.on_device(move |device| {
            let sink = Arc::clone(&sink);
            device
                .on_update("on", move |_, _, value| sink.lock().push(value.to_string()))
                .unwrap();
        });
        server.start().await.unwrap();

        // The retained value is replayed before the callback exists.
        light.update("on", false).unwrap();
        assert_eq!(seen.lock().last().map(String::as_str), Some("0"));
    }

    #[tokio::test(start_paused = true)]
    async fn denied_subscription_is_retried() {
        let broker = MemoryBroker::new();
        let connection = broker.connect();
        connection.deny("kitchen/light/on/set");
        let client = Client::new(connection.clone());
        let light = kitchen_light();
        client.add_device(Arc::clone(&light)).unwrap();

        let manager = client.manager();
        assert_eq!(
            manager.subscription_state("kitchen/light/on/set"),
            Some(SubscriptionState::Failed)
        );

        connection.denied.lock().clear();
        let hits = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&hits);
        manager.subscribe("kitchen/light/on/set", move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(
            manager.subscription_state("kitchen/light/on/set"),
            Some(SubscriptionState::Active)
        );

        broker.connect().publish("kitchen/light/on/set", b"1", PublishOptions::default()).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
