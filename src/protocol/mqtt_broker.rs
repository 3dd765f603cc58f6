// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT broker connection.
//!
//! [`MqttBroker`] is the [`Transport`] used in production. It wraps a rumqttc
//! client and its event loop:
//!
//! ```text
//! rumqttc EventLoop ──SubAck──▶ ack tracker ──▶ SubscribeAck callbacks
//!        │
//!        └──Publish──▶ dispatch queue ──▶ message handlers (one at a time)
//! ```
//!
//! Inbound messages are handed to the handlers serially on a dedicated task,
//! so a slow handler delays later messages but never the event loop itself.
//!
//! # Examples
//!
//! ```no_run
//! use hemtjanst::protocol::MqttBroker;
//!
//! # async fn example() -> hemtjanst::Result<()> {
//! let broker = MqttBroker::builder()
//!     .host("192.168.1.50")
//!     .port(1883)
//!     .credentials("user", "password")
//!     .with_generated_last_will()
//!     .build()
//!     .await?;
//!
//! if broker.is_connected() {
//!     println!("Connected as {:?}", broker.last_will_id());
//! }
//!
//! broker.disconnect().await?;
//! # Ok(())
//! # }
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use rumqttc::{AsyncClient, EventLoop, LastWill, MqttOptions, SubscribeReasonCode};
use tokio::sync::{mpsc, oneshot};

use crate::error::ProtocolError;

use super::{Grant, LEAVE_TOPIC, MessageHandler, PublishOptions, QoS, SubscribeAck, Transport};

/// Global counter for generating unique client IDs.
static BROKER_CLIENT_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Configuration for an MQTT broker connection.
#[derive(Debug, Clone)]
pub struct MqttBrokerConfig {
    host: String,
    port: u16,
    credentials: Option<(String, String)>,
    keep_alive: Duration,
    connection_timeout: Duration,
    client_id: Option<String>,
    request_capacity: usize,
    last_will_id: Option<String>,
}

impl Default for MqttBrokerConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 1883,
            credentials: None,
            keep_alive: Duration::from_secs(30),
            connection_timeout: Duration::from_secs(10),
            client_id: None,
            request_capacity: 256,
            last_will_id: None,
        }
    }
}

/// A subscribe request waiting for its SUBACK.
struct PendingAck {
    pattern: String,
    on_ack: SubscribeAck,
}

/// Correlates subscribe requests with the broker's acknowledgements.
///
/// Requests are queued in the order they are handed to the client. The event
/// loop reports each outgoing SUBSCRIBE with its packet id in that same
/// order, which moves the oldest queued request in flight under that id.
#[derive(Default)]
struct AckTracker {
    queued: VecDeque<PendingAck>,
    in_flight: HashMap<u16, PendingAck>,
}

impl AckTracker {
    fn queue(&mut self, pattern: String, on_ack: SubscribeAck) {
        self.queued.push_back(PendingAck { pattern, on_ack });
    }

    fn sent(&mut self, pkid: u16) {
        if let Some(pending) = self.queued.pop_front() {
            self.in_flight.insert(pkid, pending);
        }
    }

    fn acknowledged(&mut self, pkid: u16) -> Option<PendingAck> {
        self.in_flight.remove(&pkid)
    }

    fn drain(&mut self) -> Vec<PendingAck> {
        self.queued
            .drain(..)
            .chain(self.in_flight.drain().map(|(_, pending)| pending))
            .collect()
    }

    fn len(&self) -> usize {
        self.queued.len() + self.in_flight.len()
    }
}

/// Builds the grant list for `pattern` from SUBACK return codes.
fn grants(pattern: &str, return_codes: &[SubscribeReasonCode]) -> Vec<Grant> {
    return_codes
        .iter()
        .filter_map(|code| match code {
            SubscribeReasonCode::Success(qos) => Some(Grant {
                topic: pattern.to_string(),
                qos: QoS::from(*qos),
            }),
            SubscribeReasonCode::Failure => None,
        })
        .collect()
}

/// An MQTT broker connection.
///
/// `MqttBroker` is cheaply cloneable (via `Arc`); every clone shares the same
/// connection. Wrap it in an `Arc` to hand it to a
/// [`Client`](crate::Client) or [`Server`](crate::Server).
#[derive(Clone)]
pub struct MqttBroker {
    inner: Arc<MqttBrokerInner>,
}

struct MqttBrokerInner {
    /// The MQTT async client for publishing and subscribing.
    client: AsyncClient,
    /// Configuration used for this connection.
    config: MqttBrokerConfig,
    /// Connection status.
    connected: AtomicBool,
    /// Handlers for inbound messages.
    handlers: RwLock<Vec<MessageHandler>>,
    /// Subscribe requests awaiting acknowledgement.
    acks: Mutex<AckTracker>,
}

impl MqttBroker {
    /// Creates a new builder for configuring an MQTT broker connection.
    #[must_use]
    pub fn builder() -> MqttBrokerBuilder {
        MqttBrokerBuilder::default()
    }

    /// Returns whether the broker is currently connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::Acquire)
    }

    /// Returns the host address of the broker.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.inner.config.host
    }

    /// Returns the port of the broker.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.inner.config.port
    }

    /// Returns whether authentication is configured.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.inner.config.credentials.is_some()
    }

    /// Returns the client ID used for this connection.
    #[must_use]
    pub fn client_id(&self) -> &str {
        self.inner.config.client_id.as_deref().unwrap_or_default()
    }

    /// Returns the ID published on `leave` when this connection is lost.
    #[must_use]
    pub fn last_will_id(&self) -> Option<&str> {
        self.inner.config.last_will_id.as_deref()
    }

    /// Disconnects from the broker.
    ///
    /// # Errors
    ///
    /// Returns error if the disconnect request cannot be sent.
    pub async fn disconnect(&self) -> Result<(), ProtocolError> {
        tracing::info!(
            host = %self.inner.config.host,
            port = %self.inner.config.port,
            "Disconnecting from MQTT broker"
        );

        self.inner.client.disconnect().await?;

        self.inner.connected.store(false, Ordering::Release);
        Ok(())
    }
}

impl MqttBrokerInner {
    fn fail_pending(&self, reason: &str) {
        let pending = self.acks.lock().drain();
        for ack in pending {
            tracing::warn!(pattern = %ack.pattern, "Subscription abandoned");
            (ack.on_ack)(Err(ProtocolError::ConnectionFailed(reason.to_string())));
        }
    }
}

impl Transport for MqttBroker {
    fn publish(
        &self,
        topic: &str,
        payload: &[u8],
        options: PublishOptions,
    ) -> Result<(), ProtocolError> {
        self.inner
            .client
            .try_publish(topic, options.qos.into(), options.retain, payload.to_vec())?;
        Ok(())
    }

    fn subscribe(&self, pattern: &str, qos: QoS, on_ack: SubscribeAck) -> Result<(), ProtocolError> {
        // The lock keeps the queue in the order requests reach the client.
        let mut acks = self.inner.acks.lock();
        self.inner.client.try_subscribe(pattern, qos.into())?;
        acks.queue(pattern.to_string(), on_ack);
        Ok(())
    }

    fn on_message(&self, handler: MessageHandler) {
        self.inner.handlers.write().push(handler);
    }
}

impl std::fmt::Debug for MqttBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MqttBroker")
            .field("host", &self.inner.config.host)
            .field("port", &self.inner.config.port)
            .field("client_id", &self.client_id())
            .field("connected", &self.is_connected())
            .field("pending_acks", &self.inner.acks.lock().len())
            .finish()
    }
}

/// Builder for creating an MQTT broker connection.
///
/// # Examples
///
/// ```no_run
/// use hemtjanst::protocol::MqttBroker;
/// use std::time::Duration;
///
/// # async fn example() -> hemtjanst::Result<()> {
/// let broker = MqttBroker::builder()
///     .host("192.168.1.50")
///     .port(1883)
///     .credentials("user", "password")
///     .client_id("hall-bridge")
///     .last_will("hall-bridge")
///     .keep_alive(Duration::from_secs(60))
///     .connection_timeout(Duration::from_secs(5))
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MqttBrokerBuilder {
    config: MqttBrokerConfig,
}

impl MqttBrokerBuilder {
    /// Sets the broker host address.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Sets the broker port (default: 1883).
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Sets authentication credentials.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the keep-alive interval (default: 30 seconds).
    #[must_use]
    pub fn keep_alive(mut self, duration: Duration) -> Self {
        self.config.keep_alive = duration;
        self
    }

    /// Sets the connection timeout (default: 10 seconds).
    #[must_use]
    pub fn connection_timeout(mut self, duration: Duration) -> Self {
        self.config.connection_timeout = duration;
        self
    }

    /// Sets the client ID (default: generated per connection).
    #[must_use]
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.config.client_id = Some(client_id.into());
        self
    }

    /// Sets how many requests may be queued for the event loop (default: 256).
    #[must_use]
    pub fn request_capacity(mut self, capacity: usize) -> Self {
        self.config.request_capacity = capacity;
        self
    }

    /// Registers a last will publishing `id` on `leave`.
    ///
    /// Devices announced over this connection should carry the same id as
    /// their `lastWillID`, so servers can mark them unreachable.
    #[must_use]
    pub fn last_will(mut self, id: impl Into<String>) -> Self {
        self.config.last_will_id = Some(id.into());
        self
    }

    /// Registers a last will with a random id.
    #[must_use]
    pub fn with_generated_last_will(self) -> Self {
        self.last_will(uuid::Uuid::new_v4().to_string())
    }

    /// Builds and connects to the MQTT broker.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Host is not set
    /// - Connection fails
    /// - Connection times out
    pub async fn build(self) -> Result<MqttBroker, ProtocolError> {
        if self.config.host.is_empty() {
            return Err(ProtocolError::InvalidAddress(
                "MQTT broker host is required".to_string(),
            ));
        }

        let mut config = self.config;
        let client_id = config.client_id.get_or_insert_with(|| {
            let counter = BROKER_CLIENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
            format!("hemtjanst_{}_{}", std::process::id(), counter)
        });

        let mut mqtt_options = MqttOptions::new(client_id.as_str(), &config.host, config.port);
        mqtt_options.set_keep_alive(config.keep_alive);
        mqtt_options.set_clean_session(true);

        if let Some((ref username, ref password)) = config.credentials {
            mqtt_options.set_credentials(username, password);
        }
        if let Some(ref id) = config.last_will_id {
            mqtt_options.set_last_will(LastWill::new(
                LEAVE_TOPIC,
                id.as_bytes().to_vec(),
                rumqttc::QoS::AtLeastOnce,
                false,
            ));
        }

        let (client, event_loop) = AsyncClient::new(mqtt_options, config.request_capacity.max(1));

        let timeout = config.connection_timeout;
        let broker = MqttBroker {
            inner: Arc::new(MqttBrokerInner {
                client,
                config,
                connected: AtomicBool::new(false),
                handlers: RwLock::new(Vec::new()),
                acks: Mutex::new(AckTracker::default()),
            }),
        };

        let (dispatch_tx, dispatch_rx) = mpsc::unbounded_channel();
        tokio::spawn(dispatch_messages(dispatch_rx, Arc::clone(&broker.inner)));

        // Channel to signal when ConnAck is received
        let (connack_tx, connack_rx) = oneshot::channel();
        tokio::spawn(handle_broker_events(
            event_loop,
            Arc::clone(&broker.inner),
            dispatch_tx,
            connack_tx,
        ));

        match tokio::time::timeout(timeout, connack_rx).await {
            Ok(Ok(())) => {
                broker.inner.connected.store(true, Ordering::Release);
                tracing::info!(
                    host = %broker.host(),
                    port = %broker.port(),
                    client_id = %broker.client_id(),
                    "Connected to MQTT broker"
                );
            }
            Ok(Err(_)) => {
                return Err(ProtocolError::ConnectionFailed(
                    "MQTT event loop terminated unexpectedly".to_string(),
                ));
            }
            Err(_) => {
                return Err(ProtocolError::ConnectionFailed(format!(
                    "MQTT connection timeout after {}s",
                    timeout.as_secs()
                )));
            }
        }

        Ok(broker)
    }
}

/// Hands queued inbound messages to the handlers, one message at a time.
async fn dispatch_messages(
    mut rx: mpsc::UnboundedReceiver<(String, Vec<u8>)>,
    inner: Arc<MqttBrokerInner>,
) {
    while let Some((topic, payload)) = rx.recv().await {
        let handlers = inner.handlers.read().clone();
        for handler in &handlers {
            handler(&topic, &payload);
        }
    }
    tracing::debug!("MQTT dispatch queue closed");
}

/// Handles MQTT events for the broker connection.
async fn handle_broker_events(
    mut event_loop: EventLoop,
    inner: Arc<MqttBrokerInner>,
    dispatch_tx: mpsc::UnboundedSender<(String, Vec<u8>)>,
    connack_tx: oneshot::Sender<()>,
) {
    use rumqttc::{Event, Outgoing, Packet};

    let mut connack_tx = Some(connack_tx);

    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                tracing::debug!(?connack, "MQTT broker connected");
                inner.connected.store(true, Ordering::Release);
                if let Some(tx) = connack_tx.take() {
                    let _ = tx.send(());
                }
            }
            Ok(Event::Outgoing(Outgoing::Subscribe(pkid))) => {
                inner.acks.lock().sent(pkid);
            }
            Ok(Event::Incoming(Packet::SubAck(suback))) => {
                tracing::debug!(?suback, "MQTT subscription acknowledged");
                let pending = inner.acks.lock().acknowledged(suback.pkid);
                if let Some(ack) = pending {
                    let granted = grants(&ack.pattern, &suback.return_codes);
                    (ack.on_ack)(Ok(granted));
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                tracing::debug!(
                    topic = %publish.topic,
                    bytes = publish.payload.len(),
                    retain = publish.retain,
                    "MQTT message received"
                );
                if dispatch_tx
                    .send((publish.topic.clone(), publish.payload.to_vec()))
                    .is_err()
                {
                    tracing::error!("MQTT dispatch queue closed");
                    break;
                }
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                tracing::info!("MQTT broker disconnected");
                inner.connected.store(false, Ordering::Release);
                inner.fail_pending("broker disconnected");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "MQTT broker event loop error");
                inner.connected.store(false, Ordering::Release);
                inner.fail_pending(&e.to_string());
                break;
            }
        }
    }
}
