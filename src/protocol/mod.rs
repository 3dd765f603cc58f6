// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Message transport abstraction.
//!
//! The library never speaks a wire protocol itself. Everything it needs from
//! the underlying publish/subscribe connection is captured by the
//! [`Transport`] trait: publish a payload, subscribe to a pattern, and hand
//! every inbound message to a handler.
//!
//! With the `mqtt` feature enabled, [`MqttBroker`] implements the trait on top
//! of a `rumqttc` connection.
//!
//! # Wire conventions
//!
//! | Purpose | Topic | Payload |
//! |---|---|---|
//! | Discovery request | `discover` | `1` (retained) |
//! | Announcement | `announce/<device>` | metadata JSON (retained) |
//! | Feature command | `<device>/<feature>/set` | value |
//! | Feature value | `<device>/<feature>/get` | value (retained) |
//! | Last will | `leave` | last will ID |

#[cfg(feature = "mqtt")]
mod mqtt_broker;
pub mod topic;

#[cfg(feature = "mqtt")]
pub use mqtt_broker::{MqttBroker, MqttBrokerBuilder, MqttBrokerConfig};

use std::fmt;
use std::sync::Arc;

use crate::error::ProtocolError;

/// Topic on which servers request every client to announce its devices.
pub const DISCOVER_TOPIC: &str = "discover";

/// Prefix of the per-device announcement topic.
pub const ANNOUNCE_PREFIX: &str = "announce/";

/// Pattern matching every announcement.
pub const ANNOUNCE_PATTERN: &str = "announce/#";

/// Topic carrying last will IDs of disconnected clients.
pub const LEAVE_TOPIC: &str = "leave";

/// Delivery guarantee requested from the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QoS {
    /// Fire and forget.
    AtMostOnce,
    /// Delivered at least once.
    #[default]
    AtLeastOnce,
    /// Delivered exactly once.
    ExactlyOnce,
}

impl QoS {
    /// Returns the numeric QoS level.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::AtMostOnce => 0,
            Self::AtLeastOnce => 1,
            Self::ExactlyOnce => 2,
        }
    }
}

impl fmt::Display for QoS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

#[cfg(feature = "mqtt")]
impl From<QoS> for rumqttc::QoS {
    fn from(qos: QoS) -> Self {
        match qos {
            QoS::AtMostOnce => rumqttc::QoS::AtMostOnce,
            QoS::AtLeastOnce => rumqttc::QoS::AtLeastOnce,
            QoS::ExactlyOnce => rumqttc::QoS::ExactlyOnce,
        }
    }
}

#[cfg(feature = "mqtt")]
impl From<rumqttc::QoS> for QoS {
    fn from(qos: rumqttc::QoS) -> Self {
        match qos {
            rumqttc::QoS::AtMostOnce => QoS::AtMostOnce,
            rumqttc::QoS::AtLeastOnce => QoS::AtLeastOnce,
            rumqttc::QoS::ExactlyOnce => QoS::ExactlyOnce,
        }
    }
}

/// Options attached to a single publish.
///
/// The default is at-least-once delivery without retention.
///
/// # Examples
///
/// ```
/// use hemtjanst::protocol::{PublishOptions, QoS};
///
/// let opts = PublishOptions::default();
/// assert_eq!(opts.qos, QoS::AtLeastOnce);
/// assert!(!opts.retain);
///
/// assert!(PublishOptions::retained().retain);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublishOptions {
    /// Delivery guarantee.
    pub qos: QoS,
    /// Whether the broker keeps the message for late subscribers.
    pub retain: bool,
    /// Duplicate delivery flag.
    pub dup: bool,
}

impl PublishOptions {
    /// At-least-once delivery with retention enabled.
    #[must_use]
    pub const fn retained() -> Self {
        Self {
            qos: QoS::AtLeastOnce,
            retain: true,
            dup: false,
        }
    }

    /// Sets the QoS level.
    #[must_use]
    pub const fn with_qos(mut self, qos: QoS) -> Self {
        self.qos = qos;
        self
    }
}

/// A topic granted by the broker in response to a subscribe request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    /// The pattern that was granted.
    pub topic: String,
    /// The QoS the broker granted.
    pub qos: QoS,
}

/// Completion callback for a subscribe request.
///
/// Receives the list of granted topics, or the error that prevented the
/// subscription from being acknowledged.
pub type SubscribeAck = Box<dyn FnOnce(Result<Vec<Grant>, ProtocolError>) + Send>;

/// Handler receiving every inbound `(topic, payload)` pair.
pub type MessageHandler = Arc<dyn Fn(&str, &[u8]) + Send + Sync>;

/// The narrow interface the library needs from a publish/subscribe connection.
///
/// Implementations must deliver inbound messages serially: handlers are never
/// invoked concurrently for the same transport.
pub trait Transport: Send + Sync {
    /// Publishes `payload` to `topic`.
    ///
    /// Returns once the message has been handed to the transport; delivery
    /// is governed by `options.qos`.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the transport refuses the message.
    fn publish(
        &self,
        topic: &str,
        payload: &[u8],
        options: PublishOptions,
    ) -> Result<(), ProtocolError>;

    /// Requests a subscription to `pattern`.
    ///
    /// `on_ack` is invoked exactly once when the broker answers, possibly
    /// before this method returns. It is not invoked if this method returns
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request could not be issued.
    fn subscribe(&self, pattern: &str, qos: QoS, on_ack: SubscribeAck)
    -> Result<(), ProtocolError>;

    /// Registers a handler for every inbound message.
    fn on_message(&self, handler: MessageHandler);
}
