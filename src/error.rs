// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the hemtjanst library.
//!
//! Errors fall into three groups:
//!
//! - [`ValidationError`]: a device's metadata is incomplete or inconsistent.
//!   Returned by [`Device::validate`](crate::Device::validate) and anything
//!   that serializes metadata.
//! - [`DeviceError`]: the caller used a device incorrectly (no manager
//!   attached, unknown feature, double attachment).
//! - [`ProtocolError`] and [`ParseError`]: the transport or an inbound
//!   payload misbehaved.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Device metadata failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A device was used incorrectly.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// The transport failed.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// An inbound payload could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Errors raised when a device's metadata is incomplete.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The device was never given metadata.
    #[error("device metadata not instantiated")]
    MissingMetadata,

    /// The device topic is empty.
    #[error("device topic cannot be empty")]
    EmptyTopic,

    /// The device name is empty.
    #[error("device name cannot be empty")]
    EmptyName,

    /// The device type is missing or cannot be resolved.
    #[error("invalid or missing device type")]
    InvalidType,

    /// The device has no features.
    #[error("no features exist on device")]
    NoFeatures,

    /// A feature is stored under a name that is not its canonical name.
    #[error("invalid feature, {key} != {canonical}")]
    NonCanonicalFeature {
        /// The key the feature is stored under.
        key: String,
        /// The canonical name of that key.
        canonical: String,
    },
}

/// Usage errors when operating on a device.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The device is not attached to a manager.
    #[error("device {0} has no manager")]
    NoManager(String),

    /// The feature is not registered on the device.
    #[error("feature {feature} is not implemented on device {device}")]
    FeatureNotFound {
        /// The requested feature name.
        feature: String,
        /// The device topic.
        device: String,
    },

    /// The device is already attached to a manager.
    #[error("manager already set on device {0}")]
    ManagerAlreadySet(String),

    /// An empty string was given where a type name was expected.
    #[error("invalid formatting of type name")]
    InvalidTypeName,
}

/// Errors related to the message transport.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// MQTT client request failed.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// Connection to the broker failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid broker address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The broker refused a subscription.
    #[error("subscription to {0} was rejected")]
    SubscriptionRejected(String),

    /// Internal channel was closed.
    #[error("channel closed: {0}")]
    ChannelClosed(String),
}

/// Errors related to parsing inbound payloads.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
