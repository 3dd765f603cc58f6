// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hemtjanst - device discovery and state sync over MQTT.
//!
//! Processes that implement smart home devices and processes that observe
//! or control them find each other through a pub/sub broker. No registry
//! service is involved: devices describe themselves on well-known topics.
//!
//! # Roles
//!
//! - [`Client`]: owns local devices. Announces them on `announce/<topic>`
//!   whenever someone publishes on `discover`, and receives commands on
//!   each feature's set topic.
//! - [`Server`]: discovers remote devices. Publishes on `discover`, builds a
//!   mirror [`Device`] for each announcement, and receives values on each
//!   feature's get topic.
//!
//! # Topics
//!
//! | Topic | Payload | Publisher |
//! |---|---|---|
//! | `discover` | `1` | server |
//! | `announce/<device>` | device metadata (JSON) | client |
//! | `<device>/<feature>/set` | requested value | server |
//! | `<device>/<feature>/get` | current value, retained | client |
//! | `leave` | last will id | broker, on client loss |
//!
//! # Quick Start
//!
//! ## Implementing a device
//!
//! ```no_run
//! use std::sync::Arc;
//! use hemtjanst::{Client, Device, MqttBroker};
//! use hemtjanst::device::{DeviceMeta, FeatureMeta};
//!
//! #[tokio::main]
//! async fn main() -> hemtjanst::Result<()> {
//!     let broker = MqttBroker::builder().host("192.168.1.50").build().await?;
//!     let client = Client::new(Arc::new(broker));
//!
//!     let light = Device::new(
//!         "kitchen/light",
//!         DeviceMeta::new("Kitchen Light", "lightbulb")
//!             .with_feature("on", FeatureMeta::new())
//!             .with_feature("brightness", FeatureMeta::new().with_range(0.0, 100.0)),
//!     );
//!     client.add_device(Arc::clone(&light))?;
//!
//!     light.on_set("on", |device, feature, value| {
//!         // Drive the hardware here, then confirm.
//!         let _ = device.update(feature, value == "1");
//!     })?;
//!
//!     std::future::pending::<()>().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Observing devices
//!
//! ```no_run
//! use std::sync::Arc;
//! use hemtjanst::{MqttBroker, Server};
//!
//! #[tokio::main]
//! async fn main() -> hemtjanst::Result<()> {
//!     let broker = MqttBroker::builder().host("192.168.1.50").build().await?;
//!     let server = Server::new(Arc::new(broker));
//!
//!     server.on_device(|device| {
//!         println!("{} at {}", device.name(), device.topic());
//!     });
//!     server.start().await.ok();
//!
//!     if let Some(light) = server.get_device("kitchen/light") {
//!         light.set("brightness", 40)?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Feature flags
//!
//! - `mqtt` (default): the rumqttc-backed [`MqttBroker`] transport. Without
//!   it, bring your own [`Transport`](protocol::Transport).

pub mod device;
pub mod error;
pub mod event;
pub mod manager;
pub mod protocol;
pub mod subscription;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use device::{Device, DeviceMeta, Feature, FeatureMeta};
pub use error::{DeviceError, Error, ParseError, ProtocolError, Result, ValidationError};
pub use event::{DeviceEvent, EventBus};
pub use manager::{Client, Manager, Role, Server, ServerConfig};
#[cfg(feature = "mqtt")]
pub use protocol::{MqttBroker, MqttBrokerBuilder, MqttBrokerConfig};
pub use protocol::{PublishOptions, QoS, Transport};
pub use types::{DeviceType, FeatureType, FeatureValue, TypeName};
