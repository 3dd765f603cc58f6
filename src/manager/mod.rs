// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device managers for both sides of the discovery protocol.
//!
//! # Overview
//!
//! A [`Manager`] owns one transport connection, the subscriptions made on it
//! and a set of [`Device`](crate::Device)s. It is wrapped by one of two roles:
//!
//! - [`Client`] implements devices. It answers every discovery request by
//!   announcing its devices and receives commands on their set topics.
//! - [`Server`] observes devices. It requests discovery, builds a mirror of
//!   every announced device and receives values on their get topics.
//!
//! # Protocol
//!
//! ```text
//! Server                        broker                        Client
//!   │ subscribe announce/#, leave │                             │
//!   │──────── discover: 1 ───────▶│──────── discover: 1 ───────▶│
//!   │◀─ announce/kitchen/light ───│◀─ announce/kitchen/light ───│
//!   │── kitchen/light/on/set: 1 ─▶│── kitchen/light/on/set: 1 ─▶│
//!   │◀─ kitchen/light/on/get: 1 ──│◀─ kitchen/light/on/get: 1 ──│
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use hemtjanst::manager::{Server, ServerConfig};
//! use hemtjanst::event::DeviceEvent;
//! use hemtjanst::MqttBroker;
//!
//! #[tokio::main]
//! async fn main() -> hemtjanst::Result<()> {
//!     let broker = MqttBroker::builder().host("localhost").build().await?;
//!     let server = Server::with_config(Arc::new(broker), ServerConfig::default());
//!
//!     let mut events = server.subscribe();
//!     let _handshake = server.start();
//!
//!     while let Ok(event) = events.recv().await {
//!         match event {
//!             DeviceEvent::Discovered { topic } => println!("new device {topic}"),
//!             DeviceEvent::Unreachable { topic } => println!("lost device {topic}"),
//!             DeviceEvent::Updated { .. } => {}
//!         }
//!     }
//!     Ok(())
//! }
//! ```

mod base;
mod client;
mod config;
mod server;

pub use base::Manager;
pub use client::Client;
pub use config::ServerConfig;
pub use server::Server;

/// The side of the protocol a manager plays.
///
/// The role decides which topic a device's features listen on once the
/// device is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Implements devices: listens on set topics, feeds set callbacks.
    Client,
    /// Observes devices: listens on get topics, feeds update callbacks.
    Server,
}

impl Role {
    /// Returns `true` for the client role.
    #[must_use]
    pub const fn is_client(self) -> bool {
        matches!(self, Self::Client)
    }
}
