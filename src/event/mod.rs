// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device lifecycle events.
//!
//! A [`Server`](crate::Server) publishes a [`DeviceEvent`] on its
//! [`EventBus`] whenever a remote device is discovered, re-announced, or
//! leaves. Subscribers receive events through a tokio broadcast channel.
//!
//! # Examples
//!
//! ```
//! use hemtjanst::event::{DeviceEvent, EventBus};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(DeviceEvent::discovered("kitchen/light"));
//! assert!(rx.try_recv().unwrap().is_discovered());
//! ```

mod device_event;
mod event_bus;

pub use device_event::DeviceEvent;
pub(crate) use event_bus::DEFAULT_CHANNEL_CAPACITY;
pub use event_bus::EventBus;
