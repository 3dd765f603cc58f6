// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device event types.

/// Events emitted by a [`Server`](crate::Server) as it tracks remote devices.
///
/// Every event carries the topic of the device it concerns; look the device
/// up with [`Server::get_device`](crate::Server::get_device).
///
/// # Examples
///
/// ```
/// use hemtjanst::event::DeviceEvent;
///
/// let event = DeviceEvent::discovered("kitchen/light");
/// assert_eq!(event.topic(), "kitchen/light");
/// assert!(event.is_discovered());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// A device announced itself for the first time.
    Discovered {
        /// The device topic.
        topic: String,
    },

    /// A known device announced itself again with new metadata.
    Updated {
        /// The device topic.
        topic: String,
    },

    /// A device's client left the broker.
    Unreachable {
        /// The device topic.
        topic: String,
    },
}

impl DeviceEvent {
    /// Returns the topic of the device this event concerns.
    #[must_use]
    pub fn topic(&self) -> &str {
        match self {
            Self::Discovered { topic } | Self::Updated { topic } | Self::Unreachable { topic } => {
                topic
            }
        }
    }

    /// Returns `true` if this is a discovery event.
    #[must_use]
    pub fn is_discovered(&self) -> bool {
        matches!(self, Self::Discovered { .. })
    }

    /// Returns `true` if this is an update event.
    #[must_use]
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }

    /// Returns `true` if this is an unreachable event.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }

    /// Creates a discovery event.
    #[must_use]
    pub fn discovered(topic: impl Into<String>) -> Self {
        Self::Discovered {
            topic: topic.into(),
        }
    }

    /// Creates an update event.
    #[must_use]
    pub fn updated(topic: impl Into<String>) -> Self {
        Self::Updated {
            topic: topic.into(),
        }
    }

    /// Creates an unreachable event.
    #[must_use]
    pub fn unreachable(topic: impl Into<String>) -> Self {
        Self::Unreachable {
            topic: topic.into(),
        }
    }
}
