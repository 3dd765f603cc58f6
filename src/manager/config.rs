// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server configuration.

use std::time::Duration;

use crate::event::DEFAULT_CHANNEL_CAPACITY;

/// Timing and buffering of a [`Server`](super::Server).
///
/// The discovery handshake run by [`Server::start`](super::Server::start)
/// waits `listen_delay` before subscribing to announcements, then waits
/// until `discover_delay` has elapsed since start before broadcasting the
/// discovery request.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use hemtjanst::manager::ServerConfig;
///
/// let config = ServerConfig::default()
///     .with_discover_delay(Duration::from_secs(1))
///     .with_event_capacity(64);
///
/// assert_eq!(config.listen_delay, Duration::from_millis(100));
/// assert_eq!(config.discover_delay, Duration::from_secs(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Delay before subscribing to announcements.
    pub listen_delay: Duration,
    /// Delay, counted from start, before broadcasting the discovery request.
    pub discover_delay: Duration,
    /// Number of events buffered per event subscriber.
    pub event_capacity: usize,
}

impl ServerConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the delay before subscribing to announcements.
    #[must_use]
    pub fn with_listen_delay(mut self, delay: Duration) -> Self {
        self.listen_delay = delay;
        self
    }

    /// Sets the delay before broadcasting the discovery request.
    #[must_use]
    pub fn with_discover_delay(mut self, delay: Duration) -> Self {
        self.discover_delay = delay;
        self
    }

    /// Sets the event buffer size.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Time left between listening and discovering.
    pub(crate) fn discover_after_listen(&self) -> Duration {
        self.discover_delay.saturating_sub(self.listen_delay)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_delay: Duration::from_millis(100),
            discover_delay: Duration::from_secs(3),
            event_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}
