// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory transport for unit tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::error::ProtocolError;
use crate::protocol::topic;
use crate::protocol::{Grant, MessageHandler, PublishOptions, QoS, SubscribeAck, Transport};

/// A message handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Published {
    pub topic: String,
    pub payload: String,
    pub options: PublishOptions,
}

/// A broker and its single client in one object.
///
/// Subscriptions are granted immediately, retained messages are replayed on
/// subscribe, and every publish is looped back synchronously to the handlers
/// when a subscribed pattern matches.
#[derive(Default)]
pub(crate) struct LoopbackTransport {
    handlers: RwLock<Vec<MessageHandler>>,
    patterns: Mutex<Vec<String>>,
    retained: Mutex<BTreeMap<String, Vec<u8>>>,
    published: Mutex<Vec<Published>>,
}

impl LoopbackTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn published(&self) -> Vec<Published> {
        self.published.lock().clone()
    }

    pub(crate) fn published_to(&self, topic: &str) -> Vec<Published> {
        self.published
            .lock()
            .iter()
            .filter(|p| p.topic == topic)
            .cloned()
            .collect()
    }

    pub(crate) fn patterns(&self) -> Vec<String> {
        self.patterns.lock().clone()
    }

    /// Delivers a message as if another client had published it.
    pub(crate) fn inject(&self, topic: &str, payload: &[u8]) {
        self.deliver(topic, payload);
    }

    fn deliver(&self, topic: &str, payload: &[u8]) {
        let subscribed = self
            .patterns
            .lock()
            .iter()
            .any(|pattern| topic::matches(pattern, topic));
        if !subscribed {
            return;
        }
        let handlers = self.handlers.read().clone();
        for handler in &handlers {
            handler(topic, payload);
        }
    }
}

impl Transport for LoopbackTransport {
    fn publish(
        &self,
        topic: &str,
        payload: &[u8],
        options: PublishOptions,
    ) -> Result<(), ProtocolError> {
        self.published.lock().push(Published {
            topic: topic.to_string(),
            payload: String::from_utf8_lossy(payload).into_owned(),
            options,
        });
        if options.retain {
            let mut retained = self.retained.lock();
            if payload.is_empty() {
                retained.remove(topic);
            } else {
                retained.insert(topic.to_string(), payload.to_vec());
            }
        }
        self.deliver(topic, payload);
        Ok(())
    }

    fn subscribe(
        &self,
        pattern: &str,
        qos: QoS,
        on_ack: SubscribeAck,
    ) -> Result<(), ProtocolError> {
        self.patterns.lock().push(pattern.to_string());
        on_ack(Ok(vec![Grant {
            topic: pattern.to_string(),
            qos,
        }]));

        let replay: Vec<(String, Vec<u8>)> = self
            .retained
            .lock()
            .iter()
            .filter(|(topic, _)| topic::matches(pattern, topic))
            .map(|(topic, payload)| (topic.clone(), payload.clone()))
            .collect();
        let handlers = self.handlers.read().clone();
        for (topic, payload) in &replay {
            for handler in &handlers {
                handler(topic, payload);
            }
        }
        Ok(())
    }

    fn on_message(&self, handler: MessageHandler) {
        self.handlers.write().push(handler);
    }
}
