// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Devices and their features.
//!
//! A [`Device`] groups [`Feature`]s under one topic namespace. The same type
//! serves both sides of the protocol:
//!
//! - on a [`Client`](crate::Client) it is a device this process implements:
//!   it listens on each feature's *set* topic and reports state with
//!   [`Device::update`]
//! - on a [`Server`](crate::Server) it mirrors a remote device: it listens on
//!   each feature's *get* topic and sends commands with [`Device::set`]
//!
//! # Examples
//!
//! ```
//! use hemtjanst::device::{Device, DeviceMeta, FeatureMeta};
//!
//! let device = Device::new(
//!     "kitchen/light",
//!     DeviceMeta::new("Kitchen Light", "Lightbulb").with_feature("On", FeatureMeta::new()),
//! );
//!
//! assert!(device.validate().is_ok());
//! assert_eq!(device.type_name(), "lightbulb");
//! assert_eq!(device.features(), vec!["on".to_string()]);
//! assert_eq!(device.set_topic_name("on").unwrap(), "kitchen/light/on/set");
//! assert_eq!(device.get_topic_name("on").unwrap(), "kitchen/light/on/get");
//! ```

mod feature;
mod meta;

pub use feature::{Feature, ValueCallback};
pub use meta::{DeviceMeta, FeatureMeta};

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::{Mutex, RwLock};

use crate::error::{DeviceError, Error, ParseError, Result, ValidationError};
use crate::manager::{Manager, Role};
use crate::protocol::{ANNOUNCE_PREFIX, PublishOptions};
use crate::subscription::invoke_guarded;
use crate::types::{DeviceType, FeatureType, FeatureValue, TypeName, canonical_name};

/// Mutable device state, guarded by one lock.
#[derive(Default)]
struct DeviceState {
    meta: Option<DeviceMeta>,
    name: String,
    device_type: Option<TypeName<DeviceType>>,
    reachable: bool,
    features: BTreeMap<String, Arc<Feature>>,
}

/// The manager a device is attached to.
struct Attachment {
    manager: Weak<Manager>,
    role: Role,
}

/// A device: a topic namespace with a set of features.
///
/// Devices are always handled through `Arc<Device>`; the constructor returns
/// one. A device can be attached to a single [`Manager`] for its whole
/// lifetime.
pub struct Device {
    this: Weak<Device>,
    topic: String,
    state: RwLock<DeviceState>,
    attachment: OnceLock<Attachment>,
    /// `(feature, topic)` pairs this device has subscribed on its manager.
    subscribed: Mutex<HashSet<(String, String)>>,
}

impl Device {
    /// Creates a device under `topic` from its metadata.
    ///
    /// Feature names are canonicalized; the metadata is not validated here,
    /// see [`validate`](Self::validate).
    #[must_use]
    pub fn new(topic: impl Into<String>, meta: DeviceMeta) -> Arc<Self> {
        let device = Self::without_meta(topic);
        device.update_device(&meta);
        device
    }

    /// Creates a device under `topic` that has no metadata yet.
    ///
    /// Such a device fails validation until [`update_device`](Self::update_device)
    /// is called.
    #[must_use]
    pub fn without_meta(topic: impl Into<String>) -> Arc<Self> {
        let topic = topic.into();
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            topic,
            state: RwLock::new(DeviceState::default()),
            attachment: OnceLock::new(),
            subscribed: Mutex::new(HashSet::new()),
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the device topic, the root of its namespace.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Returns the device name.
    #[must_use]
    pub fn name(&self) -> String {
        self.state.read().name.clone()
    }

    /// Returns the canonical device type name, or an empty string if unset.
    #[must_use]
    pub fn type_name(&self) -> String {
        self.state
            .read()
            .device_type
            .as_ref()
            .map(|t| t.as_str().to_string())
            .unwrap_or_default()
    }

    /// Returns the resolved device type.
    #[must_use]
    pub fn device_type(&self) -> Option<TypeName<DeviceType>> {
        self.state.read().device_type.clone()
    }

    /// Returns the last known liveness of the device.
    #[must_use]
    pub fn reachable(&self) -> bool {
        self.state.read().reachable
    }

    pub(crate) fn set_reachable(&self, reachable: bool) {
        self.state.write().reachable = reachable;
    }

    /// Returns the last will ID the device was announced with.
    #[must_use]
    pub fn last_will_id(&self) -> Option<String> {
        self.state
            .read()
            .meta
            .as_ref()
            .and_then(|m| m.last_will_id.clone())
    }

    /// Returns the canonical names of all features.
    #[must_use]
    pub fn features(&self) -> Vec<String> {
        self.state.read().features.keys().cloned().collect()
    }

    /// Returns `true` if the device has the feature.
    #[must_use]
    pub fn has_feature(&self, feature: &str) -> bool {
        self.feature(feature).is_ok()
    }

    /// Returns a feature by name.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::FeatureNotFound` if the feature is not registered.
    pub fn feature(&self, feature: &str) -> std::result::Result<Arc<Feature>, DeviceError> {
        let not_found = || DeviceError::FeatureNotFound {
            feature: feature.to_string(),
            device: self.topic.clone(),
        };
        let name = canonical_name::<FeatureType>(feature).map_err(|_| not_found())?;
        self.state
            .read()
            .features
            .get(&name)
            .map(Arc::clone)
            .ok_or_else(not_found)
    }

    /// Returns `true` if the device is attached to a manager.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attachment.get().is_some()
    }

    /// Returns the device's metadata in canonical form, without validating it.
    #[must_use]
    pub fn meta(&self) -> DeviceMeta {
        let state = self.state.read();
        let stored = state.meta.clone().unwrap_or_default();
        DeviceMeta {
            name: state.name.clone(),
            device_type: state
                .device_type
                .as_ref()
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            manufacturer: stored.manufacturer,
            model: stored.model,
            serial_number: stored.serial_number,
            last_will_id: stored.last_will_id,
            feature: state
                .features
                .iter()
                .map(|(name, feature)| (name.clone(), feature.opts()))
                .collect(),
            reachable: None,
        }
    }

    // =========================================================================
    // Features and metadata
    // =========================================================================

    /// Adds a feature, or replaces the options of an existing one.
    ///
    /// An existing feature keeps its callbacks. If the device is already
    /// attached, a new feature is subscribed right away.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidTypeName` if `feature` is empty.
    pub fn add_feature(
        &self,
        feature: &str,
        opts: FeatureMeta,
    ) -> std::result::Result<(), DeviceError> {
        let name = canonical_name::<FeatureType>(feature)?;
        self.upsert_feature(&name, opts);
        Ok(())
    }

    /// Stores `opts` under the canonical `name` and subscribes it if attached.
    fn upsert_feature(&self, name: &str, opts: FeatureMeta) {
        {
            let mut state = self.state.write();
            match state.features.get(name) {
                Some(existing) => existing.set_opts(opts),
                None => {
                    state
                        .features
                        .insert(name.to_string(), Arc::new(Feature::new(opts)));
                }
            }
        }
        self.subscribe_feature(name);
    }

    /// Checks that the device can be announced.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found: missing metadata, empty
    /// topic or name, missing type, no features, or a feature stored under a
    /// non-canonical name.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        let state = self.state.read();
        if state.meta.is_none() {
            return Err(ValidationError::MissingMetadata);
        }
        if self.topic.is_empty() {
            return Err(ValidationError::EmptyTopic);
        }
        if state.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if state.device_type.is_none() {
            return Err(ValidationError::InvalidType);
        }
        if state.features.is_empty() {
            return Err(ValidationError::NoFeatures);
        }
        for key in state.features.keys() {
            let canonical = canonical_name::<FeatureType>(key).unwrap_or_default();
            if *key != canonical {
                return Err(ValidationError::NonCanonicalFeature {
                    key: key.clone(),
                    canonical,
                });
            }
        }
        Ok(())
    }

    /// Replaces the device's metadata and reconciles its features.
    ///
    /// Every feature in `meta` is added or updated through
    /// [`add_feature`](Self::add_feature); every feature absent from `meta` is
    /// removed. Features that persist keep their callbacks. `reachable` is
    /// only changed when `meta` carries it.
    pub fn update_device(&self, meta: &DeviceMeta) {
        let device_type = TypeName::<DeviceType>::resolve(&meta.device_type).ok();
        {
            let mut state = self.state.write();
            state.name.clone_from(&meta.name);
            state.device_type = device_type;
            if let Some(reachable) = meta.reachable {
                state.reachable = reachable;
            }
            state.meta = Some(DeviceMeta {
                feature: BTreeMap::new(),
                reachable: None,
                ..meta.clone()
            });
        }

        let mut keep = HashSet::new();
        for (name, opts) in &meta.feature {
            match canonical_name::<FeatureType>(name) {
                Ok(canonical) => {
                    self.upsert_feature(&canonical, opts.clone());
                    keep.insert(canonical);
                }
                Err(e) => {
                    tracing::warn!(device = %self.topic, error = %e, "Ignoring unnamed feature");
                }
            }
        }

        let mut state = self.state.write();
        state.features.retain(|name, _| {
            let kept = keep.contains(name);
            if !kept {
                tracing::debug!(device = %self.topic, feature = %name, "Removing feature");
            }
            kept
        });
    }

    /// Serializes the device's metadata for announcement.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the device is invalid.
    pub fn meta_json(&self) -> Result<String> {
        self.validate()?;
        let json = serde_json::to_string(&self.meta()).map_err(ParseError::from)?;
        Ok(json)
    }

    /// Publishes the device's metadata on its announce topic.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is invalid, not attached, or the
    /// publish fails.
    pub fn announce(&self) -> Result<()> {
        let manager = self.manager()?;
        let json = self.meta_json()?;
        manager.publish(
            &format!("{ANNOUNCE_PREFIX}{}", self.topic),
            json,
            PublishOptions::retained(),
        )
    }

    // =========================================================================
    // Topics
    // =========================================================================

    /// Returns the topic commands for `feature` are published on.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::FeatureNotFound` if the feature is not registered.
    pub fn set_topic_name(&self, feature: &str) -> std::result::Result<String, DeviceError> {
        let handle = self.feature(feature)?;
        Ok(handle
            .set_topic_override()
            .unwrap_or_else(|| self.default_topic(feature, "set")))
    }

    /// Returns the topic values of `feature` are published on.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::FeatureNotFound` if the feature is not registered.
    pub fn get_topic_name(&self, feature: &str) -> std::result::Result<String, DeviceError> {
        let handle = self.feature(feature)?;
        Ok(handle
            .get_topic_override()
            .unwrap_or_else(|| self.default_topic(feature, "get")))
    }

    fn default_topic(&self, feature: &str, suffix: &str) -> String {
        let name = canonical_name::<FeatureType>(feature).unwrap_or_default();
        format!("{}/{name}/{suffix}", self.topic)
    }

    /// The topic a device in `role` listens on for `feature`.
    fn listen_topic(&self, feature: &str, role: Role) -> std::result::Result<String, DeviceError> {
        match role {
            Role::Client => self.set_topic_name(feature),
            Role::Server => self.get_topic_name(feature),
        }
    }

    // =========================================================================
    // Publishing
    // =========================================================================

    /// Asks the device to change `feature` to `value`.
    ///
    /// Publishes on the feature's set topic without retention.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is not attached, the feature is not
    /// registered, or the publish fails.
    pub fn set(&self, feature: &str, value: impl Into<FeatureValue>) -> Result<()> {
        let manager = self.manager()?;
        let topic = self.set_topic_name(feature)?;
        manager.publish(
            &topic,
            value.into().to_string(),
            PublishOptions::default(),
        )
    }

    /// Reports that `feature` now has `value`.
    ///
    /// Publishes on the feature's get topic with retention, so late
    /// subscribers receive the last known value.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is not attached, the feature is not
    /// registered, or the publish fails.
    pub fn update(&self, feature: &str, value: impl Into<FeatureValue>) -> Result<()> {
        let manager = self.manager()?;
        let topic = self.get_topic_name(feature)?;
        manager.publish(
            &topic,
            value.into().to_string(),
            PublishOptions::retained(),
        )
    }

    // =========================================================================
    // Callbacks
    // =========================================================================

    /// Registers a callback for set commands on `feature`.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::FeatureNotFound` if the feature is not registered.
    pub fn on_set<F>(&self, feature: &str, callback: F) -> std::result::Result<(), DeviceError>
    where
        F: Fn(&Device, &str, &str) + Send + Sync + 'static,
    {
        self.feature(feature)?.on_set(callback);
        Ok(())
    }

    /// Registers a callback for value updates on `feature`.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::FeatureNotFound` if the feature is not registered.
    pub fn on_update<F>(&self, feature: &str, callback: F) -> std::result::Result<(), DeviceError>
    where
        F: Fn(&Device, &str, &str) + Send + Sync + 'static,
    {
        self.feature(feature)?.on_update(callback);
        Ok(())
    }

    // =========================================================================
    // Manager attachment
    // =========================================================================

    /// Attaches the device to `manager`.
    ///
    /// In the client role every feature's set topic is subscribed and feeds
    /// the set callbacks; in the server role every feature's get topic is
    /// subscribed and feeds the update callbacks.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::ManagerAlreadySet` if the device is already
    /// attached.
    pub fn set_manager(
        &self,
        manager: &Arc<Manager>,
        role: Role,
    ) -> std::result::Result<(), DeviceError> {
        self.attachment
            .set(Attachment {
                manager: Arc::downgrade(manager),
                role,
            })
            .map_err(|_| DeviceError::ManagerAlreadySet(self.topic.clone()))?;

        tracing::debug!(device = %self.topic, ?role, "Attached device to manager");
        for feature in self.features() {
            self.subscribe_feature(&feature);
        }
        Ok(())
    }

    fn manager(&self) -> std::result::Result<Arc<Manager>, Error> {
        self.attachment
            .get()
            .and_then(|attachment| attachment.manager.upgrade())
            .ok_or_else(|| DeviceError::NoManager(self.topic.clone()).into())
    }

    /// Subscribes the listen topic of `feature`, once per feature and topic.
    fn subscribe_feature(&self, feature: &str) {
        let Some(attachment) = self.attachment.get() else {
            return;
        };
        let Some(manager) = attachment.manager.upgrade() else {
            return;
        };
        let role = attachment.role;
        let Ok(topic) = self.listen_topic(feature, role) else {
            return;
        };
        if !self
            .subscribed
            .lock()
            .insert((feature.to_string(), topic.clone()))
        {
            return;
        }

        let device = self.this.clone();
        let feature = feature.to_string();
        let pattern = topic.clone();
        manager.subscribe(&topic, move |_topic, payload| {
            if let Some(device) = device.upgrade() {
                device.deliver(&feature, &pattern, role, payload);
            }
        });
    }

    /// Feeds a received value to the callbacks of `feature`.
    fn deliver(&self, feature: &str, pattern: &str, role: Role, payload: &[u8]) {
        let Ok(handle) = self.feature(feature) else {
            tracing::trace!(device = %self.topic, feature = %feature, "Feature no longer present");
            return;
        };
        // The feature may have moved to another topic since subscribing.
        if self.listen_topic(feature, role).ok().as_deref() != Some(pattern) {
            return;
        }

        let callbacks = match role {
            Role::Client => handle.set_callbacks(),
            Role::Server => handle.update_callbacks(),
        };
        let value = String::from_utf8_lossy(payload);
        let name = canonical_name::<FeatureType>(feature).unwrap_or_default();
        for callback in &callbacks {
            invoke_guarded(pattern, || callback(self, name.as_str(), &*value));
        }
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("Device")
            .field("topic", &self.topic)
            .field("name", &state.name)
            .field("type", &state.device_type)
            .field("reachable", &state.reachable)
            .field("features", &state.features.keys().collect::<Vec<_>>())
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn light_meta() -> DeviceMeta {
        DeviceMeta::new("Kitchen Light", "Lightbulb")
            .with_manufacturer("Acme")
            .with_model("L1")
            .with_serial_number("SN1")
            .with_last_will_id("lw-1")
            .with_feature("On", FeatureMeta::new())
            .with_feature(
                "brightness",
                FeatureMeta::new().with_range(0.0, 100.0).with_step(1.0),
            )
    }

    #[test]
    fn new_canonicalizes_type_and_features() {
        let device = Device::new("kitchen/light", light_meta());
        assert_eq!(device.topic(), "kitchen/light");
        assert_eq!(device.name(), "Kitchen Light");
        assert_eq!(device.type_name(), "lightbulb");
        assert_eq!(
            device.device_type(),
            Some(TypeName::Known(DeviceType::Lightbulb))
        );
        assert_eq!(device.features(), vec!["brightness", "on"]);
        assert!(!device.reachable());
    }

    #[test]
    fn unknown_device_type_passes_through() {
        let device = Device::new(
            "x",
            DeviceMeta::new("X", "Toaster").with_feature("on", FeatureMeta::new()),
        );
        assert_eq!(device.type_name(), "Toaster");
        assert!(device.validate().is_ok());
    }

    #[test]
    fn validate_accepts_complete_device() {
        assert!(Device::new("kitchen/light", light_meta()).validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_metadata() {
        let device = Device::without_meta("kitchen/light");
        assert_eq!(device.validate(), Err(ValidationError::MissingMetadata));
    }

    #[test]
    fn validate_rejects_empty_topic() {
        let device = Device::new("", light_meta());
        assert_eq!(device.validate(), Err(ValidationError::EmptyTopic));
    }

    #[test]
    fn validate_rejects_empty_name() {
        let meta = DeviceMeta {
            name: String::new(),
            ..light_meta()
        };
        assert_eq!(
            Device::new("a", meta).validate(),
            Err(ValidationError::EmptyName)
        );
    }

    #[test]
    fn validate_rejects_missing_type() {
        let meta = DeviceMeta {
            device_type: String::new(),
            ..light_meta()
        };
        assert_eq!(
            Device::new("a", meta).validate(),
            Err(ValidationError::InvalidType)
        );
    }

    #[test]
    fn validate_rejects_device_without_features() {
        let device = Device::new("a", DeviceMeta::new("A", "switch"));
        assert_eq!(device.validate(), Err(ValidationError::NoFeatures));
    }

    #[test]
    fn validate_rejects_non_canonical_feature_key() {
        let device = Device::new("a", light_meta());
        device
            .state
            .write()
            .features
            .insert("Brightness".to_string(), Arc::new(Feature::new(FeatureMeta::new())));

        assert_eq!(
            device.validate(),
            Err(ValidationError::NonCanonicalFeature {
                key: "Brightness".to_string(),
                canonical: "brightness".to_string(),
            })
        );
    }

    #[test]
    fn add_feature_replaces_opts_and_keeps_callbacks() {
        let device = Device::new("a", light_meta());
        device.on_set("brightness", |_, _, _| {}).unwrap();

        device
            .add_feature("Brightness", FeatureMeta::new().with_range(0.0, 255.0))
            .unwrap();

        let feature = device.feature("brightness").unwrap();
        assert_eq!(feature.opts().max, Some(255.0));
        assert_eq!(feature.opts().step, None);
        assert_eq!(feature.set_callback_count(), 1);
        assert_eq!(device.features().len(), 2);
    }

    #[test]
    fn add_feature_rejects_empty_name() {
        let device = Device::new("a", light_meta());
        assert_eq!(
            device.add_feature("", FeatureMeta::new()),
            Err(DeviceError::InvalidTypeName)
        );
    }

    #[test]
    fn update_device_reconciles_features() {
        let device = Device::new("a", light_meta());
        let on = device.feature("on").unwrap();

        let next = DeviceMeta::new("Renamed", "outlet")
            .with_feature("ON", FeatureMeta::new())
            .with_feature("outletInUse", FeatureMeta::new());
        device.update_device(&next);

        assert_eq!(device.name(), "Renamed");
        assert_eq!(device.type_name(), "outlet");
        assert_eq!(device.features(), vec!["on", "outletInUse"]);
        // The persisting feature is the same object.
        assert!(Arc::ptr_eq(&on, &device.feature("on").unwrap()));
    }

    #[test]
    fn update_device_is_idempotent() {
        let device = Device::new("a", light_meta());
        let next = DeviceMeta::new("A", "switch")
            .with_feature("on", FeatureMeta::new().with_set_topic("a/cmd"));

        device.update_device(&next);
        let once = (device.features(), device.meta());
        device.update_device(&next);
        let twice = (device.features(), device.meta());

        assert_eq!(once, twice);
    }

    #[test]
    fn update_device_sets_reachable_only_when_present() {
        let device = Device::new("a", light_meta().with_reachable(true));
        assert!(device.reachable());

        device.update_device(&light_meta());
        assert!(device.reachable());

        device.update_device(&light_meta().with_reachable(false));
        assert!(!device.reachable());
    }

    #[test]
    fn meta_json_round_trips() {
        let device = Device::new("kitchen/light", light_meta());
        let json = device.meta_json().unwrap();

        let parsed: DeviceMeta = serde_json::from_str(&json).unwrap();
        let copy = Device::new("kitchen/light", parsed);

        assert_eq!(copy.meta(), device.meta());
        assert_eq!(copy.last_will_id().as_deref(), Some("lw-1"));
        assert_eq!(
            copy.feature("brightness").unwrap().opts(),
            FeatureMeta::new().with_range(0.0, 100.0).with_step(1.0)
        );
    }

    #[test]
    fn meta_json_uses_canonical_names() {
        let device = Device::new("kitchen/light", light_meta());
        let value: serde_json::Value = serde_json::from_str(&device.meta_json().unwrap()).unwrap();

        assert_eq!(value["type"], "lightbulb");
        assert!(value["feature"]["on"].is_object());
        assert!(value["feature"].get("On").is_none());
        assert!(value.get("reachable").is_none());
    }

    #[test]
    fn meta_json_fails_validation() {
        let device = Device::new("a", DeviceMeta::new("A", "switch"));
        assert!(matches!(
            device.meta_json(),
            Err(Error::Validation(ValidationError::NoFeatures))
        ));
    }

    #[test]
    fn topic_names_default_and_override() {
        let device = Device::new(
            "hall/thermostat",
            DeviceMeta::new("Hall", "thermostat")
                .with_feature("targetTemperature", FeatureMeta::new().with_set_topic("hall/cmd"))
                .with_feature("currentTemperature", FeatureMeta::new().with_get_topic("sensors/hall")),
        );

        assert_eq!(device.set_topic_name("TargetTemperature").unwrap(), "hall/cmd");
        assert_eq!(
            device.get_topic_name("targetTemperature").unwrap(),
            "hall/thermostat/targetTemperature/get"
        );
        assert_eq!(
            device.set_topic_name("currentTemperature").unwrap(),
            "hall/thermostat/currentTemperature/set"
        );
        assert_eq!(device.get_topic_name("11").unwrap(), "sensors/hall");
    }

    #[test]
    fn topic_names_require_registered_feature() {
        let device = Device::new("a", light_meta());
        assert_eq!(
            device.set_topic_name("hue"),
            Err(DeviceError::FeatureNotFound {
                feature: "hue".to_string(),
                device: "a".to_string(),
            })
        );
        assert!(device.get_topic_name("").is_err());
    }

    #[test]
    fn publishing_requires_manager() {
        let device = Device::new("a", light_meta());
        assert!(matches!(
            device.set("on", true),
            Err(Error::Device(DeviceError::NoManager(_)))
        ));
        assert!(matches!(
            device.update("on", false),
            Err(Error::Device(DeviceError::NoManager(_)))
        ));
        assert!(device.announce().is_err());
    }

    #[test]
    fn callbacks_require_registered_feature() {
        let device = Device::new("a", light_meta());
        assert!(device.on_set("on", |_, _, _| {}).is_ok());
        assert!(device.on_update("hue", |_, _, _| {}).is_err());
    }
}
