// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device metadata as announced on the wire.
//!
//! ```json
//! {
//!   "name": "Kitchen Light",
//!   "type": "lightbulb",
//!   "manufacturer": "Acme",
//!   "feature": {
//!     "on": {},
//!     "brightness": { "min": 0, "max": 100, "step": 1 }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Options of a single feature.
///
/// All fields are optional. `set_topic` and `get_topic` override the default
/// `<device>/<feature>/set` and `<device>/<feature>/get` topics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureMeta {
    /// Lowest accepted value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Highest accepted value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Value increment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    /// Command topic override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_topic: Option<String>,
    /// Value topic override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get_topic: Option<String>,
}

impl FeatureMeta {
    /// Creates options with every field unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the accepted value range.
    #[must_use]
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Sets the value increment.
    #[must_use]
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Overrides the command topic.
    #[must_use]
    pub fn with_set_topic(mut self, topic: impl Into<String>) -> Self {
        self.set_topic = Some(topic.into());
        self
    }

    /// Overrides the value topic.
    #[must_use]
    pub fn with_get_topic(mut self, topic: impl Into<String>) -> Self {
        self.get_topic = Some(topic.into());
        self
    }
}

/// Metadata describing a device.
///
/// This is both the payload of an announcement and the input used to create
/// or update a [`Device`](super::Device). `reachable` is only read from
/// input; it is never serialized.
///
/// # Examples
///
/// ```
/// use hemtjanst::device::{DeviceMeta, FeatureMeta};
///
/// let meta = DeviceMeta::new("Kitchen Light", "lightbulb")
///     .with_manufacturer("Acme")
///     .with_feature("on", FeatureMeta::new())
///     .with_feature("brightness", FeatureMeta::new().with_range(0.0, 100.0));
///
/// assert_eq!(meta.feature.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceMeta {
    /// Human readable name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Device type name.
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub device_type: String,
    /// Manufacturer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    /// Model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Serial number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    /// ID published as the client's last will when it disconnects.
    #[serde(
        rename = "lastWillID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_will_id: Option<String>,
    /// Features keyed by type name.
    #[serde(default, deserialize_with = "feature_map")]
    pub feature: BTreeMap<String, FeatureMeta>,
    /// Last known liveness, set by the observing side.
    #[serde(default, skip_serializing)]
    pub reachable: Option<bool>,
}

impl DeviceMeta {
    /// Creates metadata with a name and type and no features.
    #[must_use]
    pub fn new(name: impl Into<String>, device_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            device_type: device_type.into(),
            ..Self::default()
        }
    }

    /// Sets the manufacturer.
    #[must_use]
    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the serial number.
    #[must_use]
    pub fn with_serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }

    /// Sets the last will ID.
    #[must_use]
    pub fn with_last_will_id(mut self, id: impl Into<String>) -> Self {
        self.last_will_id = Some(id.into());
        self
    }

    /// Adds a feature.
    #[must_use]
    pub fn with_feature(mut self, name: impl Into<String>, opts: FeatureMeta) -> Self {
        self.feature.insert(name.into(), opts);
        self
    }

    /// Sets the reachable flag.
    #[must_use]
    pub fn with_reachable(mut self, reachable: bool) -> Self {
        self.reachable = Some(reachable);
        self
    }
}

/// Reads `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads the feature map, accepting `null` for the map and for its entries.
fn feature_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, FeatureMeta>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Option<BTreeMap<String, Option<FeatureMeta>>> =
        Option::deserialize(deserializer)?;
    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .map(|(name, opts)| (name, opts.unwrap_or_default()))
        .collect())
}
