// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Type tables and wire values.
//!
//! # Types
//!
//! - [`DeviceType`] - the closed table of device kinds
//! - [`FeatureType`] - the closed table of device capabilities
//! - [`TypeName`] - a name resolved against a table, or kept as a literal
//! - [`FeatureValue`] - a value published on a feature topic

mod device_type;
mod feature_type;
mod type_name;
mod value;

pub use device_type::DeviceType;
pub use feature_type::FeatureType;
pub use type_name::{TypeName, TypeTable, canonical_name};
pub use value::FeatureValue;
