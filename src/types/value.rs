// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Values published on feature topics.

use std::fmt;

/// A value sent to a feature's command or value topic.
///
/// Values travel as plain strings. Booleans are encoded as `1` and `0`,
/// and whole floating-point numbers drop their fractional part.
///
/// # Examples
///
/// ```
/// use hemtjanst::types::FeatureValue;
///
/// assert_eq!(FeatureValue::from(true).to_string(), "1");
/// assert_eq!(FeatureValue::from(false).to_string(), "0");
/// assert_eq!(FeatureValue::from(42).to_string(), "42");
/// assert_eq!(FeatureValue::from(2.0).to_string(), "2");
/// assert_eq!(FeatureValue::from(0.5).to_string(), "0.5");
/// assert_eq!(FeatureValue::from("heat").to_string(), "heat");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    /// A boolean, sent as `1` or `0`.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A string, sent verbatim.
    Text(String),
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => f.write_str(if *value { "1" } else { "0" }),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) if value.is_finite() && value.fract() == 0.0 => {
                write!(f, "{value:.0}")
            }
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<bool> for FeatureValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FeatureValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FeatureValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for FeatureValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u8> for FeatureValue {
    fn from(value: u8) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<f32> for FeatureValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_encode_as_digits() {
        assert_eq!(FeatureValue::from(true).to_string(), "1");
        assert_eq!(FeatureValue::from(false).to_string(), "0");
    }

    #[test]
    fn numbers_encode_like_plain_decimals() {
        assert_eq!(FeatureValue::from(-7).to_string(), "-7");
        assert_eq!(FeatureValue::from(100_u8).to_string(), "100");
        assert_eq!(FeatureValue::from(21.5_f32).to_string(), "21.5");
        assert_eq!(FeatureValue::from(-3.0).to_string(), "-3");
    }

    #[test]
    fn non_finite_floats_are_not_truncated() {
        assert_eq!(FeatureValue::from(f64::INFINITY).to_string(), "inf");
        assert_eq!(FeatureValue::from(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn text_is_verbatim() {
        assert_eq!(FeatureValue::from(String::from("true")).to_string(), "true");
    }
}
