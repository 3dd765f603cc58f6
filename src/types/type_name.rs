// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canonical type names.
//!
//! Device and feature types are drawn from closed enumerations, but the wire
//! format carries plain strings. A name is resolved by comparing it
//! case-insensitively against each entry's canonical name, or exactly against
//! the entry's short identifier code. Names that match nothing pass through
//! unchanged as [`TypeName::Literal`].

use std::fmt;

use crate::error::DeviceError;

/// A closed enumeration of type names.
pub trait TypeTable: Copy + Eq + fmt::Debug + 'static {
    /// Every entry of the table, in declaration order.
    const ALL: &'static [Self];

    /// The canonical name: the entry name with a lower-cased first letter.
    fn canonical(self) -> &'static str;

    /// The short identifier code of the entry.
    fn code(self) -> &'static str;

    /// Looks up the entry matching `name`.
    fn lookup(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|entry| name.eq_ignore_ascii_case(entry.canonical()) || name == entry.code())
    }
}

/// A resolved type name: a table entry, or a literal that matched none.
///
/// # Examples
///
/// ```
/// use hemtjanst::types::{FeatureType, TypeName};
///
/// let known = TypeName::<FeatureType>::resolve("On").unwrap();
/// assert_eq!(known, TypeName::Known(FeatureType::On));
/// assert_eq!(known.as_str(), "on");
///
/// let literal = TypeName::<FeatureType>::resolve("fanSpeedPreset").unwrap();
/// assert_eq!(literal.as_str(), "fanSpeedPreset");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeName<T> {
    /// The name resolved to a table entry.
    Known(T),
    /// The name matched no entry and is kept verbatim.
    Literal(String),
}

impl<T: TypeTable> TypeName<T> {
    /// Resolves `name` against the table.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidTypeName` if `name` is empty.
    pub fn resolve(name: &str) -> Result<Self, DeviceError> {
        if name.is_empty() {
            return Err(DeviceError::InvalidTypeName);
        }
        Ok(T::lookup(name).map_or_else(|| Self::Literal(name.to_string()), Self::Known))
    }

    /// Returns the canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(entry) => entry.canonical(),
            Self::Literal(name) => name,
        }
    }

    /// Returns the table entry, if the name resolved to one.
    #[must_use]
    pub fn known(&self) -> Option<T> {
        match self {
            Self::Known(entry) => Some(*entry),
            Self::Literal(_) => None,
        }
    }
}

impl<T: TypeTable> From<T> for TypeName<T> {
    fn from(entry: T) -> Self {
        Self::Known(entry)
    }
}

impl<T: TypeTable> fmt::Display for TypeName<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the canonical form of `name` within table `T`.
///
/// # Errors
///
/// Returns `DeviceError::InvalidTypeName` if `name` is empty.
///
/// # Examples
///
/// ```
/// use hemtjanst::types::{DeviceType, canonical_name};
///
/// assert_eq!(canonical_name::<DeviceType>("LIGHTBULB").unwrap(), "lightbulb");
/// assert_eq!(canonical_name::<DeviceType>("43").unwrap(), "lightbulb");
/// assert_eq!(canonical_name::<DeviceType>("Toaster").unwrap(), "Toaster");
/// ```
pub fn canonical_name<T: TypeTable>(name: &str) -> Result<String, DeviceError> {
    TypeName::<T>::resolve(name).map(|resolved| resolved.as_str().to_string())
}

/// Declares a [`TypeTable`] enum from `Variant => ("canonical", "code")` rows.
macro_rules! type_table {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $variant:ident => ($canonical:literal, $code:literal), )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[allow(missing_docs)]
        $vis enum $name {
            $( $variant, )+
        }

        impl $crate::types::TypeTable for $name {
            const ALL: &'static [Self] = &[ $( Self::$variant, )+ ];

            fn canonical(self) -> &'static str {
                match self {
                    $( Self::$variant => $canonical, )+
                }
            }

            fn code(self) -> &'static str {
                match self {
                    $( Self::$variant => $code, )+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::types::TypeTable::canonical(*self))
            }
        }
    };
}

pub(crate) use type_table;
