// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Topic pattern matching.
//!
//! Subscription patterns use the usual two wildcard forms:
//!
//! - a trailing `#` matches any topic that shares the prefix before it
//! - a `+` segment matches exactly one segment
//!
//! When a pattern carries both forms, each is evaluated on its own and the
//! pattern matches if either does.

/// Separator between topic segments.
pub const SEPARATOR: char = '/';

/// Multi-level wildcard marker.
pub const MULTI_LEVEL: char = '#';

/// Single-level wildcard segment.
pub const SINGLE_LEVEL: &str = "+";

/// Returns `true` if `topic` matches the subscription `pattern`.
///
/// # Examples
///
/// ```
/// use hemtjanst::protocol::topic::matches;
///
/// assert!(matches("a/b/c", "a/b/c"));
/// assert!(matches("a/#", "a/b/c"));
/// assert!(!matches("a/#", "x/b/c"));
/// assert!(matches("a/+/c", "a/b/c"));
/// assert!(!matches("a/+/c", "a/b/c/d"));
/// ```
#[must_use]
pub fn matches(pattern: &str, topic: &str) -> bool {
    pattern == topic || matches_multi_level(pattern, topic) || matches_single_level(pattern, topic)
}

fn matches_multi_level(pattern: &str, topic: &str) -> bool {
    pattern
        .strip_suffix(MULTI_LEVEL)
        .is_some_and(|prefix| topic.starts_with(prefix))
}

fn matches_single_level(pattern: &str, topic: &str) -> bool {
    if !pattern.contains('+') {
        return false;
    }

    let mut pattern_segments = pattern.split(SEPARATOR);
    let mut topic_segments = topic.split(SEPARATOR);
    loop {
        match (pattern_segments.next(), topic_segments.next()) {
            (None, None) => return true,
            (Some(p), Some(t)) if p == SINGLE_LEVEL || p == t => {}
            _ => return false,
        }
    }
}
