// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cached value with change detection.

/// Last observed value of a plain characteristic.
///
/// Unlike [`EdgeTrigger`](super::EdgeTrigger), the first value counts as a
/// change: a temperature becoming known is worth publishing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Observed<T> {
    value: Option<T>,
}

impl<T: Copy + PartialEq> Observed<T> {
    /// Creates an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self { value: None }
    }

    /// Creates a cache holding `value`.
    #[must_use]
    pub const fn with_value(value: T) -> Self {
        Self { value: Some(value) }
    }

    /// Stores `value`; returns `true` if it differs from the cached one.
    pub fn apply(&mut self, value: T) -> bool {
        if self.value == Some(value) {
            false
        } else {
            self.value = Some(value);
            true
        }
    }

    /// The cached value.
    #[must_use]
    pub const fn get(&self) -> Option<T> {
        self.value
    }

    /// The cached value or `default`.
    #[must_use]
    pub fn get_or(&self, default: T) -> T {
        self.value.unwrap_or(default)
    }
}
