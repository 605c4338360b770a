// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Edge-triggered publication.

/// Decides whether a freshly computed value is an observable edge.
///
/// - an absent reading changes nothing
/// - the first reading after an undefined previous value is adopted silently
/// - afterwards only a reading different from the previous one publishes
///
/// # Examples
///
/// ```
/// use accessory_bridge::state::EdgeTrigger;
///
/// let mut occupancy = EdgeTrigger::with_initial(false);
/// let readings = [None, Some(true), Some(true), Some(false), Some(false), Some(true)];
///
/// let published: Vec<_> = readings
///     .into_iter()
///     .filter_map(|reading| occupancy.observe(reading))
///     .collect();
///
/// assert_eq!(published, vec![true, false, true]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeTrigger<T> {
    previous: Option<T>,
}

impl<T: Copy + PartialEq> EdgeTrigger<T> {
    /// Creates a trigger whose previous value is undefined.
    #[must_use]
    pub const fn new() -> Self {
        Self { previous: None }
    }

    /// Creates a trigger with a known previous value.
    #[must_use]
    pub const fn with_initial(value: T) -> Self {
        Self {
            previous: Some(value),
        }
    }

    /// Feeds a reading. Returns the value to publish, if it is an edge.
    pub fn observe(&mut self, reading: Option<T>) -> Option<T> {
        let candidate = reading?;
        match self.previous.replace(candidate) {
            None => None,
            Some(previous) if previous == candidate => None,
            Some(_) => Some(candidate),
        }
    }

    /// Overwrites the stored value without an edge decision.
    pub fn force(&mut self, value: T) {
        self.previous = Some(value);
    }

    /// The last adopted value.
    #[must_use]
    pub const fn current(&self) -> Option<T> {
        self.previous
    }
}
