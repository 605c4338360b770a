// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Last-observed state primitives.
//!
//! [`EdgeTrigger`] backs the edge-triggered characteristics (occupancy,
//! motion, security state). [`Observed`] backs plain values such as
//! temperatures, which publish whenever they change.
//!
//! Each accessory keeps its state behind a [`Shared`] lock. The lock is only
//! taken for short synchronous sections and never held across an `.await`.

mod edge;
mod observed;

use std::sync::Arc;

use parking_lot::Mutex;

pub use edge::EdgeTrigger;
pub use observed::Observed;

/// Per-accessory state shared between its poller and host requests.
pub type Shared<T> = Arc<Mutex<T>>;

/// Wraps a state value for sharing.
#[must_use]
pub fn shared<T>(value: T) -> Shared<T> {
    Arc::new(Mutex::new(value))
}
