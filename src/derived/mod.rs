// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Derived-state calculators.
//!
//! Pure functions that turn raw readings into secondary values:
//!
//! - [`heat_index`] - apparent temperature from temperature and humidity
//! - [`Ephemeris`] - solar event windows for one calendar day
//! - [`DayRule`] - day-of-week rules for stateful switches

mod heat_index;
mod schedule;
mod solar;

pub use heat_index::{celsius_to_fahrenheit, fahrenheit_to_celsius, heat_index};
pub use schedule::{DayRule, day_index};
pub use solar::{Ephemeris, EphemerisPayload, SolarEvent};
