// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat setpoint.

use std::fmt;

use crate::error::ValueError;

/// Target temperature in °C, 16-24 in half-degree steps.
///
/// # Examples
///
/// ```
/// use accessory_bridge::types::TargetTemperature;
///
/// let t = TargetTemperature::new(21.5).unwrap();
/// assert_eq!(t.celsius(), 21.5);
///
/// assert!(TargetTemperature::new(25.0).is_err());
/// assert!(TargetTemperature::new(20.3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TargetTemperature(f64);

impl TargetTemperature {
    /// Lowest setpoint.
    pub const MIN: Self = Self(16.0);
    /// Highest setpoint.
    pub const MAX: Self = Self(24.0);
    /// Step size.
    pub const STEP: f64 = 0.5;

    /// Creates a setpoint.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` outside 16-24 °C and
    /// `ValueError::InvalidStep` when not on a half degree.
    pub fn new(celsius: f64) -> Result<Self, ValueError> {
        if !(Self::MIN.0..=Self::MAX.0).contains(&celsius) {
            return Err(ValueError::OutOfRange {
                min: Self::MIN.0,
                max: Self::MAX.0,
                actual: celsius,
            });
        }
        let steps = celsius / Self::STEP;
        if (steps - steps.round()).abs() > 1e-9 {
            return Err(ValueError::InvalidStep {
                step: Self::STEP,
                actual: celsius,
            });
        }
        Ok(Self(celsius))
    }

    /// Returns the setpoint in °C.
    #[must_use]
    pub const fn celsius(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for TargetTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°C", self.0)
    }
}

impl TryFrom<f64> for TargetTemperature {
    type Error = ValueError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
