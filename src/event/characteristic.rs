// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Characteristics and their values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::derived::SolarEvent;
use crate::error::ValueError;

/// Optional thermostat sub-device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubDevice {
    /// Heating valve (read only).
    HeatingValve,
    /// Water valve (read/write).
    WaterValve,
    /// Heating element outlet (read only).
    HeatingElement,
}

impl SubDevice {
    /// Configuration identifier, also the endpoint path segment.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::HeatingValve => "heating-valve",
            Self::WaterValve => "water-valve",
            Self::HeatingElement => "heating-element",
        }
    }

    /// Endpoint under the thermostat base URL.
    #[must_use]
    pub const fn endpoint(&self) -> &'static str {
        match self {
            Self::HeatingValve => "heating-valve/active",
            Self::WaterValve => "water-valve/active",
            Self::HeatingElement => "heating-element/on",
        }
    }

    /// Whether the host may write this sub-device.
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        matches!(self, Self::WaterValve)
    }
}

/// A named observable value on an accessory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Characteristic {
    /// Temperature in °C.
    CurrentTemperature,
    /// Relative humidity in percent.
    CurrentRelativeHumidity,
    /// Current heating/cooling mode code.
    CurrentHeatingCoolingState,
    /// Requested heating/cooling mode code.
    TargetHeatingCoolingState,
    /// Setpoint in °C.
    TargetTemperature,
    /// Display units code (0 = Celsius).
    TemperatureDisplayUnits,
    /// Valve active / outlet on.
    SubDevice(SubDevice),
    /// Switch state.
    On,
    /// Presence.
    OccupancyDetected,
    /// Security state code.
    SecuritySystemCurrentState,
    /// Requested security state code.
    SecuritySystemTargetState,
    /// Solar event currently happening.
    MotionDetected(SolarEvent),
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CurrentTemperature => f.write_str("CurrentTemperature"),
            Self::CurrentRelativeHumidity => f.write_str("CurrentRelativeHumidity"),
            Self::CurrentHeatingCoolingState => f.write_str("CurrentHeatingCoolingState"),
            Self::TargetHeatingCoolingState => f.write_str("TargetHeatingCoolingState"),
            Self::TargetTemperature => f.write_str("TargetTemperature"),
            Self::TemperatureDisplayUnits => f.write_str("TemperatureDisplayUnits"),
            Self::SubDevice(sub) => write!(f, "Active({})", sub.id()),
            Self::On => f.write_str("On"),
            Self::OccupancyDetected => f.write_str("OccupancyDetected"),
            Self::SecuritySystemCurrentState => f.write_str("SecuritySystemCurrentState"),
            Self::SecuritySystemTargetState => f.write_str("SecuritySystemTargetState"),
            Self::MotionDetected(event) => write!(f, "MotionDetected({event})"),
        }
    }
}

/// A characteristic value as exchanged with the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    /// Boolean value.
    Bool(bool),
    /// Enumerated state code.
    State(u8),
    /// Numeric value.
    Number(f64),
}

impl CharacteristicValue {
    /// Returns the value as a boolean.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::WrongType` for non-boolean values.
    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match self {
            Self::Bool(value) => Ok(*value),
            Self::State(code) if *code <= 1 => Ok(*code == 1),
            _ => Err(ValueError::WrongType { expected: "boolean" }),
        }
    }

    /// Returns the value as a number.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::WrongType` for boolean values.
    pub fn as_number(&self) -> Result<f64, ValueError> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::State(code) => Ok(f64::from(*code)),
            Self::Bool(_) => Err(ValueError::WrongType { expected: "number" }),
        }
    }

    /// Returns the value as a state code.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::WrongType` unless the value is a whole,
    /// non-negative number.
    pub fn as_state(&self) -> Result<i64, ValueError> {
        match self {
            Self::State(code) => Ok(i64::from(*code)),
            #[allow(clippy::cast_possible_truncation)]
            Self::Number(value) if value.fract() == 0.0 && (0.0..=255.0).contains(value) => {
                Ok(*value as i64)
            }
            _ => Err(ValueError::WrongType { expected: "state code" }),
        }
    }
}

impl From<bool> for CharacteristicValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for CharacteristicValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u8> for CharacteristicValue {
    fn from(value: u8) -> Self {
        Self::State(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names() {
        assert_eq!(Characteristic::On.to_string(), "On");
        assert_eq!(
            Characteristic::MotionDetected(SolarEvent::SolarNoon).to_string(),
            "MotionDetected(Noon)"
        );
        assert_eq!(
            Characteristic::SubDevice(SubDevice::WaterValve).to_string(),
            "Active(water-valve)"
        );
    }

    #[test]
    fn value_conversions() {
        assert!(CharacteristicValue::Bool(true).as_bool().unwrap());
        assert!(CharacteristicValue::State(1).as_bool().unwrap());
        assert!(CharacteristicValue::Number(1.0).as_bool().is_err());
        assert_eq!(CharacteristicValue::Number(3.0).as_state().unwrap(), 3);
        assert!(CharacteristicValue::Number(2.5).as_state().is_err());
        assert!(CharacteristicValue::Bool(false).as_number().is_err());
    }

    #[test]
    fn untagged_json() {
        let v: CharacteristicValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, CharacteristicValue::Bool(true));
        let v: CharacteristicValue = serde_json::from_str("3").unwrap();
        assert_eq!(v, CharacteristicValue::State(3));
        let v: CharacteristicValue = serde_json::from_str("21.5").unwrap();
        assert_eq!(v, CharacteristicValue::Number(21.5));
    }

    #[test]
    fn sub_device_endpoints() {
        assert_eq!(SubDevice::HeatingElement.endpoint(), "heating-element/on");
        assert!(SubDevice::WaterValve.is_writable());
        assert!(!SubDevice::HeatingValve.is_writable());
    }
}
