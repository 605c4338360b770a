// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Heating/cooling mode codes.

use std::fmt;

use crate::error::ValueError;

/// Heating/cooling mode of a thermostat.
///
/// `Auto` is only valid as a target; the current state is one of the
/// first three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeatingCoolingState {
    /// Off.
    Off,
    /// Heating.
    Heat,
    /// Cooling.
    Cool,
    /// Automatic (target only).
    Auto,
}

impl HeatingCoolingState {
    /// Numeric code as used on the wire and by the host.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Heat => 1,
            Self::Cool => 2,
            Self::Auto => 3,
        }
    }

    /// Parses a current-state code (0-2).
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidState` for any other code.
    pub fn current_from_code(code: i64) -> Result<Self, ValueError> {
        match Self::target_from_code(code)? {
            Self::Auto => Err(ValueError::InvalidState {
                kind: "current heating/cooling state",
                code,
            }),
            state => Ok(state),
        }
    }

    /// Parses a target-state code (0-3).
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidState` for any other code.
    pub fn target_from_code(code: i64) -> Result<Self, ValueError> {
        match code {
            0 => Ok(Self::Off),
            1 => Ok(Self::Heat),
            2 => Ok(Self::Cool),
            3 => Ok(Self::Auto),
            _ => Err(ValueError::InvalidState {
                kind: "target heating/cooling state",
                code,
            }),
        }
    }
}

impl fmt::Display for HeatingCoolingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Off => "off",
            Self::Heat => "heat",
            Self::Cool => "cool",
            Self::Auto => "auto",
        };
        f.write_str(name)
    }
}
