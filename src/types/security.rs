// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Security system state codes.

use std::fmt;

use crate::error::ValueError;

/// Requested arming mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityTarget {
    /// Armed while occupants are home.
    StayArm,
    /// Armed while away.
    AwayArm,
    /// Armed for the night.
    NightArm,
    /// Disarmed.
    Disarm,
}

/// Reported security state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityState {
    /// Armed while occupants are home.
    StayArm,
    /// Armed while away.
    AwayArm,
    /// Armed for the night.
    NightArm,
    /// Disarmed.
    Disarmed,
    /// The alarm went off.
    AlarmTriggered,
}

impl SecurityTarget {
    /// Numeric code.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::StayArm => 0,
            Self::AwayArm => 1,
            Self::NightArm => 2,
            Self::Disarm => 3,
        }
    }

    /// Parses a target code (0-3).
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidState` for any other code.
    pub fn from_code(code: i64) -> Result<Self, ValueError> {
        match code {
            0 => Ok(Self::StayArm),
            1 => Ok(Self::AwayArm),
            2 => Ok(Self::NightArm),
            3 => Ok(Self::Disarm),
            _ => Err(ValueError::InvalidState {
                kind: "security target state",
                code,
            }),
        }
    }

    /// The state reached once this target has been applied.
    #[must_use]
    pub const fn resulting_state(&self) -> SecurityState {
        match self {
            Self::StayArm => SecurityState::StayArm,
            Self::AwayArm => SecurityState::AwayArm,
            Self::NightArm => SecurityState::NightArm,
            Self::Disarm => SecurityState::Disarmed,
        }
    }
}

impl SecurityState {
    /// Numeric code.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::StayArm => 0,
            Self::AwayArm => 1,
            Self::NightArm => 2,
            Self::Disarmed => 3,
            Self::AlarmTriggered => 4,
        }
    }
}

impl fmt::Display for SecurityTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::StayArm => "stay arm",
            Self::AwayArm => "away arm",
            Self::NightArm => "night arm",
            Self::Disarm => "disarm",
        };
        f.write_str(name)
    }
}

impl fmt::Display for SecurityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::StayArm => "armed (stay)",
            Self::AwayArm => "armed (away)",
            Self::NightArm => "armed (night)",
            Self::Disarmed => "disarmed",
            Self::AlarmTriggered => "alarm triggered",
        };
        f.write_str(name)
    }
}
