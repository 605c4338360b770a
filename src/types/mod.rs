// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for accessory characteristics.
//!
//! Each type is validated at construction time.
//!
//! - [`TargetTemperature`] - thermostat setpoint (16-24 °C, 0.5 steps)
//! - [`HeatingCoolingState`] - thermostat mode codes
//! - [`SecurityTarget`] / [`SecurityState`] - security system codes

mod heating;
mod security;
mod temperature;

pub use heating::HeatingCoolingState;
pub use security::{SecurityState, SecurityTarget};
pub use temperature::TargetTemperature;
