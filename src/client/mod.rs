// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device clients.
//!
//! One thin client per device kind. Each produces normalized readings or an
//! error; the retention policy on failure belongs to the accessory layer.

mod presence;
mod sensor;
mod siren;
mod solar;
mod switch;
mod thermostat;

pub use presence::{PresenceClient, PresenceReading, TvDevice};
pub use sensor::{SensorClient, SensorReading};
pub use siren::SirenClient;
pub use solar::SolarClient;
pub use switch::SwitchClient;
pub use thermostat::ThermostatClient;
