// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Temperature/humidity sensor accessory.

use crate::client::{SensorClient, SensorReading};
use crate::config::SensorConfig;
use crate::derived::heat_index;
use crate::error::{Error, Result};
use crate::event::{Characteristic, CharacteristicValue};
use crate::state::{Observed, Shared, shared};

use super::{AccessoryContext, AccessoryInfo};

/// Last observed sensor values.
#[derive(Debug, Clone, Default)]
pub struct SensorState {
    /// Raw temperature in °C.
    pub temperature: Option<f64>,
    /// Heat index in °C, when computable.
    pub heat_index: Option<f64>,
    /// Temperature exposed to the host (heat index when defined).
    pub exposed_temperature: Observed<f64>,
    /// Relative humidity in percent.
    pub humidity: Observed<f64>,
}

impl SensorState {
    /// Folds a reading in; returns the values that changed.
    fn apply(&mut self, reading: SensorReading) -> Vec<(Characteristic, f64)> {
        self.temperature = Some(reading.temperature);
        self.heat_index = heat_index(Some(reading.temperature), Some(reading.humidity));
        let exposed = self.heat_index.unwrap_or(reading.temperature);

        let mut changed = Vec::new();
        if self.exposed_temperature.apply(exposed) {
            changed.push((Characteristic::CurrentTemperature, exposed));
        }
        if self.humidity.apply(reading.humidity) {
            changed.push((Characteristic::CurrentRelativeHumidity, reading.humidity));
        }
        changed
    }
}

/// Polls the cloud API and republishes changed readings.
///
/// A failed poll keeps the previous values and publishes nothing.
#[derive(Debug, Clone)]
pub struct SensorAccessory {
    ctx: AccessoryContext,
    client: SensorClient,
    info: AccessoryInfo,
    state: Shared<SensorState>,
}

impl SensorAccessory {
    /// Creates the accessory.
    #[must_use]
    pub fn new(ctx: AccessoryContext, client: SensorClient, config: &SensorConfig) -> Self {
        let serial: String = config.uuid.chars().take(12).collect();
        Self {
            ctx,
            client,
            info: AccessoryInfo::new("Simplintho", "Simplintho Neo THP10", serial)
                .with_firmware("0.0.0"),
            state: shared(SensorState::default()),
        }
    }

    /// Accessory information.
    #[must_use]
    pub fn info(&self) -> &AccessoryInfo {
        &self.info
    }

    /// Snapshot of the last observed values.
    #[must_use]
    pub fn snapshot(&self) -> SensorState {
        self.state.lock().clone()
    }

    /// One poll tick.
    pub async fn refresh(&self) {
        let reading = match self.client.fetch().await {
            Ok(reading) => reading,
            Err(e) => {
                tracing::error!(
                    accessory = %self.ctx.id(),
                    url = %self.client.url(),
                    error = %e,
                    "Could not get sensor data"
                );
                return;
            }
        };

        let changed = self.state.lock().apply(reading);
        for (characteristic, value) in changed {
            self.ctx.publish(characteristic, value);
        }
    }

    /// Returns the cached value; 0 until the first reading.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedCharacteristic` for foreign characteristics.
    pub fn get(&self, characteristic: Characteristic) -> Result<CharacteristicValue> {
        let state = self.state.lock();
        let value = match characteristic {
            Characteristic::CurrentTemperature => state.exposed_temperature.get_or(0.0),
            Characteristic::CurrentRelativeHumidity => state.humidity.get_or(0.0),
            other => return Err(Error::UnsupportedCharacteristic(other)),
        };
        Ok(CharacteristicValue::Number(value))
    }
}
