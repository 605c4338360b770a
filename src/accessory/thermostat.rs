// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat accessory.
//!
//! Reads go to the device on every request and surface failures as errors.
//! Valves and outlets are optional and resolved from the configuration.

use crate::client::ThermostatClient;
use crate::config::{SubDeviceConfig, ThermostatConfig};
use crate::error::{Error, Result};
use crate::event::{Characteristic, CharacteristicValue, SubDevice};
use crate::types::{HeatingCoolingState, TargetTemperature};

use super::{AccessoryContext, AccessoryInfo};

/// Display units code for Celsius.
const CELSIUS: u8 = 0;

/// Thermostat with optional valves and outlets.
#[derive(Debug, Clone)]
pub struct ThermostatAccessory {
    ctx: AccessoryContext,
    client: ThermostatClient,
    info: AccessoryInfo,
    sub_devices: Vec<(SubDevice, String)>,
}

impl ThermostatAccessory {
    /// Creates the accessory. Missing valve/outlet definitions are logged
    /// and skipped.
    #[must_use]
    pub fn new(ctx: AccessoryContext, client: ThermostatClient, config: &ThermostatConfig) -> Self {
        let mut sub_devices = Vec::new();
        if let Some(valves) = &config.valves {
            for sub in [SubDevice::HeatingValve, SubDevice::WaterValve] {
                resolve_sub_device(&ctx, valves, sub, &mut sub_devices);
            }
        }
        if let Some(outlets) = &config.outlets {
            resolve_sub_device(&ctx, outlets, SubDevice::HeatingElement, &mut sub_devices);
        }

        let info = match &config.uuid {
            Some(uuid) => AccessoryInfo::new("Simplintho", "Simplintho Neo HVAC", uuid.clone()),
            None => AccessoryInfo::new("Jamie Vangeysel", "Thermostat", "Unknown"),
        }
        .with_firmware("1.0");

        Self {
            ctx,
            client,
            info,
            sub_devices,
        }
    }

    /// Accessory information.
    #[must_use]
    pub fn info(&self) -> &AccessoryInfo {
        &self.info
    }

    /// Enabled sub-devices with their display names.
    #[must_use]
    pub fn sub_devices(&self) -> &[(SubDevice, String)] {
        &self.sub_devices
    }

    fn has_sub_device(&self, sub: SubDevice) -> bool {
        self.sub_devices.iter().any(|(s, _)| *s == sub)
    }

    /// Fetches a value from the thermostat.
    ///
    /// # Errors
    ///
    /// Returns the request error, or `Error::UnsupportedCharacteristic`.
    pub async fn get(&self, characteristic: Characteristic) -> Result<CharacteristicValue> {
        tracing::debug!(accessory = %self.ctx.id(), characteristic = %characteristic, "GET");
        let value = match characteristic {
            Characteristic::CurrentHeatingCoolingState => {
                CharacteristicValue::State(self.client.current_state().await?.code())
            }
            Characteristic::TargetHeatingCoolingState => {
                CharacteristicValue::State(self.client.target_state().await?.code())
            }
            Characteristic::CurrentTemperature => {
                CharacteristicValue::Number(self.client.current_temperature().await?)
            }
            Characteristic::TargetTemperature => {
                CharacteristicValue::Number(self.client.target_temperature().await?)
            }
            Characteristic::CurrentRelativeHumidity => {
                CharacteristicValue::Number(self.client.current_humidity().await?)
            }
            Characteristic::TemperatureDisplayUnits => CharacteristicValue::State(CELSIUS),
            Characteristic::SubDevice(sub) if self.has_sub_device(sub) => {
                CharacteristicValue::Bool(self.client.sub_device(sub).await?)
            }
            other => return Err(Error::UnsupportedCharacteristic(other)),
        };
        Ok(value)
    }

    /// Writes a value to the thermostat.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for invalid values, the request error, or
    /// `Error::UnsupportedCharacteristic`.
    pub async fn set(&self, characteristic: Characteristic, value: CharacteristicValue) -> Result<()> {
        tracing::debug!(
            accessory = %self.ctx.id(),
            characteristic = %characteristic,
            value = ?value,
            "SET"
        );
        match characteristic {
            Characteristic::TargetHeatingCoolingState => {
                let state = HeatingCoolingState::target_from_code(value.as_state()?)?;
                self.client.set_target_state(state).await
            }
            Characteristic::TargetTemperature => {
                let temperature = TargetTemperature::new(value.as_number()?)?;
                self.client.set_target_temperature(temperature).await
            }
            Characteristic::TemperatureDisplayUnits => {
                tracing::info!(
                    accessory = %self.ctx.id(),
                    value = ?value,
                    "Display units are fixed to Celsius"
                );
                Ok(())
            }
            Characteristic::SubDevice(sub) if self.has_sub_device(sub) => {
                self.client.set_sub_device(sub, value.as_bool()?).await
            }
            other => Err(Error::UnsupportedCharacteristic(other)),
        }
    }
}

fn resolve_sub_device(
    ctx: &AccessoryContext,
    entries: &[SubDeviceConfig],
    sub: SubDevice,
    out: &mut Vec<(SubDevice, String)>,
) {
    match entries.iter().find(|entry| entry.id == sub.id()) {
        Some(entry) => out.push((sub, entry.name.clone())),
        None => tracing::warn!(
            accessory = %ctx.id(),
            sub_device = sub.id(),
            "Sub-device not configured, skipping"
        ),
    }
}
