// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Kind-specific accessory handlers.
//!
//! Each configured device gets one handler. [`AccessoryHandler`] is a closed
//! sum over the supported kinds; host reads, writes and poll ticks are routed
//! to the matching variant by exhaustive `match`.
//!
//! Handlers are cheap to clone: clones share the same last-observed state.

mod info;
mod presence;
mod security;
mod sensor;
mod solar;
mod switch;
mod thermostat;

use std::sync::Arc;
use std::time::Duration;

use crate::client::{
    PresenceClient, SensorClient, SirenClient, SolarClient, SwitchClient, ThermostatClient,
};
use crate::config::{DeviceEntry, DeviceKind, SwitchBehavior, TimingConfig};
use crate::derived::SolarEvent;
use crate::error::Result;
use crate::event::{AccessoryEvent, Characteristic, CharacteristicValue, EventBus, SubDevice};
use crate::identity::StableId;
use crate::protocol::{HttpClient, LivenessProbe};

pub use info::AccessoryInfo;
pub use presence::PresenceAccessory;
pub use security::SecurityAccessory;
pub use sensor::{SensorAccessory, SensorState};
pub use solar::SolarAccessory;
pub use switch::{SwitchAccessory, SwitchMode};
pub use thermostat::ThermostatAccessory;

// ============================================================================
// AccessoryContext
// ============================================================================

/// Identity of an accessory plus its publication channel.
#[derive(Debug, Clone)]
pub struct AccessoryContext {
    id: StableId,
    name: String,
    events: EventBus,
}

impl AccessoryContext {
    /// Creates a context.
    #[must_use]
    pub fn new(id: StableId, name: impl Into<String>, events: EventBus) -> Self {
        Self {
            id,
            name: name.into(),
            events,
        }
    }

    /// The accessory's stable identity.
    #[must_use]
    pub fn id(&self) -> StableId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Publishes a characteristic change.
    pub fn publish(&self, characteristic: Characteristic, value: impl Into<CharacteristicValue>) {
        let value = value.into();
        tracing::debug!(
            accessory = %self.id,
            characteristic = %characteristic,
            value = ?value,
            "Updating characteristic"
        );
        self.events
            .publish(AccessoryEvent::changed(self.id, characteristic, value));
    }

    /// Publishes refreshed accessory information.
    pub fn publish_info(&self, info: AccessoryInfo) {
        tracing::debug!(accessory = %self.id, model = %info.model, "Updating accessory information");
        self.events.publish(AccessoryEvent::InformationUpdated {
            accessory: self.id,
            info,
        });
    }
}

// ============================================================================
// Backends
// ============================================================================

/// Shared transports and options handed to every handler.
#[derive(Debug, Clone)]
pub struct Backends {
    /// Shared HTTP client.
    pub http: HttpClient,
    /// Liveness probe for presence detectors.
    pub probe: Arc<dyn LivenessProbe>,
    /// Intervals and timeouts.
    pub timing: TimingConfig,
    /// Base URL of the sensor cloud API.
    pub sensor_api_base: String,
}

// ============================================================================
// AccessoryHandler
// ============================================================================

/// Handler for one accessory, selected by device kind.
#[derive(Debug, Clone)]
pub enum AccessoryHandler {
    /// Presence detector.
    Presence(PresenceAccessory),
    /// Temperature/humidity sensor.
    Sensor(SensorAccessory),
    /// Thermostat.
    Thermostat(ThermostatAccessory),
    /// Switch.
    Switch(SwitchAccessory),
    /// Security system.
    Security(SecurityAccessory),
    /// Solar events.
    Solar(SolarAccessory),
}

impl AccessoryHandler {
    /// Builds the handler for a resolved entry.
    #[must_use]
    pub fn new(entry: &DeviceEntry, ctx: AccessoryContext, backends: &Backends) -> Self {
        let http = backends.http.clone();
        match entry {
            DeviceEntry::Presence { config, .. } => {
                let client = PresenceClient::new(
                    http,
                    Arc::clone(&backends.probe),
                    config.ip.clone(),
                    config.status_url(),
                    backends.timing.probe_timeout(),
                );
                Self::Presence(PresenceAccessory::new(ctx, client, config))
            }
            DeviceEntry::Sensor(config) => {
                let client = SensorClient::new(http, &backends.sensor_api_base, &config.uuid);
                Self::Sensor(SensorAccessory::new(ctx, client, config))
            }
            DeviceEntry::Thermostat { config, base_url } => {
                let client = ThermostatClient::new(http, base_url.clone());
                Self::Thermostat(ThermostatAccessory::new(ctx, client, config))
            }
            DeviceEntry::Switch { config, behavior } => {
                let mode = match behavior {
                    SwitchBehavior::Http {
                        state_url,
                        on_url,
                        off_url,
                    } => SwitchMode::Http(SwitchClient::new(
                        http,
                        state_url.clone(),
                        on_url.clone(),
                        off_url.clone(),
                    )),
                    SwitchBehavior::Stateful(rule) => SwitchMode::Stateful(rule.clone()),
                    SwitchBehavior::Ip => SwitchMode::Ip,
                };
                Self::Switch(SwitchAccessory::new(ctx, mode, config))
            }
            DeviceEntry::Security(config) => {
                let siren = config.siren.as_ref().map(|s| SirenClient::new(http, s));
                Self::Security(SecurityAccessory::new(
                    ctx,
                    config,
                    siren,
                    backends.timing.security_debounce(),
                ))
            }
            DeviceEntry::Solar(config) => {
                let client = SolarClient::new(http, config);
                Self::Solar(SolarAccessory::new(ctx, client, config))
            }
        }
    }

    /// The device kind.
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        match self {
            Self::Presence(_) => DeviceKind::Presence,
            Self::Sensor(_) => DeviceKind::Sensor,
            Self::Thermostat(_) => DeviceKind::Thermostat,
            Self::Switch(_) => DeviceKind::Switch,
            Self::Security(_) => DeviceKind::Security,
            Self::Solar(_) => DeviceKind::Solar,
        }
    }

    /// Current accessory information.
    #[must_use]
    pub fn info(&self) -> AccessoryInfo {
        match self {
            Self::Presence(a) => a.info(),
            Self::Sensor(a) => a.info().clone(),
            Self::Thermostat(a) => a.info().clone(),
            Self::Switch(a) => a.info().clone(),
            Self::Security(a) => a.info().clone(),
            Self::Solar(a) => a.info().clone(),
        }
    }

    /// Characteristics the host may read.
    #[must_use]
    pub fn characteristics(&self) -> Vec<Characteristic> {
        match self {
            Self::Presence(_) => vec![Characteristic::OccupancyDetected],
            Self::Sensor(_) => vec![
                Characteristic::CurrentTemperature,
                Characteristic::CurrentRelativeHumidity,
            ],
            Self::Thermostat(a) => {
                let mut list = vec![
                    Characteristic::CurrentHeatingCoolingState,
                    Characteristic::TargetHeatingCoolingState,
                    Characteristic::CurrentTemperature,
                    Characteristic::TargetTemperature,
                    Characteristic::TemperatureDisplayUnits,
                    Characteristic::CurrentRelativeHumidity,
                ];
                list.extend(a.sub_devices().iter().map(|(sub, _)| Characteristic::SubDevice(*sub)));
                list
            }
            Self::Switch(_) => vec![Characteristic::On],
            Self::Security(_) => vec![
                Characteristic::SecuritySystemCurrentState,
                Characteristic::SecuritySystemTargetState,
            ],
            Self::Solar(_) => std::iter::once(Characteristic::On)
                .chain(SolarEvent::ALL.into_iter().map(Characteristic::MotionDetected))
                .collect(),
        }
    }

    /// Whether the host may write `characteristic`.
    #[must_use]
    pub fn is_writable(&self, characteristic: Characteristic) -> bool {
        match (self, characteristic) {
            (
                Self::Thermostat(_),
                Characteristic::TargetHeatingCoolingState
                | Characteristic::TargetTemperature
                | Characteristic::TemperatureDisplayUnits
                | Characteristic::SubDevice(SubDevice::WaterValve),
            )
            | (Self::Switch(_) | Self::Solar(_), Characteristic::On)
            | (Self::Security(_), Characteristic::SecuritySystemTargetState) => {
                self.characteristics().contains(&characteristic)
            }
            _ => false,
        }
    }

    /// Handles a host read.
    ///
    /// Only the thermostat and HTTP switches go to the network; every other
    /// kind answers from its last observed state.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedCharacteristic` for foreign characteristics
    /// and, for thermostats only, the upstream error.
    pub async fn get(&self, characteristic: Characteristic) -> Result<CharacteristicValue> {
        match self {
            Self::Presence(a) => a.get(characteristic),
            Self::Sensor(a) => a.get(characteristic),
            Self::Thermostat(a) => a.get(characteristic).await,
            Self::Switch(a) => a.get(characteristic).await,
            Self::Security(a) => a.get(characteristic),
            Self::Solar(a) => a.get(characteristic),
        }
    }

    /// Handles a host write.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedCharacteristic` for characteristics the
    /// accessory does not accept writes for, `Error::Value` for invalid
    /// values and, for thermostats only, the upstream error.
    pub async fn set(
        &self,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Result<()> {
        if !self.is_writable(characteristic) {
            return Err(crate::Error::UnsupportedCharacteristic(characteristic));
        }
        match self {
            Self::Thermostat(a) => a.set(characteristic, value).await,
            Self::Switch(a) => a.set(characteristic, value).await,
            Self::Security(a) => a.set(characteristic, value),
            Self::Solar(a) => a.set(characteristic, value),
            Self::Presence(_) | Self::Sensor(_) => {
                Err(crate::Error::UnsupportedCharacteristic(characteristic))
            }
        }
    }

    /// One-time work after creation.
    pub async fn initialize(&self) {
        match self {
            Self::Switch(a) => a.initialize().await,
            Self::Presence(_)
            | Self::Sensor(_)
            | Self::Thermostat(_)
            | Self::Security(_)
            | Self::Solar(_) => {}
        }
    }

    /// One poll tick.
    pub async fn refresh(&self) {
        match self {
            Self::Presence(a) => a.refresh().await,
            Self::Sensor(a) => a.refresh().await,
            Self::Solar(a) => a.refresh().await,
            Self::Thermostat(_) | Self::Switch(_) | Self::Security(_) => {}
        }
    }

    /// Poll interval, for kinds that poll.
    #[must_use]
    pub fn poll_interval(&self, timing: &TimingConfig) -> Option<Duration> {
        match self {
            Self::Presence(_) => Some(timing.presence_interval()),
            Self::Sensor(_) => Some(timing.sensor_interval()),
            Self::Solar(_) => Some(timing.solar_interval()),
            Self::Thermostat(_) | Self::Switch(_) | Self::Security(_) => None,
        }
    }

    /// Cancels any work the handler scheduled on its own.
    pub fn stop(&self) {
        if let Self::Security(a) = self {
            a.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SecurityConfig, SensorConfig, SolarConfig, SwitchConfig};
    use crate::protocol::SystemPing;

    fn backends() -> Backends {
        Backends {
            http: HttpClient::new().unwrap(),
            probe: Arc::new(SystemPing),
            timing: TimingConfig::default(),
            sensor_api_base: "http://127.0.0.1:9".to_string(),
        }
    }

    fn build(entry: &DeviceEntry) -> AccessoryHandler {
        let ctx = AccessoryContext::new(entry.stable_id(), entry.name(), EventBus::new());
        AccessoryHandler::new(entry, ctx, &backends())
    }

    #[test]
    fn handler_kind_matches_entry() {
        let entries = [
            DeviceEntry::Sensor(SensorConfig {
                uuid: "u".to_string(),
                name: "S".to_string(),
                owner: None,
            }),
            DeviceEntry::switch(SwitchConfig::http("Lamp")).unwrap(),
            DeviceEntry::Security(SecurityConfig::new("Alarm", "h", 80)),
            DeviceEntry::Solar(SolarConfig::new("Sun")),
        ];
        for entry in &entries {
            assert_eq!(build(entry).kind(), entry.kind());
        }
    }

    #[test]
    fn only_polling_kinds_have_an_interval() {
        let timing = TimingConfig::default();
        let sensor = build(&DeviceEntry::Sensor(SensorConfig {
            uuid: "u".to_string(),
            name: "S".to_string(),
            owner: None,
        }));
        assert_eq!(sensor.poll_interval(&timing), Some(Duration::from_secs(3)));

        let alarm = build(&DeviceEntry::Security(SecurityConfig::new("Alarm", "h", 80)));
        assert_eq!(alarm.poll_interval(&timing), None);
    }

    #[test]
    fn solar_exposes_toggle_and_six_sensors() {
        let solar = build(&DeviceEntry::Solar(SolarConfig::new("Sun")));
        let list = solar.characteristics();
        assert_eq!(list.len(), 7);
        assert!(solar.is_writable(Characteristic::On));
        assert!(!solar.is_writable(Characteristic::MotionDetected(SolarEvent::Dawn)));
    }

    #[tokio::test]
    async fn sensor_rejects_writes() {
        let sensor = build(&DeviceEntry::Sensor(SensorConfig {
            uuid: "u".to_string(),
            name: "S".to_string(),
            owner: None,
        }));
        let err = sensor
            .set(Characteristic::CurrentTemperature, CharacteristicValue::Number(1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::UnsupportedCharacteristic(_)));
    }

    #[tokio::test]
    async fn sensor_reads_zero_before_first_poll() {
        let sensor = build(&DeviceEntry::Sensor(SensorConfig {
            uuid: "u".to_string(),
            name: "S".to_string(),
            owner: None,
        }));
        assert_eq!(
            sensor.get(Characteristic::CurrentTemperature).await.unwrap(),
            CharacteristicValue::Number(0.0)
        );
    }
}
