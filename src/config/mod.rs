// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Platform configuration.
//!
//! [`PlatformConfig`] is the platform section of the host's JSON
//! configuration. It holds one list per device kind plus shared options.
//!
//! # Examples
//!
//! ```
//! use accessory_bridge::config::PlatformConfig;
//!
//! let config = PlatformConfig::from_json_str(r#"{
//!     "neoSensors": [{ "uuid": "4e2f", "name": "Kitchen" }],
//!     "timing": { "sensorIntervalMs": 10000 }
//! }"#).unwrap();
//!
//! assert_eq!(config.neo_sensors.len(), 1);
//! assert_eq!(config.timing.sensor_interval().as_secs(), 10);
//! ```

mod device;

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub use device::{
    DEFAULT_LATITUDE, DEFAULT_LONGITUDE, DEFAULT_SOLAR_API, DeviceEntry, DeviceKind,
    PresenceConfig, PresenceModel, SecurityConfig, SensorConfig, SirenConfig, SolarConfig,
    SubDeviceConfig, SwitchBehavior, SwitchConfig, ThermostatConfig,
};

/// Default base URL of the sensor cloud API.
pub const DEFAULT_SENSOR_API_BASE: &str = "https://api.jamievangeysel.be/v1/neo";

/// Platform section of the host configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformConfig {
    /// Platform instance name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Presence detectors.
    #[serde(default)]
    pub presence_detectors: Vec<PresenceConfig>,
    /// Cloud temperature/humidity sensors.
    #[serde(default)]
    pub neo_sensors: Vec<SensorConfig>,
    /// Thermostats.
    #[serde(default)]
    pub thermostats: Vec<ThermostatConfig>,
    /// Switches.
    #[serde(default)]
    pub switches: Vec<SwitchConfig>,
    /// Security systems.
    #[serde(default)]
    pub security_systems: Vec<SecurityConfig>,
    /// Solar event sources.
    #[serde(default)]
    pub solar_sources: Vec<SolarConfig>,
    /// Base URL of the sensor cloud API.
    #[serde(default = "default_sensor_api_base")]
    pub sensor_api_base: String,
    /// Poll intervals and timeouts.
    #[serde(default)]
    pub timing: TimingConfig,
}

fn default_sensor_api_base() -> String {
    DEFAULT_SENSOR_API_BASE.to_string()
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            name: None,
            presence_detectors: Vec::new(),
            neo_sensors: Vec::new(),
            thermostats: Vec::new(),
            switches: Vec::new(),
            security_systems: Vec::new(),
            solar_sources: Vec::new(),
            sensor_api_base: default_sensor_api_base(),
            timing: TimingConfig::default(),
        }
    }
}

impl PlatformConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the platform JSON.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the JSON does not match the schema
    /// or a timing value is zero.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.timing.validate()?;
        Ok(config)
    }

    /// Reads and parses a platform JSON file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Invalid(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// Adds a presence detector.
    #[must_use]
    pub fn with_presence(mut self, entry: PresenceConfig) -> Self {
        self.presence_detectors.push(entry);
        self
    }

    /// Adds a sensor.
    #[must_use]
    pub fn with_sensor(mut self, entry: SensorConfig) -> Self {
        self.neo_sensors.push(entry);
        self
    }

    /// Adds a thermostat.
    #[must_use]
    pub fn with_thermostat(mut self, entry: ThermostatConfig) -> Self {
        self.thermostats.push(entry);
        self
    }

    /// Adds a switch.
    #[must_use]
    pub fn with_switch(mut self, entry: SwitchConfig) -> Self {
        self.switches.push(entry);
        self
    }

    /// Adds a security system.
    #[must_use]
    pub fn with_security(mut self, entry: SecurityConfig) -> Self {
        self.security_systems.push(entry);
        self
    }

    /// Adds a solar source.
    #[must_use]
    pub fn with_solar(mut self, entry: SolarConfig) -> Self {
        self.solar_sources.push(entry);
        self
    }

    /// Overrides the sensor API base URL.
    #[must_use]
    pub fn with_sensor_api_base(mut self, base: impl Into<String>) -> Self {
        self.sensor_api_base = base.into();
        self
    }

    /// Replaces the timing options.
    #[must_use]
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Resolves every configured device, kind by kind in processing order
    /// and in configuration order within a kind.
    #[must_use]
    pub fn entries(&self) -> Vec<Result<DeviceEntry, ConfigError>> {
        let mut out = Vec::new();
        for kind in DeviceKind::ORDER {
            match kind {
                DeviceKind::Presence => out.extend(
                    self.presence_detectors
                        .iter()
                        .cloned()
                        .map(DeviceEntry::presence),
                ),
                DeviceKind::Sensor => {
                    out.extend(self.neo_sensors.iter().cloned().map(|c| Ok(DeviceEntry::Sensor(c))));
                }
                DeviceKind::Thermostat => {
                    out.extend(self.thermostats.iter().cloned().map(DeviceEntry::thermostat));
                }
                DeviceKind::Switch => {
                    out.extend(self.switches.iter().cloned().map(DeviceEntry::switch));
                }
                DeviceKind::Security => out.extend(
                    self.security_systems
                        .iter()
                        .cloned()
                        .map(|c| Ok(DeviceEntry::Security(c))),
                ),
                DeviceKind::Solar => {
                    out.extend(self.solar_sources.iter().cloned().map(|c| Ok(DeviceEntry::Solar(c))));
                }
            }
        }
        out
    }
}

/// Poll intervals and timeouts, in milliseconds on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimingConfig {
    /// Sensor poll interval.
    pub sensor_interval_ms: u64,
    /// Presence poll interval.
    pub presence_interval_ms: u64,
    /// Solar poll interval.
    pub solar_interval_ms: u64,
    /// Upper bound for one outbound HTTP request.
    pub request_timeout_ms: u64,
    /// Liveness probe timeout.
    pub probe_timeout_ms: u64,
    /// Delay between a security target change and the current-state change.
    pub security_debounce_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            sensor_interval_ms: 3_000,
            presence_interval_ms: 2_000,
            solar_interval_ms: 3_000,
            request_timeout_ms: 10_000,
            probe_timeout_ms: 1_000,
            security_debounce_ms: 18,
        }
    }
}

impl TimingConfig {
    /// Checks that every interval and timeout is non-zero. The debounce may
    /// be zero.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first zero field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("sensorIntervalMs", self.sensor_interval_ms),
            ("presenceIntervalMs", self.presence_interval_ms),
            ("solarIntervalMs", self.solar_interval_ms),
            ("requestTimeoutMs", self.request_timeout_ms),
            ("probeTimeoutMs", self.probe_timeout_ms),
        ];
        match fields.iter().find(|(_, ms)| *ms == 0) {
            Some((field, _)) => Err(ConfigError::Invalid(format!("timing.{field} must be > 0"))),
            None => Ok(()),
        }
    }

    /// Sensor poll interval.
    #[must_use]
    pub const fn sensor_interval(&self) -> Duration {
        Duration::from_millis(self.sensor_interval_ms)
    }

    /// Presence poll interval.
    #[must_use]
    pub const fn presence_interval(&self) -> Duration {
        Duration::from_millis(self.presence_interval_ms)
    }

    /// Solar poll interval.
    #[must_use]
    pub const fn solar_interval(&self) -> Duration {
        Duration::from_millis(self.solar_interval_ms)
    }

    /// HTTP request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Liveness probe timeout.
    #[must_use]
    pub const fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Security debounce.
    #[must_use]
    pub const fn security_debounce(&self) -> Duration {
        Duration::from_millis(self.security_debounce_ms)
    }
}
