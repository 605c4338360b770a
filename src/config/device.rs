// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device configuration entries.
//!
//! The `*Config` structs mirror the platform JSON one-to-one. They are
//! resolved into a [`DeviceEntry`], a closed set of device kinds, before any
//! accessory is created; entries that cannot be resolved are reported as
//! [`ConfigError`]s and skipped by the caller.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::derived::DayRule;
use crate::error::ConfigError;
use crate::identity::StableId;

/// Default latitude of the solar source.
pub const DEFAULT_LATITUDE: f64 = 50.893_28;
/// Default longitude of the solar source.
pub const DEFAULT_LONGITUDE: f64 = 5.318_499;
/// Default ephemeris endpoint.
pub const DEFAULT_SOLAR_API: &str = "https://api.sunrisesunset.io/json";

/// Temperature/humidity sensor reported through the cloud API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorConfig {
    /// Device UUID assigned by the vendor.
    pub uuid: String,
    /// Display name.
    pub name: String,
    /// Owner of the device in the vendor cloud.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

/// Named sub-device of a thermostat (valve or outlet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubDeviceConfig {
    /// Fixed identifier, e.g. `heating-valve`.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Thermostat exposing a small REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermostatConfig {
    /// Display name.
    pub name: String,
    /// Vendor UUID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// Address of a legacy thermostat (`http://{ip}:8080`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Hostname of a generalized thermostat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Port of a generalized thermostat (default 8080).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Instance path segment (default `default`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Optional valves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valves: Option<Vec<SubDeviceConfig>>,
    /// Optional outlets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlets: Option<Vec<SubDeviceConfig>>,
}

impl ThermostatConfig {
    /// Creates a generalized thermostat configuration.
    #[must_use]
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uuid: None,
            ip: None,
            host: Some(host.into()),
            port: None,
            instance: None,
            valves: None,
            outlets: None,
        }
    }

    /// Sets the port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the vendor UUID.
    #[must_use]
    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    /// Resolves the base URL of the thermostat API.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEntry` if neither `host` nor `ip` is set.
    pub fn base_url(&self) -> Result<String, ConfigError> {
        if let Some(host) = &self.host {
            let port = self.port.unwrap_or(8080);
            let instance = self.instance.as_deref().unwrap_or("default");
            return Ok(format!("http://{host}:{port}/{instance}"));
        }
        if let Some(ip) = &self.ip {
            return Ok(format!("http://{ip}:8080"));
        }
        Err(ConfigError::MissingEntry {
            device: self.name.clone(),
            entry: "host or ip".to_string(),
        })
    }
}

/// Switch, either HTTP controlled or rule based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchConfig {
    /// Display name.
    pub name: String,
    /// Sub-type: `http`, `statefull` or `ip`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Device address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// URL switching the device on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_url: Option<String>,
    /// URL switching the device off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub off_url: Option<String>,
    /// URL returning `{status: bool}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_url: Option<String>,
    /// Whether `definition` is used (stateful switches).
    #[serde(default)]
    pub custom: bool,
    /// Day-of-week rule (stateful switches).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<DayRule>,
}

impl SwitchConfig {
    /// Creates an HTTP switch.
    #[must_use]
    pub fn http(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: "http".to_string(),
            ip: None,
            on_url: None,
            off_url: None,
            state_url: None,
            custom: false,
            definition: None,
        }
    }

    /// Creates a rule based switch.
    #[must_use]
    pub fn stateful(name: impl Into<String>, rule: DayRule) -> Self {
        Self {
            kind: "statefull".to_string(),
            custom: true,
            definition: Some(rule),
            ..Self::http(name)
        }
    }

    /// Sets the on/off URLs.
    #[must_use]
    pub fn with_urls(mut self, on_url: impl Into<String>, off_url: impl Into<String>) -> Self {
        self.on_url = Some(on_url.into());
        self.off_url = Some(off_url.into());
        self
    }

    /// Sets the state URL.
    #[must_use]
    pub fn with_state_url(mut self, state_url: impl Into<String>) -> Self {
        self.state_url = Some(state_url.into());
        self
    }
}

/// How a switch obtains and changes its state.
#[derive(Debug, Clone, PartialEq)]
pub enum SwitchBehavior {
    /// State from `stateUrl`, changes through `onUrl`/`offUrl`.
    Http {
        /// URL returning `{status: bool}`.
        state_url: Option<String>,
        /// URL switching on.
        on_url: Option<String>,
        /// URL switching off.
        off_url: Option<String>,
    },
    /// State computed from the current local day. `None` when no custom
    /// rule is defined; the state then stays unset.
    Stateful(Option<DayRule>),
    /// Address only; no state endpoint.
    Ip,
}

/// Presence detector (TV power state).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceConfig {
    /// Device address.
    pub ip: String,
    /// Display name.
    pub name: String,
    /// Device model family, e.g. `Samsung SmartTV`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Model name shown before the device reports its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Port of the status API (default 8001).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl PresenceConfig {
    /// Default port of the TV status API.
    pub const DEFAULT_PORT: u16 = 8001;

    /// Creates a presence detector for a Samsung TV.
    #[must_use]
    pub fn samsung(name: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            name: name.into(),
            kind: PresenceModel::SAMSUNG_SMART_TV.to_string(),
            model: None,
            port: None,
        }
    }

    /// Overrides the status API port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Status endpoint URL.
    #[must_use]
    pub fn status_url(&self) -> String {
        let port = self.port.unwrap_or(Self::DEFAULT_PORT);
        format!("http://{}:{port}/api/v2/", self.ip)
    }
}

/// Supported presence detector families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceModel {
    /// Samsung Tizen TV.
    SamsungSmartTv,
}

impl PresenceModel {
    const SAMSUNG_SMART_TV: &'static str = "Samsung SmartTV";

    fn parse(kind: &str) -> Option<Self> {
        (kind == Self::SAMSUNG_SMART_TV).then_some(Self::SamsungSmartTv)
    }
}

/// Siren attached to a security system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SirenConfig {
    /// Siren host.
    pub hostname: String,
    /// URL (or path on `hostname`) switching the siren on.
    pub on_url: String,
    /// URL (or path on `hostname`) switching the siren off.
    pub off_url: String,
}

impl SirenConfig {
    /// Resolved URL silencing the siren; a bare path is taken relative to
    /// `hostname`.
    #[must_use]
    pub fn off_endpoint(&self) -> String {
        let url = &self.off_url;
        if url.starts_with("http://") || url.starts_with("https://") {
            url.clone()
        } else {
            format!("http://{}/{}", self.hostname, url.trim_start_matches('/'))
        }
    }
}

/// Locally simulated security system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityConfig {
    /// Display name.
    pub name: String,
    /// Host of the alarm panel.
    pub hostname: String,
    /// Port of the alarm panel.
    pub port: u16,
    /// Manufacturer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    /// Model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Whether disarming silences the siren.
    #[serde(default)]
    pub siren_enabled: bool,
    /// Siren endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub siren: Option<SirenConfig>,
}

impl SecurityConfig {
    /// Creates a security system without siren.
    #[must_use]
    pub fn new(name: impl Into<String>, hostname: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            hostname: hostname.into(),
            port,
            make: None,
            model: None,
            siren_enabled: false,
            siren: None,
        }
    }

    /// Attaches an enabled siren.
    #[must_use]
    pub fn with_siren(mut self, siren: SirenConfig) -> Self {
        self.siren_enabled = true;
        self.siren = Some(siren);
        self
    }
}

/// Computed solar-events source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarConfig {
    /// Display name, also the identity key.
    pub name: String,
    /// Latitude in degrees.
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    /// Longitude in degrees.
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    /// Time zone the API reports in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Ephemeris endpoint.
    #[serde(default = "default_solar_api")]
    pub api_url: String,
}

impl SolarConfig {
    /// Creates a solar source with the default location.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            timezone: default_timezone(),
            api_url: DEFAULT_SOLAR_API.to_string(),
        }
    }

    /// Overrides the ephemeris endpoint.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

fn default_latitude() -> f64 {
    DEFAULT_LATITUDE
}

fn default_longitude() -> f64 {
    DEFAULT_LONGITUDE
}

fn default_timezone() -> String {
    "CET".to_string()
}

fn default_solar_api() -> String {
    DEFAULT_SOLAR_API.to_string()
}

/// Device kinds, in the order a reconciliation pass processes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// Presence detector.
    Presence,
    /// Temperature/humidity sensor.
    Sensor,
    /// Thermostat.
    Thermostat,
    /// Switch.
    Switch,
    /// Security system.
    Security,
    /// Solar events.
    Solar,
}

impl DeviceKind {
    /// Fixed processing order.
    pub const ORDER: [DeviceKind; 6] = [
        Self::Presence,
        Self::Sensor,
        Self::Thermostat,
        Self::Switch,
        Self::Security,
        Self::Solar,
    ];

    /// Configuration name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Presence => "presenceDetector",
            Self::Sensor => "neoSensor",
            Self::Thermostat => "thermostat",
            Self::Switch => "switch",
            Self::Security => "securitySystem",
            Self::Solar => "solarSource",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved, fully typed device entry.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEntry {
    /// Presence detector with a supported model.
    Presence {
        /// Raw configuration.
        config: PresenceConfig,
        /// Resolved model.
        model: PresenceModel,
    },
    /// Temperature/humidity sensor.
    Sensor(SensorConfig),
    /// Thermostat with its resolved base URL.
    Thermostat {
        /// Raw configuration.
        config: ThermostatConfig,
        /// API base URL.
        base_url: String,
    },
    /// Switch with its resolved behavior.
    Switch {
        /// Raw configuration.
        config: SwitchConfig,
        /// Resolved behavior.
        behavior: SwitchBehavior,
    },
    /// Security system.
    Security(SecurityConfig),
    /// Solar events source.
    Solar(SolarConfig),
}

impl DeviceEntry {
    /// Resolves a presence detector entry.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedKind` for unknown device families.
    pub fn presence(config: PresenceConfig) -> Result<Self, ConfigError> {
        let model = PresenceModel::parse(&config.kind).ok_or_else(|| {
            ConfigError::UnsupportedKind {
                kind: DeviceKind::Presence.as_str(),
                sub_type: config.kind.clone(),
            }
        })?;
        Ok(Self::Presence { config, model })
    }

    /// Resolves a thermostat entry.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEntry` if no address is configured.
    pub fn thermostat(config: ThermostatConfig) -> Result<Self, ConfigError> {
        let base_url = config.base_url()?;
        Ok(Self::Thermostat { config, base_url })
    }

    /// Resolves a switch entry.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedKind` for unknown sub-types.
    pub fn switch(config: SwitchConfig) -> Result<Self, ConfigError> {
        let behavior = match config.kind.as_str() {
            "http" => SwitchBehavior::Http {
                state_url: config.state_url.clone(),
                on_url: config.on_url.clone(),
                off_url: config.off_url.clone(),
            },
            "statefull" => {
                SwitchBehavior::Stateful(config.definition.clone().filter(|_| config.custom))
            }
            "ip" => SwitchBehavior::Ip,
            other => {
                return Err(ConfigError::UnsupportedKind {
                    kind: DeviceKind::Switch.as_str(),
                    sub_type: other.to_string(),
                });
            }
        };
        Ok(Self::Switch { config, behavior })
    }

    /// The kind of this entry.
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        match self {
            Self::Presence { .. } => DeviceKind::Presence,
            Self::Sensor(_) => DeviceKind::Sensor,
            Self::Thermostat { .. } => DeviceKind::Thermostat,
            Self::Switch { .. } => DeviceKind::Switch,
            Self::Security(_) => DeviceKind::Security,
            Self::Solar(_) => DeviceKind::Solar,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Presence { config, .. } => &config.name,
            Self::Sensor(config) => &config.name,
            Self::Thermostat { config, .. } => &config.name,
            Self::Switch { config, .. } => &config.name,
            Self::Security(config) => &config.name,
            Self::Solar(config) => &config.name,
        }
    }

    /// The natural key the stable identity is derived from.
    #[must_use]
    pub fn natural_key(&self) -> &str {
        match self {
            Self::Presence { config, .. } => &config.ip,
            Self::Sensor(config) => &config.uuid,
            Self::Thermostat { config, .. } => config
                .uuid
                .as_deref()
                .or(config.ip.as_deref())
                .or(config.host.as_deref())
                .unwrap_or(&config.name),
            Self::Switch { config, .. } => config
                .on_url
                .as_deref()
                .or(config.ip.as_deref())
                .unwrap_or(&config.name),
            Self::Security(config) => &config.name,
            Self::Solar(config) => &config.name,
        }
    }

    /// Stable identity of the accessory backing this entry.
    #[must_use]
    pub fn stable_id(&self) -> StableId {
        StableId::derive(self.natural_key())
    }

    /// The raw configuration as JSON, stored as accessory context.
    #[must_use]
    pub fn context(&self) -> serde_json::Value {
        let value = match self {
            Self::Presence { config, .. } => serde_json::to_value(config),
            Self::Sensor(config) => serde_json::to_value(config),
            Self::Thermostat { config, .. } => serde_json::to_value(config),
            Self::Switch { config, .. } => serde_json::to_value(config),
            Self::Security(config) => serde_json::to_value(config),
            Self::Solar(config) => serde_json::to_value(config),
        };
        value.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thermostat_generalized_base_url() {
        let config = ThermostatConfig::new("Living", "thermo.local");
        assert_eq!(config.base_url().unwrap(), "http://thermo.local:8080/default");

        let mut config = config.with_port(9000);
        config.instance = Some("floor1".to_string());
        assert_eq!(config.base_url().unwrap(), "http://thermo.local:9000/floor1");
    }

    #[test]
    fn thermostat_legacy_base_url() {
        let mut config = ThermostatConfig::new("Living", "unused");
        config.host = None;
        config.ip = Some("10.0.0.4".to_string());
        assert_eq!(config.base_url().unwrap(), "http://10.0.0.4:8080");
    }

    #[test]
    fn thermostat_without_address_is_rejected() {
        let mut config = ThermostatConfig::new("Living", "unused");
        config.host = None;
        assert!(matches!(
            DeviceEntry::thermostat(config),
            Err(ConfigError::MissingEntry { .. })
        ));
    }

    #[test]
    fn switch_key_prefers_on_url_then_ip_then_name() {
        let with_url = SwitchConfig::http("Lamp").with_urls("http://lamp/on", "http://lamp/off");
        let entry = DeviceEntry::switch(with_url).unwrap();
        assert_eq!(entry.natural_key(), "http://lamp/on");

        let mut with_ip = SwitchConfig::http("Lamp");
        with_ip.ip = Some("10.0.0.9".to_string());
        assert_eq!(DeviceEntry::switch(with_ip).unwrap().natural_key(), "10.0.0.9");

        let bare = SwitchConfig::http("Lamp");
        assert_eq!(DeviceEntry::switch(bare).unwrap().natural_key(), "Lamp");
    }

    #[test]
    fn unknown_switch_type_is_rejected() {
        let mut config = SwitchConfig::http("Lamp");
        config.kind = "zigbee".to_string();
        let err = DeviceEntry::switch(config).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedKind { sub_type, .. } if sub_type == "zigbee"));
    }

    #[test]
    fn stateful_switch_without_custom_flag_has_no_rule() {
        let mut config = SwitchConfig::stateful("Bins", DayRule::DayOfTheWeek { day: 2 });
        config.custom = false;
        assert!(matches!(
            DeviceEntry::switch(config),
            Ok(DeviceEntry::Switch {
                behavior: SwitchBehavior::Stateful(None),
                ..
            })
        ));
    }

    #[test]
    fn unknown_presence_model_is_rejected() {
        let mut config = PresenceConfig::samsung("TV", "10.0.0.2");
        config.kind = "LG WebOS".to_string();
        assert!(DeviceEntry::presence(config).is_err());
    }

    #[test]
    fn presence_status_url_uses_default_port() {
        let config = PresenceConfig::samsung("TV", "10.0.0.2");
        assert_eq!(config.status_url(), "http://10.0.0.2:8001/api/v2/");
    }

    #[test]
    fn siren_paths_resolve_against_hostname() {
        let mut siren = SirenConfig {
            hostname: "siren.local".to_string(),
            on_url: "/on".to_string(),
            off_url: "off".to_string(),
        };
        assert_eq!(siren.off_endpoint(), "http://siren.local/off");

        siren.off_url = "http://other/off".to_string();
        assert_eq!(siren.off_endpoint(), "http://other/off");
    }

    #[test]
    fn stable_id_follows_natural_key() {
        let a = DeviceEntry::Sensor(SensorConfig {
            uuid: "abc".to_string(),
            name: "Kitchen".to_string(),
            owner: None,
        });
        let b = DeviceEntry::Sensor(SensorConfig {
            uuid: "abc".to_string(),
            name: "Renamed".to_string(),
            owner: None,
        });
        assert_eq!(a.stable_id(), b.stable_id());
        assert_eq!(a.stable_id(), StableId::derive("abc"));
    }

    #[test]
    fn context_holds_raw_config() {
        let entry = DeviceEntry::Solar(SolarConfig::new("SunriseSunset"));
        assert_eq!(entry.context()["name"], "SunriseSunset");
        assert_eq!(entry.context()["timezone"], "CET");
    }
}
