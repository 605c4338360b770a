// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory Bridge - expose HTTP/ICMP smart-home devices as host accessories.
//!
//! The crate turns a platform configuration listing heterogeneous devices
//! into a set of live accessories. Each accessory is identified by a
//! [`StableId`] derived from its natural key, polled on its own timer where
//! its kind needs freshness, and publishes characteristic changes only when
//! a value actually changes.
//!
//! # Supported Devices
//!
//! - **Presence detectors**: TV power state behind an ICMP liveness probe
//! - **Sensors**: temperature/humidity from a cloud API, with heat index
//! - **Thermostats**: mode, setpoint, humidity, valves and heating element
//! - **Switches**: HTTP controlled, or computed from day-of-week rules
//! - **Security systems**: local arm/disarm with siren silencing
//! - **Solar events**: sunrise, sunset, solar noon, golden hour, dawn, dusk
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use accessory_bridge::{Platform, PlatformConfig, SensorConfig};
//! use accessory_bridge::host::MemoryRegistry;
//!
//! #[tokio::main]
//! async fn main() -> accessory_bridge::Result<()> {
//!     let config = PlatformConfig::new().with_sensor(SensorConfig {
//!         uuid: "a1b2c3".to_string(),
//!         name: "Kitchen".to_string(),
//!         owner: None,
//!     });
//!
//!     let registry = Arc::new(MemoryRegistry::new());
//!     let mut platform = Platform::new(config, registry)?;
//!     let summary = platform.discover_devices().await;
//!     assert_eq!(summary.created, 1);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Events
//!
//! Characteristic changes, registrations and information updates are
//! broadcast as [`AccessoryEvent`]s:
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use accessory_bridge::{Platform, PlatformConfig};
//! # use accessory_bridge::host::MemoryRegistry;
//! # async fn example(platform: &Platform) {
//! let mut events = platform.subscribe();
//! while let Ok(event) = events.recv().await {
//!     if event.is_characteristic_change() {
//!         println!("{event:?}");
//!     }
//! }
//! # }
//! ```

pub mod accessory;
pub mod client;
pub mod config;
pub mod derived;
pub mod error;
pub mod event;
pub mod host;
mod identity;
mod platform;
pub mod protocol;
pub mod reconcile;
pub mod scheduler;
pub mod state;
pub mod types;

pub use accessory::{AccessoryHandler, AccessoryInfo};
pub use config::{
    DeviceEntry, DeviceKind, PlatformConfig, PresenceConfig, SecurityConfig, SensorConfig,
    SirenConfig, SolarConfig, SwitchConfig, ThermostatConfig, TimingConfig,
};
pub use error::{ConfigError, Error, ParseError, ProtocolError, Result, ValueError};
pub use event::{AccessoryEvent, Characteristic, CharacteristicValue, EventBus, SubDevice};
pub use identity::StableId;
pub use platform::{DiscoverySummary, Platform};
pub use protocol::{HttpConfig, LivenessProbe};
pub use reconcile::{AccessoryRecord, ReconcilePlan, reconcile};
