// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Platform wiring.
//!
//! [`Platform`] owns the live accessory set. The host feeds it cached
//! accessories through [`Platform::configure_accessory`], then calls
//! [`Platform::discover_devices`], which reconciles the configuration
//! against everything known, applies the plan to the host registry and
//! starts one handler (and poller, where the kind polls) per accessory.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use accessory_bridge::{Platform, PlatformConfig};
//! use accessory_bridge::host::MemoryRegistry;
//!
//! # async fn example() -> accessory_bridge::Result<()> {
//! let config = PlatformConfig::load("config.json")?;
//! let mut platform = Platform::new(config, Arc::new(MemoryRegistry::new()))?;
//!
//! let mut events = platform.subscribe();
//! platform.discover_devices().await;
//!
//! while let Ok(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::accessory::{AccessoryContext, AccessoryHandler, AccessoryInfo, Backends};
use crate::config::PlatformConfig;
use crate::error::{Error, Result};
use crate::event::{AccessoryEvent, Characteristic, CharacteristicValue, EventBus};
use crate::host::{AccessoryRegistry, PLATFORM_NAME, PLUGIN_NAME};
use crate::identity::StableId;
use crate::protocol::{HttpConfig, LivenessProbe, SystemPing};
use crate::reconcile::{AccessoryRecord, PlannedAccessory, reconcile};
use crate::scheduler::{Poller, PollerHandle};

/// A live accessory: its record, its handler and its poller.
#[derive(Debug)]
struct ActiveAccessory {
    record: AccessoryRecord,
    handler: AccessoryHandler,
    poller: Option<PollerHandle>,
}

impl ActiveAccessory {
    fn stop(&self) {
        self.handler.stop();
        if let Some(poller) = &self.poller {
            poller.stop();
        }
    }
}

/// Counts of one discovery pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoverySummary {
    /// Accessories reused without registration.
    pub restored: usize,
    /// Accessories registered in this pass.
    pub created: usize,
    /// Accessories unregistered in this pass.
    pub removed: usize,
    /// Entries skipped because of configuration errors.
    pub skipped: usize,
}

/// The bridge platform.
pub struct Platform {
    config: PlatformConfig,
    registry: Arc<dyn AccessoryRegistry>,
    backends: Backends,
    events: EventBus,
    cached: Vec<AccessoryRecord>,
    active: HashMap<StableId, ActiveAccessory>,
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform")
            .field("name", &self.config.name)
            .field("cached", &self.cached.len())
            .field("active", &self.active.len())
            .finish_non_exhaustive()
    }
}

impl Platform {
    /// Creates the platform with the system `ping` as liveness probe.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a timing value is zero, or an error if the
    /// HTTP client cannot be built.
    pub fn new(config: PlatformConfig, registry: Arc<dyn AccessoryRegistry>) -> Result<Self> {
        config.timing.validate()?;
        let http = HttpConfig::new()
            .with_timeout(config.timing.request_timeout())
            .into_client()?;
        let backends = Backends {
            http,
            probe: Arc::new(SystemPing),
            timing: config.timing,
            sensor_api_base: config.sensor_api_base.clone(),
        };

        tracing::debug!(name = ?config.name, "Finished initializing platform");

        Ok(Self {
            config,
            registry,
            backends,
            events: EventBus::new(),
            cached: Vec::new(),
            active: HashMap::new(),
        })
    }

    /// Replaces the liveness probe used by presence detectors.
    #[must_use]
    pub fn with_probe(mut self, probe: Arc<dyn LivenessProbe>) -> Self {
        self.backends.probe = probe;
        self
    }

    /// Hands over an accessory restored from the host cache.
    pub fn configure_accessory(&mut self, record: AccessoryRecord) {
        tracing::info!(
            accessory = %record.id,
            name = %record.display_name,
            "Loading accessory from cache"
        );
        self.cached.push(record);
    }

    /// Subscribes to accessory events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AccessoryEvent> {
        self.events.subscribe()
    }

    /// Identities of the live accessories.
    #[must_use]
    pub fn accessory_ids(&self) -> Vec<StableId> {
        let mut ids: Vec<StableId> = self.active.keys().copied().collect();
        ids.sort();
        ids
    }

    /// The record of a live accessory.
    #[must_use]
    pub fn accessory(&self, id: StableId) -> Option<&AccessoryRecord> {
        self.active.get(&id).map(|active| &active.record)
    }

    /// Information of a live accessory.
    #[must_use]
    pub fn info(&self, id: StableId) -> Option<AccessoryInfo> {
        self.active.get(&id).map(|active| active.handler.info())
    }

    /// Runs one discovery pass.
    ///
    /// The known set is everything restored from the cache plus every
    /// accessory active from a previous pass. Afterwards the live set equals
    /// exactly the identities derived from the configuration. Initial state
    /// reads run in the background and do not delay the pass.
    #[allow(clippy::unused_async)]
    pub async fn discover_devices(&mut self) -> DiscoverySummary {
        let mut known: Vec<AccessoryRecord> = std::mem::take(&mut self.cached);
        let carried: Vec<AccessoryRecord> = self
            .active
            .values()
            .filter(|active| !known.iter().any(|k| k.id == active.record.id))
            .map(|active| active.record.clone())
            .collect();
        known.extend(carried);

        let plan = reconcile(&self.config, &known);
        let summary = DiscoverySummary {
            restored: plan.restored.len(),
            created: plan.created.len(),
            removed: plan.removed.len(),
            skipped: plan.skipped.len(),
        };

        for planned in plan.restored {
            self.activate(planned);
        }

        for planned in plan.created {
            self.registry.register(
                PLUGIN_NAME,
                PLATFORM_NAME,
                std::slice::from_ref(&planned.record),
            );
            self.events.publish(AccessoryEvent::Registered {
                accessory: planned.record.id,
                name: planned.record.display_name.clone(),
            });
            self.activate(planned);
        }

        for record in plan.removed {
            if let Some(active) = self.active.remove(&record.id) {
                active.stop();
            }
            self.registry
                .unregister(PLUGIN_NAME, PLATFORM_NAME, std::slice::from_ref(&record));
            self.events
                .publish(AccessoryEvent::Unregistered { accessory: record.id });
        }

        tracing::info!(
            restored = summary.restored,
            created = summary.created,
            removed = summary.removed,
            skipped = summary.skipped,
            outcome = "success",
            "Discovery finished"
        );
        summary
    }

    /// Binds a fresh handler to `planned`, starts its initial state read in
    /// the background and starts its poller.
    fn activate(&mut self, planned: PlannedAccessory) {
        let PlannedAccessory { entry, record } = planned;

        if let Some(previous) = self.active.remove(&record.id) {
            previous.stop();
        }

        let ctx = AccessoryContext::new(record.id, record.display_name.clone(), self.events.clone());
        let handler = AccessoryHandler::new(&entry, ctx, &self.backends);

        let initializing = handler.clone();
        tokio::spawn(async move { initializing.initialize().await });

        let poller = handler.poll_interval(&self.backends.timing).map(|period| {
            let ticking = handler.clone();
            Poller::new(record.id.to_string(), period)
                .with_tick_timeout(self.backends.timing.request_timeout())
                .spawn(move || {
                    let ticking = ticking.clone();
                    async move { ticking.refresh().await }
                })
        });

        tracing::debug!(accessory = %record.id, kind = %entry.kind(), polling = poller.is_some(), "Accessory active");

        self.active.insert(
            record.id,
            ActiveAccessory {
                record,
                handler,
                poller,
            },
        );
    }

    /// Host read.
    ///
    /// # Errors
    ///
    /// Returns `Error::AccessoryNotFound` for unknown identities and the
    /// handler's error otherwise.
    pub async fn get(
        &self,
        id: StableId,
        characteristic: Characteristic,
    ) -> Result<CharacteristicValue> {
        let handler = self.handler(id)?;
        tracing::debug!(accessory = %id, characteristic = %characteristic, "GET");
        handler.get(characteristic).await
    }

    /// Host write.
    ///
    /// # Errors
    ///
    /// Returns `Error::AccessoryNotFound` for unknown identities and the
    /// handler's error otherwise.
    pub async fn set(
        &self,
        id: StableId,
        characteristic: Characteristic,
        value: CharacteristicValue,
    ) -> Result<()> {
        let handler = self.handler(id)?;
        tracing::debug!(accessory = %id, characteristic = %characteristic, value = ?value, "SET");
        handler.set(characteristic, value).await
    }

    /// Runs one poll tick for an accessory outside its timer.
    ///
    /// # Errors
    ///
    /// Returns `Error::AccessoryNotFound` for unknown identities.
    pub async fn refresh(&self, id: StableId) -> Result<()> {
        self.handler(id)?.refresh().await;
        Ok(())
    }

    fn handler(&self, id: StableId) -> Result<AccessoryHandler> {
        self.active
            .get(&id)
            .map(|active| active.handler.clone())
            .ok_or(Error::AccessoryNotFound(id))
    }

    /// Stops every handler and poller. Accessories stay registered.
    pub fn shutdown(&mut self) {
        for (_, active) in self.active.drain() {
            active.stop();
        }
        tracing::info!("Platform stopped");
    }
}

impl Drop for Platform {
    fn drop(&mut self) {
        for active in self.active.values() {
            active.stop();
        }
    }
}
