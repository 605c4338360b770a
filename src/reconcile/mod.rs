// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reconciliation of configured devices against known accessories.
//!
//! [`reconcile`] is a pure planning step. It neither registers nor
//! unregisters anything; the caller applies the returned [`ReconcilePlan`]
//! to the host registry and keeps ownership of the accessory set.
//!
//! Ordering follows the configuration: kinds in [`DeviceKind::ORDER`],
//! devices within a kind in file order. Removals are computed last, from
//! the identities the pass did not touch.
//!
//! [`DeviceKind::ORDER`]: crate::config::DeviceKind::ORDER

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::{DeviceEntry, PlatformConfig};
use crate::error::ConfigError;
use crate::identity::StableId;

/// An accessory as the host registry knows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryRecord {
    /// Stable identity.
    pub id: StableId,
    /// Name shown by the host.
    pub display_name: String,
    /// Configuration entry the accessory was created from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

impl AccessoryRecord {
    /// Creates a record without context.
    #[must_use]
    pub fn new(id: StableId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            context: None,
        }
    }

    /// Builds the record for a freshly configured device.
    #[must_use]
    pub fn for_entry(entry: &DeviceEntry) -> Self {
        Self {
            id: entry.stable_id(),
            display_name: entry.name().to_string(),
            context: Some(entry.context()),
        }
    }
}

/// A configured device paired with the record that backs it.
#[derive(Debug, Clone)]
pub struct PlannedAccessory {
    /// The resolved configuration entry.
    pub entry: DeviceEntry,
    /// The accessory record, restored or new.
    pub record: AccessoryRecord,
}

/// Actions produced by one reconciliation pass.
#[derive(Debug, Default)]
pub struct ReconcilePlan {
    /// Known accessories that are still configured. Not re-registered.
    pub restored: Vec<PlannedAccessory>,
    /// Configured devices with no known accessory. Must be registered.
    pub created: Vec<PlannedAccessory>,
    /// Known accessories that are no longer configured. Must be unregistered.
    pub removed: Vec<AccessoryRecord>,
    /// Entries that could not be resolved.
    pub skipped: Vec<ConfigError>,
}

impl ReconcilePlan {
    /// Restored and created accessories, in configuration order of each group.
    pub fn active(&self) -> impl Iterator<Item = &PlannedAccessory> {
        self.restored.iter().chain(self.created.iter())
    }

    /// Identities that are live after the plan is applied.
    #[must_use]
    pub fn active_ids(&self) -> HashSet<StableId> {
        self.active().map(|planned| planned.record.id).collect()
    }
}

/// Plans the create/restore/remove actions for `config` given the accessories
/// the host already knows.
///
/// Unresolvable entries are logged and skipped. A second entry that maps to
/// an identity already handled in this pass is skipped as well, so no
/// identity is ever planned twice.
#[must_use]
pub fn reconcile(config: &PlatformConfig, known: &[AccessoryRecord]) -> ReconcilePlan {
    let mut plan = ReconcilePlan::default();
    let mut touched: HashSet<StableId> = HashSet::new();

    for resolved in config.entries() {
        let entry = match resolved {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping device");
                plan.skipped.push(e);
                continue;
            }
        };

        let id = entry.stable_id();
        if !touched.insert(id) {
            tracing::warn!(
                accessory = %id,
                kind = %entry.kind(),
                name = entry.name(),
                "Skipping device with duplicate identity"
            );
            continue;
        }

        if let Some(existing) = known.iter().find(|record| record.id == id) {
            tracing::info!(
                accessory = %id,
                name = %existing.display_name,
                "Restoring existing accessory from cache"
            );
            plan.restored.push(PlannedAccessory {
                record: existing.clone(),
                entry,
            });
        } else {
            tracing::info!(accessory = %id, name = entry.name(), "Adding new accessory");
            plan.created.push(PlannedAccessory {
                record: AccessoryRecord::for_entry(&entry),
                entry,
            });
        }
    }

    let mut seen_known: HashSet<StableId> = HashSet::new();
    for record in known {
        if touched.contains(&record.id) || !seen_known.insert(record.id) {
            continue;
        }
        tracing::info!(
            accessory = %record.id,
            name = %record.display_name,
            "Removing existing accessory from cache"
        );
        plan.removed.push(record.clone());
    }

    plan
}
