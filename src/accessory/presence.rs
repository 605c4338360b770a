// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Presence accessory driven by a TV's power state.

use crate::client::{PresenceClient, PresenceReading};
use crate::config::PresenceConfig;
use crate::error::{Error, Result};
use crate::event::{Characteristic, CharacteristicValue};
use crate::state::{EdgeTrigger, Shared, shared};

use super::{AccessoryContext, AccessoryInfo};

#[derive(Debug)]
struct PresenceState {
    occupancy: EdgeTrigger<bool>,
    info: AccessoryInfo,
    info_refreshed: bool,
}

/// Occupancy sensor.
///
/// An unreachable host reads as unoccupied; a reachable host whose status
/// request fails keeps the previous value.
#[derive(Debug, Clone)]
pub struct PresenceAccessory {
    ctx: AccessoryContext,
    client: PresenceClient,
    state: Shared<PresenceState>,
}

impl PresenceAccessory {
    /// Creates the accessory; occupancy starts as `false`.
    #[must_use]
    pub fn new(ctx: AccessoryContext, client: PresenceClient, config: &PresenceConfig) -> Self {
        let model = config.model.clone().unwrap_or_else(|| config.kind.clone());
        Self {
            ctx,
            client,
            state: shared(PresenceState {
                occupancy: EdgeTrigger::with_initial(false),
                info: AccessoryInfo::new("Samsung", model, config.ip.clone()),
                info_refreshed: false,
            }),
        }
    }

    /// Current accessory information.
    #[must_use]
    pub fn info(&self) -> AccessoryInfo {
        self.state.lock().info.clone()
    }

    /// One poll tick.
    pub async fn refresh(&self) {
        let reading = match self.client.check().await {
            Ok(PresenceReading::Unreachable) => Some((false, None)),
            Ok(PresenceReading::Reachable(device)) => Some((device.is_on(), Some(device))),
            Err(e) => {
                tracing::warn!(accessory = %self.ctx.id(), error = %e, "Could not read TV status");
                None
            }
        };
        let Some((occupied, device)) = reading else {
            return;
        };

        let (edge, info) = {
            let mut state = self.state.lock();
            let edge = state.occupancy.observe(Some(occupied));
            let info = match device {
                Some(device) if !state.info_refreshed => {
                    state.info_refreshed = true;
                    state.info = AccessoryInfo::new(
                        device.kind.clone(),
                        device.model_name.clone(),
                        device.serial_number(),
                    );
                    Some(state.info.clone())
                }
                _ => None,
            };
            (edge, info)
        };

        if let Some(info) = info {
            self.ctx.publish_info(info);
        }
        if let Some(occupied) = edge {
            tracing::debug!(accessory = %self.ctx.id(), occupied, "Occupancy changed");
            self.ctx.publish(Characteristic::OccupancyDetected, occupied);
        }
    }

    /// Returns the last observed occupancy.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedCharacteristic` for anything but
    /// `OccupancyDetected`.
    pub fn get(&self, characteristic: Characteristic) -> Result<CharacteristicValue> {
        match characteristic {
            Characteristic::OccupancyDetected => Ok(CharacteristicValue::Bool(
                self.state.lock().occupancy.current().unwrap_or(false),
            )),
            other => Err(Error::UnsupportedCharacteristic(other)),
        }
    }
}
