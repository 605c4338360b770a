// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Solar events accessory.
//!
//! Exposes one motion sensor per [`SolarEvent`] plus an `On` toggle. Each
//! tick re-evaluates every event window against the local clock and
//! publishes only the transitions.

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::client::SolarClient;
use crate::config::SolarConfig;
use crate::derived::{Ephemeris, SolarEvent};
use crate::error::{Error, Result};
use crate::event::{Characteristic, CharacteristicValue};
use crate::state::{EdgeTrigger, Shared, shared};

use super::{AccessoryContext, AccessoryInfo};

#[derive(Debug)]
struct SolarState {
    enabled: bool,
    ephemeris: Option<Ephemeris>,
    /// Local date of the last successful fetch.
    fetched_on: Option<NaiveDate>,
    detected: [EdgeTrigger<bool>; 6],
}

fn slot(event: SolarEvent) -> usize {
    SolarEvent::ALL
        .iter()
        .position(|e| *e == event)
        .unwrap_or_default()
}

/// Solar events source.
#[derive(Debug, Clone)]
pub struct SolarAccessory {
    ctx: AccessoryContext,
    client: SolarClient,
    info: AccessoryInfo,
    state: Shared<SolarState>,
}

impl SolarAccessory {
    /// Creates the accessory, enabled, with no ephemeris yet.
    #[must_use]
    pub fn new(ctx: AccessoryContext, client: SolarClient, config: &SolarConfig) -> Self {
        Self {
            ctx,
            client,
            info: AccessoryInfo::new("SunriseSunset.io", "Solar information", config.name.clone())
                .with_firmware("1.0.0"),
            state: shared(SolarState {
                enabled: true,
                ephemeris: None,
                fetched_on: None,
                detected: [EdgeTrigger::new(); 6],
            }),
        }
    }

    /// Accessory information.
    #[must_use]
    pub fn info(&self) -> &AccessoryInfo {
        &self.info
    }

    /// The cached ephemeris, if any.
    #[must_use]
    pub fn ephemeris(&self) -> Option<Ephemeris> {
        self.state.lock().ephemeris.clone()
    }

    /// One poll tick against the local wall clock.
    pub async fn refresh(&self) {
        self.refresh_at(Local::now().naive_local()).await;
    }

    /// One poll tick at `now`.
    ///
    /// A stale ephemeris is refetched at most once per local date, since the
    /// API's date follows its own timezone.
    pub async fn refresh_at(&self, now: NaiveDateTime) {
        let today = now.date();
        let (enabled, needs_fetch) = {
            let state = self.state.lock();
            let needs_fetch = match &state.ephemeris {
                None => true,
                Some(eph) => eph.is_stale(today) && state.fetched_on != Some(today),
            };
            (state.enabled, needs_fetch)
        };

        if !enabled {
            tracing::info!(accessory = %self.ctx.id(), "Solar events disabled");
            return;
        }

        if needs_fetch {
            match self.client.fetch().await {
                Ok(ephemeris) => {
                    tracing::info!(
                        accessory = %self.ctx.id(),
                        date = %ephemeris.date(),
                        outcome = "success",
                        "Received ephemeris"
                    );
                    let mut state = self.state.lock();
                    state.ephemeris = Some(ephemeris);
                    state.fetched_on = Some(today);
                }
                Err(e) => {
                    tracing::error!(
                        accessory = %self.ctx.id(),
                        url = %self.client.url(),
                        error = %e,
                        "Could not load ephemeris"
                    );
                    return;
                }
            }
        }

        let edges: Vec<(SolarEvent, bool)> = {
            let mut state = self.state.lock();
            let Some(detections) = state.ephemeris.as_ref().map(|eph| eph.detect_all(now)) else {
                return;
            };
            detections
                .into_iter()
                .filter_map(|(event, detected)| {
                    state.detected[slot(event)]
                        .observe(Some(detected))
                        .map(|value| (event, value))
                })
                .collect()
        };

        for (event, detected) in edges {
            tracing::info!(accessory = %self.ctx.id(), event = %event, detected, "Solar event");
            self.ctx.publish(Characteristic::MotionDetected(event), detected);
        }
    }

    /// Returns the toggle or an event's last detection.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedCharacteristic` for other characteristics.
    pub fn get(&self, characteristic: Characteristic) -> Result<CharacteristicValue> {
        let state = self.state.lock();
        match characteristic {
            Characteristic::On => Ok(CharacteristicValue::Bool(state.enabled)),
            Characteristic::MotionDetected(event) => Ok(CharacteristicValue::Bool(
                state.detected[slot(event)].current().unwrap_or(false),
            )),
            other => Err(Error::UnsupportedCharacteristic(other)),
        }
    }

    /// Enables or disables event evaluation.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for a non-boolean value and
    /// `Error::UnsupportedCharacteristic` for anything but `On`.
    pub fn set(&self, characteristic: Characteristic, value: CharacteristicValue) -> Result<()> {
        if characteristic != Characteristic::On {
            return Err(Error::UnsupportedCharacteristic(characteristic));
        }
        let enabled = value.as_bool()?;
        tracing::debug!(accessory = %self.ctx.id(), enabled, "SET On");
        self.state.lock().enabled = enabled;
        Ok(())
    }
}
