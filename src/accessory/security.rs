// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Locally simulated security system.
//!
//! A target change is applied after a short debounce. Disarming silences the
//! siren first when one is configured and enabled.

use std::time::Duration;

use tokio::task::AbortHandle;

use crate::client::SirenClient;
use crate::config::SecurityConfig;
use crate::error::{Error, Result};
use crate::event::{Characteristic, CharacteristicValue};
use crate::state::{EdgeTrigger, Shared, shared};
use crate::types::{SecurityState, SecurityTarget};

use super::{AccessoryContext, AccessoryInfo};

#[derive(Debug)]
struct SecurityInner {
    current: EdgeTrigger<SecurityState>,
    target: SecurityTarget,
}

/// Security system accessory.
#[derive(Debug, Clone)]
pub struct SecurityAccessory {
    ctx: AccessoryContext,
    siren: Option<SirenClient>,
    debounce: Duration,
    info: AccessoryInfo,
    state: Shared<SecurityInner>,
    pending: Shared<Option<AbortHandle>>,
}

impl SecurityAccessory {
    /// Creates the accessory, disarmed. `siren` is only used when enabled in
    /// `config`.
    #[must_use]
    pub fn new(
        ctx: AccessoryContext,
        config: &SecurityConfig,
        siren: Option<SirenClient>,
        debounce: Duration,
    ) -> Self {
        let info = AccessoryInfo::new(
            config.make.clone().unwrap_or_else(|| "Manufacturer unknown".to_string()),
            config.model.clone().unwrap_or_else(|| "Model unknown".to_string()),
            format!("{}:{}", config.hostname, config.port),
        );
        Self {
            ctx,
            siren: siren.filter(|_| config.siren_enabled),
            debounce,
            info,
            state: shared(SecurityInner {
                current: EdgeTrigger::with_initial(SecurityState::Disarmed),
                target: SecurityTarget::Disarm,
            }),
            pending: shared(None),
        }
    }

    /// Accessory information.
    #[must_use]
    pub fn info(&self) -> &AccessoryInfo {
        &self.info
    }

    /// Returns current or target state.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedCharacteristic` for other characteristics.
    pub fn get(&self, characteristic: Characteristic) -> Result<CharacteristicValue> {
        let state = self.state.lock();
        match characteristic {
            Characteristic::SecuritySystemCurrentState => Ok(CharacteristicValue::State(
                state.current.current().unwrap_or(SecurityState::Disarmed).code(),
            )),
            Characteristic::SecuritySystemTargetState => {
                Ok(CharacteristicValue::State(state.target.code()))
            }
            other => Err(Error::UnsupportedCharacteristic(other)),
        }
    }

    /// Records the target and schedules the transition.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for an unknown target code and
    /// `Error::UnsupportedCharacteristic` for other characteristics.
    pub fn set(&self, characteristic: Characteristic, value: CharacteristicValue) -> Result<()> {
        if characteristic != Characteristic::SecuritySystemTargetState {
            return Err(Error::UnsupportedCharacteristic(characteristic));
        }
        let target = SecurityTarget::from_code(value.as_state()?)?;
        tracing::debug!(accessory = %self.ctx.id(), target = %target, "SET SecuritySystemTargetState");

        self.state.lock().target = target;

        let this = self.clone();
        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        let handle = tokio::spawn(async move {
            tokio::time::sleep(this.debounce).await;
            this.transition().await;
        });
        *pending = Some(handle.abort_handle());
        Ok(())
    }

    /// Applies the latest target.
    async fn transition(&self) {
        let target = self.state.lock().target;

        if target == SecurityTarget::Disarm
            && let Some(siren) = &self.siren
        {
            match siren.silence().await {
                Ok(()) => tracing::info!(
                    accessory = %self.ctx.id(),
                    outcome = "success",
                    "Siren silenced"
                ),
                Err(e) => tracing::error!(
                    accessory = %self.ctx.id(),
                    url = %siren.off_url(),
                    error = %e,
                    "Could not silence siren"
                ),
            }
        }

        let edge = self
            .state
            .lock()
            .current
            .observe(Some(target.resulting_state()));
        if let Some(state) = edge {
            tracing::info!(accessory = %self.ctx.id(), state = %state, "Security state changed");
            self.ctx.publish(Characteristic::SecuritySystemCurrentState, state.code());
        }
    }

    /// Cancels a scheduled transition.
    pub fn stop(&self) {
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }
    }
}
