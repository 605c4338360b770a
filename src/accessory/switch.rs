// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Switch accessory.

use chrono::{Local, NaiveDate};

use crate::client::SwitchClient;
use crate::config::SwitchConfig;
use crate::derived::DayRule;
use crate::error::{Error, Result};
use crate::event::{Characteristic, CharacteristicValue};
use crate::state::{Observed, Shared, shared};

use super::{AccessoryContext, AccessoryInfo};

/// Where a switch gets its state from.
#[derive(Debug, Clone)]
pub enum SwitchMode {
    /// State endpoint plus on/off trigger URLs.
    Http(SwitchClient),
    /// Computed from the local weekday, or unset without a rule.
    Stateful(Option<DayRule>),
    /// Cached only.
    Ip,
}

/// On/off switch.
#[derive(Debug, Clone)]
pub struct SwitchAccessory {
    ctx: AccessoryContext,
    mode: SwitchMode,
    info: AccessoryInfo,
    on: Shared<Observed<bool>>,
}

impl SwitchAccessory {
    /// Creates the accessory.
    #[must_use]
    pub fn new(ctx: AccessoryContext, mode: SwitchMode, config: &SwitchConfig) -> Self {
        let model = match mode {
            SwitchMode::Stateful(_) => "Stateful Switch",
            SwitchMode::Http(_) | SwitchMode::Ip => "Simplintho Neo Plug",
        };
        let serial = config.ip.clone().unwrap_or_else(|| "unknown".to_string());
        Self {
            ctx,
            mode,
            info: AccessoryInfo::new("Simplintho", model, serial).with_firmware("1.0"),
            on: shared(Observed::new()),
        }
    }

    /// Accessory information.
    #[must_use]
    pub fn info(&self) -> &AccessoryInfo {
        &self.info
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    fn record(&self, on: bool) -> bool {
        self.on.lock().apply(on)
    }

    /// Reads the initial state and publishes it.
    pub async fn initialize(&self) {
        let initial = match &self.mode {
            SwitchMode::Http(client) if client.has_state_url() => match client.state().await {
                Ok(on) => Some(on),
                Err(e) => {
                    tracing::error!(accessory = %self.ctx.id(), error = %e, "Could not read switch state");
                    None
                }
            },
            SwitchMode::Stateful(rule) => {
                rule.as_ref().map(|rule| rule.is_active_on_date(Self::today()))
            }
            SwitchMode::Http(_) | SwitchMode::Ip => None,
        };

        if let Some(on) = initial
            && self.record(on)
        {
            self.ctx.publish(Characteristic::On, on);
        }
    }

    /// Current state: fetched for HTTP switches, computed for stateful ones,
    /// cached otherwise.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedCharacteristic` for anything but `On`.
    pub async fn get(&self, characteristic: Characteristic) -> Result<CharacteristicValue> {
        if characteristic != Characteristic::On {
            return Err(Error::UnsupportedCharacteristic(characteristic));
        }

        let on = match &self.mode {
            SwitchMode::Http(client) if client.has_state_url() => match client.state().await {
                Ok(on) => {
                    self.record(on);
                    on
                }
                Err(e) => {
                    tracing::warn!(accessory = %self.ctx.id(), error = %e, "Could not read switch state");
                    self.on.lock().get_or(false)
                }
            },
            SwitchMode::Stateful(Some(rule)) => rule.is_active_on_date(Self::today()),
            SwitchMode::Http(_) | SwitchMode::Stateful(None) | SwitchMode::Ip => {
                self.on.lock().get_or(false)
            }
        };
        Ok(CharacteristicValue::Bool(on))
    }

    /// Switches on or off. Trigger failures are logged, not returned.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` for a non-boolean value and
    /// `Error::UnsupportedCharacteristic` for anything but `On`.
    pub async fn set(&self, characteristic: Characteristic, value: CharacteristicValue) -> Result<()> {
        if characteristic != Characteristic::On {
            return Err(Error::UnsupportedCharacteristic(characteristic));
        }
        let on = value.as_bool()?;
        tracing::debug!(accessory = %self.ctx.id(), on, "SET On");

        match &self.mode {
            SwitchMode::Http(client) => {
                if let Err(e) = client.switch(on).await {
                    tracing::error!(accessory = %self.ctx.id(), error = %e, "Could not switch");
                }
                self.record(on);
            }
            SwitchMode::Stateful(_) => {
                tracing::debug!(accessory = %self.ctx.id(), "Stateful switch ignores SET");
            }
            SwitchMode::Ip => {
                self.record(on);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventBus;
    use crate::identity::StableId;

    fn ctx() -> AccessoryContext {
        AccessoryContext::new(StableId::derive("switch"), "Switch", EventBus::new())
    }

    #[tokio::test]
    async fn ip_switch_caches_set_value() {
        let switch = SwitchAccessory::new(ctx(), SwitchMode::Ip, &SwitchConfig::http("Lamp"));
        assert_eq!(
            switch.get(Characteristic::On).await.unwrap(),
            CharacteristicValue::Bool(false)
        );
        switch
            .set(Characteristic::On, CharacteristicValue::Bool(true))
            .await
            .unwrap();
        assert_eq!(
            switch.get(Characteristic::On).await.unwrap(),
            CharacteristicValue::Bool(true)
        );
    }

    #[tokio::test]
    async fn stateful_switch_follows_rule() {
        let everyday = DayRule::DayOfTheWeekGroup {
            days: (0..7).collect(),
        };
        let switch = SwitchAccessory::new(
            ctx(),
            SwitchMode::Stateful(Some(everyday.clone())),
            &SwitchConfig::stateful("Bins", everyday),
        );
        assert_eq!(switch.info().model, "Stateful Switch");
        assert_eq!(
            switch.get(Characteristic::On).await.unwrap(),
            CharacteristicValue::Bool(true)
        );
    }

    #[tokio::test]
    async fn stateful_initialize_publishes_rule_result() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let never = DayRule::DayOfTheWeekGroup { days: vec![] };
        let switch = SwitchAccessory::new(
            AccessoryContext::new(StableId::derive("bins"), "Bins", bus),
            SwitchMode::Stateful(Some(never.clone())),
            &SwitchConfig::stateful("Bins", never),
        );
        switch.initialize().await;
        let event = rx.try_recv().unwrap();
        assert_eq!(
            event,
            crate::event::AccessoryEvent::changed(StableId::derive("bins"), Characteristic::On, false)
        );
    }

    #[tokio::test]
    async fn stateful_switch_without_rule_stays_unset() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let switch = SwitchAccessory::new(
            AccessoryContext::new(StableId::derive("bins"), "Bins", bus),
            SwitchMode::Stateful(None),
            &SwitchConfig::http("Bins"),
        );
        switch.initialize().await;
        assert!(rx.try_recv().is_err());
        assert_eq!(
            switch.get(Characteristic::On).await.unwrap(),
            CharacteristicValue::Bool(false)
        );
    }

    #[tokio::test]
    async fn other_characteristics_are_rejected() {
        let switch = SwitchAccessory::new(ctx(), SwitchMode::Ip, &SwitchConfig::http("Lamp"));
        assert!(matches!(
            switch.get(Characteristic::OccupancyDetected).await,
            Err(Error::UnsupportedCharacteristic(_))
        ));
    }
}
