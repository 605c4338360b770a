// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory event types.

use crate::accessory::AccessoryInfo;
use crate::identity::StableId;

use super::{Characteristic, CharacteristicValue};

/// Events published towards the host.
///
/// `CharacteristicChanged` is only emitted when a value actually changed;
/// repeated identical readings never produce an event.
///
/// # Examples
///
/// ```
/// use accessory_bridge::StableId;
/// use accessory_bridge::event::{AccessoryEvent, Characteristic, CharacteristicValue};
///
/// let event = AccessoryEvent::changed(
///     StableId::derive("192.168.1.20"),
///     Characteristic::OccupancyDetected,
///     CharacteristicValue::Bool(true),
/// );
/// assert!(event.is_characteristic_change());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum AccessoryEvent {
    /// A new accessory was registered with the host.
    Registered {
        /// The accessory.
        accessory: StableId,
        /// Display name.
        name: String,
    },

    /// An accessory was unregistered and its handler stopped.
    Unregistered {
        /// The accessory.
        accessory: StableId,
    },

    /// A characteristic took a new value.
    CharacteristicChanged {
        /// The accessory.
        accessory: StableId,
        /// Which characteristic.
        characteristic: Characteristic,
        /// The new value.
        value: CharacteristicValue,
    },

    /// Accessory information (model, serial, ...) was refreshed.
    InformationUpdated {
        /// The accessory.
        accessory: StableId,
        /// The new information.
        info: AccessoryInfo,
    },
}

impl AccessoryEvent {
    /// Creates a characteristic change event.
    #[must_use]
    pub fn changed(
        accessory: StableId,
        characteristic: Characteristic,
        value: impl Into<CharacteristicValue>,
    ) -> Self {
        Self::CharacteristicChanged {
            accessory,
            characteristic,
            value: value.into(),
        }
    }

    /// Returns the accessory this event is about.
    #[must_use]
    pub fn accessory(&self) -> StableId {
        match self {
            Self::Registered { accessory, .. }
            | Self::Unregistered { accessory }
            | Self::CharacteristicChanged { accessory, .. }
            | Self::InformationUpdated { accessory, .. } => *accessory,
        }
    }

    /// Returns `true` for registration lifecycle events.
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::Registered { .. } | Self::Unregistered { .. })
    }

    /// Returns `true` for characteristic changes.
    #[must_use]
    pub fn is_characteristic_change(&self) -> bool {
        matches!(self, Self::CharacteristicChanged { .. })
    }
}
