// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Characteristic publication.
//!
//! Accessories publish [`AccessoryEvent`]s on an [`EventBus`]; the host
//! binding subscribes and forwards them as characteristic updates.
//!
//! # Examples
//!
//! ```
//! use accessory_bridge::StableId;
//! use accessory_bridge::event::{AccessoryEvent, Characteristic, EventBus};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(AccessoryEvent::changed(
//!     StableId::derive("http://lamp/on"),
//!     Characteristic::On,
//!     true,
//! ));
//! ```

mod accessory_event;
mod characteristic;
mod event_bus;

pub use accessory_event::AccessoryEvent;
pub use characteristic::{Characteristic, CharacteristicValue, SubDevice};
pub use event_bus::EventBus;
