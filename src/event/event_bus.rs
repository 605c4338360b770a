// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting accessory events.

use tokio::sync::broadcast;

use super::AccessoryEvent;

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Broadcasts accessory events to any number of subscribers.
///
/// A slow subscriber that falls more than the channel capacity behind
/// receives `RecvError::Lagged` and loses the oldest events.
///
/// # Examples
///
/// ```
/// use accessory_bridge::StableId;
/// use accessory_bridge::event::{AccessoryEvent, EventBus};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(AccessoryEvent::Unregistered {
///     accessory: StableId::derive("old"),
/// });
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AccessoryEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AccessoryEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event; dropped silently when nobody listens.
    pub fn publish(&self, event: AccessoryEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
