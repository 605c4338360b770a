// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host collaborator seams.
//!
//! The host platform owns the accessory cache. The bridge only talks to it
//! through [`AccessoryRegistry`]; [`MemoryRegistry`] is an in-process
//! implementation used by the demo and the tests.

use parking_lot::Mutex;

use crate::identity::StableId;
use crate::reconcile::AccessoryRecord;

/// Plugin identifier passed with every registry call.
pub const PLUGIN_NAME: &str = "homebridge-neo-platform";

/// Platform identifier passed with every registry call.
pub const PLATFORM_NAME: &str = "HomebridgeNeoPlatform";

/// Host-side accessory registry.
pub trait AccessoryRegistry: Send + Sync {
    /// Registers new accessories with the host.
    fn register(&self, plugin: &str, platform: &str, accessories: &[AccessoryRecord]);

    /// Removes accessories from the host and its cache.
    fn unregister(&self, plugin: &str, platform: &str, accessories: &[AccessoryRecord]);
}

/// One call made against a [`MemoryRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCall {
    /// `register` with these identities.
    Register(Vec<StableId>),
    /// `unregister` with these identities.
    Unregister(Vec<StableId>),
}

#[derive(Debug, Default)]
struct MemoryInner {
    accessories: Vec<AccessoryRecord>,
    calls: Vec<RegistryCall>,
}

/// In-memory registry that behaves like a host cache.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    inner: Mutex<MemoryInner>,
}

impl MemoryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-populated as if restored from a cache.
    #[must_use]
    pub fn with_cached(accessories: Vec<AccessoryRecord>) -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                accessories,
                calls: Vec::new(),
            }),
        }
    }

    /// Accessories currently registered.
    #[must_use]
    pub fn accessories(&self) -> Vec<AccessoryRecord> {
        self.inner.lock().accessories.clone()
    }

    /// Every register/unregister call, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RegistryCall> {
        self.inner.lock().calls.clone()
    }
}

impl AccessoryRegistry for MemoryRegistry {
    fn register(&self, plugin: &str, platform: &str, accessories: &[AccessoryRecord]) {
        tracing::debug!(plugin, platform, count = accessories.len(), "register");
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(RegistryCall::Register(accessories.iter().map(|a| a.id).collect()));
        inner.accessories.extend_from_slice(accessories);
    }

    fn unregister(&self, plugin: &str, platform: &str, accessories: &[AccessoryRecord]) {
        tracing::debug!(plugin, platform, count = accessories.len(), "unregister");
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(RegistryCall::Unregister(accessories.iter().map(|a| a.id).collect()));
        inner
            .accessories
            .retain(|kept| !accessories.iter().any(|gone| gone.id == kept.id));
    }
}
