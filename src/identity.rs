// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stable accessory identity.

use std::fmt;

use uuid::Uuid;

/// Namespace under which natural keys are hashed.
const BRIDGE_NAMESPACE: Uuid = Uuid::from_u128(0x6f1d_2a0c_5b7e_4c1a_9d3f_8e2b_7a64_c915);

/// Deterministic identifier of an accessory.
///
/// Derived from a device's natural key with a name-based (v5) UUID, so the
/// same key yields the same identity across process restarts. This is what
/// lets a configured device be matched against the accessories the host
/// restored from its cache.
///
/// # Examples
///
/// ```
/// use accessory_bridge::StableId;
///
/// let a = StableId::derive("192.168.1.20");
/// let b = StableId::derive("192.168.1.20");
/// assert_eq!(a, b);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct StableId(Uuid);

impl StableId {
    /// Derives the identity for a natural key.
    #[must_use]
    pub fn derive(key: &str) -> Self {
        Self(Uuid::new_v5(&BRIDGE_NAMESPACE, key.as_bytes()))
    }

    /// Wraps an identity that was persisted by the host.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Debug for StableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = &self.0.to_string()[..8];
        write!(f, "StableId({short}...)")
    }
}

impl fmt::Display for StableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for StableId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<StableId> for Uuid {
    fn from(id: StableId) -> Self {
        id.0
    }
}
