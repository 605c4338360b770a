// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory information service values.

use serde::{Deserialize, Serialize};

/// Manufacturer, model and serial shown by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryInfo {
    /// Manufacturer.
    pub manufacturer: String,
    /// Model.
    pub model: String,
    /// Serial number.
    pub serial_number: String,
    /// Firmware revision, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware_revision: Option<String>,
}

impl AccessoryInfo {
    /// Creates information without firmware revision.
    #[must_use]
    pub fn new(
        manufacturer: impl Into<String>,
        model: impl Into<String>,
        serial_number: impl Into<String>,
    ) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            model: model.into(),
            serial_number: serial_number.into(),
            firmware_revision: None,
        }
    }

    /// Sets the firmware revision.
    #[must_use]
    pub fn with_firmware(mut self, revision: impl Into<String>) -> Self {
        self.firmware_revision = Some(revision.into());
        self
    }
}
