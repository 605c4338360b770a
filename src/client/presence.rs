// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TV presence client: liveness probe, then status API.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;
use crate::protocol::{HttpClient, LivenessProbe};

/// `device` object of the status API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TvDevice {
    /// `on` while the screen is on.
    #[serde(rename = "PowerState")]
    pub power_state: String,
    /// Device type, e.g. `Samsung SmartTV`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Model name.
    #[serde(rename = "modelName")]
    pub model_name: String,
    /// Device identifier (`uuid:...`).
    pub id: String,
}

impl TvDevice {
    /// Whether the TV reports itself as on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.power_state == "on"
    }

    /// Serial number shown to the host: the id without its 5-character prefix.
    #[must_use]
    pub fn serial_number(&self) -> &str {
        self.id.get(5..).unwrap_or("")
    }
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    device: TvDevice,
}

/// Result of one presence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceReading {
    /// The host did not answer the probe.
    Unreachable,
    /// The host answered and reported its status.
    Reachable(TvDevice),
}

/// Client for one TV.
#[derive(Debug, Clone)]
pub struct PresenceClient {
    http: HttpClient,
    probe: Arc<dyn LivenessProbe>,
    host: String,
    status_url: String,
    probe_timeout: Duration,
}

impl PresenceClient {
    /// Creates a client probing `host` and reading `status_url`.
    #[must_use]
    pub fn new(
        http: HttpClient,
        probe: Arc<dyn LivenessProbe>,
        host: impl Into<String>,
        status_url: impl Into<String>,
        probe_timeout: Duration,
    ) -> Self {
        Self {
            http,
            probe,
            host: host.into(),
            status_url: status_url.into(),
            probe_timeout,
        }
    }

    /// Probes the host and, when reachable, reads its status.
    ///
    /// # Errors
    ///
    /// Returns error only if the host is reachable but the status request
    /// fails; an unreachable host is a regular reading.
    pub async fn check(&self) -> Result<PresenceReading> {
        if let Err(e) = self.probe.probe(&self.host, self.probe_timeout).await {
            tracing::debug!(host = %self.host, error = %e, "Host did not answer probe");
            return Ok(PresenceReading::Unreachable);
        }

        let response: StatusResponse = self.http.get_json(&self.status_url).await?;
        Ok(PresenceReading::Reachable(response.device))
    }
}
