// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Siren attached to a security system.

use crate::config::SirenConfig;
use crate::error::Result;
use crate::protocol::HttpClient;

/// Calls the siren's off URL.
#[derive(Debug, Clone)]
pub struct SirenClient {
    http: HttpClient,
    off_url: String,
}

impl SirenClient {
    /// Creates a client with the off URL resolved against the siren host.
    #[must_use]
    pub fn new(http: HttpClient, config: &SirenConfig) -> Self {
        Self {
            http,
            off_url: config.off_endpoint(),
        }
    }

    /// Returns the URL silencing the siren.
    #[must_use]
    pub fn off_url(&self) -> &str {
        &self.off_url
    }

    /// Silences the siren.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn silence(&self) -> Result<()> {
        Ok(self.http.trigger(&self.off_url).await?)
    }
}
