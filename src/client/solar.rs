// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ephemeris client for the sunrisesunset.io API.

use serde::Deserialize;

use crate::config::SolarConfig;
use crate::derived::{Ephemeris, EphemerisPayload};
use crate::error::Result;
use crate::protocol::HttpClient;

#[derive(Debug, Deserialize)]
struct EphemerisResponse {
    results: EphemerisPayload,
}

/// Fetches one day's solar events for a fixed location.
#[derive(Debug, Clone)]
pub struct SolarClient {
    http: HttpClient,
    url: String,
}

impl SolarClient {
    /// Creates a client for the location in `config`.
    #[must_use]
    pub fn new(http: HttpClient, config: &SolarConfig) -> Self {
        let url = format!(
            "{}?lat={}&lng={}&timezone={}&time_format=24",
            config.api_url,
            config.latitude,
            config.longitude,
            urlencoding::encode(&config.timezone)
        );
        Self { http, url }
    }

    /// Returns the request URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetches today's ephemeris.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or a time does not parse.
    pub async fn fetch(&self) -> Result<Ephemeris> {
        let response: EphemerisResponse = self.http.get_json(&self.url).await?;
        Ok(Ephemeris::from_payload(&response.results)?)
    }
}
