// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cloud temperature/humidity sensor client.

use serde::Deserialize;

use crate::error::{ParseError, ProtocolError, Result};
use crate::protocol::HttpClient;

/// One normalized sensor reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// Temperature in °C.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
}

#[derive(Debug, Deserialize)]
struct SensorEnvelope {
    status: i64,
    #[serde(default)]
    data: Vec<SensorSample>,
}

#[derive(Debug, Deserialize)]
struct SensorSample {
    temperature: f64,
    // fraction 0..1
    #[serde(default)]
    humidity: Option<f64>,
}

/// Client for one sensor, `GET {base}/devices/{uuid}/data`.
#[derive(Debug, Clone)]
pub struct SensorClient {
    http: HttpClient,
    url: String,
}

impl SensorClient {
    /// Creates a client for the sensor `uuid` under `api_base`.
    #[must_use]
    pub fn new(http: HttpClient, api_base: &str, uuid: &str) -> Self {
        let url = format!(
            "{}/devices/{}/data",
            api_base.trim_end_matches('/'),
            urlencoding::encode(uuid)
        );
        Self { http, url }
    }

    /// Returns the data URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetches the latest reading.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` on transport failure or an HTTP status other
    /// than 200, and `Error::Parse` when the envelope reports a failure or
    /// carries no data.
    pub async fn fetch(&self) -> Result<SensorReading> {
        let response = self.http.get(&self.url).await?;
        if response.status() != 200 {
            return Err(ProtocolError::Status {
                status: response.status(),
                reason: "expected 200".to_string(),
            }
            .into());
        }
        let envelope: SensorEnvelope = response.parse()?;

        if envelope.status != 200 {
            return Err(ParseError::UnexpectedFormat(format!(
                "envelope status {}",
                envelope.status
            ))
            .into());
        }

        let sample = envelope
            .data
            .first()
            .ok_or_else(|| ParseError::MissingField("data[0]".to_string()))?;

        Ok(SensorReading {
            temperature: sample.temperature,
            humidity: sample.humidity.unwrap_or(0.0) * 100.0,
        })
    }
}
