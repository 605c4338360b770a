// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat REST client.
//!
//! Every endpoint lives under one base URL and exchanges `{"value": ...}`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, ParseError, Result};
use crate::event::{Characteristic, SubDevice};
use crate::protocol::HttpClient;
use crate::types::{HeatingCoolingState, TargetTemperature};

#[derive(Debug, Deserialize)]
struct ValueBody {
    value: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ValueRequest<T> {
    value: T,
}

/// Client for one thermostat.
#[derive(Debug, Clone)]
pub struct ThermostatClient {
    http: HttpClient,
    base_url: String,
}

impl ThermostatClient {
    /// Creates a client for the API rooted at `base_url`.
    #[must_use]
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Returns the API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    async fn read(&self, endpoint: &str) -> Result<serde_json::Value> {
        let url = self.url(endpoint);
        match self.http.get_json::<ValueBody>(&url).await {
            Ok(body) => Ok(body.value),
            Err(e) => {
                tracing::error!(url = %url, error = %e, "Error while retrieving data from thermostat");
                Err(e)
            }
        }
    }

    async fn read_number(&self, endpoint: &str) -> Result<f64> {
        let value = self.read(endpoint).await?;
        value.as_f64().ok_or_else(|| {
            ParseError::InvalidValue {
                field: endpoint.to_string(),
                message: format!("expected a number, got {value}"),
            }
            .into()
        })
    }

    // whole numbers only, so the float cast is exact
    #[allow(clippy::cast_possible_truncation)]
    async fn read_code(&self, endpoint: &str) -> Result<i64> {
        let value = self.read(endpoint).await?;
        value
            .as_i64()
            .or_else(|| value.as_f64().filter(|v| v.fract() == 0.0).map(|v| v as i64))
            .ok_or_else(|| {
                ParseError::InvalidValue {
                    field: endpoint.to_string(),
                    message: format!("expected a state code, got {value}"),
                }
                .into()
            })
    }

    async fn write<T: Serialize>(&self, endpoint: &str, value: T) -> Result<()> {
        let url = self.url(endpoint);
        self.http
            .post_json(&url, &ValueRequest { value })
            .await
            .map(|_| ())
            .map_err(|e| {
                tracing::error!(url = %url, error = %e, "Error while sending data to thermostat");
                e.into()
            })
    }

    /// Reads the current heating/cooling state.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the code is unknown.
    pub async fn current_state(&self) -> Result<HeatingCoolingState> {
        let code = self.read_code("current-state").await?;
        Ok(HeatingCoolingState::current_from_code(code)?)
    }

    /// Reads the target heating/cooling state.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the code is unknown.
    pub async fn target_state(&self) -> Result<HeatingCoolingState> {
        let code = self.read_code("target-state").await?;
        Ok(HeatingCoolingState::target_from_code(code)?)
    }

    /// Requests a heating/cooling mode.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn set_target_state(&self, state: HeatingCoolingState) -> Result<()> {
        self.write("target-state", state.code()).await
    }

    /// Reads the measured temperature in °C.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn current_temperature(&self) -> Result<f64> {
        self.read_number("current-temperature").await
    }

    /// Reads the setpoint in °C.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn target_temperature(&self) -> Result<f64> {
        self.read_number("target-temperature").await
    }

    /// Changes the setpoint.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn set_target_temperature(&self, temperature: TargetTemperature) -> Result<()> {
        self.write("target-temperature", temperature.celsius()).await
    }

    /// Reads the relative humidity in percent.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn current_humidity(&self) -> Result<f64> {
        Ok(self.read_number("current-relative-humidity").await? * 100.0)
    }

    /// Reads whether a valve is active or an outlet is on.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the value is not boolean-like.
    pub async fn sub_device(&self, sub: SubDevice) -> Result<bool> {
        let value = self.read(sub.endpoint()).await?;
        match &value {
            serde_json::Value::Bool(on) => Ok(*on),
            serde_json::Value::Number(n) => Ok(n.as_f64().is_some_and(|v| v != 0.0)),
            _ => Err(ParseError::InvalidValue {
                field: sub.endpoint().to_string(),
                message: format!("expected 0/1 or a boolean, got {value}"),
            }
            .into()),
        }
    }

    /// Opens or closes the water valve.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedCharacteristic` for read-only sub-devices
    /// and an error if the request fails.
    pub async fn set_sub_device(&self, sub: SubDevice, active: bool) -> Result<()> {
        if !sub.is_writable() {
            return Err(Error::UnsupportedCharacteristic(Characteristic::SubDevice(sub)));
        }
        self.write(sub.endpoint(), u8::from(active)).await
    }
}
