// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport shared by all device clients.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, ProtocolError};
use crate::protocol::JsonResponse;

// ============================================================================
// HttpConfig
// ============================================================================

/// Configuration of the shared HTTP client.
///
/// # Examples
///
/// ```
/// use accessory_bridge::protocol::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new().with_timeout(Duration::from_secs(5));
/// assert_eq!(config.timeout(), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    timeout: Duration,
    user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn into_client(self) -> Result<HttpClient, ProtocolError> {
        let mut builder = Client::builder().timeout(self.timeout);
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        let client = builder.build().map_err(ProtocolError::Http)?;

        Ok(HttpClient {
            client,
            timeout: self.timeout,
        })
    }
}

// ============================================================================
// HttpClient
// ============================================================================

/// JSON-over-HTTP client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Creates a client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new() -> Result<Self, ProtocolError> {
        HttpConfig::new().into_client()
    }

    /// Returns the configured timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` on transport failure, timeout or a
    /// non-success status.
    pub async fn get(&self, url: &str) -> Result<JsonResponse, ProtocolError> {
        tracing::debug!(url = %url, "Sending HTTP GET");
        self.send(url, self.client.get(url)).await
    }

    /// Sends a GET request and parses the JSON body.
    ///
    /// # Errors
    ///
    /// Returns `Error::Protocol` if the request fails and `Error::Parse` if the
    /// body does not match `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, Error> {
        let response = self.get(url).await?;
        Ok(response.parse()?)
    }

    /// POSTs a JSON body with `Accept`/`Content-Type: application/json`.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` on transport failure, timeout or a
    /// non-success status.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<JsonResponse, ProtocolError> {
        tracing::debug!(url = %url, "Sending HTTP POST");
        let request = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        self.send(url, request).await
    }

    /// Calls a trigger URL, discarding the response body.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails or the status is not a
    /// success.
    pub async fn trigger(&self, url: &str) -> Result<(), ProtocolError> {
        tracing::debug!(url = %url, "Calling trigger URL");
        self.send(url, self.client.get(url)).await.map(|_| ())
    }

    async fn send(&self, url: &str, request: RequestBuilder) -> Result<JsonResponse, ProtocolError> {
        let response = request.send().await.map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProtocolError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await.map_err(|e| self.map_error(e))?;

        tracing::debug!(url = %url, body = %body, "Received HTTP response");

        Ok(JsonResponse::new(status.as_u16(), body))
    }

    fn map_error(&self, error: reqwest::Error) -> ProtocolError {
        if error.is_timeout() {
            let millis = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
            ProtocolError::Timeout(millis)
        } else if error.is_builder() {
            ProtocolError::InvalidAddress(error.to_string())
        } else {
            ProtocolError::Http(error)
        }
    }
}
