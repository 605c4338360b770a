// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP switch client.

use serde::Deserialize;

use crate::error::{ProtocolError, Result};
use crate::protocol::HttpClient;

#[derive(Debug, Deserialize)]
struct SwitchStatus {
    status: bool,
}

/// Client for a switch driven by three URLs.
#[derive(Debug, Clone)]
pub struct SwitchClient {
    http: HttpClient,
    state_url: Option<String>,
    on_url: Option<String>,
    off_url: Option<String>,
}

impl SwitchClient {
    /// Creates a client; any URL may be absent.
    #[must_use]
    pub fn new(
        http: HttpClient,
        state_url: Option<String>,
        on_url: Option<String>,
        off_url: Option<String>,
    ) -> Self {
        Self {
            http,
            state_url,
            on_url,
            off_url,
        }
    }

    /// Whether a state URL is configured.
    #[must_use]
    pub fn has_state_url(&self) -> bool {
        self.state_url.is_some()
    }

    /// Reads `{status: bool}` from the state URL.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` without a state URL and an
    /// error if the request or parsing fails.
    pub async fn state(&self) -> Result<bool> {
        let url = self
            .state_url
            .as_deref()
            .ok_or_else(|| ProtocolError::InvalidAddress("no stateUrl configured".to_string()))?;
        let status: SwitchStatus = self.http.get_json(url).await?;
        Ok(status.status)
    }

    /// Calls the on or off URL.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` if the URL is missing and an
    /// error if the request fails.
    pub async fn switch(&self, on: bool) -> Result<()> {
        let (url, name) = if on {
            (self.on_url.as_deref(), "onUrl")
        } else {
            (self.off_url.as_deref(), "offUrl")
        };
        let url =
            url.ok_or_else(|| ProtocolError::InvalidAddress(format!("no {name} configured")))?;
        self.http.trigger(url).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn missing_urls_are_reported() {
        let client = SwitchClient::new(HttpClient::new().unwrap(), None, None, None);
        assert!(!client.has_state_url());
        assert!(matches!(
            client.state().await,
            Err(Error::Protocol(ProtocolError::InvalidAddress(_)))
        ));
        assert!(matches!(
            client.switch(true).await,
            Err(Error::Protocol(ProtocolError::InvalidAddress(msg))) if msg.contains("onUrl")
        ));
    }
}
