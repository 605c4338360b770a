// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport layer shared by the device clients.
//!
//! - [`HttpClient`]: JSON over HTTP with a bounded request timeout
//! - [`LivenessProbe`]: reachability check run before talking to a host
//!   ([`SystemPing`] is the ICMP implementation)

mod http;
mod ping;

pub use http::{HttpClient, HttpConfig};
pub use ping::{LivenessProbe, SystemPing};

/// Successful HTTP response.
#[derive(Debug, Clone)]
pub struct JsonResponse {
    status: u16,
    body: String,
}

impl JsonResponse {
    /// Creates a response from its status and raw body.
    #[must_use]
    pub fn new(status: u16, body: String) -> Self {
        Self { status, body }
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns the raw body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns error if the JSON cannot be parsed into the target type.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Result<T, crate::error::ParseError> {
        serde_json::from_str(&self.body).map_err(Into::into)
    }
}
