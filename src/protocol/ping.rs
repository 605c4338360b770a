// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host liveness probe.

use std::fmt;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::ProtocolError;

/// Checks whether a host answers at all, before any HTTP request is made.
#[async_trait]
pub trait LivenessProbe: Send + Sync + fmt::Debug {
    /// Probes `host`, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Unreachable` if the host did not answer and
    /// `ProtocolError::Timeout` if the probe itself hung.
    async fn probe(&self, host: &str, timeout: Duration) -> Result<(), ProtocolError>;
}

/// ICMP echo through the system `ping` binary.
///
/// Sends one echo request with a whole-second wait (at least one second).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPing;

#[async_trait]
impl LivenessProbe for SystemPing {
    async fn probe(&self, host: &str, timeout: Duration) -> Result<(), ProtocolError> {
        if host.is_empty() || host.starts_with('-') {
            return Err(ProtocolError::InvalidAddress(host.to_string()));
        }

        let wait_secs = timeout.as_secs().max(1);
        let child = Command::new("ping")
            .arg("-c")
            .arg("1")
            .arg("-W")
            .arg(wait_secs.to_string())
            .arg(host)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status();

        // ping enforces its own deadline; the outer one only catches a hung process
        let deadline = Duration::from_secs(wait_secs) + Duration::from_secs(1);
        let status = tokio::time::timeout(deadline, child).await.map_err(|_| {
            ProtocolError::Timeout(u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX))
        })?;

        match status {
            Ok(status) if status.success() => Ok(()),
            Ok(_) => Err(ProtocolError::Unreachable(host.to_string())),
            Err(e) => {
                tracing::warn!(host = %host, error = %e, "Failed to run ping");
                Err(ProtocolError::Unreachable(host.to_string()))
            }
        }
    }
}
