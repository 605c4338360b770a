// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the accessory bridge.
//!
//! The hierarchy mirrors the failure classes the bridge deals with: upstream
//! transport failures, malformed upstream payloads, configuration problems and
//! out-of-range characteristic values. Transient upstream failures are caught
//! and logged at the accessory layer; they only reach the host through the
//! thermostat get-handlers.

use thiserror::Error;

use crate::event::Characteristic;
use crate::identity::StableId;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred while talking to a device or upstream service.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing an upstream response.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No active accessory carries the given identity.
    #[error("accessory {0} not found")]
    AccessoryNotFound(StableId),

    /// The accessory does not expose the requested characteristic.
    #[error("characteristic {0} is not supported by this accessory")]
    UnsupportedCharacteristic(Characteristic),
}

/// Errors related to characteristic value validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
        /// The actual value that was provided.
        actual: f64,
    },

    /// A value does not fall on the allowed step grid.
    #[error("value {actual} is not a multiple of {step}")]
    InvalidStep {
        /// The required step size.
        step: f64,
        /// The actual value that was provided.
        actual: f64,
    },

    /// An enumerated state code is unknown.
    #[error("invalid {kind} code: {code}")]
    InvalidState {
        /// The enumeration the code was meant for.
        kind: &'static str,
        /// The offending code.
        code: i64,
    },

    /// The value has the wrong shape for the characteristic.
    #[error("expected a {expected} value")]
    WrongType {
        /// Human readable name of the expected shape.
        expected: &'static str,
    },
}

/// Errors related to HTTP and ICMP communication.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("unexpected status: HTTP {status} - {reason}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// Canonical reason phrase, when known.
        reason: String,
    },

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The host did not answer the liveness probe.
    #[error("host {0} is unreachable")]
    Unreachable(String),
}

/// Errors related to parsing upstream responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// Unexpected response format.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// Errors related to the platform configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The device kind or sub-type is not handled by the bridge.
    #[error("device type '{sub_type}' is invalid for {kind}")]
    UnsupportedKind {
        /// The device kind (e.g. `presenceDetector`).
        kind: &'static str,
        /// The sub-type found in the configuration.
        sub_type: String,
    },

    /// A required entry or field is missing.
    #[error("{device}: missing {entry}")]
    MissingEntry {
        /// Display name of the device.
        device: String,
        /// The missing entry.
        entry: String,
    },

    /// The configuration file could not be read or parsed.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
