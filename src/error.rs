// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `ThinqR` library.
//!
//! This module provides a comprehensive error hierarchy for handling failures
//! across the library: cloud transport, payload parsing, value validation,
//! and startup configuration.

use thiserror::Error;

/// The main error type for this library.
///
/// This enum encompasses all possible errors that can occur when bridging
/// ThinQ devices into the local model.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred while talking to the ThinQ cloud API.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Error occurred while parsing a cloud payload.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Required configuration is missing or invalid at startup.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Device is not known to the registry or cache.
    #[error("device not found")]
    DeviceNotFound,
}

/// Errors related to cloud API communication.
///
/// Transport errors are non-fatal: they are surfaced to the caller of the
/// failing operation and never corrupt cached state.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (network error or timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status code.
    #[error("API returned HTTP {status}")]
    Status {
        /// The HTTP status code returned.
        status: u16,
    },

    /// The API rejected the request at its rate ceiling.
    #[error("API rate limit exceeded")]
    RateLimited,
}

/// Errors related to parsing ThinQ payloads.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response envelope.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// Unexpected response format.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// Errors related to value validation and constraints.
///
/// These errors occur when an intent or a constrained value is built from
/// untrusted input; no remote call is made once validation fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// An invalid operation mode string was provided.
    #[error("invalid operation mode: {0}")]
    InvalidOperationMode(String),

    /// An invalid wind strength string was provided.
    #[error("invalid wind strength: {0}")]
    InvalidWindStrength(String),

    /// An invalid job mode string was provided.
    #[error("invalid job mode: {0}")]
    InvalidJobMode(String),

    /// The fan curve has no steps to quantize against.
    #[error("fan curve is empty")]
    EmptyFanCurve,
}

/// Errors related to startup configuration.
///
/// Configuration errors are fatal: no core operation proceeds without the
/// gateway credentials.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required configuration value is missing.
    #[error("missing required configuration value: {0}")]
    Missing(&'static str),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
