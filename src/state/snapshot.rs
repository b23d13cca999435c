// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for ThinQ device state payloads.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Raw state payload for one purifier as of one fetch.
///
/// A snapshot is replaced wholesale on each successful refresh; it is never
/// partially merged. Every remote field is optional because the cloud payload
/// shape is not formally versioned — readers must tolerate missing
/// sub-objects rather than fail.
///
/// # Examples
///
/// ```
/// use thinqr_lib::state::DeviceSnapshot;
///
/// let json = r#"{
///     "operation": {"airPurifierOperationMode": "POWER_ON"},
///     "airFlow": {"windStrength": "MID"},
///     "airQualitySensor": {"totalPollution": 2, "PM2": 12.0, "PM10": 21.0},
///     "airPurifierJobMode": {"currentJobMode": "CLEAN"}
/// }"#;
/// let snapshot: DeviceSnapshot = serde_json::from_str(json).unwrap();
///
/// assert_eq!(snapshot.operation_mode(), Some("POWER_ON"));
/// assert_eq!(snapshot.wind_strength(), Some("MID"));
/// assert_eq!(snapshot.pollution_level(), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeviceSnapshot {
    /// Operation sub-object (power mode).
    #[serde(default)]
    operation: Option<OperationState>,

    /// Air flow sub-object (wind strength).
    #[serde(rename = "airFlow", default)]
    air_flow: Option<AirFlowState>,

    /// Air quality sensor readings.
    #[serde(rename = "airQualitySensor", default)]
    air_quality: Option<AirQualityState>,

    /// Job mode sub-object (clean/sleep).
    #[serde(rename = "airPurifierJobMode", default)]
    job_mode: Option<JobModeState>,

    /// When this snapshot was captured locally.
    #[serde(skip, default = "Utc::now")]
    captured_at: DateTime<Utc>,
}

/// Operation mode payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
struct OperationState {
    #[serde(rename = "airPurifierOperationMode", default)]
    mode: Option<String>,
}

/// Air flow payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
struct AirFlowState {
    #[serde(rename = "windStrength", default)]
    wind_strength: Option<String>,
}

/// Air quality sensor payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
struct AirQualityState {
    /// Pollution bucket ordinal reported by the device.
    #[serde(rename = "totalPollution", default)]
    total_pollution: Option<i64>,

    /// PM1 concentration in µg/m³.
    #[serde(rename = "PM1", default)]
    pm1: Option<f64>,

    /// PM2.5 concentration in µg/m³.
    #[serde(rename = "PM2", default)]
    pm2: Option<f64>,

    /// PM10 concentration in µg/m³.
    #[serde(rename = "PM10", default)]
    pm10: Option<f64>,
}

/// Job mode payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
struct JobModeState {
    #[serde(rename = "currentJobMode", default)]
    current_job_mode: Option<String>,
}

impl DeviceSnapshot {
    /// Returns the raw operation mode string, if reported.
    #[must_use]
    pub fn operation_mode(&self) -> Option<&str> {
        self.operation.as_ref()?.mode.as_deref()
    }

    /// Returns the raw wind strength string, if reported.
    #[must_use]
    pub fn wind_strength(&self) -> Option<&str> {
        self.air_flow.as_ref()?.wind_strength.as_deref()
    }

    /// Returns the pollution bucket ordinal, if reported.
    #[must_use]
    pub fn pollution_level(&self) -> Option<i64> {
        self.air_quality.as_ref()?.total_pollution
    }

    /// Returns the PM1 concentration in µg/m³, if reported.
    #[must_use]
    pub fn pm1(&self) -> Option<f64> {
        self.air_quality.as_ref()?.pm1
    }

    /// Returns the PM2.5 concentration in µg/m³, if reported.
    #[must_use]
    pub fn pm2_5(&self) -> Option<f64> {
        self.air_quality.as_ref()?.pm2
    }

    /// Returns the PM10 concentration in µg/m³, if reported.
    #[must_use]
    pub fn pm10(&self) -> Option<f64> {
        self.air_quality.as_ref()?.pm10
    }

    /// Returns the raw job mode string, if reported.
    #[must_use]
    pub fn current_job_mode(&self) -> Option<&str> {
        self.job_mode.as_ref()?.current_job_mode.as_deref()
    }

    /// Returns when this snapshot was captured locally.
    #[must_use]
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }
}
