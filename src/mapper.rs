// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pure translation from raw snapshots to semantic attributes.
//!
//! Every function here is total over the snapshot's declared field domain:
//! a missing or unrecognized wire value maps to a defined default rather
//! than an error, because the cloud payload shape is not formally versioned.

use crate::state::DeviceSnapshot;
use crate::types::{AirQualityBucket, FanCurve, JobMode, PowerState, WindStrength};

/// Derives the power state from the operation mode.
///
/// Anything other than `POWER_ON` (including an absent field) reads as Off.
#[must_use]
pub fn power(snapshot: &DeviceSnapshot) -> PowerState {
    snapshot
        .operation_mode()
        .and_then(|mode| mode.parse().ok())
        .unwrap_or(PowerState::Off)
}

/// Derives the named fan level, if the reported strength is recognized.
#[must_use]
pub fn fan_level(snapshot: &DeviceSnapshot) -> Option<WindStrength> {
    snapshot
        .wind_strength()
        .and_then(|strength| strength.parse().ok())
}

/// Quantizes the fan level onto the host percentage scale.
///
/// Returns 0 when the device is off, the level is unrecognized, or the
/// curve has no step for it.
#[must_use]
pub fn fan_percent(snapshot: &DeviceSnapshot, curve: &FanCurve) -> u8 {
    if !power(snapshot).is_on() {
        return 0;
    }
    fan_level(snapshot)
        .and_then(|level| curve.percent_for(level))
        .unwrap_or(0)
}

/// Buckets the pollution reading.
///
/// Unmapped or missing ordinals become [`AirQualityBucket::Invalid`].
#[must_use]
pub fn air_quality_bucket(snapshot: &DeviceSnapshot) -> AirQualityBucket {
    AirQualityBucket::from_level(snapshot.pollution_level())
}

/// Returns true if the device reports the sleep job mode.
#[must_use]
pub fn sleep_active(snapshot: &DeviceSnapshot) -> bool {
    snapshot
        .current_job_mode()
        .and_then(|mode| mode.parse::<JobMode>().ok())
        .is_some_and(|mode| mode == JobMode::Sleep)
}
