// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for ThinQ purifier control.
//!
//! This module provides type-safe representations of the values exchanged
//! with the cloud API and the smart-home host. Constrained types validate at
//! construction time, and every mapping from remote wire values is total.
//!
//! # Types
//!
//! - [`DeviceId`] - Opaque remote device identity with a derived local UUID
//! - [`PowerState`] - On/Off operation mode
//! - [`WindStrength`] - Named fan intensities
//! - [`FanCurve`] - Configurable level-to-percentage mapping
//! - [`AirQualityBucket`] - Semantic pollution buckets
//! - [`JobMode`] - Clean/Sleep job modes

mod air_quality;
mod device_id;
mod fan;
mod job_mode;
mod power;

pub use air_quality::AirQualityBucket;
pub use device_id::DeviceId;
pub use fan::{FanCurve, WindStrength};
pub use job_mode::JobMode;
pub use power::PowerState;
