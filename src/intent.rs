// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Requested state changes and their control payloads.

use crate::error::ValueError;
use crate::types::{FanCurve, JobMode, PowerState, WindStrength};

/// An ephemeral requested change to one device.
///
/// An intent exists only for the duration of a coordinator call; it is
/// never persisted and never treated as the device's state. The supported
/// set is closed: power, fan level, sleep mode.
///
/// # Examples
///
/// ```
/// use thinqr_lib::intent::Intent;
/// use thinqr_lib::types::WindStrength;
///
/// let intent = Intent::fan_level(WindStrength::High);
/// assert_eq!(
///     intent.payload(),
///     serde_json::json!({"airFlow": {"windStrength": "HIGH"}})
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Set the operation mode.
    Power(PowerState),
    /// Set the named fan intensity.
    FanLevel(WindStrength),
    /// Enable or disable sleep mode.
    Sleep(bool),
}

impl Intent {
    /// Creates a power intent from the host's boolean switch.
    #[must_use]
    pub fn power(on: bool) -> Self {
        Self::Power(PowerState::from(on))
    }

    /// Creates a fan level intent.
    #[must_use]
    pub const fn fan_level(level: WindStrength) -> Self {
        Self::FanLevel(level)
    }

    /// Creates a sleep mode intent.
    #[must_use]
    pub const fn sleep(active: bool) -> Self {
        Self::Sleep(active)
    }

    /// Builds an intent from a raw host fan percentage.
    ///
    /// A percentage of 0 aliases to a power-off intent: the device model has
    /// no zero-speed state while powered on. Any other value is quantized
    /// onto the curve's named levels.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if the percentage exceeds 100 or the curve is
    /// empty. No remote call is made on validation failure.
    pub fn from_fan_percent(percent: u8, curve: &FanCurve) -> Result<Self, ValueError> {
        if percent == 0 {
            return Ok(Self::Power(PowerState::Off));
        }
        Ok(Self::FanLevel(curve.level_for_percent(percent)?))
    }

    /// Renders the ThinQ control payload for this intent.
    #[must_use]
    pub fn payload(&self) -> serde_json::Value {
        match self {
            Self::Power(state) => serde_json::json!({
                "operation": {"airPurifierOperationMode": state.as_str()}
            }),
            Self::FanLevel(level) => serde_json::json!({
                "airFlow": {"windStrength": level.as_str()}
            }),
            Self::Sleep(active) => serde_json::json!({
                "airPurifierJobMode": {"currentJobMode": JobMode::from(*active).as_str()}
            }),
        }
    }
}
