// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power-related types for ThinQ purifiers.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Represents the operation mode of a purifier.
///
/// # Examples
///
/// ```
/// use thinqr_lib::types::PowerState;
///
/// let on = PowerState::On;
/// let off = PowerState::Off;
///
/// assert_eq!(on.as_str(), "POWER_ON");
/// assert_eq!(off.as_str(), "POWER_OFF");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerState {
    /// Device is powered off.
    Off,
    /// Device is powered on.
    On,
}

impl PowerState {
    /// Returns the ThinQ wire string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "POWER_OFF",
            Self::On => "POWER_ON",
        }
    }

    /// Returns true if the device is powered on.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "POWER_OFF" | "OFF" | "0" | "FALSE" => Ok(Self::Off),
            "POWER_ON" | "ON" | "1" | "TRUE" => Ok(Self::On),
            _ => Err(ValueError::InvalidOperationMode(s.to_string())),
        }
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}
