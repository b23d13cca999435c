// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Air quality bucket type.

use std::fmt;

/// Semantic air quality bucket derived from the purifier's pollution sensor.
///
/// The remote API reports a small pollution-level ordinal; anything outside
/// the known range (including a missing reading) maps to [`Invalid`]
/// (`Self::Invalid`) because the payload shape is not formally versioned and
/// must never fail a read.
///
/// # Examples
///
/// ```
/// use thinqr_lib::types::AirQualityBucket;
///
/// assert_eq!(AirQualityBucket::from_level(Some(1)), AirQualityBucket::Good);
/// assert_eq!(AirQualityBucket::from_level(Some(9)), AirQualityBucket::Invalid);
/// assert_eq!(AirQualityBucket::from_level(None), AirQualityBucket::Invalid);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AirQualityBucket {
    /// Reading absent or outside the known ordinal range.
    Invalid,
    /// Pollution level 1.
    Good,
    /// Pollution level 2.
    Normal,
    /// Pollution level 3.
    Bad,
    /// Pollution level 4.
    VeryBad,
}

impl AirQualityBucket {
    /// Maps a remote pollution-level ordinal to a bucket.
    ///
    /// Total over all inputs: unmapped ordinals become `Invalid`.
    #[must_use]
    pub const fn from_level(level: Option<i64>) -> Self {
        match level {
            Some(1) => Self::Good,
            Some(2) => Self::Normal,
            Some(3) => Self::Bad,
            Some(4) => Self::VeryBad,
            _ => Self::Invalid,
        }
    }

    /// Returns true if the sensor produced a usable reading.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Invalid)
    }
}

impl fmt::Display for AirQualityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Invalid => "INVALID",
            Self::Good => "GOOD",
            Self::Normal => "NORMAL",
            Self::Bad => "BAD",
            Self::VeryBad => "VERY_BAD",
        };
        write!(f, "{label}")
    }
}
