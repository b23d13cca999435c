// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan intensity types for ThinQ purifiers.
//!
//! The purifier exposes a small set of named wind strengths rather than a
//! continuous speed. [`FanCurve`] maps those named levels onto the percentage
//! scale smart-home hosts use, as an explicit table instead of inlined
//! constants so deployments can tune the mapping.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Named fan intensity of a purifier.
///
/// # Examples
///
/// ```
/// use thinqr_lib::types::WindStrength;
///
/// assert_eq!(WindStrength::Mid.as_str(), "MID");
/// assert_eq!("HIGH".parse::<WindStrength>().unwrap(), WindStrength::High);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindStrength {
    /// Device picks the intensity based on measured air quality.
    Auto,
    /// Lowest fixed intensity.
    Low,
    /// Medium fixed intensity.
    Mid,
    /// High fixed intensity.
    High,
    /// Maximum fixed intensity.
    Power,
}

impl WindStrength {
    /// Returns the ThinQ wire string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::Low => "LOW",
            Self::Mid => "MID",
            Self::High => "HIGH",
            Self::Power => "POWER",
        }
    }
}

impl fmt::Display for WindStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WindStrength {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AUTO" => Ok(Self::Auto),
            "LOW" => Ok(Self::Low),
            "MID" | "MEDIUM" => Ok(Self::Mid),
            "HIGH" => Ok(Self::High),
            "POWER" | "TURBO" => Ok(Self::Power),
            _ => Err(ValueError::InvalidWindStrength(s.to_string())),
        }
    }
}

/// Mapping between named wind strengths and host percentage steps.
///
/// The table is configuration, not a constant: different host integrations
/// disagree on where the named levels should sit on the 0-100 scale, and on
/// whether AUTO appears at all. The default places the four fixed levels at
/// even 25-point steps and leaves AUTO out; use
/// [`with_auto`](Self::with_auto) to opt it in at a chosen position.
///
/// # Examples
///
/// ```
/// use thinqr_lib::types::{FanCurve, WindStrength};
///
/// let curve = FanCurve::default();
/// assert_eq!(curve.percent_for(WindStrength::Mid), Some(50));
/// assert_eq!(curve.level_for_percent(60).unwrap(), WindStrength::Mid);
///
/// // Opting AUTO in at 20%.
/// let curve = FanCurve::default().with_auto(20);
/// assert_eq!(curve.level_for_percent(15).unwrap(), WindStrength::Auto);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanCurve {
    steps: Vec<(WindStrength, u8)>,
}

impl FanCurve {
    /// Maximum percentage a host may request.
    pub const MAX_PERCENT: u8 = 100;

    /// Creates a curve from explicit steps.
    ///
    /// Steps are kept sorted by percentage; duplicate levels are allowed but
    /// the first match wins on lookup.
    #[must_use]
    pub fn new(mut steps: Vec<(WindStrength, u8)>) -> Self {
        steps.sort_by_key(|&(_, pct)| pct);
        Self { steps }
    }

    /// Adds (or moves) the AUTO level at the given percentage.
    #[must_use]
    pub fn with_auto(mut self, percent: u8) -> Self {
        self.steps.retain(|&(level, _)| level != WindStrength::Auto);
        self.steps.push((WindStrength::Auto, percent));
        self.steps.sort_by_key(|&(_, pct)| pct);
        self
    }

    /// Returns the configured steps, sorted by percentage.
    #[must_use]
    pub fn steps(&self) -> &[(WindStrength, u8)] {
        &self.steps
    }

    /// Returns the percentage configured for a named level.
    #[must_use]
    pub fn percent_for(&self, level: WindStrength) -> Option<u8> {
        self.steps
            .iter()
            .find(|&&(step, _)| step == level)
            .map(|&(_, pct)| pct)
    }

    /// Quantizes a host percentage to the nearest named level.
    ///
    /// Ties resolve to the lower step.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `percent` exceeds 100 and
    /// `ValueError::EmptyFanCurve` if the curve has no steps.
    pub fn level_for_percent(&self, percent: u8) -> Result<WindStrength, ValueError> {
        if percent > Self::MAX_PERCENT {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: u16::from(Self::MAX_PERCENT),
                actual: u16::from(percent),
            });
        }

        let mut best: Option<(WindStrength, u8)> = None;
        for &(level, pct) in &self.steps {
            let distance = percent.abs_diff(pct);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((level, distance)),
            }
        }

        best.map(|(level, _)| level)
            .ok_or(ValueError::EmptyFanCurve)
    }
}

impl Default for FanCurve {
    fn default() -> Self {
        Self::new(vec![
            (WindStrength::Low, 25),
            (WindStrength::Mid, 50),
            (WindStrength::High, 75),
            (WindStrength::Power, 100),
        ])
    }
}
