// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Job mode type for ThinQ purifiers.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Operating job mode of a purifier.
///
/// # Examples
///
/// ```
/// use thinqr_lib::types::JobMode;
///
/// assert_eq!(JobMode::Sleep.as_str(), "SLEEP");
/// assert_eq!("CLEAN".parse::<JobMode>().unwrap(), JobMode::Clean);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobMode {
    /// Normal purification mode.
    Clean,
    /// Quiet low-power night mode.
    Sleep,
}

impl JobMode {
    /// Returns the ThinQ wire string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Clean => "CLEAN",
            Self::Sleep => "SLEEP",
        }
    }
}

impl fmt::Display for JobMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for JobMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CLEAN" => Ok(Self::Clean),
            "SLEEP" => Ok(Self::Sleep),
            _ => Err(ValueError::InvalidJobMode(s.to_string())),
        }
    }
}

impl From<bool> for JobMode {
    /// Maps the host's boolean sleep switch onto a job mode.
    fn from(sleep: bool) -> Self {
        if sleep { Self::Sleep } else { Self::Clean }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_mode_as_str() {
        assert_eq!(JobMode::Clean.as_str(), "CLEAN");
        assert_eq!(JobMode::Sleep.as_str(), "SLEEP");
    }

    #[test]
    fn job_mode_from_str() {
        assert_eq!("CLEAN".parse::<JobMode>().unwrap(), JobMode::Clean);
        assert_eq!("sleep".parse::<JobMode>().unwrap(), JobMode::Sleep);
    }

    #[test]
    fn job_mode_from_str_invalid() {
        let result = "PARTY".parse::<JobMode>();
        assert!(matches!(result.unwrap_err(), ValueError::InvalidJobMode(_)));
    }

    #[test]
    fn job_mode_from_bool() {
        assert_eq!(JobMode::from(true), JobMode::Sleep);
        assert_eq!(JobMode::from(false), JobMode::Clean);
    }
}
