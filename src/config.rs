// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge configuration.

use std::time::Duration;

use crate::error::ConfigError;
use crate::types::FanCurve;

/// Configuration for the purifier bridge.
///
/// `region`, `country_code` and `token` are the gateway credentials; they are
/// validated at startup and missing values are fatal. `interval` doubles as
/// the state cache's minimum refresh interval and the default poll cadence,
/// tuned to stay under the cloud API's request-rate ceiling.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use thinqr_lib::config::BridgeConfig;
///
/// let config = BridgeConfig::new("eu", "DE", "personal-access-token")
///     .with_interval(Duration::from_secs(45));
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.interval(), Duration::from_secs(45));
/// ```
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    region: String,
    country_code: String,
    token: String,
    interval: Duration,
    timeout: Duration,
    fan_curve: FanCurve,
}

impl BridgeConfig {
    /// Default poll / rate-gate interval.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);
    /// Default per-request timeout for gateway calls.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration from the gateway credentials.
    #[must_use]
    pub fn new(
        region: impl Into<String>,
        country_code: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            country_code: country_code.into(),
            token: token.into(),
            interval: Self::DEFAULT_INTERVAL,
            timeout: Self::DEFAULT_TIMEOUT,
            fan_curve: FanCurve::default(),
        }
    }

    /// Sets the poll / rate-gate interval.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the per-request timeout for gateway calls.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the fan level-to-percentage curve.
    #[must_use]
    pub fn with_fan_curve(mut self, curve: FanCurve) -> Self {
        self.fan_curve = curve;
        self
    }

    /// Returns the API region (e.g. `eu`, `us`, `kr`).
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Returns the ISO country code sent with every request.
    #[must_use]
    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// Returns the personal access token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the poll / rate-gate interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the configured fan curve.
    #[must_use]
    pub fn fan_curve(&self) -> &FanCurve {
        &self.fan_curve
    }

    /// Validates that all required credential values are present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` naming the first absent value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region.trim().is_empty() {
            return Err(ConfigError::Missing("region"));
        }
        if self.country_code.trim().is_empty() {
            return Err(ConfigError::Missing("country_code"));
        }
        if self.token.trim().is_empty() {
            return Err(ConfigError::Missing("token"));
        }
        Ok(())
    }
}
