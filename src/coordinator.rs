// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command dispatch and state reconciliation.
//!
//! The coordinator never mutates local state optimistically. A successful
//! write is followed by a forced cache refresh, and the state re-read from
//! the remote system is what callers receive: a command the cloud accepted
//! but the device did not fully apply surfaces as a mismatch warning, with
//! the observed state winning.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::Error;
use crate::gateway::Gateway;
use crate::intent::Intent;
use crate::mapper;
use crate::state::{DeviceSnapshot, StateCache};
use crate::types::{AirQualityBucket, DeviceId, FanCurve, PowerState, WindStrength};

/// Semantic device state re-read from the remote system after a command.
///
/// This is ground truth: it reflects what the device reports, not what was
/// requested.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedState {
    /// Confirmed power state.
    pub power: PowerState,
    /// Confirmed named fan level, if recognized.
    pub fan_level: Option<WindStrength>,
    /// Confirmed fan level on the host percentage scale.
    pub fan_percent: u8,
    /// Confirmed air quality bucket.
    pub air_quality: AirQualityBucket,
    /// Whether sleep mode is active.
    pub sleep_active: bool,
    /// When the confirming snapshot was captured.
    pub captured_at: DateTime<Utc>,
}

impl ConfirmedState {
    /// Derives the confirmed state from a snapshot via the attribute mapper.
    #[must_use]
    pub fn from_snapshot(snapshot: &DeviceSnapshot, curve: &FanCurve) -> Self {
        Self {
            power: mapper::power(snapshot),
            fan_level: mapper::fan_level(snapshot),
            fan_percent: mapper::fan_percent(snapshot, curve),
            air_quality: mapper::air_quality_bucket(snapshot),
            sleep_active: mapper::sleep_active(snapshot),
            captured_at: snapshot.captured_at(),
        }
    }
}

/// Returns true if the confirmed state satisfies the requested intent.
fn satisfies(intent: &Intent, confirmed: &ConfirmedState) -> bool {
    match intent {
        Intent::Power(state) => confirmed.power == *state,
        Intent::FanLevel(level) => confirmed.fan_level == Some(*level),
        Intent::Sleep(active) => confirmed.sleep_active == *active,
    }
}

/// Dispatches intents and reconciles the outcome against remote truth.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use thinqr_lib::config::BridgeConfig;
/// use thinqr_lib::coordinator::CommandCoordinator;
/// use thinqr_lib::gateway::ThinqClient;
/// use thinqr_lib::intent::Intent;
/// use thinqr_lib::state::StateCache;
/// use thinqr_lib::types::{DeviceId, FanCurve};
///
/// # async fn example() -> thinqr_lib::Result<()> {
/// let config = BridgeConfig::new("eu", "DE", "token");
/// let gateway = Arc::new(ThinqClient::new(&config)?);
/// let cache = Arc::new(StateCache::new(Arc::clone(&gateway), Duration::from_secs(30)));
/// let coordinator =
///     CommandCoordinator::new(gateway, cache, Arc::new(FanCurve::default()));
///
/// let confirmed = coordinator
///     .apply(&DeviceId::new("purifier-1"), Intent::power(true))
///     .await?;
/// println!("device reports {}", confirmed.power);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CommandCoordinator<G> {
    gateway: Arc<G>,
    cache: Arc<StateCache<G>>,
    curve: Arc<FanCurve>,
}

impl<G: Gateway> CommandCoordinator<G> {
    /// Creates a coordinator writing through the gateway and confirming
    /// through the cache.
    #[must_use]
    pub fn new(gateway: Arc<G>, cache: Arc<StateCache<G>>, curve: Arc<FanCurve>) -> Self {
        Self {
            gateway,
            cache,
            curve,
        }
    }

    /// Returns the fan curve used for confirmation.
    #[must_use]
    pub fn curve(&self) -> &FanCurve {
        &self.curve
    }

    /// Applies an intent and returns the confirmed state.
    ///
    /// On write failure the error propagates without a cache refresh: the
    /// remote state is unknown but, from the local model's perspective,
    /// unchanged. On write success the cache is force-refreshed and the
    /// re-read state is returned; a mismatch with the intent is logged as a
    /// warning, not an error.
    ///
    /// # Errors
    ///
    /// Propagates gateway write failures and the confirming read failure.
    pub async fn apply(&self, device_id: &DeviceId, intent: Intent) -> Result<ConfirmedState, Error> {
        let payload = intent.payload();

        tracing::debug!(device_id = %device_id, payload = %payload, "Dispatching control command");

        self.gateway.send_control(device_id, &payload).await?;

        let snapshot = self.cache.get_snapshot(device_id, true).await?;
        let confirmed = ConfirmedState::from_snapshot(&snapshot, &self.curve);

        if !satisfies(&intent, &confirmed) {
            tracing::warn!(
                device_id = %device_id,
                intent = ?intent,
                confirmed = ?confirmed,
                "Command accepted but device reports a different state"
            );
        }

        Ok(confirmed)
    }

    /// Applies a raw host fan percentage.
    ///
    /// Percentage 0 is dispatched as a power-off command; everything else is
    /// quantized onto the curve before dispatch.
    ///
    /// # Errors
    ///
    /// Returns a validation error (without any remote call) for percentages
    /// outside 0-100, plus the failure modes of [`apply`](Self::apply).
    pub async fn apply_fan_percent(
        &self,
        device_id: &DeviceId,
        percent: u8,
    ) -> Result<ConfirmedState, Error> {
        let intent = Intent::from_fan_percent(percent, &self.curve)?;
        self.apply(device_id, intent).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::gateway::DeviceDescriptor;

    /// Gateway that records control payloads and serves a fixed snapshot.
    struct RecordingGateway {
        controls: parking_lot::Mutex<Vec<serde_json::Value>>,
        reads: AtomicUsize,
        state: parking_lot::Mutex<serde_json::Value>,
        fail_control: std::sync::atomic::AtomicBool,
    }

    impl RecordingGateway {
        fn new(state: serde_json::Value) -> Self {
            Self {
                controls: parking_lot::Mutex::new(Vec::new()),
                reads: AtomicUsize::new(0),
                state: parking_lot::Mutex::new(state),
                fail_control: std::sync::atomic::AtomicBool::new(false),
            }
        }
    }

    impl Gateway for RecordingGateway {
        async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, Error> {
            Ok(Vec::new())
        }

        async fn get_state(&self, _device_id: &DeviceId) -> Result<DeviceSnapshot, Error> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(serde_json::from_value(self.state.lock().clone()).unwrap())
        }

        async fn send_control(
            &self,
            _device_id: &DeviceId,
            payload: &serde_json::Value,
        ) -> Result<(), Error> {
            if self.fail_control.load(Ordering::SeqCst) {
                return Err(crate::error::TransportError::Status { status: 500 }.into());
            }
            self.controls.lock().push(payload.clone());
            Ok(())
        }
    }

    fn coordinator(
        gateway: Arc<RecordingGateway>,
    ) -> (
        CommandCoordinator<RecordingGateway>,
        Arc<StateCache<RecordingGateway>>,
    ) {
        let cache = Arc::new(StateCache::new(
            Arc::clone(&gateway),
            Duration::from_secs(30),
        ));
        (
            CommandCoordinator::new(gateway, Arc::clone(&cache), Arc::new(FanCurve::default())),
            cache,
        )
    }

    fn powered_on_state() -> serde_json::Value {
        serde_json::json!({
            "operation": {"airPurifierOperationMode": "POWER_ON"},
            "airFlow": {"windStrength": "MID"},
            "airQualitySensor": {"totalPollution": 1},
            "airPurifierJobMode": {"currentJobMode": "CLEAN"}
        })
    }

    #[tokio::test]
    async fn apply_confirms_from_remote_truth() {
        let gateway = Arc::new(RecordingGateway::new(powered_on_state()));
        let (coordinator, _) = coordinator(Arc::clone(&gateway));

        let confirmed = coordinator
            .apply(&DeviceId::new("p1"), Intent::power(true))
            .await
            .unwrap();

        assert_eq!(confirmed.power, PowerState::On);
        assert_eq!(confirmed.fan_level, Some(WindStrength::Mid));
        assert_eq!(confirmed.fan_percent, 50);
        assert_eq!(confirmed.air_quality, AirQualityBucket::Good);
        assert!(!confirmed.sleep_active);
        assert_eq!(gateway.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn confirmed_state_wins_over_intent() {
        // The device ignores the power-on command and still reports off.
        let gateway = Arc::new(RecordingGateway::new(serde_json::json!({
            "operation": {"airPurifierOperationMode": "POWER_OFF"}
        })));
        let (coordinator, _) = coordinator(gateway);

        let confirmed = coordinator
            .apply(&DeviceId::new("p1"), Intent::power(true))
            .await
            .unwrap();

        assert_eq!(confirmed.power, PowerState::Off);
    }

    #[tokio::test]
    async fn write_failure_skips_refresh() {
        let gateway = Arc::new(RecordingGateway::new(powered_on_state()));
        gateway.fail_control.store(true, Ordering::SeqCst);
        let (coordinator, _) = coordinator(Arc::clone(&gateway));

        let result = coordinator
            .apply(&DeviceId::new("p1"), Intent::power(true))
            .await;

        assert!(result.is_err());
        assert_eq!(gateway.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn forced_refresh_updates_cache() {
        let gateway = Arc::new(RecordingGateway::new(powered_on_state()));
        let (coordinator, cache) = coordinator(Arc::clone(&gateway));
        let id = DeviceId::new("p1");

        coordinator.apply(&id, Intent::power(true)).await.unwrap();

        let cached = cache.peek(&id).await.unwrap();
        assert_eq!(cached.operation_mode(), Some("POWER_ON"));
    }

    #[tokio::test]
    async fn fan_percent_zero_sends_power_off() {
        let gateway = Arc::new(RecordingGateway::new(serde_json::json!({
            "operation": {"airPurifierOperationMode": "POWER_OFF"}
        })));
        let (coordinator, _) = coordinator(Arc::clone(&gateway));

        coordinator
            .apply_fan_percent(&DeviceId::new("p1"), 0)
            .await
            .unwrap();

        let controls = gateway.controls.lock();
        assert_eq!(
            controls[0],
            serde_json::json!({"operation": {"airPurifierOperationMode": "POWER_OFF"}})
        );
    }

    #[tokio::test]
    async fn fan_percent_out_of_range_skips_remote() {
        let gateway = Arc::new(RecordingGateway::new(powered_on_state()));
        let (coordinator, _) = coordinator(Arc::clone(&gateway));

        let result = coordinator
            .apply_fan_percent(&DeviceId::new("p1"), 200)
            .await;

        assert!(matches!(result.unwrap_err(), Error::Value(_)));
        assert!(gateway.controls.lock().is_empty());
        assert_eq!(gateway.reads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn satisfies_compares_per_intent() {
        let snapshot: DeviceSnapshot = serde_json::from_value(powered_on_state()).unwrap();
        let confirmed = ConfirmedState::from_snapshot(&snapshot, &FanCurve::default());

        assert!(satisfies(&Intent::power(true), &confirmed));
        assert!(!satisfies(&Intent::power(false), &confirmed));
        assert!(satisfies(&Intent::fan_level(WindStrength::Mid), &confirmed));
        assert!(!satisfies(&Intent::fan_level(WindStrength::High), &confirmed));
        assert!(satisfies(&Intent::sleep(false), &confirmed));
        assert!(!satisfies(&Intent::sleep(true), &confirmed));
    }
}
