// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-facing purifier representation.
//!
//! A [`PurifierAccessory`] is the long-lived local object bound 1:1 to a
//! remote device identity. Getters read through the state cache and never
//! fail the host call: a failed read falls back to the last-known-good
//! snapshot, and a device that has never been fetched reports defined
//! defaults. Setters go through the command coordinator and report the
//! confirmed (not requested) state.

use std::sync::Arc;

use uuid::Uuid;

use crate::coordinator::{CommandCoordinator, ConfirmedState};
use crate::error::Error;
use crate::gateway::{DeviceDescriptor, Gateway};
use crate::intent::Intent;
use crate::mapper;
use crate::state::{DeviceSnapshot, StateCache};
use crate::types::{AirQualityBucket, DeviceId, PowerState, WindStrength};

/// Mutable device metadata attached at discovery time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessoryMetadata {
    /// User-visible device name.
    pub alias: String,
    /// Model name reported by the cloud.
    pub model_name: String,
    /// Declared device type tag.
    pub device_type: String,
}

impl AccessoryMetadata {
    fn from_descriptor(descriptor: &DeviceDescriptor) -> Self {
        Self {
            alias: descriptor.alias().to_string(),
            model_name: descriptor.model_name().to_string(),
            device_type: descriptor.device_type().to_string(),
        }
    }
}

/// Long-lived local representation of one purifier.
pub struct PurifierAccessory<G> {
    device_id: DeviceId,
    metadata: parking_lot::RwLock<AccessoryMetadata>,
    cache: Arc<StateCache<G>>,
    coordinator: Arc<CommandCoordinator<G>>,
}

impl<G> PurifierAccessory<G> {
    /// Creates a representation for a freshly discovered device.
    pub(crate) fn new(
        device_id: DeviceId,
        metadata: AccessoryMetadata,
        cache: Arc<StateCache<G>>,
        coordinator: Arc<CommandCoordinator<G>>,
    ) -> Self {
        Self {
            device_id,
            metadata: parking_lot::RwLock::new(metadata),
            cache,
            coordinator,
        }
    }

    /// Creates a placeholder representation restored from host persistence.
    ///
    /// Metadata is attached once a discovery pass confirms the device.
    pub(crate) fn restored(
        device_id: DeviceId,
        cache: Arc<StateCache<G>>,
        coordinator: Arc<CommandCoordinator<G>>,
    ) -> Self {
        let metadata = AccessoryMetadata {
            alias: device_id.as_str().to_string(),
            ..AccessoryMetadata::default()
        };
        Self::new(device_id, metadata, cache, coordinator)
    }

    /// Returns the remote device identity.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Returns the stable local UUID for host registration.
    #[must_use]
    pub fn local_uuid(&self) -> Uuid {
        self.device_id.local_uuid()
    }

    /// Returns the user-visible name.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.metadata.read().alias.clone()
    }

    /// Returns the model name.
    #[must_use]
    pub fn model_name(&self) -> String {
        self.metadata.read().model_name.clone()
    }

    /// Returns a copy of the current metadata.
    #[must_use]
    pub fn metadata(&self) -> AccessoryMetadata {
        self.metadata.read().clone()
    }

    /// Attaches freshly discovered metadata.
    pub(crate) fn attach_metadata(&self, descriptor: &DeviceDescriptor) {
        *self.metadata.write() = AccessoryMetadata::from_descriptor(descriptor);
    }
}

impl<G: Gateway> PurifierAccessory<G> {
    /// Reads a snapshot through the cache, falling back to last-known-good.
    async fn snapshot(&self) -> Option<DeviceSnapshot> {
        match self.cache.get_snapshot(&self.device_id, false).await {
            Ok(snapshot) => Some(snapshot),
            Err(error) => {
                tracing::warn!(
                    device_id = %self.device_id,
                    error = %error,
                    "State read failed, falling back to last known snapshot"
                );
                self.cache.peek(&self.device_id).await
            }
        }
    }

    /// Returns the power state, Off when unknown.
    pub async fn get_power(&self) -> PowerState {
        self.snapshot()
            .await
            .map_or(PowerState::Off, |snapshot| mapper::power(&snapshot))
    }

    /// Returns the named fan level, None when unknown.
    pub async fn get_fan_level(&self) -> Option<WindStrength> {
        self.snapshot()
            .await
            .and_then(|snapshot| mapper::fan_level(&snapshot))
    }

    /// Returns the fan level on the host percentage scale, 0 when unknown.
    pub async fn get_fan_percent(&self) -> u8 {
        self.snapshot()
            .await
            .map_or(0, |snapshot| mapper::fan_percent(&snapshot, self.coordinator.curve()))
    }

    /// Returns the air quality bucket, Invalid when unknown.
    pub async fn get_air_quality(&self) -> AirQualityBucket {
        self.snapshot()
            .await
            .map_or(AirQualityBucket::Invalid, |snapshot| {
                mapper::air_quality_bucket(&snapshot)
            })
    }

    /// Returns whether sleep mode is active, false when unknown.
    pub async fn get_sleep(&self) -> bool {
        self.snapshot()
            .await
            .is_some_and(|snapshot| mapper::sleep_active(&snapshot))
    }

    /// Sets the power state and returns the confirmed outcome.
    ///
    /// # Errors
    ///
    /// Propagates transport failures; the error is also logged here at the
    /// host boundary.
    pub async fn set_power(&self, on: bool) -> Result<ConfirmedState, Error> {
        self.dispatch(Intent::power(on)).await
    }

    /// Sets the named fan level and returns the confirmed outcome.
    ///
    /// # Errors
    ///
    /// Propagates transport failures.
    pub async fn set_fan_level(&self, level: WindStrength) -> Result<ConfirmedState, Error> {
        self.dispatch(Intent::fan_level(level)).await
    }

    /// Sets the fan level from a host percentage and returns the confirmed
    /// outcome. Percentage 0 powers the device off.
    ///
    /// # Errors
    ///
    /// Returns a validation error for percentages above 100 (without any
    /// remote call) and propagates transport failures.
    pub async fn set_fan_percent(&self, percent: u8) -> Result<ConfirmedState, Error> {
        let result = self
            .coordinator
            .apply_fan_percent(&self.device_id, percent)
            .await;
        if let Err(error) = &result {
            tracing::warn!(device_id = %self.device_id, error = %error, "Command failed");
        }
        result
    }

    /// Sets sleep mode and returns the confirmed outcome.
    ///
    /// # Errors
    ///
    /// Propagates transport failures.
    pub async fn set_sleep(&self, active: bool) -> Result<ConfirmedState, Error> {
        self.dispatch(Intent::sleep(active)).await
    }

    async fn dispatch(&self, intent: Intent) -> Result<ConfirmedState, Error> {
        let result = self.coordinator.apply(&self.device_id, intent).await;
        if let Err(error) = &result {
            tracing::warn!(device_id = %self.device_id, error = %error, "Command failed");
        }
        result
    }
}

impl<G> std::fmt::Debug for PurifierAccessory<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PurifierAccessory")
            .field("device_id", &self.device_id)
            .field("metadata", &*self.metadata.read())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::types::FanCurve;

    /// Gateway whose reads are scripted to succeed or fail.
    struct FlakyGateway {
        reads: AtomicUsize,
        fail: std::sync::atomic::AtomicBool,
        state: serde_json::Value,
    }

    impl FlakyGateway {
        fn new(state: serde_json::Value) -> Self {
            Self {
                reads: AtomicUsize::new(0),
                fail: std::sync::atomic::AtomicBool::new(false),
                state,
            }
        }
    }

    impl Gateway for FlakyGateway {
        async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, Error> {
            Ok(Vec::new())
        }

        async fn get_state(&self, _device_id: &DeviceId) -> Result<DeviceSnapshot, Error> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(crate::error::TransportError::Status { status: 500 }.into());
            }
            Ok(serde_json::from_value(self.state.clone()).unwrap())
        }

        async fn send_control(
            &self,
            _device_id: &DeviceId,
            _payload: &serde_json::Value,
        ) -> Result<(), Error> {
            Ok(())
        }
    }

    fn accessory(gateway: Arc<FlakyGateway>) -> PurifierAccessory<FlakyGateway> {
        let cache = Arc::new(StateCache::new(
            Arc::clone(&gateway),
            Duration::from_secs(30),
        ));
        let coordinator = Arc::new(CommandCoordinator::new(
            gateway,
            Arc::clone(&cache),
            Arc::new(FanCurve::default()),
        ));
        PurifierAccessory::restored(DeviceId::new("p1"), cache, coordinator)
    }

    #[tokio::test]
    async fn never_polled_getters_return_defaults() {
        let gateway = Arc::new(FlakyGateway::new(serde_json::json!({})));
        gateway.fail.store(true, Ordering::SeqCst);
        let accessory = accessory(gateway);

        assert_eq!(accessory.get_power().await, PowerState::Off);
        assert_eq!(accessory.get_fan_level().await, None);
        assert_eq!(accessory.get_fan_percent().await, 0);
        assert_eq!(accessory.get_air_quality().await, AirQualityBucket::Invalid);
        assert!(!accessory.get_sleep().await);
    }

    #[tokio::test]
    async fn getters_read_through_cache() {
        let gateway = Arc::new(FlakyGateway::new(serde_json::json!({
            "operation": {"airPurifierOperationMode": "POWER_ON"},
            "airFlow": {"windStrength": "HIGH"},
            "airQualitySensor": {"totalPollution": 2},
            "airPurifierJobMode": {"currentJobMode": "SLEEP"}
        })));
        let accessory = accessory(Arc::clone(&gateway));

        assert_eq!(accessory.get_power().await, PowerState::On);
        assert_eq!(accessory.get_fan_level().await, Some(WindStrength::High));
        assert_eq!(accessory.get_fan_percent().await, 75);
        assert_eq!(accessory.get_air_quality().await, AirQualityBucket::Normal);
        assert!(accessory.get_sleep().await);

        // All five getters served by a single remote fetch.
        assert_eq!(gateway.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_read_falls_back_to_last_known_good() {
        let gateway = Arc::new(FlakyGateway::new(serde_json::json!({
            "operation": {"airPurifierOperationMode": "POWER_ON"}
        })));
        let accessory = accessory(Arc::clone(&gateway));

        assert_eq!(accessory.get_power().await, PowerState::On);

        // The entry goes stale, the refresh fails, and the stale-but-good
        // snapshot still serves the host.
        gateway.fail.store(true, Ordering::SeqCst);
        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(accessory.get_power().await, PowerState::On);
        assert_eq!(gateway.reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn restored_accessory_uses_id_as_name_until_discovery() {
        let gateway = Arc::new(FlakyGateway::new(serde_json::json!({})));
        let accessory = accessory(gateway);

        assert_eq!(accessory.display_name(), "p1");

        let descriptor = DeviceDescriptor::new(
            DeviceId::new("p1"),
            "DEVICE_AIR_PURIFIER",
            "Living Room",
            "PuriCare 360",
        );
        accessory.attach_metadata(&descriptor);

        assert_eq!(accessory.display_name(), "Living Room");
        assert_eq!(accessory.model_name(), "PuriCare 360");
    }

    #[tokio::test]
    async fn local_uuid_is_stable() {
        let gateway = Arc::new(FlakyGateway::new(serde_json::json!({})));
        let accessory = accessory(gateway);

        assert_eq!(accessory.local_uuid(), DeviceId::new("p1").local_uuid());
    }
}
