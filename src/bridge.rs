// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Startup wiring for the purifier bridge.

use std::sync::Arc;
use std::time::Duration;

use crate::config::BridgeConfig;
use crate::coordinator::CommandCoordinator;
use crate::error::Error;
use crate::gateway::ThinqClient;
use crate::poll::{PollScheduler, ShutdownHandle};
use crate::registry::{AccessoryHost, DeviceRegistry, DiscoverySummary};
use crate::state::StateCache;
use crate::types::DeviceId;

/// Fully wired synchronization engine for one ThinQ account.
///
/// Construction validates the configuration (missing credentials are fatal),
/// builds the cloud client, the rate-limited cache, the command coordinator
/// and the registry, and restores previously persisted accessories from the
/// host. Discovery and polling are started by the caller.
///
/// # Examples
///
/// ```no_run
/// use thinqr_lib::bridge::PurifierBridge;
/// use thinqr_lib::config::BridgeConfig;
/// use thinqr_lib::registry::{AccessoryHost, AccessoryInfo};
/// use thinqr_lib::types::DeviceId;
///
/// struct NullHost;
///
/// impl AccessoryHost for NullHost {
///     fn restored_device_ids(&self) -> Vec<DeviceId> {
///         Vec::new()
///     }
///     fn register(&self, info: &AccessoryInfo) {
///         println!("register {}", info.display_name);
///     }
///     fn unregister(&self, info: &AccessoryInfo) {
///         println!("unregister {}", info.display_name);
///     }
/// }
///
/// # async fn example() -> thinqr_lib::Result<()> {
/// let config = BridgeConfig::new("eu", "DE", "personal-access-token");
/// let bridge = PurifierBridge::new(config, NullHost)?;
///
/// bridge.discover().await?;
///
/// let (scheduler, shutdown) = bridge.poll_scheduler();
/// tokio::spawn(scheduler.run());
/// # Ok(())
/// # }
/// ```
pub struct PurifierBridge<H: AccessoryHost> {
    config: BridgeConfig,
    cache: Arc<StateCache<ThinqClient>>,
    registry: DeviceRegistry<ThinqClient, H>,
}

impl<H: AccessoryHost> PurifierBridge<H> {
    /// Builds the engine from configuration and a host boundary.
    ///
    /// # Errors
    ///
    /// Returns a fatal `ConfigError` when region, country code or token are
    /// missing, and a transport error if the HTTP client cannot be built.
    pub fn new(config: BridgeConfig, host: H) -> Result<Self, Error> {
        config.validate()?;

        let gateway = Arc::new(ThinqClient::new(&config)?);
        let cache = Arc::new(StateCache::new(Arc::clone(&gateway), config.interval()));
        let coordinator = Arc::new(CommandCoordinator::new(
            Arc::clone(&gateway),
            Arc::clone(&cache),
            Arc::new(config.fan_curve().clone()),
        ));
        let registry = DeviceRegistry::new(gateway, Arc::clone(&cache), coordinator, host);

        Ok(Self {
            config,
            cache,
            registry,
        })
    }

    /// Returns the configuration the bridge was built with.
    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Returns the device registry.
    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry<ThinqClient, H> {
        &self.registry
    }

    /// Returns the accessory for a device, if known.
    #[must_use]
    pub fn accessory(
        &self,
        device_id: &DeviceId,
    ) -> Option<Arc<crate::accessory::PurifierAccessory<ThinqClient>>> {
        self.registry.accessory(device_id)
    }

    /// Runs one discovery pass against the remote device list.
    ///
    /// # Errors
    ///
    /// Propagates the device-list fetch failure; the registry is untouched
    /// in that case.
    pub async fn discover(&self) -> Result<DiscoverySummary, Error> {
        self.registry.discover().await
    }

    /// Creates the background poll scheduler at the configured interval.
    #[must_use]
    pub fn poll_scheduler(&self) -> (PollScheduler<ThinqClient>, ShutdownHandle) {
        self.poll_scheduler_with_period(self.config.interval())
    }

    /// Creates a poll scheduler with an explicit period.
    ///
    /// The cache's rate gate still applies, so a period well below the
    /// configured interval only tightens staleness, not remote traffic.
    #[must_use]
    pub fn poll_scheduler_with_period(
        &self,
        period: Duration,
    ) -> (PollScheduler<ThinqClient>, ShutdownHandle) {
        PollScheduler::new(Arc::clone(&self.cache), period)
    }
}
