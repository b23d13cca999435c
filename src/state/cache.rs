// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rate-limited snapshot cache.
//!
//! The cache is the sole gate to the gateway's read endpoint. Every reader —
//! the poll scheduler, on-demand host reads, post-command reconciliation —
//! goes through [`StateCache::get_snapshot`], so the minimum refresh
//! interval bounds remote read traffic no matter how aggressively callers
//! poll.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use crate::error::Error;
use crate::gateway::Gateway;
use crate::types::DeviceId;

use super::DeviceSnapshot;

/// Cached snapshot plus freshness timestamp for one device.
///
/// Invariants:
/// - `last_refreshed_at` is monotonically non-decreasing.
/// - A failed fetch leaves both fields untouched.
#[derive(Debug, Default)]
struct CacheEntry {
    snapshot: Option<DeviceSnapshot>,
    last_refreshed_at: Option<Instant>,
}

/// Rate-limited cache of device snapshots.
///
/// Refreshes for one device are serialized behind a per-entry lock while
/// different devices refresh concurrently. A read younger than
/// `min_interval` is served from the cache without contacting the gateway;
/// `force` bypasses the gate (used for post-command reconciliation).
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use thinqr_lib::config::BridgeConfig;
/// use thinqr_lib::gateway::ThinqClient;
/// use thinqr_lib::state::StateCache;
/// use thinqr_lib::types::DeviceId;
///
/// # async fn example() -> thinqr_lib::Result<()> {
/// let config = BridgeConfig::new("eu", "DE", "token");
/// let gateway = Arc::new(ThinqClient::new(&config)?);
/// let cache = StateCache::new(gateway, Duration::from_secs(30));
///
/// let id = DeviceId::new("purifier-1");
/// let snapshot = cache.get_snapshot(&id, false).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct StateCache<G> {
    gateway: Arc<G>,
    min_interval: Duration,
    entries: RwLock<HashMap<DeviceId, Arc<Mutex<CacheEntry>>>>,
}

impl<G> StateCache<G> {
    /// Creates a cache gating reads through the given gateway.
    #[must_use]
    pub fn new(gateway: Arc<G>, min_interval: Duration) -> Self {
        Self {
            gateway,
            min_interval,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the configured minimum refresh interval.
    #[must_use]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Creates the (absent) entry for a newly discovered device.
    ///
    /// Idempotent; an existing entry is left untouched.
    pub async fn track(&self, device_id: &DeviceId) {
        let _ = self.entry(device_id).await;
    }

    /// Returns the identities of all tracked devices.
    pub async fn device_ids(&self) -> Vec<DeviceId> {
        self.entries.read().await.keys().cloned().collect()
    }

    /// Returns the last-known-good snapshot without any remote call.
    pub async fn peek(&self, device_id: &DeviceId) -> Option<DeviceSnapshot> {
        let entry = self.entries.read().await.get(device_id).cloned()?;
        let guard = entry.lock().await;
        guard.snapshot.clone()
    }

    /// Returns how long ago the entry was last refreshed, if ever.
    pub async fn age(&self, device_id: &DeviceId) -> Option<Duration> {
        let entry = self.entries.read().await.get(device_id).cloned()?;
        let guard = entry.lock().await;
        guard.last_refreshed_at.map(|at| at.elapsed())
    }

    /// Returns the entry for a device, creating it if absent.
    async fn entry(&self, device_id: &DeviceId) -> Arc<Mutex<CacheEntry>> {
        if let Some(entry) = self.entries.read().await.get(device_id) {
            return Arc::clone(entry);
        }
        let mut entries = self.entries.write().await;
        Arc::clone(
            entries
                .entry(device_id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(CacheEntry::default()))),
        )
    }
}

impl<G: Gateway> StateCache<G> {
    /// Returns a snapshot for the device, fetching through the gateway only
    /// when the cached one is stale (or `force` is set).
    ///
    /// The first call for a device always performs a real fetch. On fetch
    /// failure the entry is left exactly as it was: no value is invented, a
    /// previously good snapshot survives, and a never-fetched entry stays
    /// absent so the next read retries.
    ///
    /// # Errors
    ///
    /// Propagates the gateway failure when a fetch was required and failed.
    pub async fn get_snapshot(
        &self,
        device_id: &DeviceId,
        force: bool,
    ) -> Result<DeviceSnapshot, Error> {
        let entry = self.entry(device_id).await;
        let mut guard = entry.lock().await;

        if !force
            && let Some(snapshot) = guard.snapshot.as_ref()
            && let Some(refreshed_at) = guard.last_refreshed_at
            && refreshed_at.elapsed() < self.min_interval
        {
            tracing::debug!(device_id = %device_id, "Serving cached snapshot");
            return Ok(snapshot.clone());
        }

        let started_at = Instant::now();
        let snapshot = self.gateway.get_state(device_id).await?;

        // A fetch that started before the entry's current timestamp must not
        // overwrite a newer result.
        if guard
            .last_refreshed_at
            .is_none_or(|refreshed_at| started_at >= refreshed_at)
        {
            guard.snapshot = Some(snapshot.clone());
            guard.last_refreshed_at = Some(started_at);
        }

        Ok(snapshot)
    }
}
