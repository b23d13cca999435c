// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recurring background refresh of the state cache.
//!
//! The scheduler only ever calls `get_snapshot(force=false)`, so the cache's
//! rate gate still applies: an aggressive period does not by itself cause
//! excess remote traffic, it only bounds how stale the cache can get between
//! externally triggered reads.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::gateway::Gateway;
use crate::state::StateCache;

/// Handle to stop a running [`PollScheduler`].
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    /// Signals the scheduler to exit without starting new ticks.
    pub fn shutdown(&self) {
        let _ = self.tx.send(true);
    }
}

/// Recurring task refreshing every known device through the state cache.
///
/// Fetch errors are logged and the device is skipped for that tick; the
/// schedule itself never stops on errors. Ticks missed while a refresh is
/// still in flight are delayed, not burst.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use thinqr_lib::config::BridgeConfig;
/// use thinqr_lib::gateway::ThinqClient;
/// use thinqr_lib::poll::PollScheduler;
/// use thinqr_lib::state::StateCache;
///
/// # fn example() -> thinqr_lib::Result<()> {
/// let config = BridgeConfig::new("eu", "DE", "token");
/// let gateway = Arc::new(ThinqClient::new(&config)?);
/// let cache = Arc::new(StateCache::new(gateway, config.interval()));
///
/// let (scheduler, shutdown) = PollScheduler::new(cache, config.interval());
/// tokio::spawn(scheduler.run());
/// // ... later:
/// shutdown.shutdown();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PollScheduler<G> {
    cache: Arc<StateCache<G>>,
    period: Duration,
    shutdown_rx: watch::Receiver<bool>,
}

impl<G: Gateway> PollScheduler<G> {
    /// Creates a scheduler and its shutdown handle.
    #[must_use]
    pub fn new(cache: Arc<StateCache<G>>, period: Duration) -> (Self, ShutdownHandle) {
        let (tx, shutdown_rx) = watch::channel(false);
        (
            Self {
                cache,
                period,
                shutdown_rx,
            },
            ShutdownHandle { tx: Arc::new(tx) },
        )
    }

    /// Returns the tick period.
    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Runs the schedule until shut down.
    ///
    /// Spawn this on the runtime; it holds no locks between ticks and the
    /// only suspension points are gateway calls inside the cache.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::debug!(period = ?self.period, "Poll scheduler started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.refresh_all().await;
                }
                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::debug!("Poll scheduler stopped");
    }

    /// Refreshes every known device once, skipping failures.
    async fn refresh_all(&self) {
        for device_id in self.cache.device_ids().await {
            if *self.shutdown_rx.borrow() {
                return;
            }
            if let Err(error) = self.cache.get_snapshot(&device_id, false).await {
                tracing::warn!(
                    device_id = %device_id,
                    error = %error,
                    "Background refresh failed, skipping device this tick"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::Error;
    use crate::gateway::DeviceDescriptor;
    use crate::state::DeviceSnapshot;
    use crate::types::DeviceId;

    /// Gateway counting reads, optionally failing for one device.
    struct CountingGateway {
        reads: AtomicUsize,
        fail_device: Option<DeviceId>,
    }

    impl CountingGateway {
        fn new() -> Self {
            Self {
                reads: AtomicUsize::new(0),
                fail_device: None,
            }
        }

        fn failing_for(device_id: DeviceId) -> Self {
            Self {
                reads: AtomicUsize::new(0),
                fail_device: Some(device_id),
            }
        }
    }

    impl Gateway for CountingGateway {
        async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, Error> {
            Ok(Vec::new())
        }

        async fn get_state(&self, device_id: &DeviceId) -> Result<DeviceSnapshot, Error> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.fail_device.as_ref() == Some(device_id) {
                return Err(crate::error::TransportError::Status { status: 500 }.into());
            }
            Ok(serde_json::from_value(serde_json::json!({})).unwrap())
        }

        async fn send_control(
            &self,
            _device_id: &DeviceId,
            _payload: &serde_json::Value,
        ) -> Result<(), Error> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_refresh_known_devices() {
        let gateway = Arc::new(CountingGateway::new());
        let cache = Arc::new(StateCache::new(
            Arc::clone(&gateway),
            Duration::from_secs(30),
        ));
        cache.track(&DeviceId::new("p1")).await;
        cache.track(&DeviceId::new("p2")).await;

        let (scheduler, shutdown) = PollScheduler::new(Arc::clone(&cache), Duration::from_secs(30));
        let handle = tokio::spawn(scheduler.run());

        // First tick fires immediately.
        tokio::time::advance(Duration::from_millis(1)).await;
        tokio::task::yield_now().await;
        assert_eq!(gateway.reads.load(Ordering::SeqCst), 2);

        shutdown.shutdown();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn rate_gate_absorbs_aggressive_period() {
        let gateway = Arc::new(CountingGateway::new());
        let cache = Arc::new(StateCache::new(
            Arc::clone(&gateway),
            Duration::from_secs(30),
        ));
        cache.track(&DeviceId::new("p1")).await;

        // Scheduler ticks 6x faster than the cache allows fetches.
        let (scheduler, shutdown) = PollScheduler::new(Arc::clone(&cache), Duration::from_secs(5));
        let handle = tokio::spawn(scheduler.run());

        for _ in 0..5 {
            tokio::time::advance(Duration::from_secs(5)).await;
            tokio::task::yield_now().await;
        }

        // 25 seconds of 5-second ticks: only the first fetch goes remote.
        assert_eq!(gateway.reads.load(Ordering::SeqCst), 1);

        shutdown.shutdown();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn failed_device_does_not_stop_schedule() {
        let failing = DeviceId::new("broken");
        let gateway = Arc::new(CountingGateway::failing_for(failing.clone()));
        let cache = Arc::new(StateCache::new(
            Arc::clone(&gateway),
            Duration::from_secs(30),
        ));
        cache.track(&failing).await;

        let (scheduler, shutdown) = PollScheduler::new(Arc::clone(&cache), Duration::from_secs(30));
        let handle = tokio::spawn(scheduler.run());

        tokio::time::advance(Duration::from_millis(1)).await;
        tokio::task::yield_now().await;
        let after_first = gateway.reads.load(Ordering::SeqCst);
        assert_eq!(after_first, 1);

        // The failure left the entry absent, so the next tick retries.
        tokio::time::advance(Duration::from_secs(30)).await;
        tokio::task::yield_now().await;
        assert_eq!(gateway.reads.load(Ordering::SeqCst), 2);

        shutdown.shutdown();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_new_ticks() {
        let gateway = Arc::new(CountingGateway::new());
        let cache = Arc::new(StateCache::new(
            Arc::clone(&gateway),
            Duration::from_secs(30),
        ));
        cache.track(&DeviceId::new("p1")).await;

        let (scheduler, shutdown) = PollScheduler::new(Arc::clone(&cache), Duration::from_secs(30));
        let handle = tokio::spawn(scheduler.run());

        tokio::time::advance(Duration::from_millis(1)).await;
        tokio::task::yield_now().await;
        assert_eq!(gateway.reads.load(Ordering::SeqCst), 1);

        shutdown.shutdown();
        handle.await.unwrap();

        // Time marches on; no further reads happen.
        tokio::time::advance(Duration::from_secs(120)).await;
        tokio::task::yield_now().await;
        assert_eq!(gateway.reads.load(Ordering::SeqCst), 1);
    }
}
