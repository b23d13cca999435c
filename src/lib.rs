// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `ThinqR` Lib - A Rust library to bridge LG ThinQ air purifiers.
//!
//! This library keeps a locally cached, rate-limited, eventually-consistent
//! view of cloud-controlled purifiers that a smart-home host can poll and
//! command. Reads go through a state cache that is the sole gate to the
//! cloud read endpoint; commands are dispatched and then *confirmed* against
//! what the device actually reports, never assumed.
//!
//! # Supported Features
//!
//! - **Power control**: Turn purifiers on/off with confirmed outcomes
//! - **Fan control**: Named wind strengths mapped onto a configurable
//!   percentage curve; percentage 0 aliases to power-off
//! - **Sleep mode**: Toggle the purifier's sleep job mode
//! - **Air quality**: Pollution bucket plus PM1/PM2.5/PM10 readings
//! - **Discovery**: Registry reconciliation against the remote device list
//!
//! # Quick Start
//!
//! ```no_run
//! use thinqr_lib::bridge::PurifierBridge;
//! use thinqr_lib::config::BridgeConfig;
//! use thinqr_lib::registry::{AccessoryHost, AccessoryInfo};
//! use thinqr_lib::types::DeviceId;
//!
//! struct MyHost;
//!
//! impl AccessoryHost for MyHost {
//!     fn restored_device_ids(&self) -> Vec<DeviceId> {
//!         Vec::new()
//!     }
//!     fn register(&self, info: &AccessoryInfo) {
//!         println!("new accessory: {}", info.display_name);
//!     }
//!     fn unregister(&self, info: &AccessoryInfo) {
//!         println!("retired accessory: {}", info.display_name);
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> thinqr_lib::Result<()> {
//!     let config = BridgeConfig::new("eu", "DE", "personal-access-token");
//!     let bridge = PurifierBridge::new(config, MyHost)?;
//!
//!     // Reconcile local accessories against the cloud device list.
//!     let summary = bridge.discover().await?;
//!     println!("registered {} new devices", summary.registered.len());
//!
//!     // Keep the cache fresh in the background.
//!     let (scheduler, shutdown) = bridge.poll_scheduler();
//!     tokio::spawn(scheduler.run());
//!
//!     // Read and command through the accessory surface.
//!     let ids = bridge.registry().device_ids();
//!     if let Some(id) = ids.first() {
//!         let accessory = bridge.accessory(id).expect("just discovered");
//!         println!("power: {}", accessory.get_power().await);
//!         let confirmed = accessory.set_fan_percent(75).await?;
//!         println!("device reports {}% fan", confirmed.fan_percent);
//!     }
//!
//!     shutdown.shutdown();
//!     Ok(())
//! }
//! ```

pub mod accessory;
pub mod bridge;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod gateway;
pub mod intent;
pub mod mapper;
pub mod poll;
pub mod registry;
pub mod state;
pub mod types;

pub use accessory::{AccessoryMetadata, PurifierAccessory};
pub use bridge::PurifierBridge;
pub use config::BridgeConfig;
pub use coordinator::{CommandCoordinator, ConfirmedState};
pub use error::{ConfigError, Error, ParseError, Result, TransportError, ValueError};
pub use gateway::{DeviceDescriptor, Gateway, ThinqClient};
pub use intent::Intent;
pub use poll::{PollScheduler, ShutdownHandle};
pub use registry::{AccessoryHost, AccessoryInfo, DeviceKind, DeviceRegistry, DiscoverySummary};
pub use state::{DeviceSnapshot, StateCache};
pub use types::{AirQualityBucket, DeviceId, FanCurve, JobMode, PowerState, WindStrength};
