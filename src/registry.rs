// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device registry reconciliation.
//!
//! A discovery pass diffs the remote device list against the locally known
//! representations: known identities are reused with freshly attached
//! metadata, new identities get a representation registered with the host,
//! and identities missing from the result set are unregistered and dropped.
//! After a successful pass the local set equals exactly the remote list; a
//! failed list fetch aborts the pass and retains the previous registry
//! unchanged.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use crate::accessory::{AccessoryMetadata, PurifierAccessory};
use crate::coordinator::CommandCoordinator;
use crate::error::Error;
use crate::gateway::{DeviceDescriptor, Gateway};
use crate::state::StateCache;
use crate::types::DeviceId;

/// Registration details handed to the host for one accessory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryInfo {
    /// Remote device identity.
    pub device_id: DeviceId,
    /// Stable local UUID derived from the identity.
    pub uuid: Uuid,
    /// User-visible name.
    pub display_name: String,
    /// Model name.
    pub model_name: String,
}

/// Boundary to the host framework.
///
/// The host persists previously known accessories across restarts and owns
/// the actual registration mechanics; the registry only tells it what to
/// add and remove.
pub trait AccessoryHost {
    /// Device identities the host restored from its persistence.
    fn restored_device_ids(&self) -> Vec<DeviceId>;

    /// Registers a newly discovered accessory.
    fn register(&self, info: &AccessoryInfo);

    /// Unregisters an accessory that is no longer present remotely.
    fn unregister(&self, info: &AccessoryInfo);
}

impl<T: AccessoryHost + ?Sized> AccessoryHost for Arc<T> {
    fn restored_device_ids(&self) -> Vec<DeviceId> {
        (**self).restored_device_ids()
    }

    fn register(&self, info: &AccessoryInfo) {
        (**self).register(info);
    }

    fn unregister(&self, info: &AccessoryInfo) {
        (**self).unregister(info);
    }
}

/// Device class declared by the cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// An air purifier.
    AirPurifier,
    /// Any other (or missing) type tag.
    Other,
}

impl DeviceKind {
    /// Classifies a remote type tag.
    #[must_use]
    pub fn from_type_tag(tag: &str) -> Self {
        match tag {
            "DEVICE_AIR_PURIFIER" => Self::AirPurifier,
            _ => Self::Other,
        }
    }
}

/// Outcome of one discovery pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoverySummary {
    /// Identities registered for the first time this pass.
    pub registered: Vec<DeviceId>,
    /// Identities reused from earlier passes or host persistence.
    pub reused: Vec<DeviceId>,
    /// Identities unregistered because the remote list no longer has them.
    pub retired: Vec<DeviceId>,
}

/// Reconciles local representations against the remote device list.
pub struct DeviceRegistry<G, H> {
    gateway: Arc<G>,
    cache: Arc<StateCache<G>>,
    coordinator: Arc<CommandCoordinator<G>>,
    host: H,
    accessories: parking_lot::RwLock<HashMap<DeviceId, Arc<PurifierAccessory<G>>>>,
}

impl<G: Gateway, H: AccessoryHost> DeviceRegistry<G, H> {
    /// Creates a registry, restoring placeholder representations for every
    /// identity the host persisted.
    #[must_use]
    pub fn new(
        gateway: Arc<G>,
        cache: Arc<StateCache<G>>,
        coordinator: Arc<CommandCoordinator<G>>,
        host: H,
    ) -> Self {
        let registry = Self {
            gateway,
            cache,
            coordinator,
            host,
            accessories: parking_lot::RwLock::new(HashMap::new()),
        };

        for device_id in registry.host.restored_device_ids() {
            tracing::info!(device_id = %device_id, "Loading accessory from host persistence");
            let accessory = Arc::new(PurifierAccessory::restored(
                device_id.clone(),
                Arc::clone(&registry.cache),
                Arc::clone(&registry.coordinator),
            ));
            registry.accessories.write().insert(device_id, accessory);
        }

        registry
    }

    /// Returns the accessory bound to an identity, if known.
    #[must_use]
    pub fn accessory(&self, device_id: &DeviceId) -> Option<Arc<PurifierAccessory<G>>> {
        self.accessories.read().get(device_id).cloned()
    }

    /// Returns the identities of all known accessories.
    #[must_use]
    pub fn device_ids(&self) -> Vec<DeviceId> {
        self.accessories.read().keys().cloned().collect()
    }

    /// Returns the number of known accessories.
    #[must_use]
    pub fn accessory_count(&self) -> usize {
        self.accessories.read().len()
    }

    /// Runs one discovery pass.
    ///
    /// # Errors
    ///
    /// Propagates the device-list fetch failure; in that case the pass is
    /// aborted and nothing is registered or unregistered.
    pub async fn discover(&self) -> Result<DiscoverySummary, Error> {
        let devices = self.gateway.list_devices().await?;

        let mut summary = DiscoverySummary::default();
        let mut seen: HashSet<DeviceId> = HashSet::new();

        for descriptor in devices {
            let device_id = descriptor.device_id().clone();
            seen.insert(device_id.clone());
            self.cache.track(&device_id).await;

            let existing = self.accessories.read().get(&device_id).cloned();
            if let Some(accessory) = existing {
                tracing::info!(
                    device_id = %device_id,
                    alias = descriptor.alias(),
                    "Reusing known accessory"
                );
                accessory.attach_metadata(&descriptor);
                summary.reused.push(device_id);
            } else {
                let accessory = self.build_representation(&descriptor);
                tracing::info!(
                    device_id = %device_id,
                    alias = descriptor.alias(),
                    "Registering new accessory"
                );
                self.host.register(&Self::info_for(&accessory));
                self.accessories
                    .write()
                    .insert(device_id.clone(), accessory);
                summary.registered.push(device_id);
            }
        }

        let stale: Vec<DeviceId> = self
            .accessories
            .read()
            .keys()
            .filter(|id| !seen.contains(*id))
            .cloned()
            .collect();

        for device_id in stale {
            if let Some(accessory) = self.accessories.write().remove(&device_id) {
                tracing::info!(device_id = %device_id, "Retiring accessory no longer present remotely");
                self.host.unregister(&Self::info_for(&accessory));
                summary.retired.push(device_id);
            }
        }

        Ok(summary)
    }

    /// Builds the representation for a discovered device.
    ///
    /// Dispatch is keyed on the declared type, but every class — including
    /// unrecognized ones — currently maps to the purifier representation;
    /// devices are never silently skipped.
    fn build_representation(&self, descriptor: &DeviceDescriptor) -> Arc<PurifierAccessory<G>> {
        let kind = DeviceKind::from_type_tag(descriptor.device_type());
        if kind == DeviceKind::Other {
            tracing::info!(
                device_id = %descriptor.device_id(),
                device_type = descriptor.device_type(),
                "Unrecognized device type, using purifier representation"
            );
        }

        match kind {
            DeviceKind::AirPurifier | DeviceKind::Other => Arc::new(PurifierAccessory::new(
                descriptor.device_id().clone(),
                AccessoryMetadata {
                    alias: descriptor.alias().to_string(),
                    model_name: descriptor.model_name().to_string(),
                    device_type: descriptor.device_type().to_string(),
                },
                Arc::clone(&self.cache),
                Arc::clone(&self.coordinator),
            )),
        }
    }

    fn info_for(accessory: &PurifierAccessory<G>) -> AccessoryInfo {
        AccessoryInfo {
            device_id: accessory.device_id().clone(),
            uuid: accessory.local_uuid(),
            display_name: accessory.display_name(),
            model_name: accessory.model_name(),
        }
    }
}

impl<G, H> std::fmt::Debug for DeviceRegistry<G, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceRegistry")
            .field("accessories", &self.accessories.read().len())
            .finish_non_exhaustive()
    }
}
