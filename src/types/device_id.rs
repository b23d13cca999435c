// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device identifier type.

use std::fmt;

use uuid::Uuid;

/// Opaque identifier assigned to a device by the ThinQ cloud.
///
/// The identity is globally unique and stable across sessions; it is never
/// regenerated for the same physical appliance. A deterministic UUID derived
/// from it ([`local_uuid`](Self::local_uuid)) serves as the stable local
/// identifier for host-side registration.
///
/// # Examples
///
/// ```
/// use thinqr_lib::types::DeviceId;
///
/// let id = DeviceId::new("c8a1f2d3-device-serial");
/// assert_eq!(id.as_str(), "c8a1f2d3-device-serial");
///
/// // The derived local UUID is stable for the same identity.
/// assert_eq!(id.local_uuid(), DeviceId::new("c8a1f2d3-device-serial").local_uuid());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Creates a device identifier from the remote identity string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identity string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives the stable local UUID used for host registration.
    ///
    /// The UUID is a v5 hash of the remote identity, so the same physical
    /// device always maps to the same local identifier.
    #[must_use]
    pub fn local_uuid(&self) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, self.0.as_bytes())
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Identities can be long; show a readable prefix
        let short: String = self.0.chars().take(12).collect();
        if short.len() < self.0.len() {
            write!(f, "DeviceId({short}...)")
        } else {
            write!(f, "DeviceId({short})")
        }
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
