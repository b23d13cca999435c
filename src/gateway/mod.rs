// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gateway interface to the ThinQ cloud API.
//!
//! The [`Gateway`] trait is the seam between the synchronization core and
//! the remote service: list devices, fetch one device's state snapshot, send
//! a control command. [`ThinqClient`] is the production HTTP implementation;
//! tests substitute scripted implementations.

mod thinq;

pub use thinq::ThinqClient;

use serde::Deserialize;

use crate::error::Error;
use crate::state::DeviceSnapshot;
use crate::types::DeviceId;

/// One device as returned by the cloud device list.
///
/// # Examples
///
/// ```
/// use thinqr_lib::gateway::DeviceDescriptor;
///
/// let json = r#"{
///     "deviceId": "purifier-1",
///     "deviceInfo": {
///         "deviceType": "DEVICE_AIR_PURIFIER",
///         "alias": "Living Room",
///         "modelName": "PuriCare 360"
///     }
/// }"#;
/// let descriptor: DeviceDescriptor = serde_json::from_str(json).unwrap();
/// assert_eq!(descriptor.device_id().as_str(), "purifier-1");
/// assert_eq!(descriptor.alias(), "Living Room");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeviceDescriptor {
    #[serde(rename = "deviceId")]
    device_id: DeviceId,

    #[serde(rename = "deviceInfo", default)]
    info: DeviceInfo,
}

/// Device metadata nested under `deviceInfo`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
struct DeviceInfo {
    #[serde(rename = "deviceType", default)]
    device_type: String,

    #[serde(default)]
    alias: String,

    #[serde(rename = "modelName", default)]
    model_name: String,
}

impl DeviceDescriptor {
    /// Creates a descriptor from its parts.
    #[must_use]
    pub fn new(
        device_id: DeviceId,
        device_type: impl Into<String>,
        alias: impl Into<String>,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            device_id,
            info: DeviceInfo {
                device_type: device_type.into(),
                alias: alias.into(),
                model_name: model_name.into(),
            },
        }
    }

    /// Returns the remote device identity.
    #[must_use]
    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Returns the declared device type tag.
    #[must_use]
    pub fn device_type(&self) -> &str {
        &self.info.device_type
    }

    /// Returns the user-visible device name.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.info.alias
    }

    /// Returns the model name.
    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.info.model_name
    }
}

/// Interface to the remote device service.
///
/// Every call is implicitly rate-governed by the remote side; the state
/// cache's minimum refresh interval is tuned to respect that ceiling, so
/// implementations do not rate-limit themselves.
#[allow(async_fn_in_trait)]
pub trait Gateway {
    /// Lists all devices registered to the account.
    ///
    /// # Errors
    ///
    /// Returns a transport error on network failure or non-2xx response,
    /// or a parse error if the payload cannot be decoded.
    async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, Error>;

    /// Fetches the current state snapshot for one device.
    ///
    /// # Errors
    ///
    /// Same failure contract as [`list_devices`](Self::list_devices).
    async fn get_state(&self, device_id: &DeviceId) -> Result<DeviceSnapshot, Error>;

    /// Sends a control payload to one device.
    ///
    /// # Errors
    ///
    /// Returns a transport error on network failure or non-2xx response.
    async fn send_control(
        &self,
        device_id: &DeviceId,
        payload: &serde_json::Value,
    ) -> Result<(), Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_parses_full_entry() {
        let descriptor: DeviceDescriptor = serde_json::from_value(serde_json::json!({
            "deviceId": "abc",
            "deviceInfo": {
                "deviceType": "DEVICE_AIR_PURIFIER",
                "alias": "Bedroom",
                "modelName": "AS60GDWD0",
                "reportable": true
            }
        }))
        .unwrap();

        assert_eq!(descriptor.device_id().as_str(), "abc");
        assert_eq!(descriptor.device_type(), "DEVICE_AIR_PURIFIER");
        assert_eq!(descriptor.alias(), "Bedroom");
        assert_eq!(descriptor.model_name(), "AS60GDWD0");
    }

    #[test]
    fn descriptor_tolerates_missing_info() {
        let descriptor: DeviceDescriptor =
            serde_json::from_value(serde_json::json!({"deviceId": "abc"})).unwrap();

        assert_eq!(descriptor.device_type(), "");
        assert_eq!(descriptor.alias(), "");
    }
}
