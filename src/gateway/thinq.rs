// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for the ThinQ cloud API.

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::config::BridgeConfig;
use crate::error::{Error, ParseError, TransportError};
use crate::state::DeviceSnapshot;
use crate::types::DeviceId;

use super::{DeviceDescriptor, Gateway};

/// Client identifier sent with every request.
const X_CLIENT_ID: &str = "LG-THINQ";

/// Public API key for the personal-access-token surface.
const X_API_KEY: &str = "v6GFvkweNo7DK7yD3ylIZ9w52aKBU0eJ7wLXkSR3";

/// Response envelope wrapping every ThinQ payload.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Envelope<T> {
    #[serde(default)]
    response: Option<T>,
}

/// HTTP client for the ThinQ cloud API.
///
/// Talks to `https://api-{region}.lgthinq.com` with the personal access
/// token from the configuration. Each request carries a fresh random message
/// id; control requests additionally opt into conditional control so the
/// cloud rejects commands the device cannot currently apply.
///
/// # Examples
///
/// ```no_run
/// use thinqr_lib::config::BridgeConfig;
/// use thinqr_lib::gateway::{Gateway, ThinqClient};
///
/// # async fn example() -> thinqr_lib::Result<()> {
/// let config = BridgeConfig::new("eu", "DE", "token");
/// let client = ThinqClient::new(&config)?;
/// let devices = client.list_devices().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ThinqClient {
    base_url: String,
    client: Client,
    token: String,
    country_code: String,
}

impl ThinqClient {
    /// Creates a client for the region named in the configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be created.
    pub fn new(config: &BridgeConfig) -> Result<Self, TransportError> {
        let base_url = format!("https://api-{}.lgthinq.com", config.region());
        Self::with_base_url(config, base_url)
    }

    /// Creates a client against an explicit base URL.
    ///
    /// Intended for tests and region-less deployments; production code goes
    /// through [`new`](Self::new).
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be created.
    pub fn with_base_url(
        config: &BridgeConfig,
        base_url: impl Into<String>,
    ) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(TransportError::Http)?;

        Ok(Self {
            base_url: base_url.into(),
            client,
            token: config.token().to_string(),
            country_code: config.country_code().to_string(),
        })
    }

    /// Returns the base URL of the API.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the headers common to every request.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {}", self.token);
        if let Ok(value) = HeaderValue::from_str(&bearer) {
            headers.insert("Authorization", value);
        }
        let message_id = Uuid::new_v4().simple().to_string();
        if let Ok(value) = HeaderValue::from_str(&message_id) {
            headers.insert("x-message-id", value);
        }
        if let Ok(value) = HeaderValue::from_str(&self.country_code) {
            headers.insert("x-country", value);
        }
        headers.insert("x-client-id", HeaderValue::from_static(X_CLIENT_ID));
        headers.insert("x-api-key", HeaderValue::from_static(X_API_KEY));
        headers
    }

    /// Maps a non-success status to the transport taxonomy.
    fn check_status(status: StatusCode) -> Result<(), TransportError> {
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TransportError::RateLimited);
        }
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    /// Performs a GET and unwraps the response envelope.
    async fn get_enveloped<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = format!("{}{path}", self.base_url);

        tracing::debug!(url = %url, "Sending ThinQ read request");

        let response = self
            .client
            .get(&url)
            .headers(self.default_headers())
            .send()
            .await
            .map_err(TransportError::Http)?;

        Self::check_status(response.status())?;

        let body = response.text().await.map_err(TransportError::Http)?;

        tracing::debug!(body = %body, "Received ThinQ response");

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(ParseError::Json)?;
        envelope
            .response
            .ok_or_else(|| ParseError::MissingField("response".to_string()).into())
    }
}

impl Gateway for ThinqClient {
    async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, Error> {
        self.get_enveloped("/devices").await
    }

    async fn get_state(&self, device_id: &DeviceId) -> Result<DeviceSnapshot, Error> {
        let path = format!("/devices/{}/state", urlencoding::encode(device_id.as_str()));
        self.get_enveloped(&path).await
    }

    async fn send_control(
        &self,
        device_id: &DeviceId,
        payload: &serde_json::Value,
    ) -> Result<(), Error> {
        let url = format!(
            "{}/devices/{}/control",
            self.base_url,
            urlencoding::encode(device_id.as_str())
        );

        tracing::debug!(url = %url, payload = %payload, "Sending ThinQ control request");

        let response = self
            .client
            .post(&url)
            .headers(self.default_headers())
            .header("x-conditional-control", "true")
            .json(payload)
            .send()
            .await
            .map_err(TransportError::Http)?;

        Self::check_status(response.status())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ThinqClient {
        let config = BridgeConfig::new("eu", "DE", "secret-token");
        ThinqClient::new(&config).unwrap()
    }

    #[test]
    fn base_url_from_region() {
        assert_eq!(client().base_url(), "https://api-eu.lgthinq.com");
    }

    #[test]
    fn explicit_base_url() {
        let config = BridgeConfig::new("eu", "DE", "token");
        let client = ThinqClient::with_base_url(&config, "http://127.0.0.1:9999").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9999");
    }

    #[test]
    fn default_headers_carry_credentials() {
        let headers = client().default_headers();

        assert_eq!(
            headers.get("Authorization").unwrap(),
            "Bearer secret-token"
        );
        assert_eq!(headers.get("x-country").unwrap(), "DE");
        assert_eq!(headers.get("x-client-id").unwrap(), X_CLIENT_ID);
        assert_eq!(headers.get("x-api-key").unwrap(), X_API_KEY);
        assert!(headers.contains_key("x-message-id"));
    }

    #[test]
    fn message_id_is_fresh_per_request() {
        let client = client();
        let first = client.default_headers();
        let second = client.default_headers();
        assert_ne!(
            first.get("x-message-id").unwrap(),
            second.get("x-message-id").unwrap()
        );
    }

    #[test]
    fn status_taxonomy() {
        assert!(ThinqClient::check_status(StatusCode::OK).is_ok());
        assert!(matches!(
            ThinqClient::check_status(StatusCode::TOO_MANY_REQUESTS).unwrap_err(),
            TransportError::RateLimited
        ));
        assert!(matches!(
            ThinqClient::check_status(StatusCode::BAD_GATEWAY).unwrap_err(),
            TransportError::Status { status: 502 }
        ));
    }
}
