//! Activation over HTTP.

use crate::activation::{
    is_valid_code, parse_activation_reply, parse_deactivation_reply, serial_hash,
    ActivationSettings,
};
use crate::error::{ActivationError, ActivationResult};
use crate::serial::normalize;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use tracing::{debug, info, warn};

/// Talks to the activation server configured in [`ActivationSettings`].
///
/// Every request is bounded by the settings' timeout; a timeout or any
/// other transport failure surfaces as [`ActivationError::NoConnection`].
#[derive(Debug, Clone)]
pub struct OnlineActivation {
    settings: ActivationSettings,
    hwid: String,
    client: Client,
}

impl OnlineActivation {
    /// Creates a client that identifies this machine as `hwid`.
    ///
    /// # Errors
    ///
    /// Returns [`ActivationError::NotAvailable`] if no server is configured
    /// or the HTTP client cannot be built.
    pub fn new(settings: ActivationSettings, hwid: impl Into<String>) -> ActivationResult<Self> {
        if settings.server_url.is_none() {
            return Err(ActivationError::NotAvailable);
        }
        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| {
                warn!("failed to create HTTP client: {e}");
                ActivationError::NotAvailable
            })?;

        Ok(Self {
            settings,
            hwid: hwid.into(),
            client,
        })
    }

    /// Trades `code` for a serial number.
    ///
    /// # Errors
    ///
    /// Returns the outcome reported by the server, `BadCode` for a
    /// malformed code, or `NoConnection` if the server is unreachable.
    pub async fn activate(&self, code: &str) -> ActivationResult<String> {
        if !is_valid_code(code) {
            return Err(ActivationError::BadCode);
        }
        let url = self.settings.endpoint("activation.php")?;
        let hwid = BASE64.encode(self.hwid.as_bytes());
        let hash = self.settings.product_hash();

        let body = self
            .get(&url, &[("code", code), ("hwid", hwid.as_str()), ("hash", hash.as_str())])
            .await?;
        let serial = parse_activation_reply(&body)?;
        info!("license activated online");
        Ok(serial)
    }

    /// Releases `serial` on the server.
    ///
    /// # Errors
    ///
    /// Returns the outcome reported by the server, `BadCode` for an empty
    /// serial, or `NoConnection` if the server is unreachable.
    pub async fn deactivate(&self, serial: &str) -> ActivationResult<()> {
        if normalize(serial).is_empty() {
            return Err(ActivationError::BadCode);
        }
        let url = self.settings.endpoint("deactivation.php")?;
        let hash = serial_hash(serial);

        let body = self.get(&url, &[("hash", hash.as_str())]).await?;
        parse_deactivation_reply(&body)?;
        info!("license deactivated online");
        Ok(())
    }

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> ActivationResult<String> {
        debug!(url, "sending activation request");
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                warn!("activation server unreachable: {e}");
                ActivationError::NoConnection
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "activation server returned an error status");
            return Err(ActivationError::BadReply);
        }

        response.text().await.map_err(|e| {
            warn!("failed to read activation reply: {e}");
            ActivationError::NoConnection
        })
    }
}
