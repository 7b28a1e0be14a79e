//! Client Portal gateway connection and HTTP plumbing.
//!
//! The gateway runs locally (`clientportal.gw`) and proxies an already
//! authenticated brokerage session, so requests carry no credentials.

use std::time::Duration;

use options_tracker_core::GatewayConfig;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::{IbError, Result};

pub const DEFAULT_BASE_URL: &str = "https://localhost:5000/v1/api";

#[derive(Debug, Clone)]
pub struct IbConfig {
    pub base_url: String,
    /// The local gateway serves a self-signed certificate.
    pub accept_invalid_certs: bool,
    pub timeout_secs: u64,
}

impl Default for IbConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            accept_invalid_certs: true,
            timeout_secs: 30,
        }
    }
}

impl From<&GatewayConfig> for IbConfig {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            accept_invalid_certs: config.accept_invalid_certs,
            timeout_secs: config.timeout_secs,
        }
    }
}

impl IbConfig {
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// REST client for one Client Portal gateway.
#[derive(Clone)]
pub struct IbGateway {
    config: IbConfig,
    http: Client,
}

impl std::fmt::Debug for IbGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IbGateway")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl IbGateway {
    /// # Errors
    ///
    /// Returns [`IbError::Configuration`] for an empty base URL and
    /// [`IbError::Network`] if the HTTP client cannot be built.
    pub fn new(config: IbConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(IbError::Configuration("gateway base_url is empty".to_string()));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| IbError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_with_query(path, &[]).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.url(path);
        debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await?;

        self.handle_response(response).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path);
        let body_json = serde_json::to_string(body)?;
        debug!(%url, body_len = body_json.len(), "POST");

        let response = self
            .http
            .post(&url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .body(body_json)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// POST without a body, as the session endpoints expect.
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!(%url, "POST");

        let response = self
            .http
            .post(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        self.handle_response(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        debug!(%url, "DELETE");

        let response = self
            .http
            .delete(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(IbError::api(status.as_u16(), text));
        }

        Ok(())
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(IbError::api(status.as_u16(), text));
        }

        let bytes = response.bytes().await?;
        let body = serde_json::from_slice(&bytes)?;
        Ok(body)
    }
}
