//! Merchant backend client
//!
//! Posts the wallet's payment token to the merchant endpoint and reads back
//! the result code.

use crate::types::{BackendResponse, PaymentOptions};
use crate::{GPayError, Result};
use reqwest::header::HeaderMap;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Query parameter naming the form request the payment belongs to
pub const FORM_REQUEST_ID_PARAM: &str = "form_request_id";

/// Configuration for the backend HTTP client
#[derive(Debug, Clone, Default)]
pub struct BackendConfig {
    /// Request timeout; none means a hung backend is waited on indefinitely
    pub timeout: Option<Duration>,
    /// Headers sent with every request
    pub headers: HeaderMap,
}

impl BackendConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the backend configuration
    pub fn validate(&self) -> Result<()> {
        if self.timeout == Some(Duration::ZERO) {
            return Err(GPayError::config("Backend timeout must be greater than zero"));
        }

        Ok(())
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set headers sent with every request
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

/// Client for the merchant's payment endpoint
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    config: BackendConfig,
}

impl BackendClient {
    /// Create a new backend client
    pub fn new(config: BackendConfig) -> Result<Self> {
        config.validate()?;

        let mut client_builder = Client::builder();

        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder
            .build()
            .map_err(|e| GPayError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Reuse an existing HTTP client
    pub fn with_client(client: Client, config: BackendConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Post a parsed payment token with the order's correlation fields.
    ///
    /// Succeeds only when the backend answers 2xx with the success code.
    pub async fn submit_token(&self, options: &PaymentOptions, google_token: Value) -> Result<()> {
        let url = endpoint_url(options)?;
        let body = options.token_submission(google_token);

        debug!(%url, "Submitting payment token to backend");

        let response = self
            .client
            .post(url)
            .headers(self.config.headers.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GPayError::BackendStatus {
                status: status.as_u16(),
            });
        }

        let reply: BackendResponse = response.json().await?;
        if !reply.is_success() {
            return Err(GPayError::backend_rejected(reply.code_str()));
        }

        Ok(())
    }
}

/// Build `<request_url>?form_request_id=<id>`
pub fn endpoint_url(options: &PaymentOptions) -> Result<Url> {
    let base = options
        .request_url
        .as_deref()
        .ok_or(GPayError::MissingRequestUrl)?;
    let mut url = Url::parse(base)?;

    if let Some(form_request_id) = &options.form_request_id {
        url.query_pairs_mut()
            .append_pair(FORM_REQUEST_ID_PARAM, &form_request_id.to_string());
    }

    Ok(url)
}
