//! Conversion client for an HTTP conversion endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{ConversionRequest, ConversionResponse, ConversionResult, DocumentConverter};
use crate::config::ConverterConfig;
use crate::error::{Error, Result};

/// Converter that POSTs the document URL to a remote endpoint.
#[derive(Debug, Clone)]
pub struct HttpConverter {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpConverter {
    /// Create a converter for `endpoint` with the default timeout.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_timeout(
            endpoint,
            Duration::from_secs(crate::DEFAULT_CONVERSION_TIMEOUT_SECS),
        )
    }

    /// Create a converter with an explicit per-request timeout.
    #[must_use]
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            timeout,
        }
    }

    /// Create a converter from the `[converter]` configuration section.
    pub fn from_config(config: &ConverterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_timeout(config.endpoint.clone(), config.timeout))
    }

    /// The endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Timeout in whole seconds, rounded up so sub-second limits never read as 0.
    fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs() + u64::from(self.timeout.subsec_nanos() > 0)
    }

    fn map_send_error(&self, err: &reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.timeout_secs())
        } else {
            Error::ConversionRequest(format!("{}: {err}", self.endpoint))
        }
    }
}

#[async_trait]
impl DocumentConverter for HttpConverter {
    async fn convert(&self, file_url: &str) -> Result<ConversionResult> {
        let body = ConversionRequest {
            file_url: file_url.to_string(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ConversionRequest(format!(
                "{} responded with {status}",
                self.endpoint
            )));
        }

        let parsed: ConversionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(self.timeout_secs())
            } else {
                Error::InvalidResponse(format!("failed to parse conversion response: {e}"))
            }
        })?;

        parsed.into_result()
    }
}
