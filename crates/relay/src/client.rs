//! HTTP client for the delivery endpoint.

use std::time::Duration;

use contracts::{decode_batch, Record};
use tracing::instrument;

use crate::RelayError;

/// Client-level timeout on each fetch; the loop itself enforces none.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin wrapper around one `GET` endpoint.
pub struct EndpointClient {
    http: reqwest::Client,
    url: String,
}

impl EndpointClient {
    /// Build a client for `url` with the default fetch timeout.
    ///
    /// # Errors
    /// [`RelayError::ClientBuild`] when the underlying HTTP client cannot be
    /// constructed.
    pub fn new(url: impl Into<String>) -> Result<Self, RelayError> {
        let http = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| RelayError::ClientBuild {
                message: e.to_string(),
            })?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// The polled URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and decode one window.
    ///
    /// # Errors
    /// [`RelayError::Fetch`] on transport failure or non-2xx status,
    /// [`RelayError::Decode`] when the body is not wire format v1.
    #[instrument(name = "endpoint_fetch", skip(self), fields(url = %self.url))]
    pub async fn fetch(&self) -> Result<Vec<Record>, RelayError> {
        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.fetch_error(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(self.fetch_error(format!("endpoint returned status {status}")));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| self.fetch_error(format!("reading body: {e}")))?;

        decode_batch(&body).map_err(RelayError::Decode)
    }

    fn fetch_error(&self, message: String) -> RelayError {
        RelayError::Fetch {
            url: self.url.clone(),
            message,
        }
    }
}
