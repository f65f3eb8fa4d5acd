//! HTTP transport
//!
//! POSTs the envelope as JSON and decodes the body as a response envelope.
//! Connection failures, non-2xx statuses and non-JSON bodies come back as
//! distinct errors; nothing is retried.

use async_trait::async_trait;
use reqwest::{Client, header};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::Transport;
use crate::protocol::{RequestEnvelope, ResponseEnvelope};
use crate::{Error, Result};

/// HTTP transport for the cloud function endpoint
pub struct HttpTransport {
    /// HTTP client, library default timeouts
    client: Client,
    /// Full endpoint URL (base + route)
    url: Url,
}

impl HttpTransport {
    /// Create a transport posting to `url`
    pub fn new(url: Url) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("gestao-agent/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, envelope: &RequestEnvelope<'_>) -> Result<ResponseEnvelope> {
        debug!(url = %self.url, action = %envelope.action, "Posting envelope");

        let response = self
            .client
            .post(self.url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .json(envelope)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %self.url, action = %envelope.action, error = %e, "Request failed");
                Error::Transport(format!("Request failed: {e}"))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            warn!(%status, action = %envelope.action, "Endpoint returned an error status");
            return Err(Error::Status { status, body });
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| Error::InvalidResponse(format!("body is not JSON: {e}")))?;

        let parsed = ResponseEnvelope::try_from(value).map_err(|e| match e {
            Error::Protocol(msg) => Error::InvalidResponse(msg),
            other => other,
        })?;

        debug!(%status, success = ?parsed.success, "Envelope received");
        Ok(parsed)
    }

    fn endpoint(&self) -> &str {
        self.url.as_str()
    }
}
