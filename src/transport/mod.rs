//! Transport implementations for the agent endpoint

mod http;

pub use self::http::HttpTransport;

use async_trait::async_trait;

use crate::{
    Result,
    protocol::{RequestEnvelope, ResponseEnvelope},
};

/// Delivers one request envelope and returns the endpoint's answer
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the envelope and wait for the response. One call, no retries.
    async fn send(&self, envelope: &RequestEnvelope<'_>) -> Result<ResponseEnvelope>;

    /// Where envelopes are delivered, for logs
    fn endpoint(&self) -> &str;
}
