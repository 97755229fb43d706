use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Errors from a single request attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request did not complete within the per-attempt timeout
    #[error("request timed out")]
    Timeout,
    /// Connection failure, non-2xx status or undecodable body
    #[error("{0}")]
    Network(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Network(error.to_string())
        }
    }
}

/// Performs one GET against the movie database and decodes the JSON body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieTransport: Send + Sync {
    async fn get(&self, query: Vec<(String, String)>) -> Result<Value, TransportError>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport whose every request is bounded by `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl MovieTransport for HttpTransport {
    async fn get(&self, query: Vec<(String, String)>) -> Result<Value, TransportError> {
        debug!(url = %self.base_url, "Sending OMDb request");

        let payload = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        Ok(payload)
    }
}
