use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::record::MovieRecord;
use super::request::LookupRequest;
use super::transport::{HttpTransport, MovieTransport, TransportError};

/// Classification of a failed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No API key configured; never retried
    Configuration,
    /// Every attempt timed out
    Timeout,
    /// Every attempt hit a transport error
    Network,
    /// OMDb kept reporting a request limit or quota
    RateLimited,
    /// OMDb rejected the request; never retried
    Api,
    /// The attempt budget ran out without a classified failure
    Exhausted,
}

impl ErrorKind {
    /// Whether a failure of this kind is worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Timeout | ErrorKind::Network | ErrorKind::RateLimited)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Network => "network",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::Api => "api",
            ErrorKind::Exhausted => "exhausted",
        };
        f.write_str(name)
    }
}

/// A failed lookup: its kind plus a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FetchError {
    pub kind: ErrorKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// The result of a lookup. Not-found is a value, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(MovieRecord),
    NotFound,
    Failed(FetchError),
}

/// How many attempts a lookup gets and how long to pause between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
        }
    }

    /// Pause before the attempt following `attempt` (zero-based).
    ///
    /// Rate limits back off linearly; timeouts and network errors wait a
    /// constant delay.
    pub fn backoff(&self, kind: ErrorKind, attempt: u32) -> Duration {
        match kind {
            ErrorKind::RateLimited => self.retry_delay.saturating_mul(attempt + 1),
            _ => self.retry_delay,
        }
    }
}

/// Suspends the retry loop between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Client for the OMDb API with retry and outcome classification.
#[derive(Clone)]
pub struct OmdbClient {
    transport: Arc<dyn MovieTransport>,
    sleeper: Arc<dyn Sleeper>,
    api_key: Option<String>,
    policy: RetryPolicy,
}

impl fmt::Debug for OmdbClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OmdbClient")
            .field("api_key_configured", &self.api_key.is_some())
            .field("policy", &self.policy)
            .finish()
    }
}

impl OmdbClient {
    /// Creates a client over an arbitrary transport.
    ///
    /// A blank key is treated as missing so that lookups fail closed.
    pub fn new(transport: Arc<dyn MovieTransport>, api_key: Option<String>) -> Self {
        Self {
            transport,
            sleeper: Arc::new(TokioSleeper),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            policy: RetryPolicy::default(),
        }
    }

    /// Creates a client that talks HTTP to `base_url`.
    pub fn http(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(base_url, timeout)?;
        Ok(Self::new(Arc::new(transport), api_key))
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Looks up a movie with the client's default retry policy.
    pub async fn fetch(&self, request: &LookupRequest) -> LookupOutcome {
        self.fetch_with_policy(request, self.policy).await
    }

    /// Looks up a movie, retrying transient failures under `policy`.
    ///
    /// Never fails with an `Err`: every path resolves to an outcome.
    pub async fn fetch_with_policy(
        &self,
        request: &LookupRequest,
        policy: RetryPolicy,
    ) -> LookupOutcome {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("OMDb lookup refused: API key is not configured");
            return LookupOutcome::Failed(FetchError::new(
                ErrorKind::Configuration,
                "OMDB API key is not configured. Please set OMDB_API_KEY in .env file",
            ));
        };

        let query = request.to_query(api_key);

        for attempt in 0..policy.max_retries {
            debug!(
                attempt = attempt + 1,
                max_retries = policy.max_retries,
                params = ?request,
                "Querying OMDb"
            );

            let error = match self.transport.get(query.clone()).await {
                Ok(payload) => match classify(payload) {
                    Ok(outcome) => return outcome,
                    Err(error) => error,
                },
                Err(TransportError::Timeout) => FetchError::new(
                    ErrorKind::Timeout,
                    "Request timeout: OMDB API did not respond in time",
                ),
                Err(TransportError::Network(message)) => {
                    FetchError::new(ErrorKind::Network, format!("Network error: {}", message))
                }
            };

            if !error.kind.is_retryable() {
                warn!(kind = %error.kind, %error, "OMDb lookup failed");
                return LookupOutcome::Failed(error);
            }
            if attempt + 1 >= policy.max_retries {
                warn!(kind = %error.kind, %error, "OMDb lookup failed, no attempts left");
                return LookupOutcome::Failed(error);
            }

            let delay = policy.backoff(error.kind, attempt);
            warn!(kind = %error.kind, ?delay, attempt = attempt + 1, "OMDb lookup failed, retrying");
            self.sleeper.sleep(delay).await;
        }

        LookupOutcome::Failed(FetchError::new(
            ErrorKind::Exhausted,
            format!("failed after {} attempts", policy.max_retries),
        ))
    }
}

/// Sorts a decoded payload into a found/not-found outcome or a failure.
fn classify(payload: Value) -> Result<LookupOutcome, FetchError> {
    if payload.get("Response").and_then(Value::as_str) == Some("False") {
        let message = payload
            .get("Error")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string();
        let lowered = message.to_lowercase();

        if lowered.contains("limit") || lowered.contains("quota") {
            return Err(FetchError::new(
                ErrorKind::RateLimited,
                format!("Rate limit exceeded: {}", message),
            ));
        }
        if lowered.contains("not found") {
            return Ok(LookupOutcome::NotFound);
        }
        return Err(FetchError::new(
            ErrorKind::Api,
            format!("OMDB API error: {}", message),
        ));
    }

    MovieRecord::from_value(payload)
        .map(LookupOutcome::Found)
        .ok_or_else(|| {
            FetchError::new(ErrorKind::Api, "OMDB API error: unexpected response payload")
        })
}
