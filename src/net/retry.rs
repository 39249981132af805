use super::{ConnectivityError, HttpResponse, OutgoingRequest, Transport};
use async_trait::async_trait;
use http::StatusCode;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};

pub const MAX_RETRIES: u32 = 3;
pub const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            initial_delay: INITIAL_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before retry number `retry` (1-based): `initial_delay * 2^(retry - 1)`.
    #[must_use]
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.initial_delay.saturating_mul(factor)
    }

    /// Transient server conditions: any 5xx and 408.
    #[must_use]
    pub fn should_retry_status(status: StatusCode) -> bool {
        status.is_server_error() || status == StatusCode::REQUEST_TIMEOUT
    }
}

/// Retry transient failures with exponential backoff.
///
/// Statuses other than 5xx/408 are returned at once, success or not. When the
/// budget runs out the last HTTP response is returned if one was ever
/// received; otherwise a single `Exhausted` error summarizes the attempts.
#[derive(Debug)]
pub struct RetryInterceptor<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T> RetryInterceptor<T> {
    #[must_use]
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<T: Transport> Transport for RetryInterceptor<T> {
    async fn execute(&self, request: OutgoingRequest) -> Result<HttpResponse, ConnectivityError> {
        let attempts = self.policy.max_attempts();
        let mut last_response: Option<HttpResponse> = None;
        let mut last_error: Option<ConnectivityError> = None;

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = self.policy.backoff(attempt);
                debug!(
                    path = %request.path,
                    attempt = attempt + 1,
                    max_attempts = attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "retrying request"
                );
                sleep(delay).await;
            }

            match self.inner.execute(request.clone()).await {
                Ok(response) => {
                    if !RetryPolicy::should_retry_status(response.status) {
                        return Ok(response);
                    }

                    debug!(
                        path = %request.path,
                        status = response.status.as_u16(),
                        attempt = attempt + 1,
                        "retryable status"
                    );
                    last_response = Some(response);
                }

                Err(err) if !err.is_retryable() => {
                    error!(path = %request.path, error = %err, "request failed, not retrying");
                    return Err(err);
                }

                Err(err) => {
                    warn!(
                        path = %request.path,
                        attempt = attempt + 1,
                        max_attempts = attempts,
                        error = %err,
                        "transport failure"
                    );
                    last_error = Some(err);
                }
            }
        }

        if let Some(response) = last_response {
            warn!(
                path = %request.path,
                status = response.status.as_u16(),
                attempts,
                "retries exhausted, returning last response"
            );
            return Ok(response);
        }

        let last = last_error.unwrap_or_else(|| ConnectivityError::Io("no attempt was made".into()));
        error!(path = %request.path, attempts, error = %last, "retries exhausted");

        Err(ConnectivityError::Exhausted {
            attempts,
            last: Box::new(last),
        })
    }
}
