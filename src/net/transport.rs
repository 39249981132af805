//! HTTP transport backed by `reqwest`.
//!
//! Joins request paths onto the API base URL, applies the configured timeouts
//! and maps `reqwest` failures onto [`ConnectivityError`] so the retry layer can
//! tell a refused connection from an unresolvable host.

use super::{ConnectivityError, HttpResponse, OutgoingRequest, Transport};
use crate::config::ApiConfig;
use anyhow::Result;
use async_trait::async_trait;
use std::{error::Error as StdError, io};
use tracing::{debug, instrument};
use url::Url;

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Build a transport from the API config.
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Resolve a relative endpoint path against the base URL.
    /// # Errors
    /// Returns `InvalidRequest` for absolute paths or paths that do not parse.
    pub fn endpoint_url(&self, path: &str) -> Result<Url, ConnectivityError> {
        if path.starts_with('/') || path.contains("://") {
            return Err(ConnectivityError::InvalidRequest(format!(
                "endpoint path must be relative: {path}"
            )));
        }

        self.base_url
            .join(path)
            .map_err(|e| ConnectivityError::InvalidRequest(format!("{path}: {e}")))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: OutgoingRequest) -> Result<HttpResponse, ConnectivityError> {
        let url = self.endpoint_url(&request.path)?;

        let mut builder = self
            .client
            .request(request.method, url)
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| classify(&e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| classify(&e))?;

        debug!(status = status.as_u16(), bytes = body.len(), "response received");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Map a `reqwest` failure onto the retry taxonomy.
#[must_use]
pub fn classify(err: &reqwest::Error) -> ConnectivityError {
    let detail = error_chain(err);

    if err.is_timeout() {
        return ConnectivityError::Timeout(detail);
    }

    if err.is_builder() {
        return ConnectivityError::InvalidRequest(detail);
    }

    match source_io_kind(err) {
        Some(io::ErrorKind::ConnectionRefused) => {
            return ConnectivityError::ConnectionRefused(detail)
        }
        Some(io::ErrorKind::TimedOut) => return ConnectivityError::Timeout(detail),
        _ => {}
    }

    if is_dns_failure(&detail) {
        return ConnectivityError::HostResolution(detail);
    }

    ConnectivityError::Io(detail)
}

fn source_io_kind(err: &(dyn StdError + 'static)) -> Option<io::ErrorKind> {
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        source = cause.source();
    }
    None
}

// hyper reports resolver failures as "dns error"; the system resolver
// message varies by platform.
fn is_dns_failure(detail: &str) -> bool {
    let detail = detail.to_ascii_lowercase();
    detail.contains("dns error")
        || detail.contains("failed to lookup address")
        || detail.contains("name or service not known")
        || detail.contains("no such host")
        || detail.contains("nodename nor servname")
}

fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if parts.last() != Some(&text) {
            parts.push(text);
        }
        source = cause.source();
    }
    parts.join(": ")
}
