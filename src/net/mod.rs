//! Outgoing request pipeline.
//!
//! Layers implement [`Transport`] and wrap an inner transport, the same shape
//! as an interceptor chain:
//!
//! - [`retry::RetryInterceptor`] decides whether to try again and how long to wait.
//! - [`auth::AuthInterceptor`] attaches the bearer token to every attempt.
//! - [`transport::ReqwestTransport`] performs the HTTP exchange.
//!
//! Neither interceptor touches the request body.

pub mod auth;
pub mod retry;
pub mod transport;

use async_trait::async_trait;
use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use thiserror::Error;

pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    pub method: Method,
    /// Path relative to the API base URL, e.g. `api/v1/productos/listar`.
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl OutgoingRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Request carrying `body` serialized as JSON.
    ///
    /// # Errors
    /// Returns an error if `body` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(
        method: Method,
        path: impl Into<String>,
        body: &T,
    ) -> Result<Self, serde_json::Error> {
        let mut request = Self::new(method, path);
        request.body = Some(Bytes::from(serde_json::to_vec(body)?));
        request.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(CONTENT_TYPE_JSON),
        );
        request
            .headers
            .insert(header::ACCEPT, HeaderValue::from_static(CONTENT_TYPE_JSON));
        Ok(request)
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// # Errors
    /// Returns an error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Failures below HTTP: no response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectivityError {
    #[error("timeout: {0}")]
    Timeout(String),
    #[error("connection refused: {0}")]
    ConnectionRefused(String),
    #[error("unknown host: {0}")]
    HostResolution(String),
    #[error("I/O failure: {0}")]
    Io(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("no response after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        last: Box<ConnectivityError>,
    },
}

impl ConnectivityError {
    /// Host resolution and malformed requests fail the same way every time.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(
            self,
            Self::HostResolution(_) | Self::InvalidRequest(_) | Self::Exhausted { .. }
        )
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return whatever HTTP response came back, success or not.
    async fn execute(&self, request: OutgoingRequest) -> Result<HttpResponse, ConnectivityError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, request: OutgoingRequest) -> Result<HttpResponse, ConnectivityError> {
        (**self).execute(request).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn execute(&self, request: OutgoingRequest) -> Result<HttpResponse, ConnectivityError> {
        (**self).execute(request).await
    }
}
