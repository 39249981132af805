//! JSON-RPC client for the marketplace backend.
//!
//! [`ApiClient`] owns the request pipeline and turns raw HTTP exchanges into
//! either a decoded `result` or an [`ApiError`] that says which tier the
//! failure belongs to.

pub mod dto;
pub mod mapper;
pub mod params;
pub mod rpc;

use crate::{
    config::ApiConfig,
    net::{
        auth::AuthInterceptor,
        retry::{RetryInterceptor, RetryPolicy},
        transport::ReqwestTransport,
        ConnectivityError, HttpResponse, OutgoingRequest, Transport,
    },
    session::CredentialStore,
};
use anyhow::Result;
use http::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use thiserror::Error;
use tracing::{debug, instrument, warn};

pub use params::{
    NewProduct, Page, ProductQuery, ProductUpdate, PurchaseQuery, PurchaseRole, RegisterForm,
};
pub use rpc::{embedded_error_message, NoParams};

/// Why a call produced no usable result.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response, including retryable statuses left after the retry budget.
    #[error("Error: {}", .status.as_u16())]
    Http {
        status: StatusCode,
        /// Error message embedded in the body, if any.
        message: Option<String>,
    },
    /// 2xx response carrying an RPC or business error.
    #[error("{}", .message.as_deref().unwrap_or("Server error"))]
    Rpc {
        code: Option<i64>,
        message: Option<String>,
    },
    #[error("Connection error: {0}")]
    Connectivity(#[from] ConnectivityError),
    #[error("Connection error: {0}")]
    Decode(serde_json::Error),
    #[error("Connection error: {0}")]
    Encode(serde_json::Error),
}

impl ApiError {
    /// User facing message, with `default` standing in for an RPC error
    /// that carried no message.
    #[must_use]
    pub fn message_or(&self, default: &str) -> String {
        match self {
            Self::Rpc { message: None, .. } => default.to_string(),
            other => other.to_string(),
        }
    }

    /// Like [`ApiError::message_or`], but a non-2xx reply surfaces the
    /// message embedded in its body, e.g. `Invalid credentials`.
    #[must_use]
    pub fn auth_message_or(&self, default: &str) -> String {
        match self {
            Self::Http {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.message_or(default),
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub struct ApiClient {
    transport: Arc<dyn Transport>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(1),
        }
    }

    /// Retry, then auth, then the HTTP client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_policy(
        config: &ApiConfig,
        store: Arc<CredentialStore>,
        policy: RetryPolicy,
    ) -> Result<Self> {
        let transport = ReqwestTransport::new(config)?;
        let pipeline = RetryInterceptor::new(AuthInterceptor::new(transport, store), policy);
        Ok(Self::new(Arc::new(pipeline)))
    }

    /// Enveloped JSON-RPC call.
    ///
    /// `Ok(None)` is a 2xx reply with neither `result` nor `error`.
    ///
    /// # Errors
    /// See [`ApiError`].
    #[instrument(skip(self, params), fields(rpc_id = tracing::field::Empty))]
    pub async fn call<P, R>(&self, method: Method, path: &str, params: &P) -> Result<Option<R>, ApiError>
    where
        P: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::Span::current().record("rpc_id", id);

        let envelope = rpc::RpcRequest::call(params, Some(id));
        let request = OutgoingRequest::json(method, path, &envelope).map_err(ApiError::Encode)?;

        let response = self.transport.execute(request).await?;
        decode_response(&response)
    }

    /// Plain JSON POST for the REST auth endpoints; the reply is read the
    /// same way as an enveloped one.
    ///
    /// # Errors
    /// See [`ApiError`].
    #[instrument(skip(self, body))]
    pub async fn post_rest<B, R>(&self, path: &str, body: &B) -> Result<Option<R>, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let request = OutgoingRequest::json(Method::POST, path, body).map_err(ApiError::Encode)?;
        let response = self.transport.execute(request).await?;
        decode_response(&response)
    }
}

/// Classify a response: `result` wins over `error`, and a `result` object
/// with its own `error` field is a business failure.
fn decode_response<R: DeserializeOwned>(response: &HttpResponse) -> Result<Option<R>, ApiError> {
    if !response.is_success() {
        let message = embedded_error_message(&response.body);
        warn!(status = response.status.as_u16(), message = ?message, "request rejected");
        return Err(ApiError::Http {
            status: response.status,
            message,
        });
    }

    if response.body.iter().all(u8::is_ascii_whitespace) {
        debug!("empty reply");
        return Ok(None);
    }

    let envelope: rpc::RpcResponse<Value> = response.json().map_err(ApiError::Decode)?;

    let result = envelope.result.filter(|result| !result.is_null());

    match (result, envelope.error) {
        (Some(result), _) => {
            if let Some(message) = business_error(&result) {
                debug!(message = %message, "business error in result");
                return Err(ApiError::Rpc {
                    code: result.get("status").and_then(Value::as_i64),
                    message: Some(message),
                });
            }
            serde_json::from_value(result).map(Some).map_err(ApiError::Decode)
        }
        (None, Some(error)) => {
            debug!(code = ?error.code, "rpc error");
            Err(ApiError::Rpc {
                code: error.code,
                message: error.best_message(),
            })
        }
        (None, None) => Ok(None),
    }
}

fn business_error(result: &Value) -> Option<String> {
    result
        .get("error")
        .and_then(Value::as_str)
        .filter(|message| !message.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Mutex;

    struct Canned {
        status: StatusCode,
        body: &'static str,
        seen: Mutex<Vec<OutgoingRequest>>,
    }

    impl Canned {
        fn new(status: u16, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                status: StatusCode::from_u16(status).unwrap(),
                body,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for Canned {
        async fn execute(&self, request: OutgoingRequest) -> Result<HttpResponse, ConnectivityError> {
            self.seen.lock().unwrap().push(request);
            Ok(HttpResponse::new(self.status, self.body))
        }
    }

    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn execute(&self, _request: OutgoingRequest) -> Result<HttpResponse, ConnectivityError> {
            Err(ConnectivityError::HostResolution("api.invalid".into()))
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Count {
        total: i64,
    }

    async fn call(transport: Arc<dyn Transport>) -> Result<Option<Count>, ApiError> {
        ApiClient::new(transport)
            .call(Method::POST, "api/v1/categorias", &NoParams {})
            .await
    }

    #[tokio::test]
    async fn test_call_sends_envelope() {
        let canned = Canned::new(200, r#"{"jsonrpc":"2.0","id":1,"result":{"total":3}}"#);
        let client = ApiClient::new(canned.clone());

        let first: Option<Count> = client
            .call(Method::POST, "api/v1/categorias", &json!({"offset": 0, "limit": 100}))
            .await
            .unwrap();
        assert_eq!(first, Some(Count { total: 3 }));
        let _: Option<Count> = client
            .call(Method::POST, "api/v1/categorias", &NoParams {})
            .await
            .unwrap();

        let seen = canned.seen.lock().unwrap();
        assert_eq!(seen[0].method, Method::POST);
        let body: Value = serde_json::from_slice(seen[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"jsonrpc": "2.0", "method": "call", "params": {"offset": 0, "limit": 100}, "id": 1})
        );
        let body: Value = serde_json::from_slice(seen[1].body.as_ref().unwrap()).unwrap();
        assert_eq!(body["id"], 2);
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let err = call(Canned::new(404, "not here")).await.unwrap_err();
        assert_eq!(err.to_string(), "Error: 404");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));

        let err = call(Canned::new(401, r#"{"error":"Invalid credentials"}"#))
            .await
            .unwrap_err();
        assert_eq!(err.message_or("ignored"), "Error: 401");
        assert_eq!(err.auth_message_or("ignored"), "Invalid credentials");
    }

    #[tokio::test]
    async fn test_rpc_error_in_success() {
        let err = call(Canned::new(
            200,
            r#"{"jsonrpc":"2.0","error":{"code":200,"message":"Access denied"}}"#,
        ))
        .await
        .unwrap_err();
        assert_eq!(err.message_or("Server error"), "Access denied");

        let err = call(Canned::new(200, r#"{"jsonrpc":"2.0","error":{"code":200}}"#))
            .await
            .unwrap_err();
        assert_eq!(err.message_or("Error deleting product"), "Error deleting product");
    }

    #[tokio::test]
    async fn test_business_error_inside_result() {
        let err = call(Canned::new(
            200,
            r#"{"result":{"error":"Product already sold","status":400}}"#,
        ))
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Rpc { code: Some(400), .. }));
        assert_eq!(err.message_or("x"), "Product already sold");
    }

    #[tokio::test]
    async fn test_result_wins_over_error() {
        let result = call(Canned::new(
            200,
            r#"{"result":{"total":1},"error":{"message":"stale"}}"#,
        ))
        .await
        .unwrap();
        assert_eq!(result, Some(Count { total: 1 }));
    }

    #[tokio::test]
    async fn test_neither_result_nor_error() {
        assert_eq!(call(Canned::new(200, r#"{"jsonrpc":"2.0","id":1}"#)).await.unwrap(), None);
        assert_eq!(call(Canned::new(200, r#"{"result":null}"#)).await.unwrap(), None);
        assert_eq!(call(Canned::new(200, "")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_local_failures() {
        let err = call(Canned::new(200, "<html>")).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        assert!(err.to_string().starts_with("Connection error: "));

        let err = call(Canned::new(200, r#"{"result":{"total":"many"}}"#))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));

        let err = call(Arc::new(Unreachable)).await.unwrap_err();
        assert_eq!(err.to_string(), "Connection error: unknown host: api.invalid");
    }

    #[tokio::test]
    async fn test_post_rest_sends_raw_body() {
        let canned = Canned::new(200, r#"{"result":{"total":0}}"#);
        let client = ApiClient::new(canned.clone());

        let result: Option<Count> = client
            .post_rest("api/v1/auth/login", &json!({"email": "a@b.c"}))
            .await
            .unwrap();
        assert_eq!(result, Some(Count { total: 0 }));

        let seen = canned.seen.lock().unwrap();
        assert_eq!(seen[0].body.as_deref(), Some(br#"{"email":"a@b.c"}"#.as_slice()));
    }
}
