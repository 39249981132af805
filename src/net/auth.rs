use super::{ConnectivityError, HttpResponse, OutgoingRequest, Transport, CONTENT_TYPE_JSON};
use crate::session::CredentialStore;
use async_trait::async_trait;
use http::{header, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::warn;

pub const BEARER_PREFIX: &str = "Bearer ";

/// Attach the stored token to every outgoing request.
///
/// When the store has no token the request is forwarded untouched.
#[derive(Debug)]
pub struct AuthInterceptor<T> {
    inner: T,
    store: Arc<CredentialStore>,
}

impl<T> AuthInterceptor<T> {
    #[must_use]
    pub fn new(inner: T, store: Arc<CredentialStore>) -> Self {
        Self { inner, store }
    }
}

#[async_trait]
impl<T: Transport> Transport for AuthInterceptor<T> {
    async fn execute(&self, request: OutgoingRequest) -> Result<HttpResponse, ConnectivityError> {
        let request = authorize(request, self.store.token().as_ref());
        self.inner.execute(request).await
    }
}

/// Add `Authorization: Bearer <token>` and JSON content headers when a token is present.
#[must_use]
pub fn authorize(mut request: OutgoingRequest, token: Option<&SecretString>) -> OutgoingRequest {
    let Some(token) = token else {
        return request;
    };

    let Ok(mut value) = HeaderValue::from_str(&format!("{BEARER_PREFIX}{}", token.expose_secret()))
    else {
        warn!("stored token is not a valid header value, sending request without it");
        return request;
    };
    value.set_sensitive(true);

    request.headers.insert(header::AUTHORIZATION, value);
    request.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(CONTENT_TYPE_JSON),
    );
    request
        .headers
        .insert(header::ACCEPT, HeaderValue::from_static(CONTENT_TYPE_JSON));

    request
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::{MasterKey, UserIdentity};
    use bytes::Bytes;
    use http::{Method, StatusCode};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<OutgoingRequest>>,
    }

    #[async_trait]
    impl Transport for Recorder {
        async fn execute(
            &self,
            request: OutgoingRequest,
        ) -> Result<HttpResponse, ConnectivityError> {
            self.seen.lock().unwrap().push(request);
            Ok(HttpResponse::new(StatusCode::OK, "{}"))
        }
    }

    fn store(dir: &tempfile::TempDir) -> Arc<CredentialStore> {
        Arc::new(
            CredentialStore::open(dir.path().join("session.bin"), MasterKey::from_bytes([1; 32]))
                .unwrap(),
        )
    }

    fn request() -> OutgoingRequest {
        let mut request = OutgoingRequest::new(Method::POST, "api/v1/compras");
        request.body = Some(Bytes::from_static(b"{\"jsonrpc\":\"2.0\"}"));
        request
    }

    #[tokio::test]
    async fn test_without_token_request_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Arc::new(Recorder::default());
        let interceptor = AuthInterceptor::new(Arc::clone(&recorder), store(&dir));

        interceptor.execute(request()).await.unwrap();

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].headers.get(header::AUTHORIZATION).is_none());
        assert!(seen[0].headers.is_empty());
    }

    #[tokio::test]
    async fn test_with_token_adds_bearer() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store
            .save_session(
                &SecretString::from("abc.def.ghi".to_string()),
                &UserIdentity {
                    odoo_id: 7,
                    user_id: "USR-00007".to_string(),
                    email: "luis@example.com".to_string(),
                    name: "Luis".to_string(),
                },
            )
            .unwrap();

        let recorder = Arc::new(Recorder::default());
        let interceptor = AuthInterceptor::new(Arc::clone(&recorder), store);

        interceptor.execute(request()).await.unwrap();

        let seen = recorder.seen.lock().unwrap();
        let headers = &seen[0].headers;
        assert_eq!(headers.get(header::AUTHORIZATION).unwrap(), "Bearer abc.def.ghi");
        assert!(headers.get(header::AUTHORIZATION).unwrap().is_sensitive());
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), CONTENT_TYPE_JSON);
        assert_eq!(headers.get(header::ACCEPT).unwrap(), CONTENT_TYPE_JSON);
        assert_eq!(
            seen[0].body.as_deref(),
            Some(b"{\"jsonrpc\":\"2.0\"}".as_slice())
        );
    }

    #[tokio::test]
    async fn test_token_is_read_per_request() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let recorder = Arc::new(Recorder::default());
        let interceptor = AuthInterceptor::new(Arc::clone(&recorder), Arc::clone(&store));

        interceptor.execute(request()).await.unwrap();
        store
            .save_token(&SecretString::from("fresh".to_string()))
            .unwrap();
        interceptor.execute(request()).await.unwrap();
        store.clear().unwrap();
        interceptor.execute(request()).await.unwrap();

        let seen = recorder.seen.lock().unwrap();
        assert!(seen[0].headers.get(header::AUTHORIZATION).is_none());
        assert_eq!(seen[1].headers.get(header::AUTHORIZATION).unwrap(), "Bearer fresh");
        assert!(seen[2].headers.get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_invalid_token_is_skipped() {
        let token = SecretString::from("bad\ntoken".to_string());
        let request = authorize(request(), Some(&token));
        assert!(request.headers.get(header::AUTHORIZATION).is_none());
    }
}
