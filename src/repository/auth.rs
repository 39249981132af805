//! Login, registration and the local session.
//!
//! Successful authentication persists the token and identity before the
//! `Success` state is emitted, so a caller reacting to `Success` always finds
//! the session in the store. Failures leave the store as it was.

use super::{failure, INVALID_RESPONSE};
use crate::{
    api::{
        dto::AuthResult,
        params::{LoginRequest, RefreshRequest},
        ApiClient, ApiError, RegisterForm,
    },
    models::User,
    resource::ResourceFlow,
    session::{CredentialStore, StoreError, UserIdentity},
};
use secrecy::SecretString;
use serde::Serialize;
use std::sync::Arc;
use tokio::task;
use tracing::{info, instrument, warn};

pub const LOGIN_PATH: &str = "api/v1/auth/login";
pub const REGISTER_PATH: &str = "api/v1/auth/registro";
pub const REFRESH_PATH: &str = "api/v1/auth/refresh";

pub const LOGIN_FAILED: &str = "Authentication error";
pub const REGISTER_FAILED: &str = "Registration error";
pub const NOT_LOGGED_IN: &str = "Not logged in";

#[derive(Debug, Clone)]
pub struct AuthRepository {
    api: Arc<ApiClient>,
    store: Arc<CredentialStore>,
}

impl AuthRepository {
    #[must_use]
    pub fn new(api: Arc<ApiClient>, store: Arc<CredentialStore>) -> Self {
        Self { api, store }
    }

    #[must_use]
    pub fn login(&self, email: impl Into<String>, password: SecretString) -> ResourceFlow<User> {
        let api = Arc::clone(&self.api);
        let store = Arc::clone(&self.store);
        let email = email.into();

        ResourceFlow::spawn(async move {
            let request = LoginRequest {
                email: &email,
                password: &password,
            };
            authenticate(&api, &store, LOGIN_PATH, &request, LOGIN_FAILED).await
        })
    }

    /// Create an account and sign in with it.
    #[must_use]
    pub fn register(&self, form: RegisterForm) -> ResourceFlow<User> {
        let api = Arc::clone(&self.api);
        let store = Arc::clone(&self.store);

        ResourceFlow::spawn(async move {
            authenticate(&api, &store, REGISTER_PATH, &form, REGISTER_FAILED).await
        })
    }

    /// Exchange the stored token for a fresh one.
    #[must_use]
    pub fn refresh_token(&self) -> ResourceFlow<()> {
        let api = Arc::clone(&self.api);
        let store = Arc::clone(&self.store);
        ResourceFlow::spawn(async move { refresh(&api, &store).await })
    }

    /// Identity of the signed-in user, read from the local store only.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.store.identity().map(|identity| User {
            id: identity.odoo_id,
            user_id: identity.user_id,
            name: identity.name,
            email: identity.email,
            phone: None,
            location: None,
            registered_at: None,
            active: true,
            seniority_months: 0,
            rating_average: 0.0,
            rating_count: 0,
            products_for_sale: 0,
            products_sold: 0,
            products_bought: 0,
            image: None,
        })
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.store.is_session_active()
    }

    /// Forget the session.
    ///
    /// # Errors
    /// Returns an error if the session file cannot be removed.
    pub fn logout(&self) -> Result<(), StoreError> {
        self.store.clear()
    }
}

#[instrument(skip(api, store, body))]
async fn authenticate<B: Serialize + Sync>(
    api: &ApiClient,
    store: &Arc<CredentialStore>,
    path: &'static str,
    body: &B,
    default: &'static str,
) -> Result<User, String> {
    let reply: Option<AuthResult> = api
        .post_rest(path, body)
        .await
        .map_err(|e| auth_failure(&e, default))?;

    let Some(AuthResult {
        token: Some(token),
        user: Some(user),
        ..
    }) = reply
    else {
        warn!("authentication reply without token or user");
        return Err(INVALID_RESPONSE.to_string());
    };

    if token.trim().is_empty() {
        warn!("authentication reply with a blank token");
        return Err(INVALID_RESPONSE.to_string());
    }

    let user = User::from(user);
    if user.id <= 0 || user.user_id.trim().is_empty() {
        warn!(id = user.id, "authentication reply without a usable user identity");
        return Err(INVALID_RESPONSE.to_string());
    }

    let identity = UserIdentity {
        odoo_id: user.id,
        user_id: user.user_id.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
    };

    let token = SecretString::from(token);
    write_session(store, move |store| store.save_session(&token, &identity)).await?;

    info!(user_id = %user.user_id, "signed in");
    Ok(user)
}

#[instrument(skip_all)]
async fn refresh(api: &ApiClient, store: &Arc<CredentialStore>) -> Result<(), String> {
    let Some(current) = store.token() else {
        return Err(NOT_LOGGED_IN.to_string());
    };

    let reply: Option<AuthResult> = api
        .post_rest(REFRESH_PATH, &RefreshRequest { token: &current })
        .await
        .map_err(|e| auth_failure(&e, LOGIN_FAILED))?;

    let token = reply
        .and_then(|result| result.token)
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| INVALID_RESPONSE.to_string())?;

    let token = SecretString::from(token);
    write_session(store, move |store| store.save_token(&token)).await?;

    info!("token refreshed");
    Ok(())
}

/// Run a store write on the blocking pool; it fsyncs and renames the file.
async fn write_session<F>(store: &Arc<CredentialStore>, write: F) -> Result<(), String>
where
    F: FnOnce(&CredentialStore) -> Result<(), StoreError> + Send + 'static,
{
    let store = Arc::clone(store);
    task::spawn_blocking(move || write(store.as_ref()))
        .await
        .map_err(|e| format!("Could not save session: {e}"))?
        .map_err(|e| format!("Could not save session: {e}"))
}

fn auth_failure(err: &ApiError, default: &str) -> String {
    match err {
        ApiError::Http {
            message: Some(_), ..
        } => {
            warn!(error = ?err, "authentication rejected");
            err.auth_message_or(default)
        }
        _ => failure("auth", err, default),
    }
}
