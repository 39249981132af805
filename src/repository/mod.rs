//! Repositories: the boundary where every failure becomes `Error(message)`.
//!
//! Each network operation returns a fresh [`ResourceFlow`]; nothing below
//! this layer is visible to the caller except through that sequence.

pub mod auth;
pub mod categories;
pub mod conversations;
pub mod products;
pub mod purchases;
pub mod users;

use crate::{
    api::{ApiClient, ApiError},
    config::ApiConfig,
    net::retry::RetryPolicy,
    session::CredentialStore,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::warn;

pub use auth::AuthRepository;
pub use categories::CategoryRepository;
pub use conversations::ConversationRepository;
pub use products::ProductRepository;
pub use purchases::{PurchaseRepository, Transition};
pub use users::UserRepository;

pub const SERVER_ERROR: &str = "Server error";
pub const INVALID_RESPONSE: &str = "Invalid server response";

/// Log `err` and turn it into the message carried by `Error`.
fn failure(operation: &'static str, err: &ApiError, default: &str) -> String {
    let message = err.message_or(default);
    warn!(operation, error = ?err, "operation failed");
    message
}

/// All repositories sharing one pipeline and one credential store.
#[derive(Debug, Clone)]
pub struct Marketplace {
    pub auth: AuthRepository,
    pub products: ProductRepository,
    pub categories: CategoryRepository,
    pub purchases: PurchaseRepository,
    pub conversations: ConversationRepository,
    pub users: UserRepository,
    store: Arc<CredentialStore>,
}

impl Marketplace {
    /// Build the request pipeline for `config` and wire every repository to it.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn connect(config: &ApiConfig, store: Arc<CredentialStore>) -> Result<Self> {
        Self::connect_with_policy(config, store, RetryPolicy::default())
    }

    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn connect_with_policy(
        config: &ApiConfig,
        store: Arc<CredentialStore>,
        policy: RetryPolicy,
    ) -> Result<Self> {
        let api = ApiClient::with_policy(config, Arc::clone(&store), policy)?;
        Ok(Self::with_client(Arc::new(api), store))
    }

    #[must_use]
    pub fn with_client(api: Arc<ApiClient>, store: Arc<CredentialStore>) -> Self {
        Self {
            auth: AuthRepository::new(Arc::clone(&api), Arc::clone(&store)),
            products: ProductRepository::new(Arc::clone(&api)),
            categories: CategoryRepository::new(Arc::clone(&api)),
            purchases: PurchaseRepository::new(Arc::clone(&api)),
            conversations: ConversationRepository::new(Arc::clone(&api)),
            users: UserRepository::new(api),
            store,
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }
}
