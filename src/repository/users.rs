use super::{failure, SERVER_ERROR};
use crate::{
    api::{dto::UserDto, ApiClient, NoParams},
    models::User,
    resource::ResourceFlow,
};
use http::Method;
use std::sync::Arc;
use tracing::instrument;

pub const NOT_FOUND: &str = "User not found";

#[derive(Debug, Clone)]
pub struct UserRepository {
    api: Arc<ApiClient>,
}

impl UserRepository {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Public profile of a user, including seller rating and counters.
    #[must_use]
    pub fn get(&self, id: i64) -> ResourceFlow<User> {
        let api = Arc::clone(&self.api);
        ResourceFlow::spawn(async move { get_user(&api, id).await })
    }
}

#[instrument(skip(api))]
async fn get_user(api: &ApiClient, id: i64) -> Result<User, String> {
    let reply: Option<UserDto> = api
        .call(Method::POST, &format!("api/v1/usuarios/{id}"), &NoParams {})
        .await
        .map_err(|e| failure("users.get", &e, SERVER_ERROR))?;

    reply.map(User::from).ok_or_else(|| NOT_FOUND.to_string())
}
