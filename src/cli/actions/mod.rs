pub mod auth;
pub mod chats;
pub mod products;
pub mod purchases;
pub mod users;

mod render;

// The match over `Action` lives in `run` so this file stays a list of variants.
mod run;

#[derive(Debug)]
pub enum Action {
    Auth(auth::Args),
    Products(products::Args),
    Purchases(purchases::Args),
    Chats(chats::Args),
    User(users::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
