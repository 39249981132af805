use crate::cli::actions::{auth, chats, products, purchases, users, Action};
use anyhow::Result;

/// Execute the provided action.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Auth(args) => auth::execute(args).await,
        Action::Products(args) => products::execute(args).await,
        Action::Purchases(args) => purchases::execute(args).await,
        Action::Chats(args) => chats::execute(args).await,
        Action::User(args) => users::execute(args).await,
    }
}
