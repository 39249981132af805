use super::render::{follow, or_dash};
use crate::{api::RegisterForm, cli::globals::GlobalArgs, models::User};
use anyhow::{Context, Result};
use secrecy::SecretString;
use tracing::debug;

#[derive(Debug)]
pub enum Operation {
    Login {
        email: String,
        password: SecretString,
    },
    Register(RegisterForm),
    Logout,
    Whoami,
    Refresh,
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub operation: Operation,
}

/// Execute an account action.
/// # Errors
/// Returns an error if the store cannot be opened or the backend rejects the request.
pub async fn execute(args: Args) -> Result<()> {
    let store = args.globals.open_store()?;

    match args.operation {
        Operation::Logout => {
            store.clear().context("could not remove the session")?;
            println!("Signed out");
        }
        Operation::Whoami => match store.identity() {
            Some(identity) => {
                println!("{} <{}>", identity.name, identity.email);
                println!("id: {} ({})", identity.odoo_id, identity.user_id);
            }
            None => println!("Not signed in"),
        },
        Operation::Login { email, password } => {
            let market = args.globals.marketplace(store)?;
            let user = follow(market.auth.login(email, password), "Signing in").await?;
            println!("Signed in as {}", describe(&user));
        }
        Operation::Register(form) => {
            let market = args.globals.marketplace(store)?;
            let user = follow(market.auth.register(form), "Creating account").await?;
            println!("Account created, signed in as {}", describe(&user));
        }
        Operation::Refresh => {
            let market = args.globals.marketplace(store)?;
            follow(market.auth.refresh_token(), "Refreshing session").await?;
            debug!("session token replaced");
            println!("Session refreshed");
        }
    }

    Ok(())
}

fn describe(user: &User) -> String {
    format!(
        "{} <{}> [{}] {}",
        user.name,
        user.email,
        user.user_id,
        or_dash(user.location.as_deref())
    )
}
