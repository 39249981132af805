use super::render::{follow, or_dash};
use crate::{cli::globals::GlobalArgs, models::User};
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub id: i64,
}

/// Show a public user profile.
/// # Errors
/// Returns an error if the user cannot be loaded.
pub async fn execute(args: Args) -> Result<()> {
    let market = args.globals.marketplace(args.globals.open_store()?)?;
    let user = follow(market.users.get(args.id), "Loading user").await?;
    print!("{}", profile(&user));
    Ok(())
}

fn profile(user: &User) -> String {
    let mut out = format!("{} ({})\n", user.name, user.user_id);
    out.push_str(&format!("  location:  {}\n", or_dash(user.location.as_deref())));
    out.push_str(&format!(
        "  rating:    {:.1} ({} reviews)\n",
        user.rating_average, user.rating_count
    ));
    out.push_str(&format!(
        "  products:  {} for sale, {} sold, {} bought\n",
        user.products_for_sale, user.products_sold, user.products_bought
    ));
    out.push_str(&format!(
        "  member:    {} months{}\n",
        user.seniority_months,
        if user.active { "" } else { " (inactive)" }
    ));
    out
}
