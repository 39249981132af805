use crate::{
    api::{NewProduct, Page, ProductQuery, ProductUpdate, PurchaseQuery, PurchaseRole, RegisterForm},
    cli::{
        actions::{auth, chats, products, purchases, users, Action},
        commands::{connection, market::*, session},
        globals::GlobalArgs,
    },
    models::PurchaseStatus,
    repository::Transition,
};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let globals = GlobalArgs::new(
        connection::Options::parse(matches),
        session::Options::parse(matches),
    );

    let (name, sub_m) = matches.subcommand().context("missing subcommand")?;

    match name {
        SUB_LOGIN => Ok(Action::Auth(auth::Args {
            globals,
            operation: auth::Operation::Login {
                email: required(sub_m, ARG_EMAIL)?,
                password: SecretString::from(required(sub_m, ARG_PASSWORD)?),
            },
        })),
        SUB_REGISTER => Ok(Action::Auth(auth::Args {
            globals,
            operation: auth::Operation::Register(RegisterForm {
                name: required(sub_m, ARG_NAME)?,
                email: required(sub_m, ARG_EMAIL)?,
                password: SecretString::from(required(sub_m, ARG_PASSWORD)?),
                phone: optional(sub_m, ARG_PHONE),
                location: optional(sub_m, ARG_LOCATION),
            }),
        })),
        SUB_LOGOUT => Ok(Action::Auth(auth::Args {
            globals,
            operation: auth::Operation::Logout,
        })),
        SUB_WHOAMI => Ok(Action::Auth(auth::Args {
            globals,
            operation: auth::Operation::Whoami,
        })),
        SUB_REFRESH => Ok(Action::Auth(auth::Args {
            globals,
            operation: auth::Operation::Refresh,
        })),
        SUB_CATEGORIES => Ok(Action::Products(products::Args {
            globals,
            operation: products::Operation::Categories,
        })),
        SUB_PRODUCTS => Ok(Action::Products(products::Args {
            globals,
            operation: products_operation(sub_m)?,
        })),
        SUB_PURCHASES => Ok(Action::Purchases(purchases::Args {
            globals,
            operation: purchases_operation(sub_m)?,
        })),
        SUB_CHATS => Ok(Action::Chats(chats::Args {
            globals,
            operation: chats_operation(sub_m)?,
        })),
        SUB_USER => {
            let (_, show) = sub_m.subcommand().context("missing user subcommand")?;
            Ok(Action::User(users::Args {
                globals,
                id: id(show)?,
            }))
        }
        other => Err(anyhow!("unknown command: {other}")),
    }
}

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

fn optional(matches: &ArgMatches, id: &str) -> Option<String> {
    matches
        .get_one::<String>(id)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn id(matches: &ArgMatches) -> Result<i64> {
    matches
        .get_one::<i64>(ARG_ID)
        .copied()
        .context("missing required argument: <id>")
}

fn page(matches: &ArgMatches) -> Page {
    let defaults = Page::default();
    Page::new(
        matches
            .get_one::<u32>(ARG_OFFSET)
            .copied()
            .unwrap_or(defaults.offset),
        matches
            .get_one::<u32>(ARG_LIMIT)
            .copied()
            .unwrap_or(defaults.limit),
    )
}

fn products_operation(matches: &ArgMatches) -> Result<products::Operation> {
    let (name, sub_m) = matches.subcommand().context("missing products subcommand")?;

    Ok(match name {
        "list" => products::Operation::List(ProductQuery {
            page: page(sub_m),
            category_id: sub_m.get_one::<i64>(ARG_CATEGORY).copied(),
            condition: optional(sub_m, ARG_CONDITION),
            search: optional(sub_m, ARG_SEARCH),
        }),
        "show" => products::Operation::Show(id(sub_m)?),
        "create" => products::Operation::Create(NewProduct {
            name: required(sub_m, ARG_NAME)?,
            description: required(sub_m, ARG_DESCRIPTION)?,
            price: sub_m
                .get_one::<f64>(ARG_PRICE)
                .copied()
                .context("missing required argument: --price")?,
            condition: required(sub_m, ARG_CONDITION)?,
            location: required(sub_m, ARG_LOCATION)?,
            category_id: sub_m
                .get_one::<i64>(ARG_CATEGORY)
                .copied()
                .context("missing required argument: --category")?,
            age_months: sub_m.get_one::<i64>(ARG_AGE).copied(),
            images: None,
        }),
        "update" => products::Operation::Update(
            id(sub_m)?,
            ProductUpdate {
                name: optional(sub_m, ARG_NAME),
                description: optional(sub_m, ARG_DESCRIPTION),
                price: sub_m.get_one::<f64>(ARG_PRICE).copied(),
                location: optional(sub_m, ARG_LOCATION),
            },
        ),
        "delete" => products::Operation::Delete(id(sub_m)?),
        other => return Err(anyhow!("unknown products command: {other}")),
    })
}

fn purchases_operation(matches: &ArgMatches) -> Result<purchases::Operation> {
    let (name, sub_m) = matches.subcommand().context("missing purchases subcommand")?;

    Ok(match name {
        "list" => purchases::Operation::List(PurchaseQuery {
            page: page(sub_m),
            role: sub_m
                .get_one::<String>(ARG_ROLE)
                .map(|role| match role.as_str() {
                    "seller" => PurchaseRole::Seller,
                    _ => PurchaseRole::Buyer,
                }),
            status: sub_m
                .get_one::<String>(ARG_STATUS)
                .map(|status| PurchaseStatus::parse(status)),
        }),
        "buy" => purchases::Operation::Buy(id(sub_m)?),
        "confirm" => purchases::Operation::Transition(Transition::Confirm, id(sub_m)?),
        "reject" => purchases::Operation::Transition(Transition::Reject, id(sub_m)?),
        "cancel" => purchases::Operation::Transition(Transition::Cancel, id(sub_m)?),
        other => return Err(anyhow!("unknown purchases command: {other}")),
    })
}

fn chats_operation(matches: &ArgMatches) -> Result<chats::Operation> {
    let (name, sub_m) = matches.subcommand().context("missing chats subcommand")?;

    Ok(match name {
        "list" => chats::Operation::List(page(sub_m)),
        "messages" => chats::Operation::Messages(id(sub_m)?, page(sub_m)),
        "send" => chats::Operation::Send {
            conversation_id: id(sub_m)?,
            content: required(sub_m, ARG_CONTENT)?,
        },
        "start" => chats::Operation::Start(id(sub_m)?),
        other => return Err(anyhow!("unknown chats command: {other}")),
    })
}
