//! Marketplace subcommands.

use crate::models::PurchaseStatus;
use clap::{builder::PossibleValuesParser, Arg, ArgAction, Command};

pub const SUB_LOGIN: &str = "login";
pub const SUB_REGISTER: &str = "register";
pub const SUB_LOGOUT: &str = "logout";
pub const SUB_WHOAMI: &str = "whoami";
pub const SUB_REFRESH: &str = "refresh";
pub const SUB_PRODUCTS: &str = "products";
pub const SUB_CATEGORIES: &str = "categories";
pub const SUB_PURCHASES: &str = "purchases";
pub const SUB_CHATS: &str = "chats";
pub const SUB_USER: &str = "user";

pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_NAME: &str = "name";
pub const ARG_PHONE: &str = "phone";
pub const ARG_LOCATION: &str = "location";
pub const ARG_ID: &str = "id";
pub const ARG_OFFSET: &str = "offset";
pub const ARG_LIMIT: &str = "limit";
pub const ARG_CATEGORY: &str = "category";
pub const ARG_CONDITION: &str = "condition";
pub const ARG_SEARCH: &str = "search";
pub const ARG_DESCRIPTION: &str = "description";
pub const ARG_PRICE: &str = "price";
pub const ARG_AGE: &str = "age";
pub const ARG_ROLE: &str = "role";
pub const ARG_STATUS: &str = "status";
pub const ARG_CONTENT: &str = "content";

pub const CONDITIONS: [&str; 2] = ["nuevo", "segunda_mano"];
pub const ROLES: [&str; 2] = ["buyer", "seller"];

fn id_arg(help: &'static str) -> Arg {
    Arg::new(ARG_ID)
        .help(help)
        .required(true)
        .value_parser(clap::value_parser!(i64))
}

fn page_args(command: Command, default_limit: &'static str) -> Command {
    command
        .arg(
            Arg::new(ARG_OFFSET)
                .long(ARG_OFFSET)
                .help("Number of items to skip")
                .default_value("0")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_LIMIT)
                .long(ARG_LIMIT)
                .help("Maximum number of items")
                .default_value(default_limit)
                .value_parser(clap::value_parser!(u32)),
        )
}

fn password_arg() -> Arg {
    Arg::new(ARG_PASSWORD)
        .long(ARG_PASSWORD)
        .help("Account password")
        .env("BAZAAR_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

fn auth_commands() -> [Command; 5] {
    [
        Command::new(SUB_LOGIN)
            .about("Sign in and store the session")
            .arg(
                Arg::new(ARG_EMAIL)
                    .long(ARG_EMAIL)
                    .help("Account email")
                    .env("BAZAAR_EMAIL")
                    .required(true),
            )
            .arg(password_arg()),
        Command::new(SUB_REGISTER)
            .about("Create an account and sign in")
            .arg(Arg::new(ARG_NAME).long(ARG_NAME).help("Display name").required(true))
            .arg(Arg::new(ARG_EMAIL).long(ARG_EMAIL).help("Account email").required(true))
            .arg(password_arg())
            .arg(Arg::new(ARG_PHONE).long(ARG_PHONE).help("Phone number"))
            .arg(Arg::new(ARG_LOCATION).long(ARG_LOCATION).help("City or address")),
        Command::new(SUB_LOGOUT).about("Forget the stored session"),
        Command::new(SUB_WHOAMI).about("Show the signed-in user"),
        Command::new(SUB_REFRESH).about("Exchange the stored token for a fresh one"),
    ]
}

fn products_command() -> Command {
    let list = page_args(Command::new("list").about("List products for sale"), "20")
        .arg(
            Arg::new(ARG_CATEGORY)
                .long(ARG_CATEGORY)
                .help("Category id")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_CONDITION)
                .long(ARG_CONDITION)
                .help("Product condition")
                .value_parser(PossibleValuesParser::new(CONDITIONS)),
        )
        .arg(
            Arg::new(ARG_SEARCH)
                .short('s')
                .long(ARG_SEARCH)
                .help("Search by name"),
        );

    let create = Command::new("create")
        .about("Publish a product")
        .arg(Arg::new(ARG_NAME).long(ARG_NAME).required(true))
        .arg(Arg::new(ARG_DESCRIPTION).long(ARG_DESCRIPTION).required(true))
        .arg(
            Arg::new(ARG_PRICE)
                .long(ARG_PRICE)
                .required(true)
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new(ARG_CONDITION)
                .long(ARG_CONDITION)
                .default_value("nuevo")
                .value_parser(PossibleValuesParser::new(CONDITIONS)),
        )
        .arg(Arg::new(ARG_LOCATION).long(ARG_LOCATION).required(true))
        .arg(
            Arg::new(ARG_CATEGORY)
                .long(ARG_CATEGORY)
                .required(true)
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_AGE)
                .long(ARG_AGE)
                .help("Age of the item in months")
                .value_parser(clap::value_parser!(i64)),
        );

    let update = Command::new("update")
        .about("Change a product you own")
        .arg(id_arg("Product id"))
        .arg(Arg::new(ARG_NAME).long(ARG_NAME))
        .arg(Arg::new(ARG_DESCRIPTION).long(ARG_DESCRIPTION))
        .arg(
            Arg::new(ARG_PRICE)
                .long(ARG_PRICE)
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(Arg::new(ARG_LOCATION).long(ARG_LOCATION));

    Command::new(SUB_PRODUCTS)
        .about("Browse and manage products")
        .subcommand_required(true)
        .subcommand(list)
        .subcommand(Command::new("show").about("Show a product").arg(id_arg("Product id")))
        .subcommand(create)
        .subcommand(update)
        .subcommand(
            Command::new("delete")
                .about("Delete a product you own")
                .arg(id_arg("Product id")),
        )
}

fn purchases_command() -> Command {
    let statuses: Vec<&'static str> = PurchaseStatus::ALL.iter().map(|s| s.value()).collect();

    let list = page_args(Command::new("list").about("List your purchases and sales"), "20")
        .arg(
            Arg::new(ARG_ROLE)
                .long(ARG_ROLE)
                .help("Only purchases made as buyer or as seller")
                .value_parser(PossibleValuesParser::new(ROLES)),
        )
        .arg(
            Arg::new(ARG_STATUS)
                .long(ARG_STATUS)
                .help("Only purchases in this state")
                .value_parser(PossibleValuesParser::new(statuses)),
        );

    Command::new(SUB_PURCHASES)
        .about("Buy products and handle sales")
        .subcommand_required(true)
        .subcommand(list)
        .subcommand(
            Command::new("buy")
                .about("Request to buy a product")
                .arg(id_arg("Product id")),
        )
        .subcommand(
            Command::new("confirm")
                .about("Confirm a sale")
                .arg(id_arg("Purchase id")),
        )
        .subcommand(
            Command::new("reject")
                .about("Reject a sale")
                .arg(id_arg("Purchase id")),
        )
        .subcommand(
            Command::new("cancel")
                .about("Cancel a purchase")
                .arg(id_arg("Purchase id")),
        )
}

fn chats_command() -> Command {
    Command::new(SUB_CHATS)
        .about("Talk to buyers and sellers")
        .subcommand_required(true)
        .subcommand(page_args(
            Command::new("list").about("List conversations"),
            "20",
        ))
        .subcommand(page_args(
            Command::new("messages")
                .about("Show the messages of a conversation")
                .arg(id_arg("Conversation id")),
            "50",
        ))
        .subcommand(
            Command::new("send")
                .about("Send a message")
                .arg(id_arg("Conversation id"))
                .arg(
                    Arg::new(ARG_CONTENT)
                        .help("Message text")
                        .required(true)
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("start")
                .about("Start a conversation about a product")
                .arg(id_arg("Product id")),
        )
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommands(auth_commands())
        .subcommand(products_command())
        .subcommand(Command::new(SUB_CATEGORIES).about("List product categories"))
        .subcommand(purchases_command())
        .subcommand(chats_command())
        .subcommand(
            Command::new(SUB_USER)
                .about("Public user profiles")
                .subcommand_required(true)
                .subcommand(Command::new("show").about("Show a user").arg(id_arg("User id"))),
        )
}
