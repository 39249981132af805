use crate::config::{CONNECT_TIMEOUT, READ_TIMEOUT, WRITE_TIMEOUT};
use clap::{Arg, ArgMatches, Command};
use std::time::Duration;

pub const ARG_BASE_URL: &str = "base-url";
pub const ARG_CONNECT_TIMEOUT: &str = "connect-timeout";
pub const ARG_READ_TIMEOUT: &str = "read-timeout";
pub const ARG_WRITE_TIMEOUT: &str = "write-timeout";

#[derive(Debug, Clone)]
pub struct Options {
    /// Only commands that reach the backend need it.
    pub base_url: Option<String>,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
}

impl Options {
    /// Parse connection arguments from matches.
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        let base_url = matches
            .get_one::<String>(ARG_BASE_URL)
            .cloned()
            .filter(|v| !v.trim().is_empty());

        let seconds = |id: &str, default: Duration| {
            matches
                .get_one::<u64>(id)
                .copied()
                .map_or(default, Duration::from_secs)
        };

        Self {
            base_url,
            connect_timeout: seconds(ARG_CONNECT_TIMEOUT, CONNECT_TIMEOUT),
            read_timeout: seconds(ARG_READ_TIMEOUT, READ_TIMEOUT),
            write_timeout: seconds(ARG_WRITE_TIMEOUT, WRITE_TIMEOUT),
        }
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_BASE_URL)
                .short('u')
                .long(ARG_BASE_URL)
                .help("Marketplace API base URL, example: https://market.example.com/")
                .env("BAZAAR_BASE_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_CONNECT_TIMEOUT)
                .long(ARG_CONNECT_TIMEOUT)
                .help("Connect timeout in seconds")
                .env("BAZAAR_CONNECT_TIMEOUT")
                .default_value("45")
                .global(true)
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_READ_TIMEOUT)
                .long(ARG_READ_TIMEOUT)
                .help("Read timeout in seconds")
                .env("BAZAAR_READ_TIMEOUT")
                .default_value("90")
                .global(true)
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_WRITE_TIMEOUT)
                .long(ARG_WRITE_TIMEOUT)
                .help("Write timeout in seconds")
                .env("BAZAAR_WRITE_TIMEOUT")
                .default_value("90")
                .global(true)
                .value_parser(clap::value_parser!(u64)),
        )
}
