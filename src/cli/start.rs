use crate::cli::{actions::Action, commands, dispatch, telemetry};
use anyhow::Result;
use clap::ArgMatches;
use std::ffi::OsString;
use tracing::Level;

/// `-v` count to log level; no flag keeps the subscriber default (ERROR).
const fn verbosity_level(count: u8) -> Option<Level> {
    match count {
        0 => None,
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

fn requested_level(matches: &ArgMatches) -> Option<Level> {
    verbosity_level(
        matches
            .get_one::<u8>(commands::logging::ARG_VERBOSITY)
            .copied()
            .unwrap_or_default(),
    )
}

/// Parse the process arguments, install logging and build the action to run.
///
/// # Errors
///
/// Returns an error if telemetry initialization or action dispatch fails
pub fn start() -> Result<Action> {
    start_from(std::env::args_os())
}

/// Same as [`start`] for an explicit argument list; clap exits the process
/// on `--help`, `--version` and usage errors.
///
/// # Errors
///
/// Returns an error if telemetry initialization or action dispatch fails
pub fn start_from<I, T>(args: I) -> Result<Action>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = commands::new().get_matches_from(args);

    telemetry::init(requested_level(&matches))?;

    dispatch::handler(&matches)
}
