use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;
use std::{env, path::PathBuf};

pub const ARG_STORE: &str = "store";
pub const ARG_MASTER_KEY: &str = "master-key";
pub const ARG_MASTER_KEY_FILE: &str = "master-key-file";

const STATE_DIR: &str = ".bazaar";
const STORE_FILE: &str = "session.bin";
const KEY_FILE: &str = "master.key";

#[derive(Debug, Clone)]
pub struct Options {
    pub store_path: PathBuf,
    /// Base64 key; takes precedence over the key file.
    pub master_key: Option<SecretString>,
    pub master_key_file: PathBuf,
}

impl Options {
    /// Parse session storage arguments, defaulting both files to `~/.bazaar/`.
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        let path = |id: &str, file: &str| {
            matches
                .get_one::<String>(id)
                .filter(|v| !v.trim().is_empty())
                .map_or_else(|| state_dir().join(file), PathBuf::from)
        };

        Self {
            store_path: path(ARG_STORE, STORE_FILE),
            master_key: matches
                .get_one::<String>(ARG_MASTER_KEY)
                .filter(|v| !v.trim().is_empty())
                .map(|v| SecretString::from(v.trim().to_string())),
            master_key_file: path(ARG_MASTER_KEY_FILE, KEY_FILE),
        }
    }
}

fn state_dir() -> PathBuf {
    env::var_os("HOME")
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
        .join(STATE_DIR)
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_STORE)
                .long(ARG_STORE)
                .help("Path of the encrypted session file (default: ~/.bazaar/session.bin)")
                .env("BAZAAR_STORE")
                .global(true),
        )
        .arg(
            Arg::new(ARG_MASTER_KEY)
                .long(ARG_MASTER_KEY)
                .help("Base64 encoded 32-byte key sealing the session file")
                .env("BAZAAR_MASTER_KEY")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new(ARG_MASTER_KEY_FILE)
                .long(ARG_MASTER_KEY_FILE)
                .help("Key file used when no key is given, created on first use (default: ~/.bazaar/master.key)")
                .env("BAZAAR_MASTER_KEY_FILE")
                .global(true),
        )
}
