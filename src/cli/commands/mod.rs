pub mod connection;
pub mod logging;
pub mod market;
pub mod session;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    ColorChoice, Command,
};

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let command = Command::new("bazaar")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles);

    let command = connection::with_args(command);
    let command = session::with_args(command);
    let command = logging::with_args(command);
    market::with_subcommands(command)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    const ENV_VARS: [&str; 9] = [
        "BAZAAR_BASE_URL",
        "BAZAAR_STORE",
        "BAZAAR_MASTER_KEY",
        "BAZAAR_MASTER_KEY_FILE",
        "BAZAAR_LOG_LEVEL",
        "BAZAAR_CONNECT_TIMEOUT",
        "BAZAAR_READ_TIMEOUT",
        "BAZAAR_EMAIL",
        "BAZAAR_PASSWORD",
    ];

    fn with_clean_env<F: FnOnce()>(f: F) {
        temp_env::with_vars(ENV_VARS.map(|name| (name, None::<&str>)), f);
    }

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "bazaar");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            env!("CARGO_PKG_DESCRIPTION")
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_command_is_consistent() {
        new().debug_assert();
    }

    #[test]
    fn test_global_args_after_subcommand() {
        with_clean_env(|| {
            let matches = new().get_matches_from(vec![
                "bazaar",
                "categories",
                "--base-url",
                "https://market.example.com",
                "--connect-timeout",
                "5",
            ]);

            let options = connection::Options::parse(&matches);
            assert_eq!(options.base_url.as_deref(), Some("https://market.example.com"));
            assert_eq!(options.connect_timeout, Duration::from_secs(5));
            assert_eq!(options.read_timeout, Duration::from_secs(90));
            assert_eq!(options.write_timeout, Duration::from_secs(90));
        });
    }

    #[test]
    fn test_check_env() {
        with_clean_env(|| {
            temp_env::with_vars(
                [
                    ("BAZAAR_BASE_URL", Some("http://localhost:8069")),
                    ("BAZAAR_STORE", Some("/tmp/bazaar/session.bin")),
                    ("BAZAAR_READ_TIMEOUT", Some("30")),
                    ("BAZAAR_LOG_LEVEL", Some("info")),
                ],
                || {
                    let matches = new().get_matches_from(vec!["bazaar", "whoami"]);

                    let connection = connection::Options::parse(&matches);
                    assert_eq!(connection.base_url.as_deref(), Some("http://localhost:8069"));
                    assert_eq!(connection.read_timeout, Duration::from_secs(30));

                    let session = session::Options::parse(&matches);
                    assert_eq!(
                        session.store_path,
                        std::path::PathBuf::from("/tmp/bazaar/session.bin")
                    );
                    assert!(session.master_key.is_none());

                    assert_eq!(
                        matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                        Some(2)
                    );
                },
            );
        });
    }

    #[test]
    fn test_default_state_files() {
        with_clean_env(|| {
            temp_env::with_var("HOME", Some("/home/ana"), || {
                let matches = new().get_matches_from(vec!["bazaar", "logout"]);
                let session = session::Options::parse(&matches);
                assert_eq!(
                    session.store_path,
                    std::path::PathBuf::from("/home/ana/.bazaar/session.bin")
                );
                assert_eq!(
                    session.master_key_file,
                    std::path::PathBuf::from("/home/ana/.bazaar/master.key")
                );
            });
        });
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            with_clean_env(|| {
                temp_env::with_var("BAZAAR_LOG_LEVEL", Some(level), || {
                    let matches = new().get_matches_from(vec!["bazaar", "categories"]);
                    assert_eq!(
                        matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                        Some(u8::try_from(index).unwrap())
                    );
                });
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5usize {
            with_clean_env(|| {
                let mut args = vec!["bazaar".to_string(), "categories".to_string()];
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(u8::try_from(index).unwrap())
                );
            });
        }
    }

    #[test]
    fn test_login_requires_password() {
        with_clean_env(|| {
            let result = new().try_get_matches_from(vec![
                "bazaar",
                "login",
                "--email",
                "ana@example.com",
            ]);
            assert!(result.is_err());

            temp_env::with_var("BAZAAR_PASSWORD", Some("secret"), || {
                let matches = new()
                    .try_get_matches_from(vec!["bazaar", "login", "--email", "ana@example.com"])
                    .unwrap();
                let (_, login) = matches.subcommand().unwrap();
                assert_eq!(
                    login.get_one::<String>(market::ARG_PASSWORD).map(String::as_str),
                    Some("secret")
                );
            });
        });
    }

    #[test]
    fn test_rejects_unknown_values() {
        with_clean_env(|| {
            assert!(new()
                .try_get_matches_from(vec!["bazaar", "purchases", "list", "--status", "enviada"])
                .is_err());
            assert!(new()
                .try_get_matches_from(vec!["bazaar", "products", "list", "--condition", "usado"])
                .is_err());
            assert!(new()
                .try_get_matches_from(vec!["bazaar", "products", "show", "abc"])
                .is_err());
        });
    }
}
