use crate::{
    cli::commands::{connection, session},
    config::ApiConfig,
    session::{CredentialStore, MasterKey},
    Marketplace,
};
use anyhow::{anyhow, Context, Result};
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::debug;

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub connection: connection::Options,
    pub session: session::Options,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(connection: connection::Options, session: session::Options) -> Self {
        Self {
            connection,
            session,
        }
    }

    /// # Errors
    /// Returns an error if no base URL was given or it is not a valid http(s) URL.
    pub fn api_config(&self) -> Result<ApiConfig> {
        let base_url = self
            .connection
            .base_url
            .as_deref()
            .ok_or_else(|| anyhow!("missing required argument: --{}", connection::ARG_BASE_URL))?;

        Ok(ApiConfig::new(base_url)
            .context("invalid BAZAAR_BASE_URL")?
            .with_timeouts(
                self.connection.connect_timeout,
                self.connection.read_timeout,
                self.connection.write_timeout,
            ))
    }

    /// Open the credential store, reading or creating the master key first.
    ///
    /// # Errors
    /// Returns an error if the key is invalid or the store cannot be opened.
    pub fn open_store(&self) -> Result<Arc<CredentialStore>> {
        let key = match &self.session.master_key {
            Some(encoded) => MasterKey::from_base64(encoded.expose_secret())
                .context("invalid BAZAAR_MASTER_KEY")?,
            None => MasterKey::load_or_create(&self.session.master_key_file)
                .context("could not load the master key file")?,
        };

        let store = CredentialStore::open(self.session.store_path.clone(), key)
            .context("could not open the session store")?;

        debug!(path = %self.session.store_path.display(), "session store opened");

        Ok(Arc::new(store))
    }

    /// # Errors
    /// Returns an error if the configuration is incomplete or the HTTP client cannot be built.
    pub fn marketplace(&self, store: Arc<CredentialStore>) -> Result<Marketplace> {
        Marketplace::connect(&self.api_config()?, store)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use std::time::Duration;

    fn globals(dir: &std::path::Path, base_url: Option<&str>) -> GlobalArgs {
        GlobalArgs::new(
            connection::Options {
                base_url: base_url.map(str::to_string),
                connect_timeout: Duration::from_secs(5),
                read_timeout: Duration::from_secs(6),
                write_timeout: Duration::from_secs(7),
            },
            session::Options {
                store_path: dir.join("session.bin"),
                master_key: None,
                master_key_file: dir.join("master.key"),
            },
        )
    }

    #[test]
    fn test_api_config() {
        let dir = tempfile::tempdir().unwrap();

        let config = globals(dir.path(), Some("http://localhost:8069"))
            .api_config()
            .unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8069/");
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config.write_timeout, Duration::from_secs(7));

        let err = globals(dir.path(), None).api_config().unwrap_err();
        assert!(err.to_string().contains("--base-url"));
    }

    #[test]
    fn test_open_store_creates_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let args = globals(dir.path(), None);

        let store = args.open_store().unwrap();
        assert!(!store.is_session_active());
        assert!(dir.path().join("master.key").exists());

        // same key on the next run
        let key = std::fs::read_to_string(dir.path().join("master.key")).unwrap();
        args.open_store().unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("master.key")).unwrap(),
            key
        );
    }

    #[test]
    fn test_open_store_with_explicit_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = globals(dir.path(), None);
        args.session.master_key = Some(SecretString::from(MasterKey::generate().to_base64()));

        args.open_store().unwrap();
        assert!(!dir.path().join("master.key").exists());

        args.session.master_key = Some(SecretString::from("not base64!"));
        assert!(args.open_store().is_err());
    }

    #[test]
    fn test_debug_hides_master_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = globals(dir.path(), None);
        args.session.master_key = Some(SecretString::from("c2VjcmV0LWtleS1tYXRlcmlhbA=="));
        assert!(!format!("{args:?}").contains("c2VjcmV0"));
    }
}
