use crate::APP_USER_AGENT;
use anyhow::{anyhow, Result};
use std::time::Duration;
use url::Url;

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(45);
pub const READ_TIMEOUT: Duration = Duration::from_secs(90);
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(90);

/// Connection settings for the marketplace API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub user_agent: String,
}

impl ApiConfig {
    /// Build a config with the default timeouts.
    ///
    /// # Errors
    /// Returns an error if the URL cannot be parsed or its scheme is not http(s).
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            connect_timeout: CONNECT_TIMEOUT,
            read_timeout: READ_TIMEOUT,
            write_timeout: WRITE_TIMEOUT,
            user_agent: APP_USER_AGENT.to_string(),
        })
    }

    #[must_use]
    pub fn with_timeouts(mut self, connect: Duration, read: Duration, write: Duration) -> Self {
        self.connect_timeout = connect;
        self.read_timeout = read;
        self.write_timeout = write;
        self
    }

    /// Upper bound for a whole exchange: sending the body plus reading the reply.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.write_timeout.saturating_add(self.read_timeout)
    }
}

/// Parse the base URL and make sure relative endpoint paths join beneath it.
///
/// # Errors
/// Returns an error if the URL is invalid, has no host or uses an unsupported scheme.
pub fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(anyhow!("unsupported scheme in base URL: {scheme}")),
    }

    if url.host().is_none() {
        return Err(anyhow!("base URL has no host"));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
