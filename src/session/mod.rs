//! Locally persisted proof of authentication.
//!
//! The session is a token plus a minimal identity. It is sealed with
//! ChaCha20-Poly1305 under a [`MasterKey`] and written atomically, so a crash
//! mid-write leaves either the previous session or the new one on disk.

pub mod crypto;
pub mod key;
pub mod store;

pub use key::MasterKey;
pub use store::{CredentialStore, UserIdentity};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential store I/O failed at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to seal credential store")]
    Seal,
    #[error("credential store is corrupted or sealed with a different key")]
    Unseal,
    #[error("invalid credential store contents: {0}")]
    Format(#[from] serde_json::Error),
    #[error("invalid master key: {0}")]
    InvalidKey(String),
}
