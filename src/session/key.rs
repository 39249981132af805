use super::StoreError;
use base64ct::{Base64, Encoding};
use rand::{rngs::OsRng, RngCore};
use secrecy::{ExposeSecret, SecretBox};
use std::{fs, io::Write, path::Path};
use tracing::{debug, instrument};

pub const KEY_LEN: usize = 32;

/// Master key sealing the credential store.
pub struct MasterKey(SecretBox<[u8; KEY_LEN]>);

impl MasterKey {
    #[must_use]
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(SecretBox::new(Box::new(bytes)))
    }

    /// Fresh random key from the OS RNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self::from_bytes(bytes)
    }

    /// Decode a standard base64 key (32 bytes once decoded).
    ///
    /// # Errors
    /// Returns `StoreError::InvalidKey` if the value is not base64 or has the wrong length.
    pub fn from_base64(encoded: &str) -> Result<Self, StoreError> {
        let decoded = Base64::decode_vec(encoded.trim())
            .map_err(|e| StoreError::InvalidKey(format!("not valid base64: {e}")))?;

        let bytes: [u8; KEY_LEN] = decoded.as_slice().try_into().map_err(|_| {
            StoreError::InvalidKey(format!(
                "expected {KEY_LEN} bytes, got {}",
                decoded.len()
            ))
        })?;

        Ok(Self::from_bytes(bytes))
    }

    #[must_use]
    pub fn to_base64(&self) -> String {
        Base64::encode_string(self.0.expose_secret())
    }

    /// Load the key file, creating it with a new random key (mode `0600`) when absent.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or created, or holds an invalid key.
    #[instrument]
    pub fn load_or_create(path: &Path) -> Result<Self, StoreError> {
        match fs::read_to_string(path) {
            Ok(encoded) => return Self::from_base64(&encoded),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }

        let key = Self::generate();
        let io_err = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path).map_err(io_err)?;
        file.write_all(key.to_base64().as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;

        debug!("created new master key file");

        Ok(key)
    }

    pub(crate) fn bytes(&self) -> &[u8; KEY_LEN] {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(***)")
    }
}
