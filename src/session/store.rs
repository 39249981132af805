use super::{crypto, MasterKey, StoreError};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};
use tracing::{debug, info, instrument};

/// Identity persisted next to the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    /// Numeric backend id, positive for a real account.
    pub odoo_id: i64,
    /// Public user code, e.g. `USR-00001`.
    pub user_id: String,
    pub email: String,
    pub name: String,
}

#[derive(Default, Serialize, Deserialize)]
struct Fields {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "expose_token",
        deserialize_with = "seal_token"
    )]
    auth_token: Option<SecretString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    odoo_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_name: Option<String>,
}

impl Clone for Fields {
    fn clone(&self) -> Self {
        Self {
            auth_token: self.auth_token.as_ref().map(copy_secret),
            odoo_id: self.odoo_id,
            user_id: self.user_id.clone(),
            user_email: self.user_email.clone(),
            user_name: self.user_name.clone(),
        }
    }
}

impl Fields {
    fn token(&self) -> Option<&SecretString> {
        self.auth_token
            .as_ref()
            .filter(|token| !token.expose_secret().trim().is_empty())
    }

    fn set_identity(&mut self, identity: &UserIdentity) {
        self.odoo_id = Some(identity.odoo_id);
        self.user_id = Some(identity.user_id.clone());
        self.user_email = Some(identity.email.clone());
        self.user_name = Some(identity.name.clone());
    }
}

fn copy_secret(secret: &SecretString) -> SecretString {
    SecretString::from(secret.expose_secret().to_string())
}

// The plaintext only exists inside the sealed payload.
#[allow(clippy::ref_option)]
fn expose_token<S: Serializer>(token: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error> {
    match token {
        Some(token) => serializer.serialize_some(token.expose_secret()),
        None => serializer.serialize_none(),
    }
}

fn seal_token<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<SecretString>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

/// Encrypted key/value store holding the session.
///
/// One instance is created at startup and shared by handle. Writes are
/// serialized by an internal lock and hit the disk before the in-memory copy
/// changes, so readers never observe a session that is not durable.
pub struct CredentialStore {
    path: PathBuf,
    key: MasterKey,
    fields: Mutex<Fields>,
}

impl CredentialStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    /// Fails fast if the file exists but cannot be read, decrypted or parsed.
    #[instrument(skip(key))]
    pub fn open(path: impl Into<PathBuf> + std::fmt::Debug, key: MasterKey) -> Result<Self, StoreError> {
        let path = path.into();

        let fields = match fs::read(&path) {
            Ok(sealed) => {
                let plaintext = crypto::open(key.bytes(), &sealed)?;
                serde_json::from_slice(&plaintext)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no credential store yet, starting empty");
                Fields::default()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        Ok(Self {
            path,
            key,
            fields: Mutex::new(fields),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn save_token(&self, token: &SecretString) -> Result<(), StoreError> {
        self.update(|fields| fields.auth_token = Some(copy_secret(token)))
    }

    /// Stored token, `None` when absent or blank.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.lock().token().map(copy_secret)
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn save_user(&self, identity: &UserIdentity) -> Result<(), StoreError> {
        self.update(|fields| fields.set_identity(identity))
    }

    /// Token and identity in a single write.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written; nothing changes in that case.
    #[instrument(skip_all, fields(user_id = %identity.user_id))]
    pub fn save_session(&self, token: &SecretString, identity: &UserIdentity) -> Result<(), StoreError> {
        self.update(|fields| {
            fields.auth_token = Some(copy_secret(token));
            fields.set_identity(identity);
        })?;

        info!("session saved");

        Ok(())
    }

    #[must_use]
    pub fn odoo_id(&self) -> Option<i64> {
        self.lock().odoo_id
    }

    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        self.lock().user_id.clone()
    }

    #[must_use]
    pub fn user_email(&self) -> Option<String> {
        self.lock().user_email.clone()
    }

    #[must_use]
    pub fn user_name(&self) -> Option<String> {
        self.lock().user_name.clone()
    }

    /// Stored identity when a session is active.
    #[must_use]
    pub fn identity(&self) -> Option<UserIdentity> {
        let fields = self.lock();
        if !is_active(&fields) {
            return None;
        }

        Some(UserIdentity {
            odoo_id: fields.odoo_id.unwrap_or_default(),
            user_id: fields.user_id.clone().unwrap_or_default(),
            email: fields.user_email.clone().unwrap_or_default(),
            name: fields.user_name.clone().unwrap_or_default(),
        })
    }

    /// True iff a non-blank token and a positive numeric user id are stored.
    #[must_use]
    pub fn is_session_active(&self) -> bool {
        is_active(&self.lock())
    }

    /// Remove every field by deleting the backing file.
    ///
    /// # Errors
    /// Returns an error if the file exists and cannot be removed.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<(), StoreError> {
        let mut fields = self.lock();

        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        }

        *fields = Fields::default();

        info!("session cleared");

        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Fields> {
        self.fields.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update<F: FnOnce(&mut Fields)>(&self, change: F) -> Result<(), StoreError> {
        let mut fields = self.lock();
        let mut next = fields.clone();
        change(&mut next);
        self.persist(&next)?;
        *fields = next;
        Ok(())
    }

    fn persist(&self, fields: &Fields) -> Result<(), StoreError> {
        let plaintext = serde_json::to_vec(fields)?;
        let sealed = crypto::seal(self.key.bytes(), &plaintext)?;

        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let tmp = self.path.with_extension("tmp");
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&tmp).map_err(io_err)?;
        file.write_all(&sealed).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        drop(file);

        fs::rename(&tmp, &self.path).map_err(io_err)?;

        Ok(())
    }
}

fn is_active(fields: &Fields) -> bool {
    fields.token().is_some() && fields.odoo_id.is_some_and(|id| id > 0)
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields = self.lock();
        f.debug_struct("CredentialStore")
            .field("path", &self.path)
            .field("auth_token", &fields.auth_token.as_ref().map(|_| "***"))
            .field("odoo_id", &fields.odoo_id)
            .field("user_id", &fields.user_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn identity() -> UserIdentity {
        UserIdentity {
            odoo_id: 42,
            user_id: "USR-00042".to_string(),
            email: "ana@example.com".to_string(),
            name: "Ana".to_string(),
        }
    }

    fn key() -> MasterKey {
        MasterKey::from_bytes([5u8; 32])
    }

    #[test]
    fn test_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::open(dir.path().join("session.bin"), key()).unwrap();

        assert!(store.token().is_none());
        assert!(store.odoo_id().is_none());
        assert!(store.identity().is_none());
        assert!(!store.is_session_active());
    }

    #[test]
    fn test_session_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.bin");

        let store = CredentialStore::open(path.clone(), key()).unwrap();
        store
            .save_session(&SecretString::from("jwt-token".to_string()), &identity())
            .unwrap();
        assert!(store.is_session_active());
        drop(store);

        let reopened = CredentialStore::open(path, key()).unwrap();
        assert_eq!(reopened.token().unwrap().expose_secret(), "jwt-token");
        assert_eq!(reopened.odoo_id(), Some(42));
        assert_eq!(reopened.user_id().as_deref(), Some("USR-00042"));
        assert_eq!(reopened.user_email().as_deref(), Some("ana@example.com"));
        assert_eq!(reopened.user_name().as_deref(), Some("Ana"));
        assert_eq!(reopened.identity(), Some(identity()));
    }

    #[test]
    fn test_file_is_not_plaintext() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.bin");

        let store = CredentialStore::open(path.clone(), key()).unwrap();
        store
            .save_session(&SecretString::from("jwt-token".to_string()), &identity())
            .unwrap();

        let raw = fs::read(&path).unwrap();
        let needle = b"jwt-token";
        assert!(!raw.windows(needle.len()).any(|w| w == needle));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_token_without_user_is_inactive() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::open(dir.path().join("session.bin"), key()).unwrap();

        store
            .save_token(&SecretString::from("jwt-token".to_string()))
            .unwrap();
        assert!(store.has_token());
        assert!(!store.is_session_active());

        store
            .save_user(&UserIdentity {
                odoo_id: 0,
                ..identity()
            })
            .unwrap();
        assert!(!store.is_session_active());

        store.save_user(&identity()).unwrap();
        assert!(store.is_session_active());
    }

    #[test]
    fn test_token_kept_as_secret_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.bin");
        let store = CredentialStore::open(path.clone(), key()).unwrap();
        store
            .save_session(&SecretString::from("jwt-token".to_string()), &identity())
            .unwrap();

        let held: Option<SecretString> = store.lock().auth_token.as_ref().map(copy_secret);
        assert_eq!(held.unwrap().expose_secret(), "jwt-token");

        // the sealed payload still carries the plain value
        let plaintext = crypto::open(key().bytes(), &fs::read(&path).unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&plaintext).unwrap();
        assert_eq!(value["auth_token"], "jwt-token");

        let reopened = CredentialStore::open(path, key()).unwrap();
        assert_eq!(reopened.token().unwrap().expose_secret(), "jwt-token");
    }

    #[test]
    fn test_blank_token_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::open(dir.path().join("session.bin"), key()).unwrap();

        store.save_token(&SecretString::from("  ".to_string())).unwrap();
        store.save_user(&identity()).unwrap();
        assert!(store.token().is_none());
        assert!(!store.is_session_active());
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.bin");
        let store = CredentialStore::open(path.clone(), key()).unwrap();

        store
            .save_session(&SecretString::from("jwt-token".to_string()), &identity())
            .unwrap();
        store.clear().unwrap();

        assert!(!store.is_session_active());
        assert!(store.token().is_none());
        assert!(store.user_name().is_none());
        assert!(!path.exists());

        // clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_open_with_wrong_key_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.bin");

        let store = CredentialStore::open(path.clone(), key()).unwrap();
        store
            .save_session(&SecretString::from("jwt-token".to_string()), &identity())
            .unwrap();

        let result = CredentialStore::open(path, MasterKey::from_bytes([6u8; 32]));
        assert!(matches!(result, Err(StoreError::Unseal)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::open(dir.path().join("session.bin"), key()).unwrap();
        store
            .save_session(&SecretString::from("jwt-token".to_string()), &identity())
            .unwrap();

        let debug = format!("{store:?}");
        assert!(!debug.contains("jwt-token"));
        assert!(debug.contains("***"));
    }
}
