use super::StoreError;
use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305, Key, Nonce,
};
use rand::{rngs::OsRng, RngCore};

const NONCE_LEN: usize = 12;

// AAD binds the ciphertext to this file format version.
const SESSION_AAD: &[u8] = b"bazaar-session:v1";

/// Seal the serialized session with the master key.
/// Returns `nonce (12 bytes) || ciphertext`.
///
/// # Errors
/// Returns an error if encryption fails.
pub fn seal(key: &[u8; 32], plaintext: &[u8]) -> Result<Vec<u8>, StoreError> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(
            nonce,
            Payload {
                msg: plaintext,
                aad: SESSION_AAD,
            },
        )
        .map_err(|_| StoreError::Seal)?;

    let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&ciphertext);

    Ok(sealed)
}

/// Open data produced by [`seal`].
///
/// # Errors
/// Returns an error if the data is truncated, tampered with, or sealed with another key.
pub fn open(key: &[u8; 32], data: &[u8]) -> Result<Vec<u8>, StoreError> {
    if data.len() < NONCE_LEN {
        return Err(StoreError::Unseal);
    }

    let (nonce_bytes, ciphertext) = data.split_at(NONCE_LEN);
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));

    cipher
        .decrypt(
            Nonce::from_slice(nonce_bytes),
            Payload {
                msg: ciphertext,
                aad: SESSION_AAD,
            },
        )
        .map_err(|_| StoreError::Unseal)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_open() {
        let key = [7u8; 32];
        let sealed = seal(&key, b"{\"auth_token\":\"abc\"}").unwrap();
        assert!(sealed.len() > NONCE_LEN);
        assert_ne!(&sealed[NONCE_LEN..], b"{\"auth_token\":\"abc\"}");

        let opened = open(&key, &sealed).unwrap();
        assert_eq!(opened, b"{\"auth_token\":\"abc\"}");
    }

    #[test]
    fn test_nonce_is_fresh() {
        let key = [7u8; 32];
        let a = seal(&key, b"same").unwrap();
        let b = seal(&key, b"same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_open_fails_wrong_key() {
        let sealed = seal(&[1u8; 32], b"secret").unwrap();
        assert!(matches!(open(&[2u8; 32], &sealed), Err(StoreError::Unseal)));
    }

    #[test]
    fn test_open_fails_tampered() {
        let key = [3u8; 32];
        let mut sealed = seal(&key, b"secret").unwrap();
        if let Some(byte) = sealed.last_mut() {
            *byte ^= 0xFF;
        }
        assert!(open(&key, &sealed).is_err());
    }

    #[test]
    fn test_open_fails_truncated() {
        assert!(open(&[3u8; 32], &[0u8; 5]).is_err());
    }
}
