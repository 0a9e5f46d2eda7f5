// src/services/encryption.rs
//! Sealing of secrets stored inside site info blobs (SMTP password)
//!
//! Sealed values are `enc:v1:` followed by base64(nonce || ciphertext) using
//! AES-256-GCM. Values without the prefix are plaintext and pass through
//! `open` untouched, so blobs written before a key was configured stay readable.

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::RngCore;
use std::env;
use thiserror::Error;

const SEALED_PREFIX: &str = "enc:v1:";
const NONCE_LEN: usize = 12;

#[derive(Debug, Error)]
pub enum EncryptionError {
    #[error("Encryption key not configured")]
    KeyNotConfigured,

    #[error("Invalid encryption key format")]
    InvalidKeyFormat,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Invalid sealed value")]
    InvalidDataFormat,
}

pub struct SecretCipher {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for SecretCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretCipher")
            .field("cipher", &"<redacted>")
            .finish()
    }
}

impl SecretCipher {
    /// Reads the base64 key from `ENCRYPTION_MASTER_KEY`
    pub fn from_env() -> Result<Self, EncryptionError> {
        let key_str =
            env::var("ENCRYPTION_MASTER_KEY").map_err(|_| EncryptionError::KeyNotConfigured)?;

        Self::from_key(&key_str)
    }

    /// Builds the cipher from a base64-encoded 32-byte key
    pub fn from_key(key_str: &str) -> Result<Self, EncryptionError> {
        let key_bytes = BASE64
            .decode(key_str.trim().as_bytes())
            .map_err(|_| EncryptionError::InvalidKeyFormat)?;

        if key_bytes.len() != 32 {
            return Err(EncryptionError::InvalidKeyFormat);
        }

        let key = aes_gcm::Key::<Aes256Gcm>::from_slice(&key_bytes);
        Ok(Self {
            cipher: Aes256Gcm::new(key),
        })
    }

    /// Random base64-encoded key suitable for `ENCRYPTION_MASTER_KEY`
    pub fn generate_key() -> String {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        BASE64.encode(key)
    }

    pub fn is_sealed(value: &str) -> bool {
        value.starts_with(SEALED_PREFIX)
    }

    /// Seals `plaintext`; empty strings are returned as-is. Input that merely
    /// looks sealed is sealed again, so `open` always gives it back verbatim.
    pub fn seal(&self, plaintext: &str) -> Result<String, EncryptionError> {
        if plaintext.is_empty() {
            return Ok(plaintext.to_string());
        }

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| EncryptionError::EncryptionFailed(e.to_string()))?;

        let mut combined = nonce_bytes.to_vec();
        combined.extend_from_slice(&ciphertext);

        Ok(format!("{}{}", SEALED_PREFIX, BASE64.encode(combined)))
    }

    /// Opens a sealed value; plaintext values pass through
    pub fn open(&self, stored: &str) -> Result<String, EncryptionError> {
        let Some(encoded) = stored.strip_prefix(SEALED_PREFIX) else {
            return Ok(stored.to_string());
        };

        let combined = BASE64
            .decode(encoded.as_bytes())
            .map_err(|_| EncryptionError::InvalidDataFormat)?;

        if combined.len() < NONCE_LEN {
            return Err(EncryptionError::InvalidDataFormat);
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
        let plaintext_bytes = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|e| EncryptionError::DecryptionFailed(e.to_string()))?;

        String::from_utf8(plaintext_bytes)
            .map_err(|_| EncryptionError::DecryptionFailed("invalid UTF-8".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> SecretCipher {
        SecretCipher::from_key(&SecretCipher::generate_key()).unwrap()
    }

    #[test]
    fn test_seal_and_open() {
        let cipher = cipher();
        let sealed = cipher.seal("smtp-password").unwrap();

        assert!(SecretCipher::is_sealed(&sealed));
        assert!(!sealed.contains("smtp-password"));
        assert_eq!(cipher.open(&sealed).unwrap(), "smtp-password");
    }

    #[test]
    fn test_seal_uses_fresh_nonce() {
        let cipher = cipher();
        let a = cipher.seal("same").unwrap();
        let b = cipher.seal("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_plaintext_and_empty_pass_through() {
        let cipher = cipher();
        assert_eq!(cipher.open("legacy-plain").unwrap(), "legacy-plain");
        assert_eq!(cipher.seal("").unwrap(), "");
    }

    #[test]
    fn test_prefixed_plaintext_is_sealed_again() {
        let cipher = cipher();
        let sealed = cipher.seal("enc:v1:hunter2").unwrap();
        assert_ne!(sealed, "enc:v1:hunter2");
        assert_eq!(cipher.open(&sealed).unwrap(), "enc:v1:hunter2");

        let twice = cipher.seal(&sealed).unwrap();
        assert_eq!(cipher.open(&twice).unwrap(), sealed);
    }

    #[test]
    fn test_open_with_wrong_key_fails() {
        let sealed = cipher().seal("secret").unwrap();
        let result = cipher().open(&sealed);
        assert!(matches!(result, Err(EncryptionError::DecryptionFailed(_))));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            SecretCipher::from_key("not-base64!"),
            Err(EncryptionError::InvalidKeyFormat)
        ));
        assert!(matches!(
            cipher().open("enc:v1:AAAA"),
            Err(EncryptionError::InvalidDataFormat)
        ));
    }
}
