//! Encryption-at-rest boundary for stored portal passwords.
//!
//! The session store only ever sees ciphertext; the key is derived from the
//! application secret (first 32 bytes, padded with `0`, urlsafe-base64), which
//! keeps tokens compatible with data written by earlier deployments that used
//! the same derivation.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use capy_core::{CapyError, Result};
use tracing::warn;

/// Encrypts credentials before they reach the session store.
pub trait CredentialCipher: Send + Sync {
    fn encrypt(&self, plaintext: &str) -> String;

    /// Decrypts a stored token. Undecryptable input (legacy plaintext rows,
    /// rotated keys) yields an empty string, never an error.
    fn decrypt(&self, ciphertext: &str) -> String;
}

/// Fernet-based [`CredentialCipher`].
pub struct FernetCipher {
    fernet: fernet::Fernet,
}

impl FernetCipher {
    /// Derives the Fernet key from the application secret.
    pub fn from_secret(secret: &str) -> Result<Self> {
        let mut key_material = secret.as_bytes().to_vec();
        key_material.truncate(32);
        key_material.resize(32, b'0');
        let key = URL_SAFE.encode(key_material);

        let fernet = fernet::Fernet::new(&key)
            .ok_or_else(|| CapyError::Config("Failed to derive encryption key".to_string()))?;
        Ok(Self { fernet })
    }
}

impl CredentialCipher for FernetCipher {
    fn encrypt(&self, plaintext: &str) -> String {
        if plaintext.is_empty() {
            return String::new();
        }
        self.fernet.encrypt(plaintext.as_bytes())
    }

    fn decrypt(&self, ciphertext: &str) -> String {
        if ciphertext.is_empty() {
            return String::new();
        }
        match self.fernet.decrypt(ciphertext) {
            Ok(bytes) => String::from_utf8(bytes).unwrap_or_default(),
            Err(_) => {
                warn!("Stored credential token is not decryptable, treating as empty");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let cipher = FernetCipher::from_secret("dev-secret-key").unwrap();
        let token = cipher.encrypt("S3nha!Forte");
        assert_ne!(token, "S3nha!Forte");
        assert_eq!(cipher.decrypt(&token), "S3nha!Forte");
    }

    #[test]
    fn test_empty_values_pass_through() {
        let cipher = FernetCipher::from_secret("dev-secret-key").unwrap();
        assert_eq!(cipher.encrypt(""), "");
        assert_eq!(cipher.decrypt(""), "");
    }

    #[test]
    fn test_undecryptable_token_reads_empty() {
        let cipher = FernetCipher::from_secret("dev-secret-key").unwrap();
        assert_eq!(cipher.decrypt("plaintext-from-legacy-row"), "");
    }

    #[test]
    fn test_key_rotation_invalidates_old_tokens() {
        let old = FernetCipher::from_secret("old-secret").unwrap();
        let new = FernetCipher::from_secret("new-secret").unwrap();
        let token = old.encrypt("senha");
        assert_eq!(new.decrypt(&token), "");
    }

    #[test]
    fn test_long_secret_is_truncated_deterministically() {
        let a = FernetCipher::from_secret(&"x".repeat(64)).unwrap();
        let b = FernetCipher::from_secret(&"x".repeat(64)).unwrap();
        let token = a.encrypt("senha");
        assert_eq!(b.decrypt(&token), "senha");
    }
}
