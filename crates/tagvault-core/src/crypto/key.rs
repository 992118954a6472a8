//! Symmetric row keys.
//!
//! A `SecretKey` is either loaded from raw bytes the host already holds,
//! generated fresh, or derived from a passphrase with Argon2id.

use argon2::Argon2;
use secrecy::{ExposeSecret, SecretString};
use zeroize::ZeroizeOnDrop;

use super::random::RandomSource;
use crate::error::{Result, VaultError};

/// Argon2id parameters.
///
/// - Memory: 64 MB (64 * 1024 KB)
/// - Iterations: 3
/// - Parallelism: 1
const ARGON2_MEMORY_KB: u32 = 64 * 1024;
const ARGON2_ITERATIONS: u32 = 3;
const ARGON2_PARALLELISM: u32 = 1;

const MIN_SALT_LENGTH: usize = 16;

/// Length of a row key in bytes (256 bits).
pub const KEY_LENGTH: usize = 32;

/// A 256-bit symmetric key, zeroized from memory on drop.
#[derive(Clone, ZeroizeOnDrop)]
pub struct SecretKey {
    key: [u8; KEY_LENGTH],
}

impl SecretKey {
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Generate a random key.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Generation` if the random source fails.
    pub fn generate(random: &dyn RandomSource) -> Result<Self> {
        let mut key = [0u8; KEY_LENGTH];
        random.fill(&mut key).map_err(|e| VaultError::Generation {
            what: "key",
            reason: e.to_string(),
        })?;
        Ok(Self { key })
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate cipher calls.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive a row key from a passphrase using Argon2id.
///
/// Same passphrase + salt always produces the same key; the salt must be
/// stored alongside whatever the key protects.
///
/// # Errors
///
/// Returns `VaultError::InvalidInput` if the passphrase is empty or the salt
/// is shorter than 16 bytes.
///
/// # Examples
///
/// ```
/// use secrecy::SecretString;
/// use tagvault_core::crypto::derive_key;
///
/// let passphrase = SecretString::from("my-passphrase".to_string());
/// let key = derive_key(&passphrase, b"unique-salt-per-vault").unwrap();
/// assert_eq!(key.as_bytes().len(), 32);
/// ```
pub fn derive_key(passphrase: &SecretString, salt: &[u8]) -> Result<SecretKey> {
    let passphrase = passphrase.expose_secret();
    if passphrase.is_empty() {
        return Err(VaultError::InvalidInput(
            "Passphrase cannot be empty".to_string(),
        ));
    }

    if salt.len() < MIN_SALT_LENGTH {
        return Err(VaultError::InvalidInput(format!(
            "Salt must be at least {} bytes",
            MIN_SALT_LENGTH
        )));
    }

    let params = argon2::Params::new(
        ARGON2_MEMORY_KB,
        ARGON2_ITERATIONS,
        ARGON2_PARALLELISM,
        Some(KEY_LENGTH),
    )
    .map_err(|e| VaultError::InvalidInput(format!("Failed to create Argon2 params: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let mut key = [0u8; KEY_LENGTH];
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut key)
        .map_err(|e| VaultError::Generation {
            what: "key",
            reason: e.to_string(),
        })?;

    Ok(SecretKey::from_bytes(key))
}
