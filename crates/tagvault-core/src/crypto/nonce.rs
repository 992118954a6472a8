//! Per-row nonce.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::random::RandomSource;
use crate::error::{Result, VaultError};

/// Nonce length in bytes (192 bits, as XChaCha20 and XSalsa20 expect).
pub const NONCE_LENGTH: usize = 24;

/// A 24-byte nonce.
///
/// Serialized as a JSON array of 24 integers, which is how the storage
/// backend has always exchanged it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nonce([u8; NONCE_LENGTH]);

impl Nonce {
    /// Draw a fresh nonce from `random`.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Generation` if the random source fails.
    pub fn generate(random: &dyn RandomSource) -> Result<Self> {
        let mut bytes = [0u8; NONCE_LENGTH];
        random.fill(&mut bytes).map_err(|e| VaultError::Generation {
            what: "nonce",
            reason: e.to_string(),
        })?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; NONCE_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; NONCE_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nonce(")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}
