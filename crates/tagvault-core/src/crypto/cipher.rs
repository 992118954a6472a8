//! Symmetric cipher seam.
//!
//! Rows never call an AEAD directly; they go through [`Cipher`] so the host
//! can plug in a different primitive. [`XChaCha20Poly1305Cipher`] is the
//! default and matches the 24-byte row nonce.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    Key, XChaCha20Poly1305, XNonce,
};
use thiserror::Error;

use super::key::SecretKey;
use super::nonce::Nonce;

/// Failure reported by a [`Cipher`].
#[derive(Debug, Error)]
pub enum CipherError {
    /// Ciphertext failed authentication (wrong key, wrong nonce or tampering)
    #[error("authentication failed")]
    Authentication,

    /// Input the cipher cannot process at all
    #[error("malformed input: {0}")]
    Malformed(String),

    /// Any other primitive-specific failure
    #[error("{0}")]
    Other(String),
}

/// Authenticated symmetric encryption keyed by a [`SecretKey`] and a [`Nonce`].
pub trait Cipher: Send + Sync {
    fn seal(
        &self,
        plaintext: &[u8],
        nonce: &Nonce,
        key: &SecretKey,
    ) -> Result<Vec<u8>, CipherError>;

    fn open(
        &self,
        ciphertext: &[u8],
        nonce: &Nonce,
        key: &SecretKey,
    ) -> Result<Vec<u8>, CipherError>;
}

/// XChaCha20-Poly1305. Output is ciphertext followed by the 16-byte tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct XChaCha20Poly1305Cipher;

/// Poly1305 tag length; anything shorter cannot be a sealed message.
const TAG_LENGTH: usize = 16;

impl Cipher for XChaCha20Poly1305Cipher {
    fn seal(
        &self,
        plaintext: &[u8],
        nonce: &Nonce,
        key: &SecretKey,
    ) -> Result<Vec<u8>, CipherError> {
        let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
        cipher
            .encrypt(XNonce::from_slice(nonce.as_bytes()), plaintext)
            .map_err(|e| CipherError::Other(e.to_string()))
    }

    fn open(
        &self,
        ciphertext: &[u8],
        nonce: &Nonce,
        key: &SecretKey,
    ) -> Result<Vec<u8>, CipherError> {
        if ciphertext.len() < TAG_LENGTH {
            return Err(CipherError::Malformed(format!(
                "ciphertext is {} bytes, shorter than the {}-byte tag",
                ciphertext.len(),
                TAG_LENGTH
            )));
        }
        let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
        cipher
            .decrypt(XNonce::from_slice(nonce.as_bytes()), ciphertext)
            .map_err(|_| CipherError::Authentication)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::nonce::NONCE_LENGTH;
    use crate::crypto::KEY_LENGTH;

    fn key(byte: u8) -> SecretKey {
        SecretKey::from_bytes([byte; KEY_LENGTH])
    }

    fn nonce(byte: u8) -> Nonce {
        Nonce::from_bytes([byte; NONCE_LENGTH])
    }

    #[test]
    fn test_seal_open_round_trip() {
        let plaintext = b"Hello, World! This is secret data.";
        let sealed = XChaCha20Poly1305Cipher
            .seal(plaintext, &nonce(1), &key(9))
            .unwrap();

        assert_ne!(sealed.as_slice(), plaintext);
        assert_eq!(sealed.len(), plaintext.len() + TAG_LENGTH);

        let opened = XChaCha20Poly1305Cipher
            .open(&sealed, &nonce(1), &key(9))
            .unwrap();
        assert_eq!(opened, plaintext);
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = XChaCha20Poly1305Cipher
            .seal(b"secret", &nonce(1), &key(9))
            .unwrap();
        let result = XChaCha20Poly1305Cipher.open(&sealed, &nonce(1), &key(8));
        assert!(matches!(result, Err(CipherError::Authentication)));
    }

    #[test]
    fn test_wrong_nonce_fails() {
        let sealed = XChaCha20Poly1305Cipher
            .seal(b"secret", &nonce(1), &key(9))
            .unwrap();
        let result = XChaCha20Poly1305Cipher.open(&sealed, &nonce(2), &key(9));
        assert!(matches!(result, Err(CipherError::Authentication)));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let mut sealed = XChaCha20Poly1305Cipher
            .seal(b"secret data", &nonce(1), &key(9))
            .unwrap();
        let mid = sealed.len() / 2;
        sealed[mid] ^= 0xFF;

        let result = XChaCha20Poly1305Cipher.open(&sealed, &nonce(1), &key(9));
        assert!(matches!(result, Err(CipherError::Authentication)));
    }

    #[test]
    fn test_truncated_ciphertext_is_malformed() {
        let result = XChaCha20Poly1305Cipher.open(&[1, 2, 3], &nonce(1), &key(9));
        assert!(matches!(result, Err(CipherError::Malformed(_))));
    }
}
