//! Cryptographic building blocks for rows.
//!
//! - **Nonce**: 24-byte per-row value drawn from the OS CSPRNG
//! - **SecretKey**: 32-byte symmetric key, zeroized on drop
//! - **Cipher**: the seal/open seam rows encrypt and decrypt through,
//!   with XChaCha20-Poly1305 as the default implementation
//!
//! ## Security Model
//!
//! - A nonce is generated once per row and never changes afterwards
//! - Keys never appear in `Debug` output
//! - Passphrase-derived keys use Argon2id (memory-hard)
//!
//! Key distribution and rotation are left to the host application.

pub mod cipher;
pub mod key;
pub mod nonce;
pub mod random;

pub use cipher::{Cipher, CipherError, XChaCha20Poly1305Cipher};
pub use key::{derive_key, SecretKey, KEY_LENGTH};
pub use nonce::{Nonce, NONCE_LENGTH};
pub use random::{OsRandom, RandomSource, SourceError};
