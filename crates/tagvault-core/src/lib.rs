//! # Tagvault Core
//!
//! Record model for encrypted, tag-searchable storage.
//!
//! A [`Row`] is stored on an untrusted server as ciphertext plus a set of
//! random tokens. The client keeps [`TagPairs`] mapping each plain tag to its
//! token, so it can ask the server for rows by token and then turn a row's
//! tokens back into the plain tags it was created with.
//!
//! ## Architecture
//!
//! - **row**: `Row` lifecycle (create, encrypt, decrypt, resolve tags), the
//!   JSON wire form and row listings
//! - **tags**: structured plain tags, tag pairs and the `TagIndex` contract
//! - **crypto**: nonces, keys, the `Cipher` seam and its XChaCha20-Poly1305 default
//! - **config**: options injected into row construction
//!
//! Persistence, transport and establishing new tag pairs are up to the host.
//!
//! ## Example
//!
//! ```
//! use tagvault_core::{Row, SecretKey, TagPair, TagPairs};
//!
//! let key = SecretKey::from_bytes([7; 32]);
//! let row = Row::new_simple(b"buy milk".to_vec(), ["todo"]).unwrap();
//! let index: TagPairs = vec![TagPair::new("todo", "6c3f0e")].into();
//!
//! let bytes = row.encrypt(Some(&key), &index).unwrap().to_bytes().unwrap();
//!
//! let mut fetched = Row::from_bytes(&bytes).unwrap();
//! fetched.populate(Some(&key), &index).unwrap();
//! assert_eq!(fetched.decrypted(), b"buy milk");
//! assert!(fetched.has_plain_tag("todo"));
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod row;
pub mod tags;

pub use config::RowOptions;
pub use crypto::{Cipher, Nonce, SecretKey, XChaCha20Poly1305Cipher};
pub use error::{PopulateStage, Result, VaultError};
pub use row::{Row, RowFactory, Rows, WireRow};
pub use tags::{Tag, TagIndex, TagPair, TagPairs};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
