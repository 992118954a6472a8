//! Rows: the unit of encrypted, tag-searchable storage.
//!
//! A row has a server-visible half ([`WireRow`]: ciphertext, tokens, nonce)
//! and a client-only half (plaintext and plain tags). The client-only half is
//! filled at creation, or later by [`Row::decrypt`] and
//! [`Row::set_plain_tags`].
//!
//! ```text
//! Created (plaintext + plain tags)
//!   └─ encrypt ─▶ Encrypted (ciphertext + nonce + tokens)
//!                   └─ to_bytes / from_bytes (storage backend)
//!                        └─ decrypt ─▶ + plaintext
//!                             └─ set_plain_tags ─▶ + plain tags
//! ```

pub mod factory;
pub mod rows;
pub mod wire;

pub use factory::{Clock, RowFactory, SystemClock};
pub use rows::Rows;
pub use wire::WireRow;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::RowOptions;
use crate::crypto::{Cipher, Nonce, SecretKey, XChaCha20Poly1305Cipher};
use crate::error::{PopulateStage, Result, VaultError};
use crate::tags::{Tag, TagIndex};

#[derive(Debug, Clone)]
pub struct Row {
    wire: WireRow,
    plaintext: Option<Vec<u8>>,
    plain_tags: Option<Vec<Tag>>,
    options: RowOptions,
}

impl Row {
    /// Create a row with an `id:` tag first and `created:`/`all` tags last.
    ///
    /// See [`RowFactory::new_row`].
    pub fn new<I>(plaintext: impl Into<Vec<u8>>, tags: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Tag>,
    {
        RowFactory::default().new_row(plaintext, tags)
    }

    /// Create a row with exactly the given tags.
    ///
    /// See [`RowFactory::new_row_simple`].
    pub fn new_simple<I>(plaintext: impl Into<Vec<u8>>, tags: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Tag>,
    {
        RowFactory::default().new_row_simple(plaintext, tags)
    }

    /// Parse a row from its JSON wire form.
    ///
    /// See [`RowFactory::row_from_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        RowFactory::default().row_from_bytes(bytes)
    }

    pub(crate) fn fresh(
        plaintext: Vec<u8>,
        plain_tags: Vec<Tag>,
        nonce: Nonce,
        options: RowOptions,
    ) -> Self {
        Self {
            wire: WireRow {
                ciphertext: Vec::new(),
                tokens: Vec::new(),
                nonce: Some(nonce),
            },
            plaintext: Some(plaintext),
            plain_tags: Some(plain_tags),
            options,
        }
    }

    pub(crate) fn from_wire(wire: WireRow, options: RowOptions) -> Self {
        Self {
            wire,
            plaintext: None,
            plain_tags: None,
            options,
        }
    }

    /// Serialize the server-visible half to JSON.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.wire)?)
    }

    pub fn wire(&self) -> &WireRow {
        &self.wire
    }

    pub fn into_wire(self) -> WireRow {
        self.wire
    }

    pub fn options(&self) -> RowOptions {
        self.options
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.wire.ciphertext
    }

    pub fn random_tags(&self) -> &[String] {
        &self.wire.tokens
    }

    pub fn nonce(&self) -> Option<&Nonce> {
        self.wire.nonce.as_ref()
    }

    /// Decrypted payload; empty until [`decrypt`](Self::decrypt) succeeds.
    pub fn decrypted(&self) -> &[u8] {
        self.plaintext.as_deref().unwrap_or_default()
    }

    pub fn is_decrypted(&self) -> bool {
        self.plaintext.is_some()
    }

    /// Plain tags; empty until supplied at creation or resolved.
    pub fn plain_tags(&self) -> &[Tag] {
        self.plain_tags.as_deref().unwrap_or_default()
    }

    pub fn plain_tag_strings(&self) -> Vec<String> {
        self.plain_tags().iter().map(Tag::to_string).collect()
    }

    /// The row ID, if the first plain tag is an `id:` tag.
    pub fn id(&self) -> Option<Uuid> {
        self.plain_tags().first().and_then(Tag::as_id)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.plain_tags().iter().find_map(Tag::as_created)
    }

    /// Does this row carry the random tag `token`?
    pub fn has_random_tag(&self, token: &str) -> bool {
        self.wire.tokens.iter().any(|t| t == token)
    }

    /// Does this row carry the plain tag `plain`?
    pub fn has_plain_tag(&self, plain: &str) -> bool {
        self.plain_tags().iter().any(|t| t == plain)
    }

    /// Render the payload and plain tags for a terminal.
    ///
    /// Only meaningful for text payloads; other bytes are shown lossily.
    pub fn format(&self) -> String {
        format!(
            "{}    {}\n",
            String::from_utf8_lossy(self.decrypted()),
            self.plain_tag_strings().join("   ")
        )
    }

    /// Decrypt the ciphertext with the default cipher.
    ///
    /// See [`decrypt_with`](Self::decrypt_with).
    pub fn decrypt(&mut self, key: Option<&SecretKey>) -> Result<()> {
        self.decrypt_with(&XChaCha20Poly1305Cipher, key)
    }

    /// Decrypt the ciphertext and keep the plaintext.
    ///
    /// A row without ciphertext has nothing to decrypt; that succeeds without
    /// looking at the key. Tokens and plain tags are left alone.
    ///
    /// # Errors
    ///
    /// - `VaultError::MissingKey` if `key` is `None` (checked before the cipher runs)
    /// - `VaultError::Decryption` if the cipher rejects the ciphertext
    pub fn decrypt_with(&mut self, cipher: &dyn Cipher, key: Option<&SecretKey>) -> Result<()> {
        if self.wire.ciphertext.is_empty() {
            if self.options.debug {
                tracing::debug!("row.decrypt: no data to decrypt, returning without error");
            }
            return Ok(());
        }

        let Some(key) = key else {
            if self.options.debug {
                tracing::debug!(tokens = ?self.wire.tokens, "no key passed to row.decrypt");
            }
            return Err(VaultError::MissingKey);
        };

        // The wire form refuses data without a nonce, so this only trips on
        // rows assembled by hand.
        let nonce = self.wire.nonce.as_ref().ok_or_else(|| {
            VaultError::InvalidInput("row has ciphertext but no nonce".to_string())
        })?;

        let plaintext = cipher
            .open(&self.wire.ciphertext, nonce, key)
            .map_err(VaultError::Decryption)?;
        self.plaintext = Some(plaintext);
        Ok(())
    }

    /// Resolve this row's tokens to plain tags through `index`.
    ///
    /// Plain tags come back in index order, which need not match the order
    /// they were created in. The `id:` tag, if any, is moved to the front so
    /// [`Row::id`] keeps working; the rest keep their index order.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NoMatchingTags` if no token has a pair in `index`.
    pub fn set_plain_tags<I: TagIndex + ?Sized>(&mut self, index: &I) -> Result<()> {
        let matches = index.matching_pairs(&self.wire.tokens)?;
        let mut plain_tags = matches.all_plain();
        if let Some(pos) = plain_tags.iter().position(|t| t.as_id().is_some()) {
            plain_tags[..=pos].rotate_right(1);
        }

        if self.options.debug {
            tracing::debug!(
                plain_tags = ?plain_tags.iter().map(Tag::to_string).collect::<Vec<_>>(),
                "row.plain_tags set"
            );
        }
        self.plain_tags = Some(plain_tags);
        Ok(())
    }

    /// Decrypt, then resolve plain tags, with the default cipher.
    pub fn populate<I: TagIndex + ?Sized>(
        &mut self,
        key: Option<&SecretKey>,
        index: &I,
    ) -> Result<()> {
        self.populate_with(&XChaCha20Poly1305Cipher, key, index)
    }

    /// Decrypt, then resolve plain tags.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Populate` naming the stage that failed.
    pub fn populate_with<I: TagIndex + ?Sized>(
        &mut self,
        cipher: &dyn Cipher,
        key: Option<&SecretKey>,
        index: &I,
    ) -> Result<()> {
        self.decrypt_with(cipher, key)
            .map_err(|e| VaultError::populate(PopulateStage::Decrypt, e))?;
        self.set_plain_tags(index)
            .map_err(|e| VaultError::populate(PopulateStage::ResolveTags, e))?;
        Ok(())
    }

    /// Seal the plaintext with the default cipher.
    ///
    /// See [`encrypt_with`](Self::encrypt_with).
    pub fn encrypt<I: TagIndex + ?Sized>(&self, key: Option<&SecretKey>, index: &I) -> Result<Row> {
        self.encrypt_with(&XChaCha20Poly1305Cipher, key, index)
    }

    /// Produce the server-visible form of this row.
    ///
    /// The plaintext is sealed under the row's own nonce and every plain tag
    /// is replaced by its token from `index`. The returned row carries no
    /// plaintext. An empty payload stays empty and needs no key.
    ///
    /// # Errors
    ///
    /// - `VaultError::MissingKey` if there is a payload and `key` is `None`
    /// - `VaultError::UnknownPlainTag` if a plain tag has no pair in `index`
    /// - `VaultError::Encryption` if the cipher fails
    pub fn encrypt_with<I: TagIndex + ?Sized>(
        &self,
        cipher: &dyn Cipher,
        key: Option<&SecretKey>,
        index: &I,
    ) -> Result<Row> {
        let tokens = index.tokens_for(self.plain_tags())?;

        let plaintext = self.decrypted();
        let ciphertext = if plaintext.is_empty() {
            Vec::new()
        } else {
            let key = key.ok_or(VaultError::MissingKey)?;
            let nonce = self.wire.nonce.as_ref().ok_or_else(|| {
                VaultError::InvalidInput("row has no nonce to encrypt with".to_string())
            })?;
            cipher
                .seal(plaintext, nonce, key)
                .map_err(VaultError::Encryption)?
        };

        if self.options.debug {
            tracing::debug!(tokens = tokens.len(), data_len = ciphertext.len(), "row encrypted");
        }
        Ok(Row::from_wire(
            WireRow {
                ciphertext,
                tokens,
                nonce: self.wire.nonce,
            },
            self.options,
        ))
    }
}
