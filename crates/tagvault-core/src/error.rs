//! Error types for tagvault core operations.
//!
//! Every failure is returned to the immediate caller with the operation that
//! failed and the underlying cause. Nothing here is retried; retry policy
//! belongs to whatever transport sits above this crate.

use std::fmt;

use thiserror::Error;

use crate::crypto::CipherError;

/// Result type alias for tagvault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Which half of [`Row::populate`](crate::Row::populate) failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulateStage {
    Decrypt,
    ResolveTags,
}

impl fmt::Display for PopulateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopulateStage::Decrypt => write!(f, "decrypting row"),
            PopulateStage::ResolveTags => write!(f, "setting row's plain tags"),
        }
    }
}

/// Core error type for tagvault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Row ID or nonce could not be generated
    #[error("Failed to generate {what}: {reason}")]
    Generation { what: &'static str, reason: String },

    /// Wire bytes did not describe a valid row
    #[error(
        "Error creating row from bytes: `{source}`. Input: `{}`",
        String::from_utf8_lossy(.input)
    )]
    Deserialization {
        input: Vec<u8>,
        #[source]
        source: serde_json::Error,
    },

    /// Decryption or encryption attempted without a key
    #[error("Key is missing")]
    MissingKey,

    /// Cipher rejected the ciphertext/nonce/key combination
    #[error("Error decrypting: {0}")]
    Decryption(#[source] CipherError),

    /// Cipher failed to seal the plaintext
    #[error("Error encrypting: {0}")]
    Encryption(#[source] CipherError),

    /// None of the row's tokens has a pair in the tag index
    #[error("No tag pairs match any of {tokens} random tag(s)")]
    NoMatchingTags { tokens: usize },

    /// A plain tag has no token in the tag index
    #[error("No tag pair found for plain tag `{0}`")]
    UnknownPlainTag(String),

    /// One stage of populate failed
    #[error("Error {stage}: {source}")]
    Populate {
        stage: PopulateStage,
        #[source]
        source: Box<VaultError>,
    },

    /// An operation on one row of a listing failed
    #[error("Row {index}: {source}")]
    InRow {
        index: usize,
        #[source]
        source: Box<VaultError>,
    },

    /// A row listing query matched nothing
    #[error("No rows found")]
    RowsNotFound,

    /// Invalid caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Options could not be parsed
    #[error("Config error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl VaultError {
    pub(crate) fn populate(stage: PopulateStage, source: VaultError) -> Self {
        VaultError::Populate {
            stage,
            source: Box::new(source),
        }
    }

    /// Unwraps `Populate` and `InRow` layers and returns the error that started it.
    pub fn root_cause(&self) -> &VaultError {
        match self {
            VaultError::Populate { source, .. } | VaultError::InRow { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

impl From<toml::de::Error> for VaultError {
    fn from(err: toml::de::Error) -> Self {
        VaultError::Config(err.to_string())
    }
}
