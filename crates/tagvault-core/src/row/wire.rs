//! Server-visible half of a row.
//!
//! JSON shape exchanged with storage backends:
//!
//! ```json
//! {"data": "<base64 ciphertext>", "tags": ["<token>", ...], "nonce": [24 integers]}
//! ```
//!
//! `data`, `tags` and `nonce` may each be `null` or missing. A row with
//! non-empty `data` must carry a nonce.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::crypto::Nonce;

/// Ciphertext, tokens and nonce: everything the server stores for a row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWireRow")]
pub struct WireRow {
    #[serde(rename = "data", serialize_with = "serialize_data")]
    pub(crate) ciphertext: Vec<u8>,

    #[serde(rename = "tags")]
    pub(crate) tokens: Vec<String>,

    pub(crate) nonce: Option<Nonce>,
}

impl WireRow {
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn nonce(&self) -> Option<&Nonce> {
        self.nonce.as_ref()
    }
}

#[derive(Deserialize)]
struct RawWireRow {
    #[serde(default, deserialize_with = "deserialize_data")]
    data: Vec<u8>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    nonce: Option<Nonce>,
}

impl TryFrom<RawWireRow> for WireRow {
    type Error = String;

    fn try_from(raw: RawWireRow) -> Result<Self, Self::Error> {
        if !raw.data.is_empty() && raw.nonce.is_none() {
            return Err("row has data but no nonce".to_string());
        }
        Ok(WireRow {
            ciphertext: raw.data,
            tokens: raw.tags.unwrap_or_default(),
            nonce: raw.nonce,
        })
    }
}

fn serialize_data<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    if data.is_empty() {
        serializer.serialize_none()
    } else {
        serializer.serialize_str(&STANDARD.encode(data))
    }
}

fn deserialize_data<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(encoded) => STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| serde::de::Error::custom(format!("invalid base64 in data: {}", e))),
        None => Ok(Vec::new()),
    }
}
