//! Row construction with injected collaborators.
//!
//! [`RowFactory`] owns everything building a row depends on: the clock for
//! `created:` tags, the random source for IDs and nonces, and the
//! [`RowOptions`]. The `Row::new*` shortcuts use a default factory.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::rows::Rows;
use super::wire::WireRow;
use super::Row;
use crate::config::RowOptions;
use crate::crypto::{Nonce, OsRandom, RandomSource};
use crate::error::{Result, VaultError};
use crate::tags::Tag;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Builds rows.
#[derive(Clone)]
pub struct RowFactory {
    options: RowOptions,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
}

impl Default for RowFactory {
    fn default() -> Self {
        Self {
            options: RowOptions::default(),
            clock: Arc::new(SystemClock),
            random: Arc::new(OsRandom),
        }
    }
}

impl fmt::Debug for RowFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowFactory")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl RowFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: RowOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_random(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Arc::new(random);
        self
    }

    pub fn options(&self) -> RowOptions {
        self.options
    }

    /// Build a row from plaintext and user tags, adding the conventional tags.
    ///
    /// The resulting plain tags are `[id:<uuid>, ...tags, created:<now>, all]`.
    /// The ID must stay first: lookups by ID only inspect the leading tag.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Generation` if the ID or the nonce cannot be generated.
    pub fn new_row<I>(&self, plaintext: impl Into<Vec<u8>>, tags: I) -> Result<Row>
    where
        I: IntoIterator,
        I::Item: Into<Tag>,
    {
        let id = self.new_id()?;

        let mut plain_tags = vec![Tag::Id(id)];
        plain_tags.extend(tags.into_iter().map(Into::into));
        plain_tags.push(Tag::created(self.clock.now()));
        plain_tags.push(Tag::All);

        self.build(plaintext.into(), plain_tags)
    }

    /// Build a row with exactly the given tags.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Generation` if the nonce cannot be generated.
    pub fn new_row_simple<I>(&self, plaintext: impl Into<Vec<u8>>, tags: I) -> Result<Row>
    where
        I: IntoIterator,
        I::Item: Into<Tag>,
    {
        let plain_tags = tags.into_iter().map(Into::into).collect();
        self.build(plaintext.into(), plain_tags)
    }

    /// Parse a row from its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Deserialization`, carrying the input, if `bytes`
    /// is not a valid wire row.
    pub fn row_from_bytes(&self, bytes: &[u8]) -> Result<Row> {
        let wire: WireRow = serde_json::from_slice(bytes).map_err(|source| {
            VaultError::Deserialization {
                input: bytes.to_vec(),
                source,
            }
        })?;
        if self.options.debug {
            tracing::debug!(
                tokens = wire.tokens.len(),
                data_len = wire.ciphertext.len(),
                "Created new row from bytes"
            );
        }
        Ok(Row::from_wire(wire, self.options))
    }

    /// Parse a JSON array of wire rows, as returned by a backend listing.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Deserialization` if any element is invalid; no
    /// rows are returned in that case.
    pub fn rows_from_bytes(&self, bytes: &[u8]) -> Result<Rows> {
        let wires: Vec<WireRow> = serde_json::from_slice(bytes).map_err(|source| {
            VaultError::Deserialization {
                input: bytes.to_vec(),
                source,
            }
        })?;
        if self.options.debug {
            tracing::debug!(count = wires.len(), "Created new rows from bytes");
        }
        Ok(wires
            .into_iter()
            .map(|wire| Row::from_wire(wire, self.options))
            .collect())
    }

    fn build(&self, plaintext: Vec<u8>, plain_tags: Vec<Tag>) -> Result<Row> {
        let nonce = Nonce::generate(self.random.as_ref())?;
        Ok(Row::fresh(plaintext, plain_tags, nonce, self.options))
    }

    fn new_id(&self) -> Result<Uuid> {
        let mut bytes = [0u8; 16];
        self.random
            .fill(&mut bytes)
            .map_err(|e| VaultError::Generation {
                what: "row ID",
                reason: e.to_string(),
            })?;
        Ok(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SourceError;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    /// Succeeds for the first `ok` fills, then fails.
    struct FailAfter {
        ok: usize,
        calls: AtomicUsize,
    }

    impl FailAfter {
        fn new(ok: usize) -> Self {
            Self {
                ok,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl RandomSource for FailAfter {
        fn fill(&self, dest: &mut [u8]) -> std::result::Result<(), SourceError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) < self.ok {
                dest.fill(0x11);
                Ok(())
            } else {
                Err("no entropy".into())
            }
        }
    }

    #[test]
    fn test_conventional_tag_layout() {
        let at = Utc.with_ymd_and_hms(2015, 2, 24, 10, 0, 0).unwrap();
        let factory = RowFactory::new().with_clock(FixedClock(at));

        let row = factory.new_row(b"hello".to_vec(), ["work", "home"]).unwrap();
        let tags = row.plain_tag_strings();

        assert_eq!(tags.len(), 5);
        assert!(tags[0].starts_with("id:"));
        assert_eq!(&tags[1..], ["work", "home", "created:20150224100000", "all"]);
    }

    #[test]
    fn test_id_is_random_v4() {
        let row = RowFactory::new().new_row(Vec::<u8>::new(), Vec::<Tag>::new()).unwrap();
        let id = row.id().unwrap();
        assert_eq!(id.get_version_num(), 4);
    }

    #[test]
    fn test_id_generation_failure() {
        let factory = RowFactory::new().with_random(FailAfter::new(0));
        let err = factory.new_row(b"x".to_vec(), ["work"]).unwrap_err();
        assert!(matches!(err, VaultError::Generation { what: "row ID", .. }));
    }

    #[test]
    fn test_nonce_generation_failure() {
        let factory = RowFactory::new().with_random(FailAfter::new(1));
        let err = factory.new_row(b"x".to_vec(), ["work"]).unwrap_err();
        assert!(matches!(err, VaultError::Generation { what: "nonce", .. }));

        let factory = RowFactory::new().with_random(FailAfter::new(0));
        let err = factory.new_row_simple(b"x".to_vec(), ["work"]).unwrap_err();
        assert!(matches!(err, VaultError::Generation { what: "nonce", .. }));
    }

    #[test]
    fn test_simple_row_keeps_tags_verbatim() {
        let row = RowFactory::new()
            .new_row_simple(b"x".to_vec(), ["b", "a", "all"])
            .unwrap();
        assert_eq!(row.plain_tag_strings(), ["b", "a", "all"]);
        assert!(row.id().is_none());
    }

    #[test]
    fn test_options_carried_into_rows() {
        let factory = RowFactory::new().with_options(RowOptions::new(true));
        let row = factory.row_from_bytes(br#"{"data":null,"tags":["r1"]}"#).unwrap();
        assert!(row.options().debug);
    }

    #[test]
    fn test_rows_from_bytes_all_or_nothing() {
        let factory = RowFactory::new();
        let rows = factory
            .rows_from_bytes(br#"[{"tags":["r1"]},{"tags":["r2"]}]"#)
            .unwrap();
        assert_eq!(rows.len(), 2);

        let err = factory
            .rows_from_bytes(br#"[{"tags":["r1"]},{"data":"YWJj"}]"#)
            .unwrap_err();
        assert!(matches!(err, VaultError::Deserialization { .. }));
    }
}
