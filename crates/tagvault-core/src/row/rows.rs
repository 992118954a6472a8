//! A listing of rows, as a storage backend returns them.

use uuid::Uuid;

use super::wire::WireRow;
use super::{Row, RowFactory};
use crate::crypto::SecretKey;
use crate::error::{Result, VaultError};
use crate::tags::TagIndex;

#[derive(Debug, Clone, Default)]
pub struct Rows(Vec<Row>);

impl Rows {
    /// Parse a JSON array of wire rows. See [`RowFactory::rows_from_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        RowFactory::default().rows_from_bytes(bytes)
    }

    /// Serialize the server-visible half of every row as a JSON array.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let wires: Vec<&WireRow> = self.iter().map(Row::wire).collect();
        Ok(serde_json::to_vec(&wires)?)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.0.iter()
    }

    /// Populate every row, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::InRow` with the position of the failing row.
    pub fn populate<I: TagIndex + ?Sized>(
        &mut self,
        key: Option<&SecretKey>,
        index: &I,
    ) -> Result<()> {
        for (i, row) in self.0.iter_mut().enumerate() {
            row.populate(key, index).map_err(|e| VaultError::InRow {
                index: i,
                source: Box::new(e),
            })?;
        }
        Ok(())
    }

    /// Rows carrying the plain tag `plain`.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::RowsNotFound` if no row has it.
    pub fn with_plain_tag(&self, plain: &str) -> Result<Rows> {
        let found: Rows = self
            .iter()
            .filter(|row| row.has_plain_tag(plain))
            .cloned()
            .collect();
        if found.is_empty() {
            return Err(VaultError::RowsNotFound);
        }
        Ok(found)
    }

    /// The row whose leading `id:` tag is `id`.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::RowsNotFound` if no row has that ID.
    pub fn find_by_id(&self, id: Uuid) -> Result<&Row> {
        self.iter()
            .find(|row| row.id() == Some(id))
            .ok_or(VaultError::RowsNotFound)
    }
}

impl From<Vec<Row>> for Rows {
    fn from(rows: Vec<Row>) -> Self {
        Self(rows)
    }
}

impl FromIterator<Row> for Rows {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Rows {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Rows {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
