//! The tag index contract rows resolve against.

use std::sync::Arc;

use super::pairs::TagPairs;
use super::tag::Tag;
use crate::error::Result;

/// Read-only view of the client's plain tag ↔ token mapping.
///
/// Implementations must tolerate concurrent readers. Adding pairs is the
/// owner's business and has to be synchronized outside this trait.
pub trait TagIndex: Send + Sync {
    /// Pairs whose token is in `tokens`, in index order.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NoMatchingTags` when nothing matches.
    fn matching_pairs(&self, tokens: &[String]) -> Result<TagPairs>;

    /// Token for each plain tag, in the order given.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::UnknownPlainTag` for the first tag without a pair.
    fn tokens_for(&self, plain: &[Tag]) -> Result<Vec<String>>;
}

impl TagIndex for TagPairs {
    fn matching_pairs(&self, tokens: &[String]) -> Result<TagPairs> {
        self.with_all_random_tags(tokens)
    }

    fn tokens_for(&self, plain: &[Tag]) -> Result<Vec<String>> {
        TagPairs::tokens_for(self, plain)
    }
}

impl<T: TagIndex + ?Sized> TagIndex for Arc<T> {
    fn matching_pairs(&self, tokens: &[String]) -> Result<TagPairs> {
        (**self).matching_pairs(tokens)
    }

    fn tokens_for(&self, plain: &[Tag]) -> Result<Vec<String>> {
        (**self).tokens_for(plain)
    }
}
