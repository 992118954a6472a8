//! Plain tag ↔ random token pairs.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::tag::Tag;
use crate::error::{Result, VaultError};

/// One plain tag and the random token that stands in for it on the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagPair {
    plain: Tag,
    random: String,
}

impl TagPair {
    pub fn new(plain: impl Into<Tag>, random: impl Into<String>) -> Self {
        Self {
            plain: plain.into(),
            random: random.into(),
        }
    }

    pub fn plain(&self) -> &Tag {
        &self.plain
    }

    pub fn random(&self) -> &str {
        &self.random
    }
}

/// An ordered set of [`TagPair`]s held by the client.
///
/// Order matters only for tie-breaking: when two pairs share a token, or two
/// matched pairs share a plain tag, the earlier pair wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagPairs(Vec<TagPair>);

impl TagPairs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pair: TagPair) {
        self.0.push(pair);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TagPair> {
        self.0.iter()
    }

    /// Pairs whose token appears in `tokens`, in index order.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NoMatchingTags` if no pair matches.
    pub fn with_all_random_tags(&self, tokens: &[String]) -> Result<TagPairs> {
        let wanted: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        let mut seen_tokens = HashSet::new();
        let mut seen_plain = HashSet::new();

        let matches: TagPairs = self
            .iter()
            .filter(|pair| wanted.contains(pair.random()))
            .filter(|pair| seen_tokens.insert(pair.random()))
            .filter(|pair| seen_plain.insert(pair.plain()))
            .cloned()
            .collect();

        if matches.is_empty() {
            return Err(VaultError::NoMatchingTags {
                tokens: tokens.len(),
            });
        }
        Ok(matches)
    }

    /// Token for each plain tag, in the order given.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::UnknownPlainTag` naming the first tag without a pair.
    pub fn tokens_for(&self, plain: &[Tag]) -> Result<Vec<String>> {
        plain
            .iter()
            .map(|tag| {
                self.pick_by_plain(tag)
                    .map(|pair| pair.random.clone())
                    .ok_or_else(|| VaultError::UnknownPlainTag(tag.to_string()))
            })
            .collect()
    }

    pub fn pick_by_plain(&self, plain: &Tag) -> Option<&TagPair> {
        self.iter().find(|pair| pair.plain() == plain)
    }

    pub fn pick_by_random(&self, random: &str) -> Option<&TagPair> {
        self.iter().find(|pair| pair.random() == random)
    }

    pub fn all_plain(&self) -> Vec<Tag> {
        self.iter().map(|pair| pair.plain.clone()).collect()
    }

    pub fn all_random(&self) -> Vec<String> {
        self.iter().map(|pair| pair.random.clone()).collect()
    }
}

impl From<Vec<TagPair>> for TagPairs {
    fn from(pairs: Vec<TagPair>) -> Self {
        Self(pairs)
    }
}

impl FromIterator<TagPair> for TagPairs {
    fn from_iter<I: IntoIterator<Item = TagPair>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for TagPairs {
    type Item = TagPair;
    type IntoIter = std::vec::IntoIter<TagPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TagPairs {
    type Item = &'a TagPair;
    type IntoIter = std::slice::Iter<'a, TagPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn work_home() -> TagPairs {
        vec![TagPair::new("work", "r1"), TagPair::new("home", "r2")].into()
    }

    #[test]
    fn test_unmatched_tokens_ignored() {
        let matches = work_home()
            .with_all_random_tags(&tokens(&["r1", "r2", "r3"]))
            .unwrap();

        let mut plain: Vec<String> = matches.all_plain().iter().map(Tag::to_string).collect();
        plain.sort();
        assert_eq!(plain, vec!["home", "work"]);
    }

    #[test]
    fn test_no_match_is_error() {
        let result = work_home().with_all_random_tags(&tokens(&["r9"]));
        assert!(matches!(result, Err(VaultError::NoMatchingTags { tokens: 1 })));
    }

    #[test]
    fn test_empty_index_and_empty_tokens() {
        let result = TagPairs::new().with_all_random_tags(&tokens(&["r1"]));
        assert!(matches!(result, Err(VaultError::NoMatchingTags { .. })));

        let result = work_home().with_all_random_tags(&[]);
        assert!(matches!(result, Err(VaultError::NoMatchingTags { tokens: 0 })));
    }

    #[test]
    fn test_duplicate_token_first_pair_wins() {
        let pairs: TagPairs = vec![TagPair::new("work", "r1"), TagPair::new("job", "r1")].into();
        let matches = pairs.with_all_random_tags(&tokens(&["r1"])).unwrap();
        assert_eq!(matches.all_plain(), vec![Tag::from("work")]);
    }

    #[test]
    fn test_duplicate_plain_reported_once() {
        let pairs: TagPairs = vec![TagPair::new("work", "r1"), TagPair::new("work", "r2")].into();
        let matches = pairs.with_all_random_tags(&tokens(&["r2", "r1"])).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches.all_random(), vec!["r1"]);
    }

    #[test]
    fn test_tokens_for_plain_tags() {
        let pairs = work_home();
        let found = pairs
            .tokens_for(&[Tag::from("home"), Tag::from("work")])
            .unwrap();
        assert_eq!(found, vec!["r2", "r1"]);

        let err = pairs.tokens_for(&[Tag::from("gym")]).unwrap_err();
        assert!(matches!(err, VaultError::UnknownPlainTag(ref t) if t == "gym"));
    }

    #[test]
    fn test_pick() {
        let pairs = work_home();
        assert_eq!(pairs.pick_by_random("r2").unwrap().plain(), &Tag::from("home"));
        assert_eq!(pairs.pick_by_plain(&Tag::from("work")).unwrap().random(), "r1");
        assert!(pairs.pick_by_random("r3").is_none());
    }

    #[test]
    fn test_serde_round_trip() {
        let pairs = work_home();
        let json = serde_json::to_string(&pairs).unwrap();
        assert_eq!(
            json,
            r#"[{"plain":"work","random":"r1"},{"plain":"home","random":"r2"}]"#
        );
        let back: TagPairs = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pairs);
    }
}
