//! Structured plain tags.
//!
//! Rows carry a few conventional tags (`id:<uuid>`, `created:<timestamp>`,
//! `all`) next to whatever the user typed. They are kept as a [`Tag`] enum
//! in memory and only become strings at the serialization boundary.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

pub const ID_PREFIX: &str = "id:";
pub const CREATED_PREFIX: &str = "created:";
pub const ALL_TAG: &str = "all";

/// `created:` timestamps are UTC, second precision, no separators.
pub const CREATED_FORMAT: &str = "%Y%m%d%H%M%S";

/// A plain (human-readable) tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `id:<uuid>`, always the first tag of a conventional row
    Id(Uuid),
    /// `created:<YYYYMMDDhhmmss>`
    Created(DateTime<Utc>),
    /// `all`, carried by every conventional row
    All,
    /// Anything else, verbatim
    Plain(String),
}

impl Tag {
    /// A `created:` tag for `at`, truncated to whole seconds.
    pub fn created(at: DateTime<Utc>) -> Self {
        Tag::Created(at.trunc_subsecs(0))
    }

    /// Parse the literal form of a tag.
    ///
    /// Never fails. A string only becomes `Id` or `Created` if rendering the
    /// parsed value reproduces it exactly, so `parse(s).to_string() == s`
    /// holds for every input.
    pub fn parse(raw: &str) -> Self {
        if raw == ALL_TAG {
            return Tag::All;
        }
        if let Some(value) = raw.strip_prefix(ID_PREFIX) {
            if let Ok(id) = Uuid::parse_str(value) {
                if id.hyphenated().to_string() == value {
                    return Tag::Id(id);
                }
            }
        }
        if let Some(value) = raw.strip_prefix(CREATED_PREFIX) {
            if let Ok(naive) = NaiveDateTime::parse_from_str(value, CREATED_FORMAT) {
                let at = naive.and_utc();
                if at.format(CREATED_FORMAT).to_string() == value {
                    return Tag::Created(at);
                }
            }
        }
        Tag::Plain(raw.to_string())
    }

    pub fn as_id(&self) -> Option<Uuid> {
        match self {
            Tag::Id(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_created(&self) -> Option<DateTime<Utc>> {
        match self {
            Tag::Created(at) => Some(*at),
            _ => None,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Id(id) => write!(f, "{}{}", ID_PREFIX, id.hyphenated()),
            Tag::Created(at) => write!(f, "{}{}", CREATED_PREFIX, at.format(CREATED_FORMAT)),
            Tag::All => f.write_str(ALL_TAG),
            Tag::Plain(s) => f.write_str(s),
        }
    }
}

impl FromStr for Tag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Tag::parse(s))
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Tag::parse(s)
    }
}

impl From<String> for Tag {
    fn from(s: String) -> Self {
        Tag::parse(&s)
    }
}

impl PartialEq<str> for Tag {
    fn eq(&self, other: &str) -> bool {
        match self {
            Tag::Plain(s) => s == other,
            Tag::All => other == ALL_TAG,
            _ => self.to_string() == other,
        }
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Tag::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_conventional_tags() {
        let id = Uuid::new_v4();
        assert_eq!(Tag::parse(&format!("id:{}", id)), Tag::Id(id));
        assert_eq!(Tag::parse("all"), Tag::All);

        let at = Utc.with_ymd_and_hms(2015, 2, 24, 13, 5, 9).unwrap();
        assert_eq!(Tag::parse("created:20150224130509"), Tag::Created(at));
    }

    #[test]
    fn test_display_uses_literal_prefixes() {
        let at = Utc.with_ymd_and_hms(2015, 2, 24, 13, 5, 9).unwrap();
        assert_eq!(Tag::created(at).to_string(), "created:20150224130509");
        assert_eq!(Tag::All.to_string(), "all");
        assert_eq!(Tag::Plain("work".into()).to_string(), "work");
    }

    #[test]
    fn test_non_canonical_forms_stay_plain() {
        for raw in [
            "id:not-a-uuid",
            "id:{67e55044-10b1-426f-9247-bb680e5fe0c8}",
            "id:67E55044-10B1-426F-9247-BB680E5FE0C8",
            "created:yesterday",
            "created:2015-02-24",
            "All",
            "",
        ] {
            let tag = Tag::parse(raw);
            assert!(matches!(tag, Tag::Plain(_)), "{raw} should stay plain");
            assert_eq!(tag.to_string(), raw);
        }
    }

    #[test]
    fn test_created_truncates_subseconds() {
        let at = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::milliseconds(750);
        let tag = Tag::created(at);
        assert_eq!(Tag::parse(&tag.to_string()), tag);
    }

    #[test]
    fn test_compare_with_str() {
        let id = Uuid::new_v4();
        assert!(Tag::Id(id) == format!("id:{}", id).as_str());
        assert!(Tag::All == "all");
        assert!(Tag::Plain("home".into()) == "home");
        assert!(Tag::Plain("home".into()) != "work");
    }

    #[test]
    fn test_serde_as_string() {
        let tags = vec![Tag::All, Tag::Plain("work".into())];
        let json = serde_json::to_string(&tags).unwrap();
        assert_eq!(json, r#"["all","work"]"#);

        let back: Vec<Tag> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tags);
    }
}
