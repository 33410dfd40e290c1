//! Ordered tag set used for multi-valued creator attributes.
//!
//! The store keeps these as a comma-joined string; in memory they are a
//! duplicate-free list that preserves first-seen order.

use std::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Separators accepted when parsing a joined tag string (ASCII and full-width comma).
const SEPARATORS: [char; 2] = [',', '，'];

/// Ordered, duplicate-free set of tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: Vec<String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-joined tag string.
    pub fn parse(joined: &str) -> Self {
        let mut set = Self::new();
        for part in joined.split(SEPARATORS.as_slice()) {
            set.insert(part);
        }
        set
    }

    /// Insert a tag. Blank tags and duplicates are ignored.
    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag.trim())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Comma-joined storage form.
    pub fn joined(&self) -> String {
        self.tags.join(",")
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tags.join(", "))
    }
}

impl<S: AsRef<str>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for tag in iter {
            set.insert(tag.as_ref());
        }
        set
    }
}

impl Serialize for TagSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.joined())
    }
}

impl<'de> Deserialize<'de> for TagSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TagSetVisitor;

        impl<'de> Visitor<'de> for TagSetVisitor {
            type Value = TagSet;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a comma-joined string or a list of strings")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<TagSet, E> {
                Ok(TagSet::parse(v))
            }

            // CSV cells holding a bare number come through as numbers.
            fn visit_u64<E: de::Error>(self, v: u64) -> Result<TagSet, E> {
                Ok(TagSet::parse(&v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<TagSet, E> {
                Ok(TagSet::parse(&v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<TagSet, E> {
                Ok(TagSet::parse(&v.to_string()))
            }

            fn visit_unit<E: de::Error>(self) -> Result<TagSet, E> {
                Ok(TagSet::new())
            }

            fn visit_none<E: de::Error>(self) -> Result<TagSet, E> {
                Ok(TagSet::new())
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<TagSet, A::Error> {
                let mut set = TagSet::new();
                while let Some(tag) = seq.next_element::<String>()? {
                    set.insert(&tag);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_any(TagSetVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_and_trims() {
        let set = TagSet::parse("美妆护肤, 生活方式");
        assert_eq!(set.len(), 2);
        assert!(set.contains("美妆护肤"));
        assert!(set.contains("生活方式"));
    }

    #[test]
    fn test_parse_full_width_comma_and_duplicates() {
        let set = TagSet::parse("美食，旅行,美食, ,");
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["美食", "旅行"]);
    }

    #[test]
    fn test_serialize_joined() {
        let set: TagSet = ["已签约", "商务合作"].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&set).unwrap(),
            "\"已签约,商务合作\""
        );
    }

    #[test]
    fn test_deserialize_string_or_list() {
        let a: TagSet = serde_json::from_str("\"a, b\"").unwrap();
        let b: TagSet = serde_json::from_str("[\"a\", \"b\", \"a\"]").unwrap();
        let c: TagSet = serde_json::from_str("null").unwrap();
        assert_eq!(a, b);
        assert!(c.is_empty());
    }
}
