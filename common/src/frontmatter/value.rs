//! Value types produced by the frontmatter parser.
//!
//! Every value is resolved to one of three shapes at parse time: a scalar
//! string, an inline list, or an inline map. Map values are restricted to
//! [`FlatValue`], so a map can never contain another map.

use std::fmt;

/// The shape of a parsed value, used when reporting type mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// A plain string.
    Scalar,
    /// An inline `[a, b]` list.
    List,
    /// An inline `{key: value}` map.
    Map,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Scalar => "string",
            Self::List => "list",
            Self::Map => "map",
        };
        f.write_str(label)
    }
}

/// A value held inside an inline map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlatValue {
    /// A plain string with one pair of surrounding quotes removed.
    Scalar(String),
    /// An inline list of strings.
    List(Vec<String>),
}

impl FlatValue {
    /// Return the scalar text, if this is a scalar.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value),
            Self::List(_) => None,
        }
    }

    /// Return the list items, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            Self::Scalar(_) => None,
        }
    }

    /// Return the shape of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Scalar(_) => ValueKind::Scalar,
            Self::List(_) => ValueKind::List,
        }
    }
}

/// A top-level frontmatter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontmatterValue {
    /// A plain string with one pair of surrounding quotes removed.
    Scalar(String),
    /// An inline list of strings.
    List(Vec<String>),
    /// An inline map whose values are scalars or lists, in source order.
    Map(Vec<(String, FlatValue)>),
}

impl FrontmatterValue {
    /// Return the scalar text, if this is a scalar.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value),
            Self::List(_) | Self::Map(_) => None,
        }
    }

    /// Return the list items, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            Self::Scalar(_) | Self::Map(_) => None,
        }
    }

    /// Return the map entries, if this is a map.
    #[must_use]
    pub fn as_map(&self) -> Option<&[(String, FlatValue)]> {
        match self {
            Self::Map(entries) => Some(entries),
            Self::Scalar(_) | Self::List(_) => None,
        }
    }

    /// Look up `key` inside a map value.
    ///
    /// Returns `None` when the value is not a map or the key is absent.
    #[must_use]
    pub fn map_get(&self, key: &str) -> Option<&FlatValue> {
        self.as_map()?
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value)
    }

    /// Return the shape of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Scalar(_) => ValueKind::Scalar,
            Self::List(_) => ValueKind::List,
            Self::Map(_) => ValueKind::Map,
        }
    }
}

impl From<FlatValue> for FrontmatterValue {
    fn from(value: FlatValue) -> Self {
        match value {
            FlatValue::Scalar(text) => Self::Scalar(text),
            FlatValue::List(items) => Self::List(items),
        }
    }
}

/// Ordered key/value pairs read from a frontmatter block.
///
/// Keys keep the position of their first occurrence. Inserting an existing
/// key replaces its value in place.
///
/// # Examples
///
/// ```
/// use skillpack_common::frontmatter::{Frontmatter, FrontmatterValue};
///
/// let mut frontmatter = Frontmatter::new();
/// frontmatter.insert("name", FrontmatterValue::Scalar("pdf-tools".to_owned()));
/// frontmatter.insert("license", FrontmatterValue::Scalar("MIT".to_owned()));
/// frontmatter.insert("name", FrontmatterValue::Scalar("pdf-kit".to_owned()));
///
/// assert_eq!(frontmatter.keys().collect::<Vec<_>>(), ["name", "license"]);
/// assert_eq!(
///     frontmatter.get("name").and_then(FrontmatterValue::as_scalar),
///     Some("pdf-kit")
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    entries: Vec<(String, FrontmatterValue)>,
}

impl Frontmatter {
    /// Create an empty frontmatter block.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert `value` under `key`, replacing any earlier value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: FrontmatterValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Return the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FrontmatterValue> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value)
    }

    /// Return true when `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over keys in source order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Iterate over entries in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FrontmatterValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return true when the block holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FrontmatterValue)> for Frontmatter {
    fn from_iter<I: IntoIterator<Item = (K, FrontmatterValue)>>(iter: I) -> Self {
        let mut frontmatter = Self::new();
        for (key, value) in iter {
            frontmatter.insert(key, value);
        }
        frontmatter
    }
}
