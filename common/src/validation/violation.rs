//! Schema violations reported by the validator.
//!
//! Each variant names exactly one broken rule. Violations accumulate; an
//! empty list means the manifest is valid.

use crate::frontmatter::ValueKind;
use thiserror::Error;

/// A single broken schema rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    /// A top-level key outside the allow-list.
    #[error("unrecognised frontmatter key \"{key}\"")]
    UnrecognisedKey {
        /// The offending key.
        key: String,
    },

    /// A required field is absent or empty.
    #[error("missing required field \"{field}\"")]
    MissingField {
        /// The missing field.
        field: &'static str,
    },

    /// A field holds the wrong kind of value.
    #[error("field \"{field}\" must be a {expected}, found a {found}")]
    WrongType {
        /// Dotted path of the field.
        field: &'static str,
        /// The kind the rule requires.
        expected: ValueKind,
        /// The kind that was parsed.
        found: ValueKind,
    },

    /// A field exceeds its character limit.
    #[error("field \"{field}\" must be at most {max} characters, found {length}")]
    TooLong {
        /// The offending field.
        field: &'static str,
        /// The character limit.
        max: usize,
        /// The actual character count.
        length: usize,
    },

    /// The skill name is not kebab-case.
    #[error("name \"{name}\" must be kebab-case (lowercase letters and digits joined by single hyphens)")]
    NameNotKebabCase {
        /// The rejected name.
        name: String,
    },

    /// The skill name differs from the directory holding it.
    #[error("name \"{name}\" must match its directory name \"{directory}\"")]
    NameDirectoryMismatch {
        /// The declared name.
        name: String,
        /// The containing directory name.
        directory: String,
    },

    /// A field contains a reserved word.
    #[error("field \"{field}\" must not contain the reserved word \"{word}\"")]
    ReservedWord {
        /// The offending field.
        field: &'static str,
        /// The reserved word that was found.
        word: &'static str,
    },

    /// The description contains markup.
    #[error("description must not contain markup tags (found \"{tag}\")")]
    MarkupTag {
        /// The first tag found.
        tag: String,
    },

    /// The description does not read as a usage trigger.
    #[error("description must say when to use the skill (include one of: {expected})")]
    MissingTrigger {
        /// Comma-separated trigger words.
        expected: String,
    },

    /// An `allowed-tools` entry is empty or not kebab-case.
    #[error("allowed-tools item {position} (\"{item}\") must be a non-empty kebab-case tool name")]
    InvalidTool {
        /// One-based position in the list.
        position: usize,
        /// The rejected item.
        item: String,
    },

    /// `metadata.version` is not `MAJOR.MINOR.PATCH`.
    #[error("metadata.version \"{version}\" must be semantic (MAJOR.MINOR.PATCH)")]
    InvalidVersion {
        /// The rejected version.
        version: String,
    },

    /// A `metadata.tags` entry is not kebab-case.
    #[error("metadata.tags item {position} (\"{tag}\") must be kebab-case")]
    InvalidTag {
        /// One-based position in the list.
        position: usize,
        /// The rejected tag.
        tag: String,
    },

    /// The manifest file is too long.
    #[error("manifest has {count} lines; the maximum is {max}")]
    TooManyLines {
        /// The file's line count.
        count: usize,
        /// The permitted maximum.
        max: usize,
    },
}
