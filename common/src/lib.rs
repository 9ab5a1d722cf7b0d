//! Core of the skill packager: the `SKILL.md` frontmatter parser, its
//! renderer, and the schema validator that gates packaging.
//!
//! Nothing in this crate touches the filesystem; callers read the manifest
//! and supply directory facts through a [`ValidationContext`].

pub mod frontmatter;
pub mod validation;

pub use frontmatter::{
    FENCE, FlatValue, Frontmatter, FrontmatterError, FrontmatterValue, ValueKind,
    parse_frontmatter, render_frontmatter,
};
pub use validation::{ValidationContext, ValidationFailure, ValidationRules, Validator, Violation};

/// File name of the manifest at the root of every skill directory.
pub const MANIFEST_FILE_NAME: &str = "SKILL.md";
