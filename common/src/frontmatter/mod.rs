//! Frontmatter block parsing and rendering for `SKILL.md` manifests.
//!
//! The block is a restricted key/value format, not general YAML: no
//! comments, no multi-line scalars, no anchors, and at most one level of
//! nesting through inline maps.
//!
//! # Sub-modules
//!
//! - [`error`] - Structural fence errors (`FrontmatterError`).
//! - [`parser`] - Text to [`Frontmatter`] conversion.
//! - [`render`] - [`Frontmatter`] to text conversion.
//! - [`value`] - Parsed value types (`FrontmatterValue`, `FlatValue`).

pub mod error;
pub mod parser;
pub mod render;
pub mod value;

pub use error::FrontmatterError;
pub use parser::{FENCE, parse_frontmatter};
pub use render::render_frontmatter;
pub use value::{FlatValue, Frontmatter, FrontmatterValue, ValueKind};
