//! Skillpack library surface: shared configuration and re-exports of the
//! manifest parser and validator.

pub mod config;

pub use config::{CONFIG_FILE_NAME, ConfigError, DEFAULT_OUTPUT_DIR, SharedConfig, ValidationConfig};
pub use skillpack_common::{
    Frontmatter, FrontmatterError, FrontmatterValue, MANIFEST_FILE_NAME, ValidationFailure,
    ValidationRules, Validator, Violation, parse_frontmatter, render_frontmatter,
};
