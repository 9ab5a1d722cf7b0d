//! Structural errors raised while locating the frontmatter block.

use thiserror::Error;

/// The frontmatter fences are malformed, so no block can be read.
///
/// These failures are fatal: without a parsed block there is nothing to
/// validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrontmatterError {
    /// The first line of the file is not the `---` fence.
    #[error("missing frontmatter opening fence (---) on the first line")]
    MissingOpeningFence,

    /// No later line closes the block with the `---` fence.
    #[error("missing frontmatter closing fence (---)")]
    MissingClosingFence,
}

/// Result type alias using [`FrontmatterError`].
pub type Result<T> = std::result::Result<T, FrontmatterError>;
