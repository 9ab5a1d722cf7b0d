//! Skill packager library.
//!
//! This crate validates `SKILL.md` manifests and writes valid skill
//! directories into deterministic zip archives. It is used by the
//! `skillpack` CLI binary and can be consumed programmatically for testing
//! or custom packaging workflows.
//!
//! # Modules
//!
//! - [`archive`] - Atomic zip writing and SHA-256 digests
//! - [`cli`] - Command-line argument definitions
//! - [`error`] - Fatal error types for validate and package runs
//! - [`pipeline`] - Validate and package orchestration
//! - [`report`] - User-facing report text
//! - [`scanner`] - Recursive skill directory listing with symlink policy
//! - [`state`] - Run lifecycle state machine

pub mod archive;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod scanner;
pub mod state;

pub use pipeline::{
    PackageOutcome, PackageOutput, Packager, ValidationOutcome, package_skill, validate_skill,
};
