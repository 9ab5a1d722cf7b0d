//! CLI argument definitions for the `skillpack` binary.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use skillpack::SharedConfig;

/// Validate and package agent skill directories.
#[derive(Parser, Debug)]
#[command(name = "skillpack")]
#[command(version, about)]
#[command(long_about = concat!(
    "Validate and package agent skill directories.\n\n",
    "A skill is a directory holding a SKILL.md manifest and any bundled ",
    "resources. The manifest opens with a frontmatter block fenced by `---` ",
    "lines. `validate` checks that block against the manifest schema; ",
    "`package` validates first and, only when nothing is wrong, writes ",
    "<OUTPUT_DIR>/<skill-name>.zip containing the whole directory.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Check a skill:\n",
    "    $ skillpack validate skills/pdf-tools\n\n",
    "  Package into ./dist:\n",
    "    $ skillpack package skills/pdf-tools\n\n",
    "  Package into a chosen directory:\n",
    "    $ skillpack package skills/pdf-tools build/skills\n\n",
    "CONFIGURATION:\n",
    "  skillpack.toml in the current directory is read when present:\n",
    "    output_dir = \"dist\"\n",
    "    [validation]\n",
    "    max_manifest_lines = 500\n",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Read configuration from FILE instead of ./skillpack.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbosity")]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check a skill manifest against the schema.
    Validate(ValidateArgs),

    /// Validate a skill and write it to a zip archive.
    Package(PackageArgs),
}

/// Arguments for the validate command.
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Skill directory containing SKILL.md.
    #[arg(value_name = "SKILL_PATH")]
    pub skill_path: Utf8PathBuf,
}

/// Arguments for the package command.
#[derive(Args, Debug, Clone)]
pub struct PackageArgs {
    /// Skill directory containing SKILL.md.
    #[arg(value_name = "SKILL_PATH")]
    pub skill_path: Utf8PathBuf,

    /// Directory that receives the archive [default: configured output_dir, or dist].
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<Utf8PathBuf>,
}

impl PackageArgs {
    /// Return the output directory, falling back to the configured one.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8PathBuf;
    /// use skillpack::SharedConfig;
    /// use skillpack_packager::cli::PackageArgs;
    ///
    /// let args = PackageArgs {
    ///     skill_path: Utf8PathBuf::from("skills/pdf-tools"),
    ///     output_dir: None,
    /// };
    /// assert_eq!(args.output_dir_or(&SharedConfig::default()), "dist");
    /// ```
    #[must_use]
    pub fn output_dir_or<'a>(&'a self, config: &'a SharedConfig) -> &'a Utf8Path {
        self.output_dir.as_deref().unwrap_or(&config.output_dir)
    }
}

impl Cli {
    /// Return the log level implied by `-q` and `-v`.
    ///
    /// Quiet runs log errors only; the default is warnings, and each `-v`
    /// raises the level by one step up to trace.
    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
