//! Workspace-wide configuration loaded from `skillpack.toml`.
//!
//! Every setting is optional. Values are deserialised from `skillpack.toml`
//! when the file is present and fall back to the built-in defaults
//! otherwise, so a workspace without the file behaves exactly like one with
//! an empty file.

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::Deserialize;
use skillpack_common::validation::rules::MAX_MANIFEST_LINES;
use skillpack_common::{ValidationRules, Validator};
use std::io;
use thiserror::Error;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "skillpack.toml";

/// Output directory used when neither the CLI nor the config names one.
pub const DEFAULT_OUTPUT_DIR: &str = "dist";

/// Errors raised while reading or parsing `skillpack.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The file is not valid TOML or has unknown fields.
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

/// Shared configuration for the packager.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SharedConfig {
    /// Directory that receives packaged archives when the CLI does not
    /// name one.
    pub output_dir: Utf8PathBuf,
    /// Overrides for manifest validation.
    pub validation: ValidationConfig,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            output_dir: Utf8PathBuf::from(DEFAULT_OUTPUT_DIR),
            validation: ValidationConfig::default(),
        }
    }
}

impl SharedConfig {
    /// Parse configuration from TOML text.
    ///
    /// `path` is only used to label errors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML, mistyped values,
    /// or unknown fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use skillpack::SharedConfig;
    ///
    /// let config = SharedConfig::parse("output_dir = \"out\"\n", Utf8Path::new("skillpack.toml"))
    ///     .expect("valid configuration");
    /// assert_eq!(config.output_dir, "out");
    /// assert_eq!(config.validation.max_manifest_lines, 500);
    /// ```
    pub fn parse(source: &str, path: &Utf8Path) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|source_error| ConfigError::Parse {
            path: path.to_owned(),
            source: source_error,
        })
    }

    /// Load configuration from an explicit file, which must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when it is invalid.
    pub fn load_from(path: &Utf8Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|error| ConfigError::Read {
            path: path.to_owned(),
            source: error,
        })?;
        Self::parse(&source, path)
    }

    /// Load `skillpack.toml` from the current directory, or return defaults
    /// when absent.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but is unreadable or invalid.
    pub fn discover() -> Result<Self, ConfigError> {
        Self::discover_in(Utf8Path::new("."))
    }

    /// Load `skillpack.toml` from `dir`, or return defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but is unreadable or invalid.
    pub fn discover_in(dir: &Utf8Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        Self::load_with(&path, |candidate| match std::fs::read_to_string(candidate) {
            Ok(source) => Ok(Some(source)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!("no configuration at {candidate}; using defaults");
                Ok(None)
            }
            Err(error) => Err(error),
        })
    }

    /// Load configuration using the supplied reader.
    ///
    /// The reader returns `Ok(None)` when no file exists at `path`. This
    /// variant lets tests simulate the filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the reader fails and
    /// [`ConfigError::Parse`] when the text is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use skillpack::SharedConfig;
    ///
    /// let config = SharedConfig::load_with(Utf8Path::new("skillpack.toml"), |_| Ok(None))
    ///     .expect("defaults");
    /// assert_eq!(config, SharedConfig::default());
    /// ```
    pub fn load_with<F>(path: &Utf8Path, reader: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&Utf8Path) -> io::Result<Option<String>>,
    {
        match reader(path) {
            Ok(Some(source)) => Self::parse(&source, path),
            Ok(None) => Ok(Self::default()),
            Err(error) => Err(ConfigError::Read {
                path: path.to_owned(),
                source: error,
            }),
        }
    }

    /// Build the validation rules these settings describe.
    #[must_use]
    pub fn validation_rules(&self) -> ValidationRules {
        ValidationRules::default().with_max_manifest_lines(self.validation.max_manifest_lines)
    }

    /// Build a validator applying [`Self::validation_rules`].
    #[must_use]
    pub fn validator(&self) -> Validator {
        Validator::new(self.validation_rules())
    }
}

/// Settings that tune manifest validation.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    /// Maximum number of lines permitted in a `SKILL.md` file.
    pub max_manifest_lines: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_manifest_lines: MAX_MANIFEST_LINES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(source: &str) -> Result<SharedConfig, ConfigError> {
        SharedConfig::parse(source, Utf8Path::new(CONFIG_FILE_NAME))
    }

    #[rstest]
    fn defaults_match_the_built_in_rules() {
        let config = SharedConfig::default();

        assert_eq!(config.output_dir, Utf8PathBuf::from("dist"));
        assert_eq!(config.validation.max_manifest_lines, 500);
        assert_eq!(config.validation_rules(), ValidationRules::default());
    }

    #[rstest]
    fn empty_file_yields_defaults() {
        let config = parse("").expect("empty configuration should parse");
        assert_eq!(config, SharedConfig::default());
    }

    #[rstest]
    fn deserialises_overrides_from_toml() {
        let source = "output_dir = \"build/skills\"\n[validation]\nmax_manifest_lines = 120\n";

        let config = parse(source).expect("expected configuration to parse successfully");

        assert_eq!(config.output_dir, Utf8PathBuf::from("build/skills"));
        assert_eq!(config.validator().rules().max_manifest_lines, 120);
    }

    #[rstest]
    #[case::mistyped("[validation]\nmax_manifest_lines = \"a lot\"\n")]
    #[case::unknown_top_level("unexpected = true\n")]
    #[case::unknown_nested("[validation]\nreserved_words = []\n")]
    fn rejects_invalid_sources(#[case] source: &str) {
        let outcome = parse(source);
        assert!(
            matches!(outcome, Err(ConfigError::Parse { .. })),
            "expected a parse error for {source:?}"
        );
    }

    #[rstest]
    fn load_with_reports_reader_failures() {
        let outcome = SharedConfig::load_with(Utf8Path::new(CONFIG_FILE_NAME), |_| {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        });

        assert!(matches!(outcome, Err(ConfigError::Read { .. })));
    }

    #[rstest]
    fn discover_in_reads_file_when_present() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8Path::from_path(dir.path()).expect("utf-8 temp dir");
        std::fs::write(root.join(CONFIG_FILE_NAME), "output_dir = \"out\"\n")
            .expect("write config");

        let config = SharedConfig::discover_in(root).expect("config should load");

        assert_eq!(config.output_dir, Utf8PathBuf::from("out"));
    }

    #[rstest]
    fn discover_in_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8Path::from_path(dir.path()).expect("utf-8 temp dir");

        let config = SharedConfig::discover_in(root).expect("defaults");

        assert_eq!(config, SharedConfig::default());
    }

    #[rstest]
    fn load_from_requires_the_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8Path::from_path(dir.path()).expect("utf-8 temp dir");

        let outcome = SharedConfig::load_from(&root.join("missing.toml"));

        assert!(matches!(outcome, Err(ConfigError::Read { .. })));
    }
}
