//! Validate and package pipeline.
//!
//! Both runs read `SKILL.md`, parse it, and validate it against the
//! directory that holds it. Packaging continues to the archive only when
//! validation found nothing; a failed validation never touches the output
//! directory.

use crate::archive::{Sha256Digest, compute_sha256, write_archive};
use crate::error::{PackagerError, Result};
use crate::scanner::scan_skill_excluding;
use crate::state::{PackageRun, PackageState};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use skillpack::SharedConfig;
use skillpack_common::{Frontmatter, MANIFEST_FILE_NAME, ValidationFailure, Validator};
use std::fs;

/// Verdict of a validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The manifest satisfies every rule.
    Valid(Frontmatter),
    /// The manifest is malformed or breaks one or more rules.
    Invalid(ValidationFailure),
}

impl ValidationOutcome {
    /// Return true when the manifest passed.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Return the ordered failure messages, empty when valid.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Valid(_) => Vec::new(),
            Self::Invalid(failure) => failure.messages(),
        }
    }
}

/// Details of a written archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOutput {
    /// Final path of the archive.
    pub archive_path: Utf8PathBuf,
    /// SHA-256 digest of the archive bytes.
    pub sha256: Sha256Digest,
    /// Number of files stored in the archive.
    pub file_count: usize,
}

/// Verdict of a package run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageOutcome {
    /// Validation passed and the archive was written.
    Packaged(PackageOutput),
    /// Validation failed; nothing was written.
    Invalid(ValidationFailure),
}

/// Runs validation and packaging with a fixed validator.
#[derive(Debug, Clone, Default)]
pub struct Packager {
    validator: Validator,
}

impl Packager {
    /// Create a packager applying `validator`.
    #[must_use]
    pub const fn new(validator: Validator) -> Self {
        Self { validator }
    }

    /// Create a packager using the rules described by `config`.
    #[must_use]
    pub fn from_config(config: &SharedConfig) -> Self {
        Self::new(config.validator())
    }

    /// Validate the skill directory at `skill_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::ManifestRead`] when `SKILL.md` is missing or
    /// unreadable and [`PackagerError::InvalidSkillPath`] when the directory
    /// has no usable name. Rule violations are not errors; they are returned
    /// as [`ValidationOutcome::Invalid`].
    pub fn validate_skill(&self, skill_dir: &Utf8Path) -> Result<ValidationOutcome> {
        let mut run = PackageRun::new(skill_dir.as_str());
        let result = self.validate_with_run(skill_dir, &mut run);
        if result.is_err() {
            run.fail();
        }
        result
    }

    /// Validate `skill_dir` and, when it passes, write
    /// `<output_dir>/<name>.zip`.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::validate_skill`], plus
    /// [`PackagerError::Scan`] and [`PackagerError::Archive`] when the tree
    /// cannot be read or the archive cannot be written. No archive exists
    /// at the final path after any error or failed validation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use camino::Utf8Path;
    /// use skillpack_packager::pipeline::{PackageOutcome, Packager};
    ///
    /// let outcome = Packager::default()
    ///     .package_skill(Utf8Path::new("skills/pdf-tools"), Utf8Path::new("dist"))?;
    /// if let PackageOutcome::Packaged(output) = outcome {
    ///     println!("{} ({})", output.archive_path, output.sha256);
    /// }
    /// # Ok::<(), skillpack_packager::error::PackagerError>(())
    /// ```
    pub fn package_skill(
        &self,
        skill_dir: &Utf8Path,
        output_dir: &Utf8Path,
    ) -> Result<PackageOutcome> {
        let mut run = PackageRun::new(skill_dir.as_str());
        let result = self.run_package(skill_dir, output_dir, &mut run);
        if result.is_err() {
            run.fail();
        }
        result
    }

    /// Validate and settle a failed verdict in [`PackageState::Failed`].
    fn validate_with_run(
        &self,
        skill_dir: &Utf8Path,
        run: &mut PackageRun,
    ) -> Result<ValidationOutcome> {
        let outcome = self.run_validation(skill_dir, run)?;
        if !outcome.is_valid() {
            run.advance(PackageState::Failed)?;
        }
        Ok(outcome)
    }

    fn run_validation(
        &self,
        skill_dir: &Utf8Path,
        run: &mut PackageRun,
    ) -> Result<ValidationOutcome> {
        run.advance(PackageState::Validating)?;

        let manifest_path = skill_dir.join(MANIFEST_FILE_NAME);
        let text =
            fs::read_to_string(&manifest_path).map_err(|source| PackagerError::ManifestRead {
                path: manifest_path.clone(),
                source,
            })?;
        let directory_name = skill_directory_name(skill_dir)?;
        debug!(
            "read {manifest_path} ({} lines) for directory {directory_name}",
            text.lines().count()
        );

        match self.validator.check(&text, &directory_name) {
            Ok(frontmatter) => {
                run.advance(PackageState::Valid)?;
                Ok(ValidationOutcome::Valid(frontmatter))
            }
            Err(failure) => {
                run.advance(PackageState::Invalid)?;
                info!("{skill_dir} failed validation");
                Ok(ValidationOutcome::Invalid(failure))
            }
        }
    }

    fn run_package(
        &self,
        skill_dir: &Utf8Path,
        output_dir: &Utf8Path,
        run: &mut PackageRun,
    ) -> Result<PackageOutcome> {
        if let ValidationOutcome::Invalid(failure) = self.validate_with_run(skill_dir, run)? {
            return Ok(PackageOutcome::Invalid(failure));
        }

        run.advance(PackageState::Archiving)?;
        let package = scan_skill_excluding(skill_dir, output_dir)?;
        let archive_path = write_archive(&package, output_dir)?;
        let sha256 = compute_sha256(&archive_path)?;
        run.advance(PackageState::Done)?;

        info!("packaged {} as {archive_path} (sha256 {sha256})", package.name());
        Ok(PackageOutcome::Packaged(PackageOutput {
            archive_path,
            sha256,
            file_count: package.files().len(),
        }))
    }
}

/// Validate `skill_dir` with the default rules.
///
/// # Errors
///
/// See [`Packager::validate_skill`].
pub fn validate_skill(skill_dir: &Utf8Path) -> Result<ValidationOutcome> {
    Packager::default().validate_skill(skill_dir)
}

/// Validate and package `skill_dir` with the default rules.
///
/// # Errors
///
/// See [`Packager::package_skill`].
pub fn package_skill(skill_dir: &Utf8Path, output_dir: &Utf8Path) -> Result<PackageOutcome> {
    Packager::default().package_skill(skill_dir, output_dir)
}

/// Return the final component of the resolved skill directory.
fn skill_directory_name(skill_dir: &Utf8Path) -> Result<String> {
    let invalid = |reason: String| PackagerError::InvalidSkillPath {
        path: skill_dir.to_owned(),
        reason,
    };
    let resolved = skill_dir
        .canonicalize_utf8()
        .map_err(|error| invalid(error.to_string()))?;
    resolved
        .file_name()
        .map(str::to_owned)
        .ok_or_else(|| invalid("path has no directory name".to_owned()))
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
