//! User-facing report text for validate and package runs.

use crate::pipeline::{PackageOutcome, PackageOutput, ValidationOutcome};
use skillpack_common::ValidationFailure;

/// Heading printed when validation succeeds.
pub const PASSED: &str = "Validation passed";

/// Heading printed before the list of failures.
pub const FAILED: &str = "Validation failed:";

/// Render the report for a validation run.
///
/// # Examples
///
/// ```
/// use skillpack_common::{FrontmatterError, ValidationFailure};
/// use skillpack_packager::pipeline::ValidationOutcome;
/// use skillpack_packager::report::validation_report;
///
/// let outcome = ValidationOutcome::Invalid(ValidationFailure::Structural(
///     FrontmatterError::MissingClosingFence,
/// ));
/// assert_eq!(
///     validation_report(&outcome),
///     "Validation failed:\n- missing frontmatter closing fence (---)\n",
/// );
/// ```
#[must_use]
pub fn validation_report(outcome: &ValidationOutcome) -> String {
    match outcome {
        ValidationOutcome::Valid(_) => format!("{PASSED}\n"),
        ValidationOutcome::Invalid(failure) => failure_report(failure),
    }
}

/// Render the report for a package run.
#[must_use]
pub fn package_report(outcome: &PackageOutcome) -> String {
    match outcome {
        PackageOutcome::Packaged(output) => packaged_report(output),
        PackageOutcome::Invalid(failure) => failure_report(failure),
    }
}

fn packaged_report(output: &PackageOutput) -> String {
    format!("Packaged skill: {}\n", output.archive_path)
}

fn failure_report(failure: &ValidationFailure) -> String {
    let lines: String = failure
        .messages()
        .into_iter()
        .map(|message| format!("- {message}\n"))
        .collect();
    format!("{FAILED}\n{lines}")
}
