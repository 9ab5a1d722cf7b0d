//! Rule-based schema validation for parsed frontmatter.
//!
//! The validator never reads the filesystem. Callers supply the containing
//! directory name and the manifest's line count through a
//! [`ValidationContext`]. Every rule runs on every call; one violation never
//! hides an independent one.
//!
//! # Sub-modules
//!
//! - [`rules`] - Rule constants, [`ValidationRules`], and text predicates.
//! - [`violation`] - The [`Violation`] type naming each broken rule.

pub mod rules;
pub mod violation;

pub use rules::ValidationRules;
pub use violation::Violation;

use crate::frontmatter::{
    FlatValue, Frontmatter, FrontmatterError, FrontmatterValue, ValueKind, parse_frontmatter,
};
use log::debug;
use rules::{contains_any_word, find_markup_tag, find_reserved_word, is_kebab_case, is_semver};

/// Filesystem facts the validator needs but must not gather itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationContext {
    /// Name of the directory that contains the manifest.
    pub directory_name: String,
    /// Line count of the whole manifest file.
    pub line_count: usize,
}

impl ValidationContext {
    /// Create a context from explicit values.
    #[must_use]
    pub fn new(directory_name: impl Into<String>, line_count: usize) -> Self {
        Self {
            directory_name: directory_name.into(),
            line_count,
        }
    }

    /// Create a context for the full manifest `text`.
    #[must_use]
    pub fn for_manifest(directory_name: impl Into<String>, text: &str) -> Self {
        Self::new(directory_name, text.lines().count())
    }
}

/// Why a manifest was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    /// The frontmatter fences are malformed; no schema rules ran.
    Structural(FrontmatterError),
    /// One or more schema rules failed, in rule order.
    Schema(Vec<Violation>),
}

impl ValidationFailure {
    /// Return one human-readable message per failure, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Structural(error) => vec![error.to_string()],
            Self::Schema(violations) => violations.iter().map(ToString::to_string).collect(),
        }
    }
}

impl From<FrontmatterError> for ValidationFailure {
    fn from(error: FrontmatterError) -> Self {
        Self::Structural(error)
    }
}

/// Applies a [`ValidationRules`] set to parsed frontmatter.
///
/// # Examples
///
/// ```
/// use skillpack_common::validation::Validator;
///
/// let text = "---\nname: pdf-tools\ndescription: Use when filling PDF forms.\n---\n";
/// let validator = Validator::default();
///
/// let frontmatter = validator
///     .check(text, "pdf-tools")
///     .expect("manifest should be valid");
/// assert_eq!(frontmatter.len(), 2);
///
/// let failure = validator.check(text, "other-dir").expect_err("name mismatch");
/// assert_eq!(failure.messages().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: ValidationRules,
}

impl Validator {
    /// Create a validator owning `rules`.
    #[must_use]
    pub const fn new(rules: ValidationRules) -> Self {
        Self { rules }
    }

    /// Return the rules this validator applies.
    #[must_use]
    pub const fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Parse `text` and validate the result against `directory_name`.
    ///
    /// The line count is taken from the whole of `text`, body included.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFailure::Structural`] when the fences are
    /// malformed, or [`ValidationFailure::Schema`] with every violation
    /// when any rule fails.
    pub fn check(
        &self,
        text: &str,
        directory_name: &str,
    ) -> Result<Frontmatter, ValidationFailure> {
        let frontmatter = parse_frontmatter(text)?;
        let context = ValidationContext::for_manifest(directory_name, text);
        let violations = self.validate(&frontmatter, &context);
        if violations.is_empty() {
            Ok(frontmatter)
        } else {
            Err(ValidationFailure::Schema(violations))
        }
    }

    /// Apply every rule and return the violations in rule order.
    ///
    /// An empty vector means the frontmatter is valid.
    #[must_use]
    pub fn validate(
        &self,
        frontmatter: &Frontmatter,
        context: &ValidationContext,
    ) -> Vec<Violation> {
        let mut violations = Vec::new();

        self.check_keys(frontmatter, &mut violations);
        self.check_name(frontmatter.get("name"), context, &mut violations);
        self.check_description(frontmatter.get("description"), &mut violations);
        check_compatibility(frontmatter.get("compatibility"), &mut violations);
        check_allowed_tools(frontmatter.get("allowed-tools"), &mut violations);
        check_metadata(frontmatter.get("metadata"), &mut violations);

        if context.line_count > self.rules.max_manifest_lines {
            violations.push(Violation::TooManyLines {
                count: context.line_count,
                max: self.rules.max_manifest_lines,
            });
        }

        debug!(
            "validated {} frontmatter keys for {}: {} violation(s)",
            frontmatter.len(),
            context.directory_name,
            violations.len()
        );
        violations
    }

    fn check_keys(&self, frontmatter: &Frontmatter, violations: &mut Vec<Violation>) {
        violations.extend(
            frontmatter
                .keys()
                .filter(|key| !self.rules.allowed_keys.iter().any(|allowed| allowed == key))
                .map(|key| Violation::UnrecognisedKey {
                    key: key.to_owned(),
                }),
        );
    }

    fn check_name(
        &self,
        value: Option<&FrontmatterValue>,
        context: &ValidationContext,
        violations: &mut Vec<Violation>,
    ) {
        let Some(name) = required_scalar("name", value, violations) else {
            return;
        };

        let length = name.chars().count();
        if length > self.rules.max_name_length {
            violations.push(Violation::TooLong {
                field: "name",
                max: self.rules.max_name_length,
                length,
            });
        }
        if !is_kebab_case(name) {
            violations.push(Violation::NameNotKebabCase {
                name: name.to_owned(),
            });
        }
        if name != context.directory_name {
            violations.push(Violation::NameDirectoryMismatch {
                name: name.to_owned(),
                directory: context.directory_name.clone(),
            });
        }
        if let Some(word) = find_reserved_word(name, self.rules.reserved_words) {
            violations.push(Violation::ReservedWord {
                field: "name",
                word,
            });
        }
    }

    fn check_description(&self, value: Option<&FrontmatterValue>, violations: &mut Vec<Violation>) {
        let Some(description) = required_scalar("description", value, violations) else {
            return;
        };

        let length = description.chars().count();
        if length > self.rules.max_description_length {
            violations.push(Violation::TooLong {
                field: "description",
                max: self.rules.max_description_length,
                length,
            });
        }
        if let Some(word) = find_reserved_word(description, self.rules.reserved_words) {
            violations.push(Violation::ReservedWord {
                field: "description",
                word,
            });
        }
        if let Some(tag) = find_markup_tag(description) {
            violations.push(Violation::MarkupTag {
                tag: tag.to_owned(),
            });
        }
        if !contains_any_word(description, self.rules.trigger_words) {
            violations.push(Violation::MissingTrigger {
                expected: self.rules.trigger_words.join(", "),
            });
        }
    }
}

/// Return the non-empty scalar in `value`, recording why it is unusable
/// otherwise.
fn required_scalar<'a>(
    field: &'static str,
    value: Option<&'a FrontmatterValue>,
    violations: &mut Vec<Violation>,
) -> Option<&'a str> {
    match value {
        Some(FrontmatterValue::Scalar(text)) if !text.is_empty() => Some(text),
        None | Some(FrontmatterValue::Scalar(_)) => {
            violations.push(Violation::MissingField { field });
            None
        }
        Some(other) => {
            violations.push(Violation::WrongType {
                field,
                expected: ValueKind::Scalar,
                found: other.kind(),
            });
            None
        }
    }
}

fn check_compatibility(value: Option<&FrontmatterValue>, violations: &mut Vec<Violation>) {
    if let Some(value) = value.filter(|value| value.kind() != ValueKind::Scalar) {
        violations.push(Violation::WrongType {
            field: "compatibility",
            expected: ValueKind::Scalar,
            found: value.kind(),
        });
    }
}

fn check_allowed_tools(value: Option<&FrontmatterValue>, violations: &mut Vec<Violation>) {
    match value {
        None => {}
        Some(FrontmatterValue::List(items)) => {
            if let Some((position, item)) = first_non_kebab(items) {
                violations.push(Violation::InvalidTool {
                    position,
                    item: item.to_owned(),
                });
            }
        }
        Some(other) => violations.push(Violation::WrongType {
            field: "allowed-tools",
            expected: ValueKind::List,
            found: other.kind(),
        }),
    }
}

fn check_metadata(value: Option<&FrontmatterValue>, violations: &mut Vec<Violation>) {
    let Some(value) = value else {
        return;
    };
    if value.kind() != ValueKind::Map {
        violations.push(Violation::WrongType {
            field: "metadata",
            expected: ValueKind::Map,
            found: value.kind(),
        });
        return;
    }

    match value.map_get("version") {
        None => {}
        Some(FlatValue::Scalar(version)) => {
            if !is_semver(version) {
                violations.push(Violation::InvalidVersion {
                    version: version.clone(),
                });
            }
        }
        Some(other) => violations.push(Violation::WrongType {
            field: "metadata.version",
            expected: ValueKind::Scalar,
            found: other.kind(),
        }),
    }

    match value.map_get("tags") {
        None => {}
        Some(FlatValue::List(tags)) => {
            if let Some((position, tag)) = first_non_kebab(tags) {
                violations.push(Violation::InvalidTag {
                    position,
                    tag: tag.to_owned(),
                });
            }
        }
        Some(other) => violations.push(Violation::WrongType {
            field: "metadata.tags",
            expected: ValueKind::List,
            found: other.kind(),
        }),
    }
}

/// Return the one-based position and text of the first non-kebab item.
fn first_non_kebab(items: &[String]) -> Option<(usize, &str)> {
    items
        .iter()
        .enumerate()
        .find(|(_, item)| !is_kebab_case(item))
        .map(|(index, item)| (index + 1, item.as_str()))
}
