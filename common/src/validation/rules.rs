//! Rule constants and text predicates used by the validator.

/// Top-level keys a manifest may declare.
pub const ALLOWED_KEYS: &[&str] = &[
    "name",
    "description",
    "license",
    "compatibility",
    "allowed-tools",
    "metadata",
];

/// Substrings that may not appear in a name or description, in any case.
pub const RESERVED_WORDS: &[&str] = &["anthropic", "claude"];

/// Words of which a description must contain at least one, in any case.
pub const TRIGGER_WORDS: &[&str] = &["use", "when"];

/// Maximum characters in a skill name.
pub const MAX_NAME_LENGTH: usize = 64;

/// Maximum characters in a skill description.
pub const MAX_DESCRIPTION_LENGTH: usize = 1024;

/// Maximum lines in the whole manifest file.
pub const MAX_MANIFEST_LINES: usize = 500;

/// The fixed rule set applied by a [`Validator`](super::Validator).
///
/// # Examples
///
/// ```
/// use skillpack_common::validation::ValidationRules;
///
/// let rules = ValidationRules::default().with_max_manifest_lines(200);
/// assert_eq!(rules.max_manifest_lines, 200);
/// assert_eq!(rules.max_name_length, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRules {
    /// Accepted top-level keys.
    pub allowed_keys: &'static [&'static str],
    /// Forbidden substrings for names and descriptions.
    pub reserved_words: &'static [&'static str],
    /// Words that mark a description as a usage trigger.
    pub trigger_words: &'static [&'static str],
    /// Character limit for `name`.
    pub max_name_length: usize,
    /// Character limit for `description`.
    pub max_description_length: usize,
    /// Line limit for the whole manifest file.
    pub max_manifest_lines: usize,
}

impl ValidationRules {
    /// Return a copy with a different manifest line limit.
    #[must_use]
    pub const fn with_max_manifest_lines(mut self, max_manifest_lines: usize) -> Self {
        self.max_manifest_lines = max_manifest_lines;
        self
    }
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            allowed_keys: ALLOWED_KEYS,
            reserved_words: RESERVED_WORDS,
            trigger_words: TRIGGER_WORDS,
            max_name_length: MAX_NAME_LENGTH,
            max_description_length: MAX_DESCRIPTION_LENGTH,
            max_manifest_lines: MAX_MANIFEST_LINES,
        }
    }
}

/// Return true for lowercase alphanumeric segments joined by single hyphens.
///
/// # Examples
///
/// ```
/// use skillpack_common::validation::rules::is_kebab_case;
///
/// assert!(is_kebab_case("pdf-tools-2"));
/// assert!(!is_kebab_case("PDF-tools"));
/// assert!(!is_kebab_case("pdf--tools"));
/// ```
#[must_use]
pub fn is_kebab_case(value: &str) -> bool {
    !value.is_empty()
        && value.split('-').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
}

/// Return true for strict `MAJOR.MINOR.PATCH` with all-digit components.
#[must_use]
pub fn is_semver(value: &str) -> bool {
    let components: Vec<&str> = value.split('.').collect();
    components.len() == 3
        && components
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}

/// Return the first reserved word contained in `value`, ignoring case.
#[must_use]
pub fn find_reserved_word(value: &str, reserved: &[&'static str]) -> Option<&'static str> {
    let lowered = value.to_lowercase();
    reserved
        .iter()
        .copied()
        .find(|word| lowered.contains(&word.to_lowercase()))
}

/// Return true when `value` contains any of `words` as a whole word,
/// ignoring case.
#[must_use]
pub fn contains_any_word(value: &str, words: &[&str]) -> bool {
    let lowered = value.to_lowercase();
    lowered
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| words.iter().any(|word| token == word.to_lowercase()))
}

/// Return the first `<tag>`-shaped substring in `value`.
///
/// A tag starts with `<` followed by a letter or `/` and runs to the next
/// `>` without another `<` in between. Comparisons such as `a < b` are not
/// tags.
///
/// # Examples
///
/// ```
/// use skillpack_common::validation::rules::find_markup_tag;
///
/// assert_eq!(find_markup_tag("Use <b>bold</b> text"), Some("<b>"));
/// assert_eq!(find_markup_tag("Use when a < b > c"), None);
/// ```
#[must_use]
pub fn find_markup_tag(value: &str) -> Option<&str> {
    let mut search_from = 0;
    while let Some(offset) = value.get(search_from..)?.find('<') {
        let start = search_from + offset;
        let rest = value.get(start + 1..)?;
        let opens_tag = rest
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '/');
        if opens_tag {
            if let Some(end) = rest.find(['<', '>']) {
                if rest.get(end..)?.starts_with('>') {
                    return value.get(start..start + end + 2);
                }
            }
        }
        search_from = start + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::single("pdf", true)]
    #[case::hyphenated("pdf-tools", true)]
    #[case::digits("v2-api-3", true)]
    #[case::empty("", false)]
    #[case::uppercase("Pdf-tools", false)]
    #[case::leading_hyphen("-pdf", false)]
    #[case::trailing_hyphen("pdf-", false)]
    #[case::double_hyphen("pdf--tools", false)]
    #[case::underscore("pdf_tools", false)]
    #[case::space("pdf tools", false)]
    #[case::non_ascii("pdf-outil\u{e9}", false)]
    fn kebab_case(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_kebab_case(value), expected);
    }

    #[rstest]
    #[case::plain("1.2.3", true)]
    #[case::zeros("0.0.0", true)]
    #[case::multi_digit("10.20.300", true)]
    #[case::two_parts("1.2", false)]
    #[case::four_parts("1.2.3.4", false)]
    #[case::prerelease("1.2.3-beta", false)]
    #[case::prefixed("v1.2.3", false)]
    #[case::empty_part("1..3", false)]
    #[case::empty("", false)]
    fn semver(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_semver(value), expected);
    }

    #[rstest]
    #[case::clean("pdf-tools", None)]
    #[case::lowercase("claude-helper", Some("claude"))]
    #[case::mixed_case("Built by Anthropic", Some("anthropic"))]
    #[case::embedded("myclaudetool", Some("claude"))]
    fn reserved_words(#[case] value: &str, #[case] expected: Option<&str>) {
        assert_eq!(find_reserved_word(value, RESERVED_WORDS), expected);
    }

    #[rstest]
    #[case::use_word("Use this to edit PDFs", true)]
    #[case::when_word("Helps WHEN editing PDFs", true)]
    #[case::punctuated("Editing PDFs (use-case: forms)", true)]
    #[case::substring_only("Because PDFs are useful", false)]
    #[case::topic_label("PDF editing", false)]
    fn trigger_words(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(contains_any_word(value, TRIGGER_WORDS), expected);
    }

    #[rstest]
    #[case::open_tag("Use <b>this</b>", Some("<b>"))]
    #[case::closing_tag("Use this</b>", Some("</b>"))]
    #[case::attributes("Use <a href=x>", Some("<a href=x>"))]
    #[case::comparison("Use when a < b", None)]
    #[case::unclosed("Use <b when ready", None)]
    #[case::nested_open("Use <<b>", Some("<b>"))]
    #[case::digit_start("Use <3 hearts>", None)]
    fn markup_tags(#[case] value: &str, #[case] expected: Option<&str>) {
        assert_eq!(find_markup_tag(value), expected);
    }
}
