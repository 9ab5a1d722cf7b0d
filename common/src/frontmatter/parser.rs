//! Restricted `key: value` parser for the frontmatter block.
//!
//! The block opens with a `---` line on the first line of the file and
//! closes at the next `---` line. Each line in between is split on its first
//! colon. Raw values are classified in order as an inline list, an inline
//! map, or a scalar. Inline maps only hold lists and scalars.
//!
//! Comma splitting does not track quotes, so a quoted item that contains a
//! comma is split in two. This is part of the format, not an oversight.
//! Inside an inline map only a value that opens with `[` is read as a list;
//! brackets anywhere else are plain text.

use super::error::{FrontmatterError, Result};
use super::value::{FlatValue, Frontmatter, FrontmatterValue};
use log::debug;

/// The delimiter line that opens and closes the frontmatter block.
pub const FENCE: &str = "---";

/// Quote characters stripped from scalars and list items.
const QUOTES: [char; 2] = ['"', '\''];

/// Parse the frontmatter block at the top of `text`.
///
/// Only the lines strictly between the fences are read; the body after the
/// closing fence is ignored. Blank lines and lines without a colon are
/// skipped.
///
/// # Errors
///
/// Returns [`FrontmatterError::MissingOpeningFence`] when the first line is
/// not a fence, and [`FrontmatterError::MissingClosingFence`] when no later
/// line is.
///
/// # Examples
///
/// ```
/// use skillpack_common::frontmatter::{FrontmatterValue, parse_frontmatter};
///
/// let text = "---\nname: pdf-tools\nallowed-tools: [read, write]\n---\n# PDF tools\n";
/// let frontmatter = parse_frontmatter(text).expect("valid frontmatter");
///
/// assert_eq!(
///     frontmatter.get("name").and_then(FrontmatterValue::as_scalar),
///     Some("pdf-tools")
/// );
/// assert_eq!(
///     frontmatter.get("allowed-tools").and_then(FrontmatterValue::as_list),
///     Some(&["read".to_owned(), "write".to_owned()][..])
/// );
/// ```
pub fn parse_frontmatter(text: &str) -> Result<Frontmatter> {
    let mut lines = text.lines();
    if !lines.next().is_some_and(is_fence) {
        return Err(FrontmatterError::MissingOpeningFence);
    }

    let mut frontmatter = Frontmatter::new();
    for line in lines {
        if is_fence(line) {
            return Ok(frontmatter);
        }
        let Some((key, raw_value)) = line.split_once(':') else {
            if !line.trim().is_empty() {
                debug!("ignoring frontmatter line without a colon: {line:?}");
            }
            continue;
        };
        frontmatter.insert(key.trim(), classify(raw_value.trim()));
    }

    Err(FrontmatterError::MissingClosingFence)
}

fn is_fence(line: &str) -> bool {
    line.trim() == FENCE
}

/// Classify a trimmed top-level value.
fn classify(raw: &str) -> FrontmatterValue {
    if let Some(interior) = enclosed(raw, '[', ']') {
        FrontmatterValue::List(parse_list(interior))
    } else if let Some(interior) = enclosed(raw, '{', '}') {
        FrontmatterValue::Map(parse_map(interior))
    } else {
        FrontmatterValue::Scalar(unquote(raw).to_owned())
    }
}

/// Classify a trimmed map value. Maps are never recognised here.
fn classify_flat(raw: &str) -> FlatValue {
    match enclosed(raw, '[', ']') {
        Some(interior) => FlatValue::List(parse_list(interior)),
        None => FlatValue::Scalar(unquote(raw).to_owned()),
    }
}

fn enclosed(raw: &str, open: char, close: char) -> Option<&str> {
    raw.strip_prefix(open)?.strip_suffix(close)
}

fn parse_list(interior: &str) -> Vec<String> {
    if interior.trim().is_empty() {
        return Vec::new();
    }
    interior
        .split(',')
        .map(|item| unquote(item.trim()).to_owned())
        .collect()
}

fn parse_map(interior: &str) -> Vec<(String, FlatValue)> {
    let mut entries: Vec<(String, FlatValue)> = Vec::new();
    for entry in split_map_entries(interior) {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let Some((key, raw_value)) = entry.split_once(':') else {
            debug!("ignoring inline map entry without a colon: {entry:?}");
            continue;
        };
        let key = key.trim();
        let value = classify_flat(raw_value.trim());
        match entries.iter_mut().find(|(existing, _)| existing == key) {
            Some(slot) => slot.1 = value,
            None => entries.push((key.to_owned(), value)),
        }
    }
    entries
}

/// Split an inline map into its entries.
///
/// An entry ends at the next comma unless its value opens with `[`. Such a
/// value runs to the first `]` followed by a comma or the end of the map,
/// so commas inside a list do not split the entry. When no such `]`
/// exists the value is a scalar and ends at the next comma.
fn split_map_entries(interior: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = interior;
    loop {
        let end = entry_end(rest);
        parts.push(&rest[..end]);
        let Some(next) = rest.get(end + 1..) else {
            return parts;
        };
        rest = next;
    }
}

/// Byte index of the comma closing the first entry of `rest`, or its length.
fn entry_end(rest: &str) -> usize {
    let next_comma = |from: usize| rest[from..].find(',').map_or(rest.len(), |at| from + at);
    let Some(colon) = rest.find(':').filter(|&at| at < next_comma(0)) else {
        return next_comma(0);
    };
    let value = &rest[colon + 1..];
    let list_start = colon + 1 + (value.len() - value.trim_start().len());
    if !rest[list_start..].starts_with('[') {
        return next_comma(colon);
    }
    match list_close(&rest[list_start..]) {
        Some(close) => next_comma(list_start + close),
        None => next_comma(colon),
    }
}

/// Index just past the `]` that closes a map-entry list starting at `value`.
fn list_close(value: &str) -> Option<usize> {
    value
        .match_indices(']')
        .map(|(at, _)| at + 1)
        .find(|&end| {
            let after = value[end..].trim_start();
            after.is_empty() || after.starts_with(',')
        })
}

/// Strip one matching pair of surrounding quotes.
pub(super) fn unquote(value: &str) -> &str {
    QUOTES
        .iter()
        .find_map(|&quote| value.strip_prefix(quote)?.strip_suffix(quote))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn scalar(text: &str) -> FrontmatterValue {
        FrontmatterValue::Scalar(text.to_owned())
    }

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|&item| item.to_owned()).collect()
    }

    fn parse_value(raw: &str) -> FrontmatterValue {
        let text = format!("---\nkey: {raw}\n---\n");
        let frontmatter = parse_frontmatter(&text).expect("frontmatter should parse");
        frontmatter.get("key").cloned().expect("key should be present")
    }

    #[test]
    fn parses_keys_in_source_order() {
        let frontmatter =
            parse_frontmatter("---\nname: demo\ndescription: Use it\nlicense: MIT\n---\nbody")
                .expect("frontmatter should parse");

        assert_eq!(
            frontmatter.keys().collect::<Vec<_>>(),
            ["name", "description", "license"]
        );
        assert_eq!(frontmatter.get("license"), Some(&scalar("MIT")));
    }

    #[rstest]
    #[case::empty("")]
    #[case::body_only("# Title\nname: demo\n")]
    #[case::indented_fence("  x\n---\n")]
    #[case::four_dashes("----\nname: demo\n----\n")]
    fn rejects_missing_opening_fence(#[case] text: &str) {
        assert_eq!(
            parse_frontmatter(text),
            Err(FrontmatterError::MissingOpeningFence)
        );
    }

    #[rstest]
    #[case::no_close("---\nname: demo\n")]
    #[case::fence_only("---")]
    #[case::close_with_suffix("---\nname: demo\n--- trailing\n")]
    fn rejects_missing_closing_fence(#[case] text: &str) {
        assert_eq!(
            parse_frontmatter(text),
            Err(FrontmatterError::MissingClosingFence)
        );
    }

    #[test]
    fn tolerates_crlf_line_endings() {
        let frontmatter = parse_frontmatter("---\r\nname: demo\r\n---\r\nbody\r\n")
            .expect("frontmatter should parse");
        assert_eq!(frontmatter.get("name"), Some(&scalar("demo")));
    }

    #[test]
    fn empty_block_parses_to_empty_frontmatter() {
        let frontmatter = parse_frontmatter("---\n---\n").expect("frontmatter should parse");
        assert!(frontmatter.is_empty());
    }

    #[test]
    fn skips_blank_lines_and_lines_without_colons() {
        let frontmatter = parse_frontmatter("---\n\nname: demo\n  - stray item\n---\n")
            .expect("frontmatter should parse");
        assert_eq!(frontmatter.keys().collect::<Vec<_>>(), ["name"]);
    }

    #[test]
    fn lines_after_closing_fence_are_ignored() {
        let frontmatter = parse_frontmatter("---\nname: demo\n---\nlicense: MIT\n")
            .expect("frontmatter should parse");
        assert!(!frontmatter.contains_key("license"));
    }

    #[test]
    fn value_splits_on_first_colon_only() {
        assert_eq!(
            parse_value("Use when: parsing URLs like http://x"),
            scalar("Use when: parsing URLs like http://x")
        );
    }

    #[rstest]
    #[case::bare("plain text", "plain text")]
    #[case::double_quoted("\"quoted\"", "quoted")]
    #[case::single_quoted("'quoted'", "quoted")]
    #[case::mismatched("\"half'", "\"half'")]
    #[case::single_quote_char("\"", "\"")]
    #[case::only_one_pair_stripped("\"\"twice\"\"", "\"twice\"")]
    #[case::empty("", "")]
    #[case::lone_bracket("[", "[")]
    fn classifies_scalars(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(parse_value(raw), scalar(expected));
    }

    #[rstest]
    #[case::simple("[read, write]", &["read", "write"])]
    #[case::quoted("[\"read\", 'write']", &["read", "write"])]
    #[case::empty("[]", &[])]
    #[case::blank("[   ]", &[])]
    #[case::empty_item("[a, , b]", &["a", "", "b"])]
    #[case::single("[only]", &["only"])]
    fn classifies_lists(#[case] raw: &str, #[case] expected: &[&str]) {
        assert_eq!(parse_value(raw), FrontmatterValue::List(list(expected)));
    }

    #[test]
    fn quoted_list_item_with_comma_is_split() {
        assert_eq!(
            parse_value("[\"a, b\", c]"),
            FrontmatterValue::List(list(&["\"a", "b\"", "c"]))
        );
    }

    #[test]
    fn classifies_inline_map_with_nested_list() {
        assert_eq!(
            parse_value("{version: \"0.1.0\", tags: [pdf, forms]}"),
            FrontmatterValue::Map(vec![
                ("version".to_owned(), FlatValue::Scalar("0.1.0".to_owned())),
                ("tags".to_owned(), FlatValue::List(list(&["pdf", "forms"]))),
            ])
        );
    }

    #[test]
    fn inline_map_never_nests_maps() {
        assert_eq!(
            parse_value("{outer: {inner: x}}"),
            FrontmatterValue::Map(vec![(
                "outer".to_owned(),
                FlatValue::Scalar("{inner: x}".to_owned())
            )])
        );
    }

    #[rstest]
    #[case::empty("{}")]
    #[case::trailing_comma("{, }")]
    #[case::no_colon("{orphan}")]
    fn inline_map_skips_empty_and_colonless_entries(#[case] raw: &str) {
        assert_eq!(parse_value(raw), FrontmatterValue::Map(Vec::new()));
    }

    #[test]
    fn inline_map_repeated_key_keeps_last_value() {
        assert_eq!(
            parse_value("{version: 1.0.0, version: 2.0.0}"),
            FrontmatterValue::Map(vec![(
                "version".to_owned(),
                FlatValue::Scalar("2.0.0".to_owned())
            )])
        );
    }

    #[rstest]
    #[case::list_value("a: [1, 2], b: 3", &["a: [1, 2]", " b: 3"])]
    #[case::stray_bracket("note: v1[beta, version: 1.2", &["note: v1[beta", " version: 1.2"])]
    #[case::unclosed_list("note: [beta, version: 1.2", &["note: [beta", " version: 1.2"])]
    #[case::bracket_inside_item("tags: [a]b, c], d: 1", &["tags: [a]b, c]", " d: 1"])]
    #[case::colonless_entry("orphan, a: [1, 2]", &["orphan", " a: [1, 2]"])]
    #[case::trailing_comma("a: 1,", &["a: 1", ""])]
    fn map_entries_split_outside_lists(#[case] interior: &str, #[case] expected: &[&str]) {
        assert_eq!(split_map_entries(interior), expected);
    }

    #[test]
    fn stray_bracket_does_not_swallow_later_entries() {
        assert_eq!(
            parse_value("{note: v1[beta, version: 1.2}"),
            FrontmatterValue::Map(vec![
                ("note".to_owned(), FlatValue::Scalar("v1[beta".to_owned())),
                ("version".to_owned(), FlatValue::Scalar("1.2".to_owned())),
            ])
        );
    }
}
