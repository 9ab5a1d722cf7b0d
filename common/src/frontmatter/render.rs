//! Serialise a [`Frontmatter`] back into the fenced `key: value` format.
//!
//! Scalars and list items are quoted only when the parser would otherwise
//! read them back differently. Text that opens with `[` or closes with `]`
//! is always quoted so an inline-map entry never mistakes it for a list
//! boundary. Values containing commas or newlines cannot be represented and
//! do not survive a round trip.

use super::parser::{FENCE, unquote};
use super::value::{FlatValue, Frontmatter, FrontmatterValue};

/// Render `frontmatter` as a fenced block terminated by a newline.
///
/// # Examples
///
/// ```
/// use skillpack_common::frontmatter::{Frontmatter, FrontmatterValue, render_frontmatter};
///
/// let mut frontmatter = Frontmatter::new();
/// frontmatter.insert("name", FrontmatterValue::Scalar("pdf-tools".to_owned()));
/// frontmatter.insert(
///     "allowed-tools",
///     FrontmatterValue::List(vec!["read".to_owned(), "write".to_owned()]),
/// );
///
/// assert_eq!(
///     render_frontmatter(&frontmatter),
///     "---\nname: pdf-tools\nallowed-tools: [read, write]\n---\n"
/// );
/// ```
#[must_use]
pub fn render_frontmatter(frontmatter: &Frontmatter) -> String {
    let mut out = String::new();
    out.push_str(FENCE);
    out.push('\n');
    for (key, value) in frontmatter.iter() {
        out.push_str(key);
        out.push_str(": ");
        render_value(value, &mut out);
        out.push('\n');
    }
    out.push_str(FENCE);
    out.push('\n');
    out
}

fn render_value(value: &FrontmatterValue, out: &mut String) {
    match value {
        FrontmatterValue::Scalar(text) => render_scalar(text, out),
        FrontmatterValue::List(items) => render_list(items, out),
        FrontmatterValue::Map(entries) => {
            out.push('{');
            for (index, (key, entry)) in entries.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                out.push_str(key);
                out.push_str(": ");
                match entry {
                    FlatValue::Scalar(text) => render_scalar(text, out),
                    FlatValue::List(items) => render_list(items, out),
                }
            }
            out.push('}');
        }
    }
}

fn render_list(items: &[String], out: &mut String) {
    out.push('[');
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        if item.is_empty() {
            out.push_str("\"\"");
        } else {
            render_scalar(item, out);
        }
    }
    out.push(']');
}

fn render_scalar(text: &str, out: &mut String) {
    if needs_quotes(text) {
        out.push('"');
        out.push_str(text);
        out.push('"');
    } else {
        out.push_str(text);
    }
}

/// Return true when the parser would not read `text` back verbatim.
fn needs_quotes(text: &str) -> bool {
    let looks_enclosed = |open: char, close: char| {
        text.len() >= 2 && text.starts_with(open) && text.ends_with(close)
    };
    text.trim() != text
        || unquote(text) != text
        || text.starts_with('[')
        || text.ends_with(']')
        || looks_enclosed('{', '}')
}
