//! HTML utility functions.
//!
//! - `escape()`, `escape_attr()` - HTML entity escaping
//! - `element_id()` - id of the outermost element in a markup fragment

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Characters that require HTML escaping.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML special characters in text content.
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
///
/// # Example
/// ```ignore
/// assert_eq!(escape("<script>"), "&lt;script&gt;");
/// assert_eq!(escape("hello"), "hello"); // No allocation
/// ```
#[inline]
pub fn escape(s: &str) -> Cow<'_, str> {
    escape_with(s, &ESCAPE_CHARS)
}

/// Escape HTML attribute values.
///
/// Identical to `escape()` but semantically indicates attribute context.
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    escape_with(s, &ESCAPE_CHARS)
}

#[inline]
fn escape_with<'a>(s: &'a str, chars: &[char]) -> Cow<'a, str> {
    if !s.contains(chars) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

// =============================================================================
// Fragment inspection
// =============================================================================

static FIRST_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<[a-zA-Z][a-zA-Z0-9-]*[^>]*?[ \t\r\n]id[ \t\r\n]*=[ \t\r\n]*["']([^"']+)["']"#)
        .expect("static regex")
});

/// Id attribute of the first element in `html` that carries one.
pub fn element_id(html: &str) -> Option<&str> {
    FIRST_ID
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Id attributes of every element in `html`, in document order.
pub fn element_ids(html: &str) -> impl Iterator<Item = &str> {
    FIRST_ID
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
}
