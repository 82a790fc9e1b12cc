//! Inline markup handling for mod display names.
//!
//! Names arrive pre-sanitized and may contain simple tags such as `<b>` or
//! `<span class="...">`. Matching and sorting work on the plain text.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<>]*>").expect("tag pattern is valid"));

/// Removes inline tags and decodes the basic character entities.
pub fn strip_inline_markup(name: &str) -> String {
    let without_tags = TAG_RE.replace_all(name, "");
    without_tags
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}
