//! Text normalisation applied to every document before vectorisation.
//!
//! The vectoriser was fitted on text cleaned exactly this way, so any drift
//! here silently changes predictions.
//!
//! # Steps (order matters)
//!
//! 1. Lowercase the whole input.
//! 2. Drop lines that start with an `http://` or `https://` URL, up to and
//!    including the line terminators that follow them.
//! 3. Drop HTML-like tags (`<...>` with no `>` inside).
//! 4. Translate characters: `_ . -` become a space, `[ ] ( ) @ ' + &` are
//!    removed, everything else is kept.

use std::sync::LazyLock;

use regex::Regex;

/// A URL at the start of a line, running to end of line plus trailing `\r`/`\n`.
static LEADING_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^https?://.*[\r\n]*").unwrap());

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Characters replaced by a single space.
const SPACE_CHARS: &[char] = &['_', '.', '-'];

/// Characters removed outright.
const DELETE_CHARS: &[char] = &['[', ']', '(', ')', '@', '\'', '+', '&'];

/// Normalise raw article text into the form the feature extractor expects.
///
/// Never fails; an empty input yields an empty string.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let without_urls = LEADING_URL.replace_all(&lowered, "");
    let without_tags = HTML_TAG.replace_all(&without_urls, "");
    translate_special_chars(&without_tags)
}

/// Apply the character translation table from step 4.
pub fn translate_special_chars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if SPACE_CHARS.contains(&ch) {
            out.push(' ');
        } else if !DELETE_CHARS.contains(&ch) {
            out.push(ch);
        }
    }
    out
}
