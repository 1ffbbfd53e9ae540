//! Person-name sanitation for card fields.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::pattern::collapse_whitespace;
use crate::types::NOT_STATED;

const MAX_NAME_WORDS: usize = 4;

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("Digit regex pattern is valid and should compile"));
static PUNCTUATION_NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[><"/\\|_=,:;]+"#).expect("Punctuation noise regex pattern is valid and should compile")
});
static NON_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z.\s]").expect("Non-name regex pattern is valid and should compile"));
static TRAILING_INITIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\b[A-Za-z]$").expect("Trailing initial regex pattern is valid and should compile"));

/// Strip OCR debris from a person name.
///
/// Digits and non-name glyphs are removed, a dangling one-letter token at the
/// end is dropped and the result is capped at four words. Anything shorter
/// than two characters becomes the sentinel.
pub fn clean_person_name(name: &str) -> String {
    if name.trim().is_empty() || name == NOT_STATED {
        return NOT_STATED.to_string();
    }

    let text = DIGITS.replace_all(name, "");
    let text = PUNCTUATION_NOISE.replace_all(&text, " ");
    let text = NON_NAME.replace_all(&text, " ");
    let text = collapse_whitespace(&text);
    let text = TRAILING_INITIAL.replace(&text, "");

    let text = text.split_whitespace().take(MAX_NAME_WORDS).collect::<Vec<_>>().join(" ");
    if text.chars().count() < 2 {
        NOT_STATED.to_string()
    } else {
        text
    }
}
