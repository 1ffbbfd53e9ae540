//! Helpers for turning vocabulary entries into compiled regexes.

use regex::{Regex, RegexBuilder};

use crate::error::{Result, RollscanError};

/// Join label fragments into a non-capturing alternation, preserving order.
pub fn alternation(fragments: &[String]) -> String {
    format!("(?:{})", fragments.join("|"))
}

/// Join literal tokens into an alternation with regex metacharacters escaped.
pub fn literal_alternation(tokens: &[String]) -> String {
    let escaped: Vec<String> = tokens.iter().map(|t| regex::escape(t)).collect();
    alternation(&escaped)
}

/// Compile a case-insensitive pattern, reporting which vocabulary entry broke.
pub fn compile(what: &str, pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| RollscanError::validation_with_source(format!("Invalid {} pattern '{}'", what, pattern), e))
}

/// Compile `\b(?:a|b|c)\b`, or `None` for an empty list.
///
/// An empty alternation would match the empty string everywhere, so callers
/// treat `None` as "never matches".
pub fn compile_word_alternation(what: &str, fragments: &[String]) -> Result<Option<Regex>> {
    if fragments.is_empty() {
        return Ok(None);
    }
    compile(what, &format!(r"\b{}\b", alternation(fragments))).map(Some)
}

/// Same as [`compile_word_alternation`] for literal tokens.
pub fn compile_literal_words(what: &str, tokens: &[String]) -> Result<Option<Regex>> {
    if tokens.is_empty() {
        return Ok(None);
    }
    compile(what, &format!(r"\b{}\b", literal_alternation(tokens))).map(Some)
}

/// Collapse every whitespace run (newlines included) to one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
