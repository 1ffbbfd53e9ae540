//! Identifier (EPIC) code recovery.
//!
//! Codes are three letters followed by seven digits, but OCR splits them with
//! spaces, glues caption text to them and renders `0` as `¢`. Recovery strips
//! the caption, keeps only ASCII alphanumerics and looks for 3-4 letters
//! followed by 6-8 digits, canonicalizing to the first 3 letters and at most
//! 7 digits.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;
use crate::text::pattern::compile_word_alternation;
use crate::text::vocabulary::Vocabulary;
use crate::types::NOT_STATED;

static CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]{3,4})([0-9]{6,8})").expect("Code regex pattern is valid and should compile"));
static STRICT_CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z]{3}[0-9]{7}\b").expect("Strict code regex pattern is valid and should compile"));

static DEFAULT_RULE: Lazy<IdentifierRule> = Lazy::new(|| {
    IdentifierRule::new(&Vocabulary::default()).expect("Default identifier captions are valid and should compile")
});

#[derive(Debug, Clone)]
pub struct IdentifierRule {
    captions: Option<Regex>,
}

impl IdentifierRule {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self> {
        Ok(Self {
            captions: compile_word_alternation("identifier caption", &vocabulary.identifier_captions)?,
        })
    }

    /// Recover a code from identifier-crop text, or the sentinel.
    pub fn extract(&self, text: &str) -> String {
        self.recover(text).unwrap_or_else(|| NOT_STATED.to_string())
    }

    fn recover(&self, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }

        let upper = text.to_uppercase().replace('¢', "0");
        let uncaptioned = match &self.captions {
            Some(captions) => captions.replace_all(&upper, " ").into_owned(),
            None => upper,
        };
        let compact: String = uncaptioned.chars().filter(char::is_ascii_alphanumeric).collect();

        let caps = CODE_PATTERN.captures(&compact)?;
        let letters = &caps[1];
        let digits = &caps[2];
        Some(format!("{}{}", &letters[..3], &digits[..digits.len().min(7)]))
    }

    /// Card mode: a clean whole-token code wins, otherwise recover per token.
    ///
    /// Recovery is never run across token boundaries on card text, where a
    /// caption followed by a date would otherwise fuse into a plausible code.
    pub fn extract_card(&self, clean_text: &str) -> String {
        if let Some(m) = STRICT_CODE_PATTERN.find(clean_text) {
            return m.as_str().to_string();
        }
        clean_text
            .split_whitespace()
            .find_map(|token| self.recover(token))
            .unwrap_or_else(|| NOT_STATED.to_string())
    }
}

/// Recover a code with the default caption list.
pub fn extract_code(text: &str) -> String {
    DEFAULT_RULE.extract(text)
}
