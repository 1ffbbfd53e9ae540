//! OCR text normalization.
//!
//! [`Normalizer`] produces the canonical upper-cased form every list-mode
//! extractor works on. [`normalize_card_text`] is the gentler variant used for
//! whole-card text, where case and line structure still carry meaning.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;
use crate::text::pattern::{collapse_whitespace, compile_literal_words};
use crate::text::vocabulary::{GlyphSubstitution, Vocabulary};

static DEFAULT_NORMALIZER: Lazy<Normalizer> = Lazy::new(|| {
    Normalizer::new(&Vocabulary::default()).expect("Default vocabulary watermark tokens are valid and should compile")
});

static CARD_NON_ASCII: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\x00-\x7F\n]+").expect("Non-ASCII regex pattern is valid and should compile"));
static CARD_HORIZONTAL_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]+").expect("Horizontal space regex pattern is valid and should compile"));

/// Canonicalizes raw OCR text. Order of the steps matters:
///
/// 1. empty input stays empty
/// 2. upper-case
/// 3. confusable glyph substitution
/// 4. colon-like glyphs fold into `:`
/// 5. watermark tokens are blanked
/// 6. whitespace collapses
#[derive(Debug, Clone)]
pub struct Normalizer {
    confusables: Vec<GlyphSubstitution>,
    colon_glyphs: Vec<char>,
    watermark: Option<Regex>,
}

impl Normalizer {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self> {
        let confusables = vocabulary
            .confusables
            .iter()
            .filter(|sub| !sub.from.is_empty())
            .map(|sub| GlyphSubstitution {
                from: sub.from.to_uppercase(),
                to: sub.to.clone(),
            })
            .collect();

        Ok(Self {
            confusables,
            colon_glyphs: vocabulary.colon_glyphs.chars().collect(),
            watermark: compile_literal_words("watermark token", &vocabulary.watermark_tokens)?,
        })
    }

    pub fn normalize(&self, raw: &str) -> String {
        if raw.trim().is_empty() {
            return String::new();
        }

        let mut text = raw.to_uppercase();

        for sub in &self.confusables {
            if text.contains(sub.from.as_str()) {
                text = text.replace(sub.from.as_str(), &sub.to);
            }
        }

        if !self.colon_glyphs.is_empty() {
            text = text
                .chars()
                .map(|c| if self.colon_glyphs.contains(&c) { ':' } else { c })
                .collect();
        }

        if let Some(watermark) = &self.watermark
            && watermark.is_match(&text)
        {
            text = watermark.replace_all(&text, " ").into_owned();
        }

        collapse_whitespace(&text)
    }
}

/// Normalize with the default vocabulary.
pub fn normalize(raw: &str) -> String {
    DEFAULT_NORMALIZER.normalize(raw)
}

/// Card-mode normalization: keeps case and newlines, drops non-ASCII glyphs.
pub fn normalize_card_text(raw: &str) -> String {
    let text = raw.replace('\u{2019}', "'").replace('|', " ");
    let text = CARD_NON_ASCII.replace_all(&text, " ");
    let text = CARD_HORIZONTAL_SPACE.replace_all(&text, " ");
    text.trim().to_string()
}
