//! Gender classification from OCR'd tokens.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;
use crate::text::pattern::compile_literal_words;
use crate::text::vocabulary::{GenderTokens, Vocabulary};
use crate::types::NOT_STATED;

static DEFAULT_LIST_RULE: Lazy<GenderRule> =
    Lazy::new(|| GenderRule::list(&Vocabulary::default()).expect("Default gender tokens are valid and should compile"));

#[derive(Debug, Clone)]
struct TokenSet {
    value: String,
    pattern: Regex,
}

/// Ordered token sets; the first set with a whole-word hit decides.
#[derive(Debug, Clone)]
pub struct GenderRule {
    sets: Vec<TokenSet>,
    native: Vec<GenderTokens>,
}

impl GenderRule {
    /// List mode: Latin token sets only.
    pub fn list(vocabulary: &Vocabulary) -> Result<Self> {
        Ok(Self {
            sets: compile_sets(&vocabulary.gender_sets)?,
            native: Vec::new(),
        })
    }

    /// Card mode: native-script words first, then the card token sets.
    pub fn card(vocabulary: &Vocabulary) -> Result<Self> {
        Ok(Self {
            sets: compile_sets(&vocabulary.card_gender_sets)?,
            native: vocabulary.native_gender_words.clone(),
        })
    }

    fn match_tokens(&self, text: &str) -> Option<&str> {
        self.sets
            .iter()
            .find(|set| set.pattern.is_match(text))
            .map(|set| set.value.as_str())
    }

    fn match_native(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        self.native
            .iter()
            .find(|set| set.tokens.iter().any(|word| lower.contains(word.to_lowercase().as_str())))
            .map(|set| set.value.as_str())
    }

    pub fn extract(&self, text: &str) -> String {
        self.match_tokens(text).unwrap_or(NOT_STATED).to_string()
    }

    /// Card lookup order: native words in the raw text, tokens in the raw
    /// text, then tokens in the cleaned text.
    pub fn extract_card(&self, raw: &str, clean: &str) -> String {
        self.match_native(raw)
            .or_else(|| self.match_tokens(raw))
            .or_else(|| self.match_tokens(clean))
            .unwrap_or(NOT_STATED)
            .to_string()
    }
}

fn compile_sets(sets: &[GenderTokens]) -> Result<Vec<TokenSet>> {
    let mut compiled = Vec::with_capacity(sets.len());
    for set in sets {
        if let Some(pattern) = compile_literal_words("gender token", &set.tokens)? {
            compiled.push(TokenSet {
                value: set.value.clone(),
                pattern,
            });
        }
    }
    Ok(compiled)
}

/// List-mode gender with the default token sets.
pub fn extract_gender(text: &str) -> String {
    DEFAULT_LIST_RULE.extract(text)
}
