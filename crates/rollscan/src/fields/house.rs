//! House number rule.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;
use crate::text::pattern::{compile, compile_word_alternation};
use crate::text::vocabulary::Vocabulary;
use crate::types::NOT_STATED;

static DEFAULT_RULE: Lazy<HouseRule> =
    Lazy::new(|| HouseRule::new(&Vocabulary::default()).expect("Default house labels are valid and should compile"));

/// Tries each house label in order; the first one present decides.
///
/// The remainder of the line after the label is cut at the first bleed
/// caption (AGE, GENDER, ...) and trimmed of non-word characters.
#[derive(Debug, Clone)]
pub struct HouseRule {
    labels: Vec<Regex>,
    bleed: Option<Regex>,
}

impl HouseRule {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self> {
        let labels = vocabulary
            .house_labels
            .iter()
            .map(|label| compile("house label", &format!(r"{}\s*[:\-]?\s*(.+)", label)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            labels,
            bleed: compile_word_alternation("house bleed label", &vocabulary.house_bleed_labels)?,
        })
    }

    pub fn extract(&self, text: &str) -> String {
        let Some(caps) = self.labels.iter().find_map(|label| label.captures(text)) else {
            return NOT_STATED.to_string();
        };

        let mut value = caps[1].trim();
        if let Some(bleed) = &self.bleed
            && let Some(m) = bleed.find(value)
        {
            value = &value[..m.start()];
        }

        let value = value.trim_matches(|c: char| !(c.is_alphanumeric() || c == '_'));
        if value.is_empty() {
            NOT_STATED.to_string()
        } else {
            value.to_string()
        }
    }
}

/// House number with the default labels.
pub fn extract_house(text: &str) -> String {
    DEFAULT_RULE.extract(text)
}
