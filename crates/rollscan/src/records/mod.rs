//! Record assembly.
//!
//! A parser is compiled once from a [`Vocabulary`](crate::text::vocabulary::Vocabulary)
//! and turns OCR text into a complete record. Label-bounded fields are driven
//! by a table of [`BoundedField`] entries, so adding a captioned field is a
//! vocabulary entry and a table row rather than a new extractor.

pub mod card;
pub mod list;

pub use card::{CardParser, parse_card_text};
pub use list::{ListParser, parse_list_cell};

use crate::fields::boundary::BoundaryPattern;

/// Post-processing applied to a bounded value after extraction.
pub type PostProcessor = fn(&str) -> String;

/// One row of a parser's bounded-field table.
#[derive(Debug, Clone)]
pub struct BoundedField<C> {
    pub column: C,
    pub pattern: BoundaryPattern,
    pub post: Option<PostProcessor>,
}

impl<C: Copy> BoundedField<C> {
    pub fn new(column: C, pattern: BoundaryPattern) -> Self {
        Self {
            column,
            pattern,
            post: None,
        }
    }

    pub fn with_post(mut self, post: PostProcessor) -> Self {
        self.post = Some(post);
        self
    }

    /// Extract the value, falling back to the sentinel, then post-process.
    pub fn extract(&self, text: &str) -> String {
        let value = self.pattern.extract_or_sentinel(text);
        match self.post {
            Some(post) => post(&value),
            None => value,
        }
    }
}
