//! Card address block.

use regex::Regex;

use crate::error::{Result, RollscanError};
use crate::text::pattern::{alternation, collapse_whitespace, compile};
use crate::text::vocabulary::Vocabulary;
use crate::types::ADDRESS_NOT_AVAILABLE;

/// Shortest collapsed address still treated as real text.
const MIN_ADDRESS_CHARS: usize = 10;

/// Captures from the address label up to the first line that opens with a
/// stop marker, spanning line breaks.
#[derive(Debug, Clone)]
pub struct AddressRule {
    label: Regex,
    stop: Option<Regex>,
}

impl AddressRule {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self> {
        if vocabulary.address_labels.is_empty() {
            return Err(RollscanError::validation("Address rule needs at least one address label"));
        }
        let label = compile("address label", &format!(r"{}\s*[:.\-]?\s*", alternation(&vocabulary.address_labels)))?;
        let stop = if vocabulary.address_stop_markers.is_empty() {
            None
        } else {
            Some(compile(
                "address stop marker",
                &format!(r"\n\s*{}", alternation(&vocabulary.address_stop_markers)),
            )?)
        };
        Ok(Self { label, stop })
    }

    pub fn extract(&self, text: &str) -> String {
        let Some(label) = self.label.find(text) else {
            return ADDRESS_NOT_AVAILABLE.to_string();
        };
        let end = self
            .stop
            .as_ref()
            .and_then(|stop| stop.find_at(text, label.end()))
            .map_or(text.len(), |m| m.start());

        let address = collapse_whitespace(&text[label.end()..end]);
        if address.chars().count() > MIN_ADDRESS_CHARS {
            address
        } else {
            ADDRESS_NOT_AVAILABLE.to_string()
        }
    }
}
