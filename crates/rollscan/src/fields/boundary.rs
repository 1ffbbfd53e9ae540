//! Label-bounded extraction.
//!
//! A value is the text between the first occurrence of one of its start labels
//! and the next whole-word stop label (or the end of the text). OCR'd captions
//! are inconsistent, so a successful capture is cleaned in a second phase:
//! box-border punctuation is stripped from the front, and if a caption word
//! still leaked into the value the value is cut at that word.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, RollscanError};
use crate::text::pattern::{alternation, collapse_whitespace, compile, compile_word_alternation, literal_alternation};
use crate::text::vocabulary::{FieldTagSet, Vocabulary};
use crate::types::{GuardianKind, NOT_STATED};

static LEADING_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\w\s]+").expect("Leading noise regex pattern is valid and should compile"));

static DEFAULT_LEAK_LABELS: Lazy<Option<Regex>> = Lazy::new(|| {
    compile_word_alternation("leak label", &Vocabulary::default().leak_labels)
        .expect("Default leak labels are valid and should compile")
});

/// Compiled start/stop/leak patterns for one field.
#[derive(Debug, Clone)]
pub struct BoundaryPattern {
    start: Regex,
    stop: Option<Regex>,
    leak: Option<Regex>,
}

impl BoundaryPattern {
    /// Build from regex fragments. `start_labels` must not be empty.
    pub fn new(start_labels: &[String], stop_labels: &[String], leak_labels: &[String]) -> Result<Self> {
        if start_labels.is_empty() {
            return Err(RollscanError::validation("A bounded field needs at least one start label"));
        }
        let start = compile("start label", &format!(r"{}\s*[:.\-]?\s*", alternation(start_labels)))?;
        Ok(Self {
            start,
            stop: compile_word_alternation("stop label", stop_labels)?,
            leak: compile_word_alternation("leak label", leak_labels)?,
        })
    }

    /// Raw span after the first start label, up to the first stop label or end of text.
    pub fn span<'t>(&self, text: &'t str) -> Option<&'t str> {
        let start = self.start.find(text)?;
        let end = self
            .stop
            .as_ref()
            .and_then(|stop| stop.find_at(text, start.end()))
            .map_or(text.len(), |m| m.start());
        Some(&text[start.end()..end])
    }

    /// Extract and clean the value, `None` when no start label matched or
    /// nothing survived cleaning.
    pub fn extract(&self, text: &str) -> Option<String> {
        self.span(text).and_then(|span| clean_value(span, self.leak.as_ref()))
    }

    /// Same as [`extract`](Self::extract) with the sentinel substituted.
    pub fn extract_or_sentinel(&self, text: &str) -> String {
        self.extract(text).unwrap_or_else(|| NOT_STATED.to_string())
    }
}

fn clean_value(span: &str, leak: Option<&Regex>) -> Option<String> {
    let value = span.trim();
    let value = LEADING_NOISE.replace(value, "");
    let mut value = value.trim_matches(|c: char| c == ':' || c == '-' || c.is_whitespace());

    if let Some(leak) = leak
        && let Some(m) = leak.find(value)
    {
        value = &value[..m.start()];
    }

    let value = collapse_whitespace(value);
    if value.is_empty() { None } else { Some(value) }
}

/// Extract the value between literal `start_labels` and `stop_labels`.
///
/// Labels are matched case-insensitively and taken literally. Leaked
/// NAME/FATHER/HUSBAND captions are trimmed off. Returns the sentinel when no
/// start label is present or the span is empty.
pub fn extract_between(text: &str, start_labels: &[&str], stop_labels: &[&str]) -> String {
    if start_labels.is_empty() {
        return NOT_STATED.to_string();
    }
    let starts: Vec<String> = start_labels.iter().map(|s| s.to_string()).collect();
    let stops: Vec<String> = stop_labels.iter().map(|s| s.to_string()).collect();

    let Ok(start) = compile("start label", &format!(r"{}\s*[:.\-]?\s*", literal_alternation(&starts))) else {
        return NOT_STATED.to_string();
    };
    let stop = if stops.is_empty() {
        None
    } else {
        compile("stop label", &format!(r"\b{}\b", literal_alternation(&stops))).ok()
    };

    let pattern = BoundaryPattern {
        start,
        stop,
        leak: DEFAULT_LEAK_LABELS.clone(),
    };
    pattern.extract_or_sentinel(text)
}

/// Outcome of the guardian priority scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardianMatch {
    pub kind: Option<GuardianKind>,
    pub value: String,
}

impl GuardianMatch {
    pub fn type_label(&self) -> &'static str {
        self.kind.map_or(NOT_STATED, |kind| kind.as_str())
    }
}

#[derive(Debug, Clone)]
struct GuardianEntry {
    kind: GuardianKind,
    detect: Regex,
    value: BoundaryPattern,
}

/// Resolves the guardian relation by scanning categories in priority order.
///
/// The first category whose aliases appear as whole words wins, even if a
/// later category also appears; its value runs to the next shared stop label.
#[derive(Debug, Clone)]
pub struct GuardianResolver {
    entries: Vec<GuardianEntry>,
}

impl GuardianResolver {
    pub fn new(tags: &FieldTagSet, leak_labels: &[String]) -> Result<Self> {
        let mut entries = Vec::with_capacity(tags.guardians.len());
        for tag in &tags.guardians {
            let Some(detect) = compile_word_alternation("guardian alias", &tag.aliases)? else {
                continue;
            };
            entries.push(GuardianEntry {
                kind: tag.kind,
                detect,
                value: BoundaryPattern::new(&tag.aliases, &tags.stop_labels, leak_labels)?,
            });
        }
        Ok(Self { entries })
    }

    pub fn resolve(&self, text: &str) -> GuardianMatch {
        for entry in &self.entries {
            if entry.detect.is_match(text) {
                return GuardianMatch {
                    kind: Some(entry.kind),
                    value: entry.value.extract_or_sentinel(text),
                };
            }
        }
        GuardianMatch {
            kind: None,
            value: NOT_STATED.to_string(),
        }
    }
}
