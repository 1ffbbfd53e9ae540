//! Age and date-of-birth rules.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, RollscanError};
use crate::text::pattern::{alternation, compile};
use crate::text::vocabulary::Vocabulary;
use crate::types::NOT_STATED;

static DOB_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{2}[/-]\d{2}[/-]\d{4}\b").expect("DOB regex pattern is valid and should compile"));

const DOB_FORMATS: [&str; 2] = ["%d-%m-%Y", "%d/%m/%Y"];

static DEFAULT_RULE: Lazy<AgeRule> =
    Lazy::new(|| AgeRule::new(&Vocabulary::default()).expect("Default age labels are valid and should compile"));

/// Digits following "Age" or one of its OCR misreads.
#[derive(Debug, Clone)]
pub struct AgeRule {
    pattern: Regex,
}

impl AgeRule {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self> {
        if vocabulary.age_labels.is_empty() {
            return Err(RollscanError::validation("Age rule needs at least one age label"));
        }
        let pattern = compile("age label", &format!(r"{}\s*[:\-\s]*(\d+)", alternation(&vocabulary.age_labels)))?;
        Ok(Self { pattern })
    }

    pub fn extract(&self, text: &str) -> String {
        self.pattern
            .captures(text)
            .map_or_else(|| NOT_STATED.to_string(), |caps| caps[1].to_string())
    }
}

/// Age from list-cell text with the default labels.
pub fn extract_age(text: &str) -> String {
    DEFAULT_RULE.extract(text)
}

/// First `DD-MM-YYYY` or `DD/MM/YYYY` token and the date it denotes.
///
/// Only the first date-shaped token counts; `None` if it is not a real date.
pub fn find_date_of_birth(text: &str) -> Option<(String, NaiveDate)> {
    let token = DOB_PATTERN.find(text)?.as_str();
    DOB_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(token, fmt).ok())
        .map(|date| (token.to_string(), date))
}

/// Completed years between `dob` and `reference`, `None` if `dob` is in the future.
pub fn age_on(dob: NaiveDate, reference: NaiveDate) -> Option<u32> {
    let mut years = reference.year() - dob.year();
    if (reference.month(), reference.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Date of birth and derived age as output strings.
///
/// A missing or unparseable date yields the sentinel for both. A date after
/// `reference` keeps the DOB but reports the age as the sentinel.
pub fn date_of_birth_and_age(text: &str, reference: NaiveDate) -> (String, String) {
    match find_date_of_birth(text) {
        Some((printed, dob)) => {
            let age = age_on(dob, reference).map_or_else(|| NOT_STATED.to_string(), |years| years.to_string());
            (printed, age)
        }
        None => (NOT_STATED.to_string(), NOT_STATED.to_string()),
    }
}
