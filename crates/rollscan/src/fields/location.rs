//! Postal code and region lookups on card text.

use regex::Regex;

use crate::error::{Result, RollscanError};
use crate::text::pattern::compile;
use crate::text::vocabulary::{PostalPrefixRange, Vocabulary};
use crate::types::NOT_STATED;

/// Six digits with a leading digit in the configured range.
#[derive(Debug, Clone)]
pub struct PostalCodeRule {
    pattern: Regex,
}

impl PostalCodeRule {
    pub fn new(range: &PostalPrefixRange) -> Result<Self> {
        if range.first > range.last || range.last > 9 {
            return Err(RollscanError::validation(format!(
                "Invalid postal prefix range {}-{}",
                range.first, range.last
            )));
        }
        let pattern = compile("postal code", &format!(r"\b[{}-{}]\d{{5}}\b", range.first, range.last))?;
        Ok(Self { pattern })
    }

    pub fn extract(&self, text: &str) -> String {
        self.pattern
            .find(text)
            .map_or_else(|| NOT_STATED.to_string(), |m| m.as_str().to_string())
    }
}

#[derive(Debug, Clone)]
struct Region {
    display: String,
    words: Vec<Regex>,
}

/// Region names matched word by word, first in list order wins.
#[derive(Debug, Clone)]
pub struct RegionMatcher {
    regions: Vec<Region>,
}

impl RegionMatcher {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self> {
        let mut regions = Vec::with_capacity(vocabulary.regions.len());
        for name in &vocabulary.regions {
            let words = name
                .split_whitespace()
                .map(|word| compile("region", &format!(r"\b{}\b", regex::escape(word))))
                .collect::<Result<Vec<_>>>()?;
            if words.is_empty() {
                continue;
            }
            regions.push(Region {
                display: title_case(name),
                words,
            });
        }
        Ok(Self { regions })
    }

    pub fn extract(&self, text: &str) -> String {
        self.regions
            .iter()
            .find(|region| region.words.iter().all(|word| word.is_match(text)))
            .map_or_else(|| NOT_STATED.to_string(), |region| region.display.clone())
    }
}

fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postal_code_prefix() {
        let rule = PostalCodeRule::new(&PostalPrefixRange::default()).unwrap();
        assert_eq!(rule.extract("Hyderabad 500001"), "500001");
        assert_eq!(rule.extract("Delhi 110001"), NOT_STATED);
        assert_eq!(rule.extract("Ref 5000012"), NOT_STATED);
    }

    #[test]
    fn test_postal_range_validation() {
        assert!(PostalCodeRule::new(&PostalPrefixRange { first: 7, last: 5 }).is_err());
        assert!(PostalCodeRule::new(&PostalPrefixRange { first: 1, last: 12 }).is_err());
    }

    #[test]
    fn test_region_all_words_required() {
        let matcher = RegionMatcher::new(&Vocabulary::default()).unwrap();
        assert_eq!(matcher.extract("Guntur, Andhra Pradesh 522001"), "Andhra Pradesh");
        assert_eq!(matcher.extract("Hyderabad, Telangana 500001"), "Telangana");
        assert_eq!(matcher.extract("Pradesh Road"), NOT_STATED);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("TAMIL NADU"), "Tamil Nadu");
    }
}
