//! Card-mode record assembly.

use chrono::NaiveDate;
use once_cell::sync::Lazy;

use crate::error::Result;
use crate::fields::{
    AddressRule, BoundaryPattern, GenderRule, IdentifierRule, PostalCodeRule, RegionMatcher, clean_person_name,
    date_of_birth_and_age,
};
use crate::records::BoundedField;
use crate::text::normalize::normalize_card_text;
use crate::text::vocabulary::Vocabulary;
use crate::types::{CardRecord, NOT_STATED};

static DEFAULT_PARSER: Lazy<CardParser> =
    Lazy::new(|| CardParser::new(&Vocabulary::default()).expect("Default vocabulary is valid and should compile"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardColumn {
    Name,
    FatherName,
}

/// Builds the single [`CardRecord`] for a whole voter-ID card scan.
#[derive(Debug, Clone)]
pub struct CardParser {
    bounded: Vec<BoundedField<CardColumn>>,
    address: AddressRule,
    postal_code: PostalCodeRule,
    region: RegionMatcher,
    gender: GenderRule,
    identifier: IdentifierRule,
}

impl CardParser {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self> {
        let leak = &vocabulary.leak_labels;
        let bounded = vec![
            BoundedField::new(
                CardColumn::Name,
                BoundaryPattern::new(&vocabulary.card_name_labels, &vocabulary.card_name_stop_labels, leak)?,
            )
            .with_post(clean_person_name),
            BoundedField::new(
                CardColumn::FatherName,
                BoundaryPattern::new(&vocabulary.card_father_labels, &vocabulary.card_father_stop_labels, leak)?,
            )
            .with_post(clean_person_name),
        ];

        Ok(Self {
            bounded,
            address: AddressRule::new(vocabulary)?,
            postal_code: PostalCodeRule::new(&vocabulary.postal_prefix)?,
            region: RegionMatcher::new(vocabulary)?,
            gender: GenderRule::card(vocabulary)?,
            identifier: IdentifierRule::new(vocabulary)?,
        })
    }

    pub fn shared() -> &'static CardParser {
        &DEFAULT_PARSER
    }

    /// Assemble the record from raw whole-card OCR text. Age is derived
    /// against `reference_date`.
    pub fn parse(&self, raw: &str, reference_date: NaiveDate) -> CardRecord {
        let clean = normalize_card_text(raw);

        let mut name = NOT_STATED.to_string();
        let mut father_name = NOT_STATED.to_string();
        for field in &self.bounded {
            let value = field.extract(&clean);
            match field.column {
                CardColumn::Name => name = value,
                CardColumn::FatherName => father_name = value,
            }
        }

        let (dob, age) = date_of_birth_and_age(&clean, reference_date);

        CardRecord {
            name,
            father_name,
            dob,
            age,
            identifier_code: self.identifier.extract_card(&clean),
            gender: self.gender.extract_card(raw, &clean),
            address: self.address.extract(&clean),
            postal_code: self.postal_code.extract(&clean),
            region: self.region.extract(&clean),
        }
    }
}

/// Parse whole-card text with the default vocabulary.
pub fn parse_card_text(raw: &str, reference_date: NaiveDate) -> CardRecord {
    DEFAULT_PARSER.parse(raw, reference_date)
}
