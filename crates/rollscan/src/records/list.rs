//! List-mode record assembly.

use once_cell::sync::Lazy;

use crate::error::Result;
use crate::fields::{AgeRule, BoundaryPattern, GenderRule, GuardianResolver, HouseRule, IdentifierRule};
use crate::text::normalize::Normalizer;
use crate::text::vocabulary::Vocabulary;
use crate::types::ListRecord;

static DEFAULT_PARSER: Lazy<ListParser> =
    Lazy::new(|| ListParser::new(&Vocabulary::default()).expect("Default vocabulary is valid and should compile"));

/// Builds a [`ListRecord`] from the OCR text of one list cell.
#[derive(Debug, Clone)]
pub struct ListParser {
    normalizer: Normalizer,
    name: BoundaryPattern,
    guardian: GuardianResolver,
    house: HouseRule,
    age: AgeRule,
    gender: GenderRule,
    identifier: IdentifierRule,
}

impl ListParser {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self> {
        let tags = &vocabulary.field_tags;
        let name = BoundaryPattern::new(&tags.name_labels, &tags.name_stop_labels(), &vocabulary.leak_labels)?;

        Ok(Self {
            normalizer: Normalizer::new(vocabulary)?,
            name,
            guardian: GuardianResolver::new(tags, &vocabulary.leak_labels)?,
            house: HouseRule::new(vocabulary)?,
            age: AgeRule::new(vocabulary)?,
            gender: GenderRule::list(vocabulary)?,
            identifier: IdentifierRule::new(vocabulary)?,
        })
    }

    /// Parser compiled from the default vocabulary.
    pub fn shared() -> &'static ListParser {
        &DEFAULT_PARSER
    }

    /// Assemble one record. `text` is the cell's text-region OCR output and
    /// `identifier_text` the identifier-region output, both raw. The identifier
    /// text skips normalization, which would turn `¢` into `C` instead of `0`.
    pub fn parse(&self, text: &str, identifier_text: &str, page_number: usize, serial: usize) -> ListRecord {
        let text = self.normalizer.normalize(text);

        let guardian = self.guardian.resolve(&text);

        ListRecord {
            page_number,
            serial,
            name: self.name.extract_or_sentinel(&text),
            guardian_type: guardian.type_label().to_string(),
            guardian: guardian.value,
            house_no: self.house.extract(&text),
            age: self.age.extract(&text),
            gender: self.gender.extract(&text),
            identifier_code: self.identifier.extract(identifier_text),
        }
    }
}

/// Parse one cell with the default vocabulary.
pub fn parse_list_cell(text: &str, identifier_text: &str, page_number: usize, serial: usize) -> ListRecord {
    DEFAULT_PARSER.parse(text, identifier_text, page_number, serial)
}
