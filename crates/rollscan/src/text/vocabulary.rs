//! Curated OCR vocabulary.
//!
//! Every label, stop word and glyph table used by the extractors lives here as
//! plain data so it can be overridden from configuration and so the extraction
//! algorithms can be tested against small synthetic vocabularies.
//!
//! Label entries are case-insensitive regex fragments (for example
//! `HOUSE\s*NO\.?`), because OCR'd captions vary in spacing and punctuation.
//! Token entries used for whole-word matching (watermarks, gender tokens,
//! region names) are literal.

use serde::{Deserialize, Serialize};

use crate::types::GuardianKind;

/// A single OCR confusion correction applied during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphSubstitution {
    pub from: String,
    pub to: String,
}

impl GlyphSubstitution {
    fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Alias labels for one guardian category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianTag {
    pub kind: GuardianKind,
    pub aliases: Vec<String>,
}

/// Field labels of a list cell: the voter name labels, the guardian
/// categories in priority order, and the stop labels that end any value span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldTagSet {
    pub name_labels: Vec<String>,
    pub guardians: Vec<GuardianTag>,
    pub stop_labels: Vec<String>,
}

impl FieldTagSet {
    /// Every guardian alias followed by the shared stop labels; this is the
    /// stop set for the voter's own name.
    pub fn name_stop_labels(&self) -> Vec<String> {
        self.guardians
            .iter()
            .flat_map(|tag| tag.aliases.iter().cloned())
            .chain(self.stop_labels.iter().cloned())
            .collect()
    }
}

impl Default for FieldTagSet {
    fn default() -> Self {
        Self {
            name_labels: strings(&["NAME"]),
            guardians: vec![
                GuardianTag {
                    kind: GuardianKind::Father,
                    aliases: strings(&["FATHER NAME", "FATHERS NAME", "FATHER"]),
                },
                GuardianTag {
                    kind: GuardianKind::Husband,
                    aliases: strings(&["HUSBAND NAME", "HUSBANDS NAME", "HUSBAND"]),
                },
                GuardianTag {
                    kind: GuardianKind::Mother,
                    aliases: strings(&["MOTHER NAME", "MOTHERS NAME", "MOTHER", "MOTHERS"]),
                },
                GuardianTag {
                    kind: GuardianKind::Other,
                    aliases: strings(&["OTHER NAME", "OTHERS NAME", "OTHER", "OTHERS"]),
                },
            ],
            stop_labels: strings(&["HOUSE", "AGE", "GENDER", "EPIC", "PHOTO"]),
        }
    }
}

/// Whole-word tokens that map to one canonical gender value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderTokens {
    pub value: String,
    pub tokens: Vec<String>,
}

impl GenderTokens {
    fn new(value: &str, tokens: &[&str]) -> Self {
        Self {
            value: value.to_string(),
            tokens: strings(tokens),
        }
    }
}

/// Inclusive range of valid leading digits for a postal code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalPrefixRange {
    pub first: u8,
    pub last: u8,
}

impl Default for PostalPrefixRange {
    fn default() -> Self {
        Self { first: 5, last: 7 }
    }
}

/// The full curated vocabulary. `Default` is the tuned production set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    /// OCR-confusable glyph corrections, applied in order after upper-casing.
    pub confusables: Vec<GlyphSubstitution>,
    /// Glyphs that OCR produces in place of a colon after a caption.
    pub colon_glyphs: String,
    /// Watermark words stamped across cells that split field values.
    pub watermark_tokens: Vec<String>,
    pub field_tags: FieldTagSet,
    /// Caption words whose presence inside a captured value means a boundary was missed.
    pub leak_labels: Vec<String>,
    pub house_labels: Vec<String>,
    pub house_bleed_labels: Vec<String>,
    /// "Age" and its common misreads.
    pub age_labels: Vec<String>,
    pub gender_sets: Vec<GenderTokens>,
    /// Card mode Latin token sets; checked after the native-script words.
    pub card_gender_sets: Vec<GenderTokens>,
    /// Non-Latin gender words, matched as substrings of raw card text.
    pub native_gender_words: Vec<GenderTokens>,
    /// Captions printed next to identifier codes.
    pub identifier_captions: Vec<String>,
    pub card_name_labels: Vec<String>,
    pub card_name_stop_labels: Vec<String>,
    pub card_father_labels: Vec<String>,
    pub card_father_stop_labels: Vec<String>,
    pub address_labels: Vec<String>,
    /// Footer and section markers that end an address when they start a line.
    pub address_stop_markers: Vec<String>,
    pub postal_prefix: PostalPrefixRange,
    /// Canonical administrative regions, in match priority order.
    pub regions: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            confusables: vec![
                GlyphSubstitution::new("¢", "C"),
                GlyphSubstitution::new("|", "I"),
                GlyphSubstitution::new("!", "I"),
            ],
            colon_glyphs: ";=+?".to_string(),
            watermark_tokens: strings(&["PHOTO", "AVAILABLE"]),
            field_tags: FieldTagSet::default(),
            leak_labels: strings(&["NAME", "FATHER", "HUSBAND"]),
            house_labels: strings(&[r"HOUSE\s*NO\.?", r"HOUSE\s*NUMBER", r"H\.?\s*NO\.?"]),
            house_bleed_labels: strings(&["AGE", "AQE", "AGC", "GENDER", "PHOTO", "AVAILABLE", "NAME", "FATHER", "HUSBAND"]),
            age_labels: strings(&["AGE", "AQE", "AGC"]),
            gender_sets: vec![
                GenderTokens::new("Male", &["MALE", "MAIA", "MATE"]),
                GenderTokens::new("Female", &["FEMALE", "FERNALE", "FEMAIE", "FAMATE"]),
            ],
            card_gender_sets: vec![
                GenderTokens::new("Male", &["MALE", "MAIA", "MATE"]),
                GenderTokens::new("Female", &["FEMALE", "FERNALE", "FEMAIE", "FAMATE"]),
                GenderTokens::new("Other", &["OTHER"]),
            ],
            native_gender_words: vec![
                GenderTokens::new("Male", &["पुरुष"]),
                GenderTokens::new("Female", &["महिला", "स्त्री"]),
            ],
            identifier_captions: strings(&[r"EPIC\s*NO\.?", r"EPIC", r"VOTER\s*ID", r"ID\s*NO\.?"]),
            card_name_labels: strings(&["Name"]),
            card_name_stop_labels: strings(&[
                "Father'?s Name",
                "Gender",
                "Date of Birth",
                "DOB",
                "Address",
                "Electoral",
            ]),
            card_father_labels: strings(&["Father'?s Name"]),
            card_father_stop_labels: strings(&["Name", "Gender", "Date of Birth", "DOB", "Address", "Electoral"]),
            address_labels: strings(&["Address"]),
            address_stop_markers: strings(&[
                "Electoral Registration Officer",
                "Issue Date",
                "This card",
                "Note",
                "www",
                "http",
                "Date of Birth",
                "Name",
                "Father",
            ]),
            postal_prefix: PostalPrefixRange::default(),
            regions: strings(&[
                "ANDHRA PRADESH",
                "TELANGANA",
                "KARNATAKA",
                "TAMIL NADU",
                "KERALA",
                "MAHARASHTRA",
                "DELHI",
                "UTTAR PRADESH",
                "WEST BENGAL",
                "ODISHA",
                "GUJARAT",
                "RAJASTHAN",
                "MADHYA PRADESH",
                "BIHAR",
                "ASSAM",
                "PUNJAB",
                "HARYANA",
                "JHARKHAND",
                "CHHATTISGARH",
            ]),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
