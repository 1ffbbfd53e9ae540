//! Text normalization and the curated vocabulary it is driven by.

pub mod normalize;
pub mod pattern;
pub mod vocabulary;

pub use normalize::{Normalizer, normalize, normalize_card_text};
pub use vocabulary::{FieldTagSet, GenderTokens, GlyphSubstitution, GuardianTag, PostalPrefixRange, Vocabulary};
