//! Rollscan - structured records from scanned voter rolls and voter-ID cards
//!
//! Rollscan turns page images into typed records. List pages are segmented
//! into one ruled cell per voter, each cell is recognized and its noisy OCR
//! text is parsed into name, guardian, house, age, gender and identifier
//! fields. Whole voter-ID card scans are recognized as one text and parsed
//! into a single card record.
//!
//! # Quick Start
//!
//! ```rust
//! use rollscan::records::parse_list_cell;
//!
//! let record = parse_list_cell(
//!     "Name : Ram Kumar Fathers Name: Shyam Lal House No : 12 B Age : 34 Gender : MALE",
//!     "EPIC NO: XYZ 123 4567",
//!     1,
//!     1,
//! );
//! assert_eq!(record.name, "RAM KUMAR");
//! assert_eq!(record.identifier_code, "XYZ1234567");
//! ```
//!
//! # Architecture
//!
//! - **Core Module** (`core`): configuration loading and the list/card pipelines
//! - **Segmentation** (`segment`): ruled-cell detection on list pages
//! - **Text** (`text`): OCR normalization driven by a curated vocabulary
//! - **Fields** (`fields`): label-bounded extraction and per-field rules
//! - **Records** (`records`): list and card record assembly
//! - **OCR** (`ocr`): the recognizer contract and the optional Tesseract backend
//!
//! # Features
//!
//! - `tesseract`: native Tesseract recognizer (off by default)

#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod fields;
pub mod ocr;
pub mod records;
pub mod segment;
pub mod text;
pub mod types;

pub use error::{Result, RollscanError};

pub use core::config::{CardPreprocessingConfig, OcrConfig, RollscanConfig, SegmentationConfig};
pub use core::pipeline::RollPipeline;

pub use ocr::{CropKind, EngineConfig, Recognizer};
pub use records::{CardParser, ListParser, parse_card_text, parse_list_cell};
pub use segment::Segmenter;
pub use text::{Vocabulary, normalize};
pub use types::{
    ADDRESS_NOT_AVAILABLE, CardRecord, CellBox, CellSplit, GuardianKind, ListRecord, NOT_STATED, RasterPage, RecordSet,
};
