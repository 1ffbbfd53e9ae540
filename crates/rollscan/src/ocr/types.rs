use serde::{Deserialize, Serialize};

use crate::error::{Result, RollscanError};

/// Page Segmentation Mode for Tesseract OCR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PSMMode {
    OsdOnly = 0,
    AutoOsd = 1,
    AutoOnly = 2,
    Auto = 3,
    SingleColumn = 4,
    SingleBlockVertical = 5,
    SingleBlock = 6,
    SingleLine = 7,
    SingleWord = 8,
    CircleWord = 9,
    SingleChar = 10,
    SparseText = 11,
    SparseTextOsd = 12,
    RawLine = 13,
}

impl PSMMode {
    pub fn from_u8(value: u8) -> std::result::Result<Self, String> {
        match value {
            0 => Ok(PSMMode::OsdOnly),
            1 => Ok(PSMMode::AutoOsd),
            2 => Ok(PSMMode::AutoOnly),
            3 => Ok(PSMMode::Auto),
            4 => Ok(PSMMode::SingleColumn),
            5 => Ok(PSMMode::SingleBlockVertical),
            6 => Ok(PSMMode::SingleBlock),
            7 => Ok(PSMMode::SingleLine),
            8 => Ok(PSMMode::SingleWord),
            9 => Ok(PSMMode::CircleWord),
            10 => Ok(PSMMode::SingleChar),
            11 => Ok(PSMMode::SparseText),
            12 => Ok(PSMMode::SparseTextOsd),
            13 => Ok(PSMMode::RawLine),
            _ => Err(format!("Invalid PSM mode value: {}", value)),
        }
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

/// What a crop contains; decides which engine settings are requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropKind {
    /// Paragraph-like text of a list cell.
    Prose,
    /// The short identifier strip at the right of a list cell.
    Identifier,
    /// Form-like whole-card layouts.
    Sparse,
}

/// Per crop kind engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_psm")]
    pub psm: u8,

    /// Restrict recognition to these characters (empty = no restriction)
    #[serde(default)]
    pub char_whitelist: String,

    #[serde(default = "default_true")]
    pub dict_correction: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::prose()
    }
}

impl EngineConfig {
    pub fn prose() -> Self {
        Self {
            psm: PSMMode::SingleBlock.as_u8(),
            char_whitelist: String::new(),
            dict_correction: true,
        }
    }

    pub fn identifier() -> Self {
        Self {
            psm: PSMMode::SingleLine.as_u8(),
            char_whitelist: "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789".to_string(),
            dict_correction: false,
        }
    }

    pub fn sparse() -> Self {
        Self {
            psm: PSMMode::SparseText.as_u8(),
            char_whitelist: String::new(),
            dict_correction: true,
        }
    }

    pub fn psm_mode(&self) -> Result<PSMMode> {
        PSMMode::from_u8(self.psm).map_err(RollscanError::validation)
    }

    pub fn validate(&self) -> Result<()> {
        self.psm_mode().map(|_| ())
    }
}

fn default_psm() -> u8 {
    PSMMode::SingleBlock.as_u8()
}

fn default_true() -> bool {
    true
}
