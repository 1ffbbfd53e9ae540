//! Configuration loading and management.
//!
//! This module provides utilities for loading pipeline configuration from various
//! sources (TOML, YAML, JSON) and discovering configuration files in the project hierarchy.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ocr::types::{CropKind, EngineConfig};
use crate::text::vocabulary::Vocabulary;
use crate::{Result, RollscanError};

/// Main pipeline configuration.
///
/// Every field has a default, so a config file only needs the values it
/// changes.
///
/// # Example
///
/// ```rust
/// use rollscan::core::config::RollscanConfig;
///
/// // Create with defaults
/// let config = RollscanConfig::default();
/// assert_eq!(config.segmentation.threshold_block_size, 15);
///
/// // Load from TOML file
/// // let config = RollscanConfig::from_toml_file("rollscan.toml")?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollscanConfig {
    /// Table segmentation parameters
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// OCR languages and per crop kind engine settings
    #[serde(default)]
    pub ocr: OcrConfig,

    /// Whole-card image preparation
    #[serde(default)]
    pub card_preprocessing: CardPreprocessingConfig,

    /// Maximum concurrent cell OCR tasks (None = num_cpus * 2)
    #[serde(default)]
    pub max_concurrent_cells: Option<usize>,

    /// Curated labels and tokens driving the field rules
    #[serde(default)]
    pub vocabulary: Vocabulary,
}

/// Table segmentation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Side of the square adaptive threshold window (odd, >= 3)
    #[serde(default = "default_block_size")]
    pub threshold_block_size: u32,

    /// Subtracted from the local mean before thresholding
    #[serde(default = "default_threshold_offset")]
    pub threshold_offset: i32,

    /// Length of the horizontal/vertical line structuring elements
    #[serde(default = "default_kernel_length")]
    pub line_kernel_length: u32,

    #[serde(default = "default_iterations")]
    pub line_iterations: u32,

    #[serde(default = "default_min_width")]
    pub min_cell_width: u32,

    #[serde(default = "default_max_width")]
    pub max_cell_width: u32,

    #[serde(default = "default_min_height")]
    pub min_cell_height: u32,

    #[serde(default = "default_max_height")]
    pub max_cell_height: u32,

    /// Fraction of a cell's width given to the text crop
    #[serde(default = "default_split_ratio")]
    pub text_split_ratio: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            threshold_block_size: default_block_size(),
            threshold_offset: default_threshold_offset(),
            line_kernel_length: default_kernel_length(),
            line_iterations: default_iterations(),
            min_cell_width: default_min_width(),
            max_cell_width: default_max_width(),
            min_cell_height: default_min_height(),
            max_cell_height: default_max_height(),
            text_split_ratio: default_split_ratio(),
        }
    }
}

impl SegmentationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.threshold_block_size < 3 || self.threshold_block_size % 2 == 0 {
            return Err(RollscanError::validation(format!(
                "threshold_block_size must be odd and at least 3, got {}",
                self.threshold_block_size
            )));
        }
        if self.line_kernel_length < 2 {
            return Err(RollscanError::validation(format!(
                "line_kernel_length must be at least 2, got {}",
                self.line_kernel_length
            )));
        }
        if self.line_iterations == 0 {
            return Err(RollscanError::validation("line_iterations must be at least 1"));
        }
        if self.min_cell_width > self.max_cell_width {
            return Err(RollscanError::validation(format!(
                "min_cell_width ({}) exceeds max_cell_width ({})",
                self.min_cell_width, self.max_cell_width
            )));
        }
        if self.min_cell_height > self.max_cell_height {
            return Err(RollscanError::validation(format!(
                "min_cell_height ({}) exceeds max_cell_height ({})",
                self.min_cell_height, self.max_cell_height
            )));
        }
        if !(self.text_split_ratio > 0.0 && self.text_split_ratio < 1.0) {
            return Err(RollscanError::validation(format!(
                "text_split_ratio must be between 0 and 1, got {}",
                self.text_split_ratio
            )));
        }
        Ok(())
    }

    /// Inclusive size bounds check for a candidate cell.
    pub fn accepts(&self, width: u32, height: u32) -> bool {
        (self.min_cell_width..=self.max_cell_width).contains(&width)
            && (self.min_cell_height..=self.max_cell_height).contains(&height)
    }
}

/// OCR configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Language hint for list pages (e.g., "eng")
    #[serde(default = "default_language")]
    pub language: String,

    /// Language hint for whole-card scans (e.g., "eng+hin")
    #[serde(default = "default_card_language")]
    pub card_language: String,

    #[serde(default = "EngineConfig::prose")]
    pub prose: EngineConfig,

    #[serde(default = "EngineConfig::identifier")]
    pub identifier: EngineConfig,

    #[serde(default = "EngineConfig::sparse")]
    pub sparse: EngineConfig,

    /// Per-crop recognition timeout in milliseconds (None = no timeout)
    #[serde(default)]
    pub cell_timeout_ms: Option<u64>,

    /// Tesseract language data directory (None = TESSDATA_PREFIX or system paths)
    #[serde(default)]
    pub tessdata_path: Option<PathBuf>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            card_language: default_card_language(),
            prose: EngineConfig::prose(),
            identifier: EngineConfig::identifier(),
            sparse: EngineConfig::sparse(),
            cell_timeout_ms: None,
            tessdata_path: None,
        }
    }
}

impl OcrConfig {
    /// Engine settings requested for a crop kind.
    pub fn engine(&self, kind: CropKind) -> &EngineConfig {
        match kind {
            CropKind::Prose => &self.prose,
            CropKind::Identifier => &self.identifier,
            CropKind::Sparse => &self.sparse,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.language.trim().is_empty() || self.card_language.trim().is_empty() {
            return Err(RollscanError::validation("OCR language hints cannot be empty"));
        }
        if self.cell_timeout_ms == Some(0) {
            return Err(RollscanError::validation("cell_timeout_ms must be greater than 0"));
        }
        self.prose.validate()?;
        self.identifier.validate()?;
        self.sparse.validate()
    }
}

/// Whole-card image preparation before sparse OCR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardPreprocessingConfig {
    /// Resize factor applied with cubic interpolation
    #[serde(default = "default_upscale_factor")]
    pub upscale_factor: f32,

    /// Median filter radius (0 = no denoising)
    #[serde(default = "default_denoise_radius")]
    pub denoise_radius: u32,
}

impl Default for CardPreprocessingConfig {
    fn default() -> Self {
        Self {
            upscale_factor: default_upscale_factor(),
            denoise_radius: default_denoise_radius(),
        }
    }
}

impl CardPreprocessingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.upscale_factor > 0.0 && self.upscale_factor <= 8.0) {
            return Err(RollscanError::validation(format!(
                "upscale_factor must be in (0, 8], got {}",
                self.upscale_factor
            )));
        }
        Ok(())
    }
}

fn default_block_size() -> u32 {
    15
}

fn default_threshold_offset() -> i32 {
    4
}

fn default_kernel_length() -> u32 {
    40
}

fn default_iterations() -> u32 {
    2
}

fn default_min_width() -> u32 {
    350
}

fn default_max_width() -> u32 {
    900
}

fn default_min_height() -> u32 {
    180
}

fn default_max_height() -> u32 {
    350
}

fn default_split_ratio() -> f64 {
    0.72
}

fn default_language() -> String {
    "eng".to_string()
}

fn default_card_language() -> String {
    "eng+hin".to_string()
}

fn default_upscale_factor() -> f32 {
    2.0
}

fn default_denoise_radius() -> u32 {
    1
}

impl RollscanConfig {
    /// Check every section; called by the pipeline before any work starts.
    pub fn validate(&self) -> Result<()> {
        self.segmentation.validate()?;
        self.ocr.validate()?;
        self.card_preprocessing.validate()?;
        if self.max_concurrent_cells == Some(0) {
            return Err(RollscanError::validation("max_concurrent_cells must be greater than 0"));
        }
        Ok(())
    }

    /// Effective concurrency limit for cell OCR.
    pub fn concurrency(&self) -> usize {
        self.max_concurrent_cells.unwrap_or_else(|| num_cpus::get() * 2).max(1)
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RollscanError::validation(format!("Failed to read config file {}: {}", path.as_ref().display(), e))
        })?;

        toml::from_str(&content)
            .map_err(|e| RollscanError::validation(format!("Invalid TOML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RollscanError::validation(format!("Failed to read config file {}: {}", path.as_ref().display(), e))
        })?;

        serde_yaml_ng::from_str(&content)
            .map_err(|e| RollscanError::validation(format!("Invalid YAML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RollscanError::validation(format!("Failed to read config file {}: {}", path.as_ref().display(), e))
        })?;

        serde_json::from_str(&content)
            .map_err(|e| RollscanError::validation(format!("Invalid JSON in {}: {}", path.as_ref().display(), e)))
    }

    /// Load a config file, choosing the format by extension (defaults to TOML).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Discover configuration file in parent directories.
    ///
    /// Searches for `rollscan.toml` in current directory and parent directories.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if found
    /// - `None` if no config file found
    pub fn discover() -> Result<Option<Self>> {
        let current = std::env::current_dir().map_err(RollscanError::Io)?;
        Self::discover_from(&current)
    }

    /// Same as [`discover`](Self::discover) starting from `start`.
    pub fn discover_from(start: &Path) -> Result<Option<Self>> {
        let mut current = start.to_path_buf();

        loop {
            let rollscan_toml = current.join("rollscan.toml");
            if rollscan_toml.exists() {
                tracing::debug!(path = %rollscan_toml.display(), "Discovered config file");
                return Ok(Some(Self::from_toml_file(rollscan_toml)?));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = RollscanConfig::default();
        assert_eq!(config.segmentation.threshold_block_size, 15);
        assert_eq!(config.segmentation.line_kernel_length, 40);
        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.ocr.card_language, "eng+hin");
        assert!(config.max_concurrent_cells.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("rollscan.toml");

        fs::write(
            &config_path,
            r#"
max_concurrent_cells = 3

[segmentation]
min_cell_width = 300

[ocr]
card_language = "eng"
cell_timeout_ms = 5000
"#,
        )
        .unwrap();

        let config = RollscanConfig::from_toml_file(&config_path).unwrap();
        assert_eq!(config.max_concurrent_cells, Some(3));
        assert_eq!(config.segmentation.min_cell_width, 300);
        assert_eq!(config.segmentation.max_cell_width, 900);
        assert_eq!(config.ocr.card_language, "eng");
        assert_eq!(config.ocr.cell_timeout_ms, Some(5000));
        assert_eq!(config.ocr.identifier, EngineConfig::identifier());
        assert_eq!(config.concurrency(), 3);
    }

    #[test]
    fn test_from_yaml_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("rollscan.yaml");

        fs::write(
            &config_path,
            r#"
card_preprocessing:
  upscale_factor: 1.5
vocabulary:
  age_labels: ["AGE", "AOE"]
"#,
        )
        .unwrap();

        let config = RollscanConfig::from_file(&config_path).unwrap();
        assert_eq!(config.card_preprocessing.upscale_factor, 1.5);
        assert_eq!(config.card_preprocessing.denoise_radius, 1);
        assert_eq!(config.vocabulary.age_labels, vec!["AGE".to_string(), "AOE".to_string()]);
        assert_eq!(config.vocabulary.regions, Vocabulary::default().regions);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("rollscan.json");
        fs::write(&config_path, r#"{"ocr": {"sparse": {"psm": 12}}}"#).unwrap();

        let config = RollscanConfig::from_file(&config_path).unwrap();
        assert_eq!(config.ocr.engine(CropKind::Sparse).psm, 12);
        assert_eq!(config.ocr.engine(CropKind::Prose).psm, 6);
    }

    #[test]
    fn test_invalid_toml_names_path() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("broken.toml");
        fs::write(&config_path, "segmentation = [").unwrap();

        let err = RollscanConfig::from_toml_file(&config_path).unwrap_err();
        assert!(matches!(err, RollscanError::Validation { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_missing_file() {
        let err = RollscanConfig::from_toml_file("/nonexistent/rollscan.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_discover_walks_up() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("rollscan.toml"), "max_concurrent_cells = 7\n").unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let config = RollscanConfig::discover_from(&nested).unwrap().unwrap();
        assert_eq!(config.max_concurrent_cells, Some(7));
    }

    #[test]
    fn test_segmentation_validation() {
        let even_block = SegmentationConfig {
            threshold_block_size: 14,
            ..SegmentationConfig::default()
        };
        assert!(even_block.validate().is_err());

        let inverted = SegmentationConfig {
            min_cell_height: 400,
            ..SegmentationConfig::default()
        };
        assert!(inverted.validate().is_err());

        let ratio = SegmentationConfig {
            text_split_ratio: 1.0,
            ..SegmentationConfig::default()
        };
        assert!(ratio.validate().is_err());

        let no_iterations = SegmentationConfig {
            line_iterations: 0,
            ..SegmentationConfig::default()
        };
        assert!(no_iterations.validate().is_err());
    }

    #[test]
    fn test_size_bounds_are_inclusive() {
        let config = SegmentationConfig::default();
        assert!(config.accepts(350, 180));
        assert!(config.accepts(900, 350));
        assert!(!config.accepts(349, 200));
        assert!(!config.accepts(500, 351));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = RollscanConfig {
            max_concurrent_cells: Some(0),
            ..RollscanConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
