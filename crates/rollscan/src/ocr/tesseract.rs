//! Tesseract-backed [`Recognizer`].

use std::env;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::{DynamicImage, RgbImage};
use kreuzberg_tesseract::{TessPageSegMode, TesseractAPI};

use super::{EngineConfig, Recognizer};
use crate::error::{Result, RollscanError};

const FALLBACK_TESSDATA_PATHS: [&str; 9] = [
    "/opt/homebrew/share/tessdata",
    "/opt/homebrew/opt/tesseract/share/tessdata",
    "/usr/local/opt/tesseract/share/tessdata",
    "/usr/share/tesseract-ocr/5/tessdata",
    "/usr/share/tesseract-ocr/4/tessdata",
    "/usr/share/tessdata",
    "/usr/local/share/tessdata",
    r#"C:\Program Files\Tesseract-OCR\tessdata"#,
    r#"C:\ProgramData\Tesseract-OCR\tessdata"#,
];

/// Runs Tesseract on a blocking thread per crop.
///
/// A fresh engine handle is initialized per call; handles are not shared
/// between threads.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    tessdata_path: String,
}

impl TesseractRecognizer {
    /// Resolve tessdata from the explicit path, `TESSDATA_PREFIX`, then the
    /// usual install locations.
    pub fn new(tessdata_path: Option<&Path>) -> Result<Self> {
        let resolved = tessdata_path
            .map(Path::to_path_buf)
            .or_else(|| env::var_os("TESSDATA_PREFIX").map(PathBuf::from))
            .or_else(|| {
                FALLBACK_TESSDATA_PATHS
                    .iter()
                    .map(PathBuf::from)
                    .find(|path| path.exists())
            })
            .map(|path| path.to_string_lossy().to_string())
            .unwrap_or_default();

        tracing::debug!(
            tessdata = %resolved,
            version = %TesseractAPI::version(),
            "Tesseract recognizer configured"
        );

        Ok(Self {
            tessdata_path: resolved,
        })
    }

    fn check_languages(&self, language: &str) -> Result<()> {
        if language.trim().is_empty() {
            return Err(RollscanError::validation(
                "Language cannot be empty. Please specify a valid language code (e.g., 'eng')",
            ));
        }
        if self.tessdata_path.is_empty() {
            return Ok(());
        }
        for lang in language.split('+').map(str::trim).filter(|l| !l.is_empty()) {
            let traineddata = Path::new(&self.tessdata_path).join(format!("{}.traineddata", lang));
            if !traineddata.exists() {
                return Err(RollscanError::MissingDependency(format!(
                    "Tesseract language '{}' not found: {}",
                    lang,
                    traineddata.display()
                )));
            }
        }
        Ok(())
    }
}

fn recognize_blocking(tessdata_path: &str, image: &RgbImage, language: &str, engine: &EngineConfig) -> Result<String> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Ok(String::new());
    }
    let bytes_per_pixel = 3;
    let bytes_per_line = width * bytes_per_pixel;

    let api = TesseractAPI::new();
    api.init(tessdata_path, language)
        .map_err(|e| RollscanError::ocr(format!("Failed to initialize language '{}': {}", language, e)))?;

    api.set_page_seg_mode(TessPageSegMode::from_int(engine.psm as i32))
        .map_err(|e| RollscanError::ocr(format!("Failed to set PSM mode: {}", e)))?;

    api.set_variable("tessedit_enable_dict_correction", &engine.dict_correction.to_string())
        .map_err(|e| RollscanError::ocr(format!("Failed to set tessedit_enable_dict_correction: {}", e)))?;

    if !engine.char_whitelist.is_empty() {
        api.set_variable("tessedit_char_whitelist", &engine.char_whitelist)
            .map_err(|e| RollscanError::ocr(format!("Failed to set tessedit_char_whitelist: {}", e)))?;
    }

    api.set_image(
        image.as_raw(),
        width as i32,
        height as i32,
        bytes_per_pixel as i32,
        bytes_per_line as i32,
    )
    .map_err(|e| RollscanError::ocr(format!("Failed to set image: {}", e)))?;

    api.recognize()
        .map_err(|e| RollscanError::ocr(format!("Failed to recognize text: {}", e)))?;

    api.get_utf8_text()
        .map_err(|e| RollscanError::ocr(format!("Failed to extract text: {}", e)))
}

#[async_trait]
impl Recognizer for TesseractRecognizer {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(&self, crop: &DynamicImage, language: &str, engine: &EngineConfig) -> Result<String> {
        engine.validate()?;
        self.check_languages(language)?;

        let tessdata_path = self.tessdata_path.clone();
        let image = crop.to_rgb8();
        let language = language.to_string();
        let engine = engine.clone();

        tokio::task::spawn_blocking(move || recognize_blocking(&tessdata_path, &image, &language, &engine))
            .await
            .map_err(|e| RollscanError::Other(format!("Tesseract task panicked: {}", e)))?
    }
}
