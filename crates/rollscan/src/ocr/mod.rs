//! OCR collaborator contract.
//!
//! The core never talks to an OCR engine directly. It hands crops to a
//! [`Recognizer`] together with a language hint and the engine settings for
//! the crop's [`CropKind`]. The Tesseract backend is available behind the
//! `tesseract` feature; tests drive the pipeline with scripted recognizers.

pub mod preprocess;
#[cfg(feature = "tesseract")]
pub mod tesseract;
pub mod types;

pub use preprocess::prepare_card_page;
#[cfg(feature = "tesseract")]
pub use tesseract::TesseractRecognizer;
pub use types::{CropKind, EngineConfig, PSMMode};

use async_trait::async_trait;
use image::DynamicImage;

use crate::Result;

/// Turns an image crop into text.
///
/// # Thread Safety
///
/// Recognizers are shared across concurrent cell tasks and must be
/// `Send + Sync`.
///
/// # Errors
///
/// An `Err` means the engine itself failed (initialization, missing language
/// data). A crop with nothing legible is `Ok` with empty text. The pipeline
/// downgrades a per-cell `Err` to empty text and keeps going.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Short identifier used in log messages.
    fn name(&self) -> &str;

    async fn recognize(&self, crop: &DynamicImage, language: &str, engine: &EngineConfig) -> Result<String>;
}
