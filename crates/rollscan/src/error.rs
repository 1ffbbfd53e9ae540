//! Error types for rollscan.
//!
//! Errors only exist at the edges of the crate: loading configuration,
//! compiling a vocabulary, decoding images and talking to the OCR engine.
//! Field extraction itself never fails; it degrades to sentinel values
//! (see [`crate::types::NOT_STATED`]).
//!
//! # Error Handling Philosophy
//!
//! **System errors MUST always bubble up unchanged:**
//! - `RollscanError::Io` (from `std::io::Error`) - file system and permission errors
//!
//! **Application errors are wrapped with context:**
//! - `Validation` - invalid configuration, vocabulary or parameters
//! - `Ocr` - recognizer failures (the pipeline downgrades these per cell)
//! - `ImageProcessing` - undecodable or degenerate raster input
//! - `MissingDependency` - an optional backend that was not compiled in
//!
//! # Example
//!
//! ```rust
//! use rollscan::{RollscanError, Result};
//!
//! fn load_labels(path: &str) -> Result<String> {
//!     let content = std::fs::read_to_string(path)?;
//!
//!     if content.trim().is_empty() {
//!         return Err(RollscanError::validation(format!("Label file is empty: {}", path)));
//!     }
//!
//!     Ok(content)
//! }
//! ```
use thiserror::Error;

/// Result type alias using `RollscanError`.
pub type Result<T> = std::result::Result<T, RollscanError>;

/// Main error type for all rollscan operations.
#[derive(Debug, Error)]
pub enum RollscanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("OCR error: {message}")]
    Ocr {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Image processing error: {message}")]
    ImageProcessing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for RollscanError {
    fn from(err: serde_json::Error) -> Self {
        RollscanError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<image::ImageError> for RollscanError {
    fn from(err: image::ImageError) -> Self {
        RollscanError::ImageProcessing {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl RollscanError {
    error_constructor!(validation, Validation);
    error_constructor!(ocr, Ocr);
    error_constructor!(image_processing, ImageProcessing);
    error_constructor!(serialization, Serialization);
}
