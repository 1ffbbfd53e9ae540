//! Pipeline orchestration and configuration.
//!
//! # Architecture
//!
//! - **Configuration**: Loading and validating [`RollscanConfig`]
//! - **Pipeline**: [`RollPipeline`] segments list pages, fans cell OCR out over a
//!   bounded task pool and assembles records in cell order; card documents
//!   are preprocessed, recognized page by page and parsed as one text
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use rollscan::core::config::RollscanConfig;
//! use rollscan::core::pipeline::RollPipeline;
//! use rollscan::ocr::Recognizer;
//! use rollscan::types::RasterPage;
//!
//! # async fn example(recognizer: Arc<dyn Recognizer>) -> rollscan::Result<()> {
//! let pipeline = RollPipeline::new(RollscanConfig::default(), recognizer)?;
//! let page = RasterPage::open(0, "page-001.png")?;
//! let records = pipeline.process_list_document(vec![page]).await?;
//! println!("{} voters", records.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod pipeline;

pub use config::{CardPreprocessingConfig, OcrConfig, RollscanConfig, SegmentationConfig};
pub use pipeline::RollPipeline;
