//! Table segmentation.
//!
//! Voter-roll pages print one ruled box per voter. Boxes are found by
//! isolating long horizontal and vertical rulings from an adaptively
//! thresholded page, taking the outer contour of each connected ruling shape
//! and keeping the bounding rectangles that fall inside the expected cell
//! size. Text strokes are too short to survive the line opening, so they never
//! produce candidate boxes.

pub mod morphology;
pub mod threshold;

use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use rayon::prelude::*;

use crate::Result;
use crate::core::config::SegmentationConfig;
use crate::types::{CellBox, CellSplit, RasterPage};

pub use morphology::{Axis, open_lines, union};
pub use threshold::adaptive_mean_threshold_inv;

/// Locates voter cells on list pages.
#[derive(Debug, Clone)]
pub struct Segmenter {
    config: SegmentationConfig,
}

impl Segmenter {
    pub fn new(config: SegmentationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Foreground mask of the page's table rulings.
    pub fn ruling_mask(&self, gray: &GrayImage) -> GrayImage {
        let cfg = &self.config;
        let bw = adaptive_mean_threshold_inv(gray, cfg.threshold_block_size, cfg.threshold_offset);
        let horizontal = open_lines(&bw, Axis::Horizontal, cfg.line_kernel_length, cfg.line_iterations);
        let vertical = open_lines(&bw, Axis::Vertical, cfg.line_kernel_length, cfg.line_iterations);
        union(&horizontal, &vertical)
    }

    /// Cell boxes of a grayscale page, sorted by `(y, x)`.
    pub fn detect_cells(&self, gray: &GrayImage) -> Vec<CellBox> {
        let mask = self.ruling_mask(gray);

        let mut boxes: Vec<CellBox> = find_contours::<u32>(&mask)
            .into_iter()
            .filter(|contour| contour.border_type == BorderType::Outer && contour.parent.is_none())
            .filter_map(|contour| {
                let min_x = contour.points.iter().map(|p| p.x).min()?;
                let max_x = contour.points.iter().map(|p| p.x).max()?;
                let min_y = contour.points.iter().map(|p| p.y).min()?;
                let max_y = contour.points.iter().map(|p| p.y).max()?;
                Some(CellBox::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
            })
            .filter(|cell| self.config.accepts(cell.width, cell.height))
            .collect();

        boxes.sort();
        boxes
    }

    /// Cells of one page, each split into its text and identifier crops.
    pub fn segment(&self, page: &RasterPage) -> Vec<CellSplit> {
        let gray = page.image().to_luma8();
        let cells: Vec<CellSplit> = self
            .detect_cells(&gray)
            .iter()
            .map(|cell| cell.split(self.config.text_split_ratio))
            .collect();

        tracing::debug!(
            page = page.page_number(),
            width = page.width(),
            height = page.height(),
            cells = cells.len(),
            "Segmented list page"
        );
        cells
    }

    /// Segment many pages in parallel; output order follows `pages`.
    pub fn segment_pages(&self, pages: &[RasterPage]) -> Vec<Vec<CellSplit>> {
        pages.par_iter().map(|page| self.segment(page)).collect()
    }
}
