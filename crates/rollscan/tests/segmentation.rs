//! Segmentation integration tests on synthetic list pages.

use image::{DynamicImage, GrayImage, Luma};
use rollscan::core::config::SegmentationConfig;
use rollscan::segment::Segmenter;
use rollscan::types::{CellBox, RasterPage};

fn draw_box(gray: &mut GrayImage, cell: CellBox, thickness: u32) {
    for y in cell.y..cell.bottom() {
        for x in cell.x..cell.right() {
            let on_edge = x < cell.x + thickness
                || x >= cell.right() - thickness
                || y < cell.y + thickness
                || y >= cell.bottom() - thickness;
            if on_edge {
                gray.put_pixel(x, y, Luma([0]));
            }
        }
    }
}

/// Short dark strokes, about the size of printed glyphs.
fn scribble(gray: &mut GrayImage, x0: u32, y0: u32) {
    for i in 0..12 {
        gray.put_pixel(x0 + i, y0, Luma([20]));
        gray.put_pixel(x0 + i, y0 + 1, Luma([20]));
        gray.put_pixel(x0, y0 + i, Luma([20]));
        gray.put_pixel(x0 + 1, y0 + i, Luma([20]));
    }
}

fn grid_page() -> (RasterPage, Vec<CellBox>) {
    let mut gray = GrayImage::from_pixel(1400, 700, Luma([255]));
    let mut cells = Vec::new();
    for row in 0..2 {
        for col in 0..3 {
            let cell = CellBox::new(20 + col * 450, 30 + row * 320, 420, 260);
            draw_box(&mut gray, cell, 2);
            for k in 0..6 {
                scribble(&mut gray, cell.x + 30 + k * 40, cell.y + 60);
            }
            cells.push(cell);
        }
    }
    (RasterPage::new(0, DynamicImage::ImageLuma8(gray)), cells)
}

#[test]
fn test_cells_found_in_row_major_order() {
    let (page, expected) = grid_page();
    let segmenter = Segmenter::new(SegmentationConfig::default()).unwrap();

    let splits = segmenter.segment(&page);

    let cells: Vec<CellBox> = splits.iter().map(|split| split.cell).collect();
    assert_eq!(cells, expected, "Text strokes must not produce cells");
}

#[test]
fn test_splits_partition_each_cell() {
    let (page, _) = grid_page();
    let segmenter = Segmenter::new(SegmentationConfig::default()).unwrap();

    for split in segmenter.segment(&page) {
        assert_eq!(split.text.x, split.cell.x);
        assert_eq!(split.text.width, (420.0_f64 * 0.72).floor() as u32);
        assert_eq!(split.identifier.x, split.text.right());
        assert_eq!(split.identifier.right(), split.cell.right());
        assert_eq!(split.text.height, split.cell.height);
    }
}

#[test]
fn test_size_bounds_are_inclusive() {
    let mut gray = GrayImage::from_pixel(900, 500, Luma([255]));
    let exact = CellBox::new(20, 20, 350, 180);
    let narrow = CellBox::new(450, 20, 349, 180);
    draw_box(&mut gray, exact, 2);
    draw_box(&mut gray, narrow, 2);

    let segmenter = Segmenter::new(SegmentationConfig::default()).unwrap();
    assert_eq!(segmenter.detect_cells(&gray), vec![exact]);
}

#[test]
fn test_custom_bounds_admit_small_cells() {
    let mut gray = GrayImage::from_pixel(500, 300, Luma([255]));
    let cell = CellBox::new(40, 40, 200, 120);
    draw_box(&mut gray, cell, 2);

    let config = SegmentationConfig {
        min_cell_width: 150,
        min_cell_height: 100,
        ..SegmentationConfig::default()
    };
    let segmenter = Segmenter::new(config).unwrap();
    assert_eq!(segmenter.detect_cells(&gray), vec![cell]);
}

#[test]
fn test_pages_keep_input_order() {
    let (first, expected) = grid_page();
    let blank = RasterPage::new(1, DynamicImage::ImageLuma8(GrayImage::from_pixel(800, 600, Luma([255]))));
    let segmenter = Segmenter::new(SegmentationConfig::default()).unwrap();

    let per_page = segmenter.segment_pages(&[first, blank]);

    assert_eq!(per_page.len(), 2);
    assert_eq!(per_page[0].len(), expected.len());
    assert!(per_page[1].is_empty());
}
