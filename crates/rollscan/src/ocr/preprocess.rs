//! Whole-card image preparation.

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage};
use imageproc::filter::median_filter;

use crate::core::config::CardPreprocessingConfig;

/// Grayscale, upscale and lightly denoise a card page before sparse OCR.
pub fn prepare_card_page(image: &DynamicImage, config: &CardPreprocessingConfig) -> DynamicImage {
    let gray = image.to_luma8();
    let scaled = upscale(gray, config.upscale_factor);
    let denoised = if config.denoise_radius > 0 {
        median_filter(&scaled, config.denoise_radius, config.denoise_radius)
    } else {
        scaled
    };
    DynamicImage::ImageLuma8(denoised)
}

fn upscale(gray: GrayImage, factor: f32) -> GrayImage {
    if (factor - 1.0).abs() < f32::EPSILON || gray.width() == 0 || gray.height() == 0 {
        return gray;
    }
    let width = ((gray.width() as f32) * factor).round().max(1.0) as u32;
    let height = ((gray.height() as f32) * factor).round().max(1.0) as u32;
    image::imageops::resize(&gray, width, height, FilterType::CatmullRom)
}
