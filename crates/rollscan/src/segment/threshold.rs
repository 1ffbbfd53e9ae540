//! Adaptive mean thresholding.

use image::{GrayImage, Luma};

/// Inverted adaptive threshold: a pixel is foreground (255) when it is at
/// least `offset` darker than the mean of the `block_size` square around it.
///
/// The mean is taken over the in-bounds part of the window, so borders are
/// not padded. Uses an integral image; cost is independent of `block_size`.
pub fn adaptive_mean_threshold_inv(gray: &GrayImage, block_size: u32, offset: i32) -> GrayImage {
    let (width, height) = gray.dimensions();
    let mut out = GrayImage::new(width, height);
    if width == 0 || height == 0 {
        return out;
    }

    let integral = integral_image(gray);
    let stride = width as usize + 1;
    let radius = block_size / 2;

    for y in 0..height {
        let top = y.saturating_sub(radius) as usize;
        let bottom = (y + radius).min(height - 1) as usize + 1;
        for x in 0..width {
            let left = x.saturating_sub(radius) as usize;
            let right = (x + radius).min(width - 1) as usize + 1;

            let sum = integral[bottom * stride + right] + integral[top * stride + left]
                - integral[top * stride + right]
                - integral[bottom * stride + left];
            let count = ((bottom - top) * (right - left)) as i64;

            let value = i64::from(gray.get_pixel(x, y)[0]);
            if value * count <= sum as i64 - i64::from(offset) * count {
                out.put_pixel(x, y, Luma([255]));
            }
        }
    }
    out
}

/// `(w + 1) x (h + 1)` summed-area table with a zero first row and column.
fn integral_image(gray: &GrayImage) -> Vec<u64> {
    let (width, height) = gray.dimensions();
    let stride = width as usize + 1;
    let mut table = vec![0u64; stride * (height as usize + 1)];

    for y in 0..height as usize {
        let mut row_sum = 0u64;
        for x in 0..width as usize {
            row_sum += u64::from(gray.get_pixel(x as u32, y as u32)[0]);
            table[(y + 1) * stride + x + 1] = table[y * stride + x + 1] + row_sum;
        }
    }
    table
}
