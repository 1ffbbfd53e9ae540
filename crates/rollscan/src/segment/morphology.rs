//! Binary morphology with one-dimensional line kernels.
//!
//! Erosion and dilation by a `length x 1` (or `1 x length`) rectangle reduce
//! to a window count along each row (or column), done here with a running
//! prefix sum. Pixels outside the image never affect the result.

use image::{GrayImage, Luma};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Erode,
    Dilate,
}

/// Morphological opening (`iterations` erosions, then as many dilations)
/// with a line kernel. Keeps foreground runs along `axis` long enough to hold
/// the eroded kernel and removes everything else.
pub fn open_lines(mask: &GrayImage, axis: Axis, length: u32, iterations: u32) -> GrayImage {
    let mut out = mask.clone();
    for _ in 0..iterations {
        out = apply_line(&out, axis, length, Op::Erode);
    }
    for _ in 0..iterations {
        out = apply_line(&out, axis, length, Op::Dilate);
    }
    out
}

/// Pixelwise saturating union of two masks of the same size.
pub fn union(a: &GrayImage, b: &GrayImage) -> GrayImage {
    let (width, height) = a.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let other = if x < b.width() && y < b.height() { b.get_pixel(x, y)[0] } else { 0 };
        Luma([a.get_pixel(x, y)[0].max(other)])
    })
}

fn apply_line(mask: &GrayImage, axis: Axis, length: u32, op: Op) -> GrayImage {
    let (width, height) = mask.dimensions();
    let mut out = GrayImage::new(width, height);
    if width == 0 || height == 0 || length == 0 {
        return out;
    }

    let (lines, line_len) = match axis {
        Axis::Horizontal => (height, width),
        Axis::Vertical => (width, height),
    };
    let at = |line: u32, i: u32| match axis {
        Axis::Horizontal => (i, line),
        Axis::Vertical => (line, i),
    };

    // Erosion uses the kernel anchored at its centre; dilation uses its
    // reflection so that opening restores surviving runs exactly.
    let anchor = length / 2;
    let (before, after) = match op {
        Op::Erode => (anchor, length - 1 - anchor),
        Op::Dilate => (length - 1 - anchor, anchor),
    };

    let mut prefix = vec![0u32; line_len as usize + 1];
    for line in 0..lines {
        for i in 0..line_len {
            let (x, y) = at(line, i);
            prefix[i as usize + 1] = prefix[i as usize] + u32::from(mask.get_pixel(x, y)[0] != 0);
        }

        for i in 0..line_len {
            let lo = i.saturating_sub(before);
            let hi = i.saturating_add(after).min(line_len - 1);
            let count = prefix[hi as usize + 1] - prefix[lo as usize];
            let on = match op {
                Op::Erode => count == hi - lo + 1,
                Op::Dilate => count > 0,
            };
            if on {
                let (x, y) = at(line, i);
                out.put_pixel(x, y, Luma([255]));
            }
        }
    }
    out
}
