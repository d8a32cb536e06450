//! Laplacian-variance sharpness measurement.

use image::GrayImage;
use imageproc::contrast::{ThresholdType, threshold};
use imageproc::filter::gaussian_blur_f32;

use crate::core::constants::BINARIZATION_LEVEL;

/// Reflect-101 border index, the default border mode of common vision
/// libraries: `-1 -> 1`, `len -> len - 2`.
fn reflect_101(i: i64, len: i64) -> u32 {
    if len == 1 {
        return 0;
    }
    let mut i = i;
    if i < 0 {
        i = -i;
    }
    if i >= len {
        i = 2 * (len - 1) - i;
    }
    i.clamp(0, len - 1) as u32
}

/// Variance of the 3x3 Laplacian response over every pixel.
///
/// Kernel `[0,1,0; 1,-4,1; 0,1,0]`, reflect-101 borders, evaluated in f64.
/// Returns 0 for an empty image.
pub fn laplacian_variance(gray: &GrayImage) -> f64 {
    let (width, height) = gray.dimensions();
    let n = width as u64 * height as u64;
    if n == 0 {
        return 0.0;
    }
    let (w, h) = (width as i64, height as i64);
    let at = |x: i64, y: i64| gray.get_pixel(reflect_101(x, w), reflect_101(y, h)).0[0] as f64;

    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for y in 0..h {
        for x in 0..w {
            let lap = at(x, y - 1) + at(x, y + 1) + at(x - 1, y) + at(x + 1, y) - 4.0 * at(x, y);
            sum += lap;
            sum_sq += lap * lap;
        }
    }
    let n = n as f64;
    let mean = sum / n;
    (sum_sq / n - mean * mean).max(0.0)
}

/// The sharpness statistic the quality gate compares against its threshold.
///
/// Optionally binarizes at mid-gray, always smooths with a Gaussian of
/// `sigma`, then measures the Laplacian variance.
pub fn sharpness(gray: &GrayImage, apply_binarization: bool, sigma: f32) -> f64 {
    let prepared = if apply_binarization {
        threshold(gray, BINARIZATION_LEVEL, ThresholdType::Binary)
    } else {
        gray.clone()
    };
    let smoothed = if sigma > 0.0 && prepared.width() > 0 && prepared.height() > 0 {
        gaussian_blur_f32(&prepared, sigma)
    } else {
        prepared
    };
    laplacian_variance(&smoothed)
}
