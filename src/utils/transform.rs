//! Geometric transforms for grayscale images.

use image::{GrayImage, Luma};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};

/// Coefficient of the cubic convolution kernel (same value OpenCV uses).
const CUBIC_A: f32 = -0.75;

/// Rotates a binary mask about its centre with nearest-neighbour sampling.
///
/// Positive angles rotate counter-clockwise as displayed. Pixels whose
/// pre-image falls outside the mask become background (0). A new buffer is
/// returned; the input is left untouched.
pub fn rotate_mask(mask: &GrayImage, angle_degrees: f32) -> GrayImage {
    // imageproc rotates clockwise for positive theta.
    rotate_about_center(
        mask,
        -angle_degrees.to_radians(),
        Interpolation::Nearest,
        Luma([0]),
    )
}

/// Rotates an image about its centre with bicubic interpolation and
/// edge-replicating borders.
///
/// Uses the same angle convention as [`rotate_mask`]. Out-of-range source
/// coordinates are clamped to the nearest edge pixel, so no values are
/// invented at the borders. An angle of zero returns an unchanged copy.
pub fn rotate_bicubic_replicate(image: &GrayImage, angle_degrees: f32) -> GrayImage {
    if angle_degrees == 0.0 {
        return image.clone();
    }
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let cx = (width / 2) as f32;
    let cy = (height / 2) as f32;
    let (sin, cos) = angle_degrees.to_radians().sin_cos();

    GrayImage::from_fn(width, height, |x, y| {
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        // Inverse mapping: destination back to source.
        let sx = cx + cos * dx - sin * dy;
        let sy = cy + sin * dx + cos * dy;
        Luma([sample_bicubic_replicate(image, sx, sy)])
    })
}

fn cubic_weight(t: f32) -> f32 {
    let t = t.abs();
    if t <= 1.0 {
        ((CUBIC_A + 2.0) * t - (CUBIC_A + 3.0)) * t * t + 1.0
    } else if t < 2.0 {
        ((CUBIC_A * t - 5.0 * CUBIC_A) * t + 8.0 * CUBIC_A) * t - 4.0 * CUBIC_A
    } else {
        0.0
    }
}

fn sample_bicubic_replicate(image: &GrayImage, sx: f32, sy: f32) -> u8 {
    let (width, height) = image.dimensions();
    let max_x = width as i64 - 1;
    let max_y = height as i64 - 1;

    let x0 = sx.floor();
    let y0 = sy.floor();
    let fx = sx - x0;
    let fy = sy - y0;
    let x0 = x0 as i64;
    let y0 = y0 as i64;

    let mut acc = 0.0f32;
    for j in -1..=2i64 {
        let wy = cubic_weight(j as f32 - fy);
        if wy == 0.0 {
            continue;
        }
        let py = (y0 + j).clamp(0, max_y) as u32;
        for i in -1..=2i64 {
            let wx = cubic_weight(i as f32 - fx);
            if wx == 0.0 {
                continue;
            }
            let px = (x0 + i).clamp(0, max_x) as u32;
            acc += wx * wy * image.get_pixel(px, py).0[0] as f32;
        }
    }
    acc.round().clamp(0.0, 255.0) as u8
}
