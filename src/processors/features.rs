//! Oriented binary keypoint descriptors and ratio-test matching.
//!
//! Keypoints are FAST-9 corners. Each keypoint gets an orientation from the
//! intensity centroid of its patch, and a 256-bit BRIEF descriptor whose
//! sampling pattern is rotated by that orientation, which makes descriptors
//! rotation-invariant. Scale is normalized upstream by resizing every image
//! to the same canonical size.

use image::GrayImage;
use imageproc::corners::corners_fast9;
use imageproc::filter::gaussian_blur_f32;
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Radius of the patch used for orientation.
const PATCH_RADIUS: i32 = 15;
/// Radius of the disk the sampling pairs are drawn from.
const SAMPLE_RADIUS: i32 = 13;
/// Keypoints closer than this to the border are discarded.
const BORDER_MARGIN: u32 = 16;
/// Non-maximum suppression radius.
const NMS_RADIUS: u32 = 3;
/// Smoothing applied before sampling descriptor pairs.
const DESCRIPTOR_SIGMA: f32 = 2.0;
const DESCRIPTOR_BITS: usize = 256;
const PATTERN_SEED: u64 = 0x0a12_5eed;

type TestPair = ((i32, i32), (i32, i32));

/// Fixed sampling pattern shared by every descriptor.
static PATTERN: Lazy<Vec<TestPair>> = Lazy::new(|| {
    let mut rng = StdRng::seed_from_u64(PATTERN_SEED);
    let mut point = || loop {
        let x = rng.gen_range(-SAMPLE_RADIUS..=SAMPLE_RADIUS);
        let y = rng.gen_range(-SAMPLE_RADIUS..=SAMPLE_RADIUS);
        if x * x + y * y <= SAMPLE_RADIUS * SAMPLE_RADIUS {
            return (x, y);
        }
    };
    let mut pairs = Vec::with_capacity(DESCRIPTOR_BITS);
    while pairs.len() < DESCRIPTOR_BITS {
        let p = point();
        let q = point();
        if p != q {
            pairs.push((p, q));
        }
    }
    pairs
});

/// A detected corner with its orientation in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    pub x: u32,
    pub y: u32,
    pub score: f32,
    pub angle: f32,
}

/// A 256-bit binary descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Descriptor {
    bits: [u64; 4],
}

impl Descriptor {
    pub fn hamming_distance(&self, other: &Descriptor) -> u32 {
        self.bits
            .iter()
            .zip(other.bits.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }
}

/// Keypoints and their descriptors, index-aligned.
#[derive(Debug, Clone, Default)]
pub struct FeatureSet {
    pub keypoints: Vec<Keypoint>,
    pub descriptors: Vec<Descriptor>,
}

impl FeatureSet {
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Detects keypoints and computes descriptors on canonical images.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    max_keypoints: usize,
    fast_threshold: u8,
}

impl FeatureExtractor {
    pub fn new(max_keypoints: usize, fast_threshold: u8) -> Self {
        Self {
            max_keypoints,
            fast_threshold,
        }
    }

    /// Extracts features from a grayscale image.
    pub fn extract(&self, gray: &GrayImage) -> FeatureSet {
        let (width, height) = gray.dimensions();
        if width <= 2 * BORDER_MARGIN || height <= 2 * BORDER_MARGIN {
            return FeatureSet::default();
        }

        let smoothed = gaussian_blur_f32(gray, DESCRIPTOR_SIGMA);
        let keypoints: Vec<Keypoint> = self
            .detect(gray)
            .into_iter()
            .map(|(x, y, score)| Keypoint {
                x,
                y,
                score,
                angle: centroid_angle(&smoothed, x, y),
            })
            .collect();

        let descriptors = keypoints
            .iter()
            .map(|kp| describe(&smoothed, kp))
            .collect();

        FeatureSet {
            keypoints,
            descriptors,
        }
    }

    /// FAST corners away from the border, strongest first, after
    /// non-maximum suppression.
    fn detect(&self, gray: &GrayImage) -> Vec<(u32, u32, f32)> {
        let (width, height) = gray.dimensions();
        let mut corners: Vec<_> = corners_fast9(gray, self.fast_threshold)
            .into_iter()
            .filter(|c| {
                c.x >= BORDER_MARGIN
                    && c.y >= BORDER_MARGIN
                    && c.x < width - BORDER_MARGIN
                    && c.y < height - BORDER_MARGIN
            })
            .collect();
        // Stable ordering for equal scores keeps extraction deterministic.
        corners.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then(a.y.cmp(&b.y))
                .then(a.x.cmp(&b.x))
        });

        let stride = width as usize;
        let mut suppressed = vec![false; stride * height as usize];
        let mut kept = Vec::with_capacity(self.max_keypoints.min(corners.len()));
        for corner in corners {
            if kept.len() >= self.max_keypoints {
                break;
            }
            if suppressed[corner.y as usize * stride + corner.x as usize] {
                continue;
            }
            kept.push((corner.x, corner.y, corner.score));

            let y0 = corner.y.saturating_sub(NMS_RADIUS);
            let y1 = (corner.y + NMS_RADIUS).min(height - 1);
            let x0 = corner.x.saturating_sub(NMS_RADIUS);
            let x1 = (corner.x + NMS_RADIUS).min(width - 1);
            for y in y0..=y1 {
                for x in x0..=x1 {
                    suppressed[y as usize * stride + x as usize] = true;
                }
            }
        }
        kept
    }
}

/// Orientation from the intensity centroid of the circular patch.
fn centroid_angle(image: &GrayImage, cx: u32, cy: u32) -> f32 {
    let (mut m01, mut m10) = (0.0f64, 0.0f64);
    for dy in -PATCH_RADIUS..=PATCH_RADIUS {
        for dx in -PATCH_RADIUS..=PATCH_RADIUS {
            if dx * dx + dy * dy > PATCH_RADIUS * PATCH_RADIUS {
                continue;
            }
            let x = (cx as i32 + dx) as u32;
            let y = (cy as i32 + dy) as u32;
            let v = image.get_pixel(x, y).0[0] as f64;
            m10 += dx as f64 * v;
            m01 += dy as f64 * v;
        }
    }
    m01.atan2(m10) as f32
}

fn describe(image: &GrayImage, kp: &Keypoint) -> Descriptor {
    let (sin, cos) = kp.angle.sin_cos();
    let sample = |(px, py): (i32, i32)| {
        let rx = (cos * px as f32 - sin * py as f32).round() as i32;
        let ry = (sin * px as f32 + cos * py as f32).round() as i32;
        image
            .get_pixel((kp.x as i32 + rx) as u32, (kp.y as i32 + ry) as u32)
            .0[0]
    };

    let mut bits = [0u64; 4];
    for (i, &(p, q)) in PATTERN.iter().enumerate() {
        if sample(p) < sample(q) {
            bits[i / 64] |= 1 << (i % 64);
        }
    }
    Descriptor { bits }
}

/// Counts probe descriptors that pass the nearest-neighbour ratio test.
///
/// For every probe descriptor the two closest template descriptors are
/// found; the match is good when `best < ratio * second`. With fewer than
/// two template descriptors no pair can be formed and the count is 0.
pub fn count_good_matches(probe: &[Descriptor], template: &[Descriptor], ratio: f32) -> usize {
    if template.len() < 2 {
        return 0;
    }
    probe
        .iter()
        .filter(|d| {
            let (mut best, mut second) = (u32::MAX, u32::MAX);
            for t in template {
                let dist = d.hamming_distance(t);
                if dist < best {
                    second = best;
                    best = dist;
                } else if dist < second {
                    second = dist;
                }
            }
            (best as f32) < ratio * second as f32
        })
        .count()
}
