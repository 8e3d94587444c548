//! Composition metrics over a grayscale projection of the image.

use image::{DynamicImage, GrayImage};
use serde::Serialize;
use std::time::Instant;
use tracing::warn;

use super::core::{AnalysisResult, ImageRegion};

const MAX_LUMA: f64 = 255.0;

/// Composition metrics, each normalized into `[0, 1]`.
///
/// Balance values measure the brightness difference between opposing
/// halves, so lower is more balanced. `thirds_intensity` is the mean over
/// the whole grid with everything outside the central thirds cell zeroed,
/// which caps it near 1/9 for a uniformly bright frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CompositionMetrics {
    pub balance_horizontal: f64,
    pub balance_vertical: f64,
    pub thirds_intensity: f64,
    pub overall_brightness: f64,
    pub edge_density: f64,
    pub contrast: f64,
}

impl CompositionMetrics {
    fn clamped(self) -> Self {
        Self {
            balance_horizontal: self.balance_horizontal.clamp(0.0, 1.0),
            balance_vertical: self.balance_vertical.clamp(0.0, 1.0),
            thirds_intensity: self.thirds_intensity.clamp(0.0, 1.0),
            overall_brightness: self.overall_brightness.clamp(0.0, 1.0),
            edge_density: self.edge_density.clamp(0.0, 1.0),
            contrast: self.contrast.clamp(0.0, 1.0),
        }
    }
}

/// Computes every composition metric in one pass over the grayscale image.
/// A zero-area image degrades to zeroed metrics instead of failing.
pub fn analyze_composition(image: &DynamicImage) -> AnalysisResult<CompositionMetrics> {
    let start_time = Instant::now();
    let gray = image.to_luma8();
    let (width, height) = gray.dimensions();

    if width == 0 || height == 0 {
        warn!(width, height, "composition analysis skipped, empty image");
        return AnalysisResult::degraded(CompositionMetrics::default(), "empty image")
            .with_timing(start_time);
    }

    let metrics = CompositionMetrics {
        balance_horizontal: balance(
            &gray,
            ImageRegion::left_half(width, height),
            ImageRegion::right_half(width, height),
        ),
        balance_vertical: balance(
            &gray,
            ImageRegion::top_half(width, height),
            ImageRegion::bottom_half(width, height),
        ),
        thirds_intensity: thirds_intensity(&gray),
        overall_brightness: mean_luma(&gray) / MAX_LUMA,
        edge_density: edge_density(&gray),
        contrast: contrast(&gray),
    }
    .clamped();

    AnalysisResult::complete(metrics).with_timing(start_time)
}

/// Absolute difference of the two region means, normalized. An empty
/// region (image thinner than two pixels on that axis) reads as balanced.
fn balance(gray: &GrayImage, a: ImageRegion, b: ImageRegion) -> f64 {
    match (region_mean(gray, a), region_mean(gray, b)) {
        (Some(mean_a), Some(mean_b)) => (mean_a - mean_b).abs() / MAX_LUMA,
        _ => 0.0,
    }
}

fn region_mean(gray: &GrayImage, region: ImageRegion) -> Option<f64> {
    if region.is_empty() {
        return None;
    }
    let mut sum = 0u64;
    for y in region.top..region.top + region.height {
        for x in region.left..region.left + region.width {
            sum += gray.get_pixel(x, y).0[0] as u64;
        }
    }
    Some(sum as f64 / region.area() as f64)
}

fn mean_luma(gray: &GrayImage) -> f64 {
    let sum: u64 = gray.pixels().map(|p| p.0[0] as u64).sum();
    sum as f64 / (gray.width() as f64 * gray.height() as f64)
}

fn thirds_intensity(gray: &GrayImage) -> f64 {
    let (width, height) = gray.dimensions();
    let center = ImageRegion::center_third(width, height);

    let mut sum = 0u64;
    for y in center.top..center.top + center.height {
        for x in center.left..center.left + center.width {
            sum += gray.get_pixel(x, y).0[0] as u64;
        }
    }

    // Denominator is the full pixel count: the region outside the center
    // cell contributes zeros, it is not cropped away.
    sum as f64 / (width as f64 * height as f64) / MAX_LUMA
}

/// Mean gradient magnitude from horizontal and vertical backward
/// differences. First row and column have no backward neighbor and
/// contribute a zero difference on that axis.
fn edge_density(gray: &GrayImage) -> f64 {
    let (width, height) = gray.dimensions();
    let mut sum = 0.0f64;

    for y in 0..height {
        for x in 0..width {
            let v = gray.get_pixel(x, y).0[0] as f64;
            let dx = if x == 0 {
                0.0
            } else {
                v - gray.get_pixel(x - 1, y).0[0] as f64
            };
            let dy = if y == 0 {
                0.0
            } else {
                v - gray.get_pixel(x, y - 1).0[0] as f64
            };
            sum += (dx * dx + dy * dy).sqrt();
        }
    }

    sum / (width as f64 * height as f64) / MAX_LUMA
}

fn contrast(gray: &GrayImage) -> f64 {
    // One-pass mean/variance (Welford)
    let mut n = 0.0f64;
    let mut mean = 0.0f64;
    let mut m2 = 0.0f64;

    for p in gray.pixels() {
        let v = p.0[0] as f64;
        n += 1.0;
        let delta = v - mean;
        mean += delta / n;
        m2 += delta * (v - mean);
    }

    if n < 1.0 {
        return 0.0;
    }
    (m2 / n).sqrt() / MAX_LUMA
}
