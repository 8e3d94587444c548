//! Dominant color extraction via seeded k-means over RGB samples.

use image::DynamicImage;
use rand::distr::{weighted::WeightedIndex, Distribution};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::cmp::Ordering;
use std::time::Instant;
use tracing::warn;

use super::core::AnalysisResult;

/// Seed used when the caller supplies none. Fixed so repeated runs over the
/// same image return byte-identical palettes.
pub const DEFAULT_SEED: u64 = 42;

const RESTARTS: usize = 10;
const MAX_ITERATIONS: usize = 300;
const SHIFT_TOLERANCE: f64 = 1e-4;

/// One dominant color and the fraction of sampled pixels assigned to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorCluster {
    pub rgb: [u8; 3],
    pub fraction: f64,
}

/// K-means color quantizer.
///
/// All restarts draw from a single seeded `StdRng`, so clustering is fully
/// deterministic. A cluster that ends up with no pixels keeps its centroid
/// and reports a fraction of 0; on the non-degraded path the palette length
/// therefore always equals `n_colors`, even for images with fewer distinct
/// colors than that.
#[derive(Debug, Clone)]
pub struct ColorQuantizer {
    n_colors: usize,
    seed: u64,
    stride: u32,
}

impl ColorQuantizer {
    pub fn new(n_colors: usize) -> Self {
        Self {
            n_colors,
            seed: DEFAULT_SEED,
            stride: 1,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sample every `stride`-th pixel along both axes. 1 keeps every pixel;
    /// larger strides trade palette accuracy for speed on big frames.
    pub fn with_stride(mut self, stride: u32) -> Self {
        self.stride = stride.max(1);
        self
    }

    /// Extracts the palette, sorted by fraction descending. Ties keep the
    /// original cluster order. Degenerate input (zero-area image, zero
    /// clusters requested) degrades to an empty palette instead of failing.
    pub fn quantize(&self, image: &DynamicImage) -> AnalysisResult<Vec<ColorCluster>> {
        let start_time = Instant::now();
        let samples = self.collect_samples(image);

        if samples.is_empty() || self.n_colors == 0 {
            warn!(
                n_colors = self.n_colors,
                samples = samples.len(),
                "color quantization skipped, nothing to cluster"
            );
            return AnalysisResult::degraded(Vec::new(), "nothing to cluster")
                .with_timing(start_time);
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best = lloyd_clustering(&samples, self.n_colors, &mut rng);
        for _ in 1..RESTARTS {
            let run = lloyd_clustering(&samples, self.n_colors, &mut rng);
            if run.inertia < best.inertia {
                best = run;
            }
        }

        let total = samples.len() as f64;
        let mut clusters: Vec<ColorCluster> = best
            .centroids
            .iter()
            .zip(&best.counts)
            .map(|(centroid, &count)| ColorCluster {
                rgb: [
                    centroid[0].round().clamp(0.0, 255.0) as u8,
                    centroid[1].round().clamp(0.0, 255.0) as u8,
                    centroid[2].round().clamp(0.0, 255.0) as u8,
                ],
                fraction: count as f64 / total,
            })
            .collect();

        clusters.sort_by(|a, b| {
            b.fraction
                .partial_cmp(&a.fraction)
                .unwrap_or(Ordering::Equal)
        });

        AnalysisResult::complete(clusters).with_timing(start_time)
    }

    fn collect_samples(&self, image: &DynamicImage) -> Vec<[f64; 3]> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        let stride = self.stride as usize;

        let mut samples = Vec::new();
        for y in (0..height).step_by(stride) {
            for x in (0..width).step_by(stride) {
                let pixel = rgb.get_pixel(x, y);
                samples.push([pixel[0] as f64, pixel[1] as f64, pixel[2] as f64]);
            }
        }
        samples
    }
}

struct ClusteringRun {
    centroids: Vec<[f64; 3]>,
    counts: Vec<usize>,
    inertia: f64,
}

/// One Lloyd's-algorithm run from a k-means++ seeding.
fn lloyd_clustering(samples: &[[f64; 3]], k: usize, rng: &mut StdRng) -> ClusteringRun {
    let mut centroids = seed_centroids(samples, k, rng);
    let mut assignment = vec![0usize; samples.len()];

    for _ in 0..MAX_ITERATIONS {
        for (slot, sample) in assignment.iter_mut().zip(samples) {
            *slot = nearest_centroid(sample, &centroids);
        }

        let mut sums = vec![[0.0f64; 3]; k];
        let mut counts = vec![0usize; k];
        for (sample, &cluster) in samples.iter().zip(&assignment) {
            sums[cluster][0] += sample[0];
            sums[cluster][1] += sample[1];
            sums[cluster][2] += sample[2];
            counts[cluster] += 1;
        }

        let mut shift = 0.0;
        for cluster in 0..k {
            // An emptied cluster keeps its previous centroid.
            if counts[cluster] == 0 {
                continue;
            }
            let n = counts[cluster] as f64;
            let next = [
                sums[cluster][0] / n,
                sums[cluster][1] / n,
                sums[cluster][2] / n,
            ];
            shift += distance_sq(&centroids[cluster], &next);
            centroids[cluster] = next;
        }

        if shift <= SHIFT_TOLERANCE {
            break;
        }
    }

    // Final assignment against the converged centroids.
    let mut counts = vec![0usize; k];
    let mut inertia = 0.0;
    for sample in samples {
        let cluster = nearest_centroid(sample, &centroids);
        counts[cluster] += 1;
        inertia += distance_sq(sample, &centroids[cluster]);
    }

    ClusteringRun {
        centroids,
        counts,
        inertia,
    }
}

/// K-means++ seeding: the first centroid is drawn uniformly, each further
/// one proportionally to its squared distance from the nearest chosen
/// centroid.
fn seed_centroids(samples: &[[f64; 3]], k: usize, rng: &mut StdRng) -> Vec<[f64; 3]> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(samples[rng.random_range(0..samples.len())]);

    while centroids.len() < k {
        let weights: Vec<f64> = samples
            .iter()
            .map(|sample| {
                centroids
                    .iter()
                    .map(|centroid| distance_sq(sample, centroid))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();

        // All-zero weights mean every sample already coincides with a
        // centroid (fewer distinct colors than clusters). Fall back to a
        // uniform draw so the remaining slots still get filled.
        let next = match WeightedIndex::new(&weights) {
            Ok(dist) => samples[dist.sample(rng)],
            Err(_) => samples[rng.random_range(0..samples.len())],
        };
        centroids.push(next);
    }
    centroids
}

/// Ties go to the lowest cluster index.
fn nearest_centroid(sample: &[f64; 3], centroids: &[[f64; 3]]) -> usize {
    let mut best = 0;
    let mut best_dist = distance_sq(sample, &centroids[0]);
    for (index, centroid) in centroids.iter().enumerate().skip(1) {
        let dist = distance_sq(sample, centroid);
        if dist < best_dist {
            best = index;
            best_dist = dist;
        }
    }
    best
}

fn distance_sq(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}
