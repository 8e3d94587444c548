//! Brightness aggregation across many thumbnails on the thirds grid.

use image::DynamicImage;
use tracing::warn;

use super::core::ImageRegion;

const MAX_LUMA: f64 = 255.0;

/// Accumulates per-cell mean brightness over a batch of images, on the
/// 3x3 rule-of-thirds grid. Cells are normalized to `[0, 1]`, so cell
/// means stay comparable across images of different sizes.
#[derive(Debug, Clone, Default)]
pub struct ThirdsOverlay {
    sums: [[f64; 3]; 3],
    images: u64,
}

impl ThirdsOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one image into the accumulator. Zero-area images are skipped.
    /// Grid cells emptied by integer division on tiny images contribute a
    /// brightness of zero.
    pub fn accumulate(&mut self, image: &DynamicImage) {
        let gray = image.to_luma8();
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            warn!(width, height, "overlay accumulation skipped, empty image");
            return;
        }

        for row in 0..3u32 {
            for col in 0..3u32 {
                let cell = ImageRegion::thirds_cell(width, height, row, col);
                if cell.is_empty() {
                    continue;
                }
                let mut sum = 0u64;
                for y in cell.top..cell.top + cell.height {
                    for x in cell.left..cell.left + cell.width {
                        sum += gray.get_pixel(x, y).0[0] as u64;
                    }
                }
                self.sums[row as usize][col as usize] +=
                    sum as f64 / cell.area() as f64 / MAX_LUMA;
            }
        }
        self.images += 1;
    }

    pub fn image_count(&self) -> u64 {
        self.images
    }

    /// Per-cell mean brightness over all accumulated images, or `None`
    /// when nothing was accumulated.
    pub fn cell_means(&self) -> Option<[[f64; 3]; 3]> {
        if self.images == 0 {
            return None;
        }
        let n = self.images as f64;
        Some(self.sums.map(|row| row.map(|sum| sum / n)))
    }

    /// `(row, col)` of the brightest cell, ties to the first in row-major
    /// order.
    pub fn brightest_cell(&self) -> Option<(usize, usize)> {
        let means = self.cell_means()?;
        let mut best = (0, 0);
        for row in 0..3 {
            for col in 0..3 {
                if means[row][col] > means[best.0][best.1] {
                    best = (row, col);
                }
            }
        }
        Some(best)
    }
}
