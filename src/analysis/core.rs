use serde::Serialize;
use std::time::Instant;

/// Completion status of a recoverable analysis pass.
///
/// A degraded pass still carries a well-defined payload (empty list, zeroed
/// metrics) so presentation code never has to special-case it; the status is
/// what lets callers tell "found nothing" apart from "could not analyze".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AnalysisStatus {
    Complete,
    Degraded { reason: String },
}

impl AnalysisStatus {
    pub fn is_degraded(&self) -> bool {
        matches!(self, AnalysisStatus::Degraded { .. })
    }
}

/// Result of one analysis pass with its status and timing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult<T> {
    pub value: T,
    pub status: AnalysisStatus,
    pub elapsed_us: u64,
}

impl<T> AnalysisResult<T> {
    pub fn complete(value: T) -> Self {
        Self {
            value,
            status: AnalysisStatus::Complete,
            elapsed_us: 0,
        }
    }

    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        Self {
            value,
            status: AnalysisStatus::Degraded {
                reason: reason.into(),
            },
            elapsed_us: 0,
        }
    }

    pub fn with_timing(mut self, start_time: Instant) -> Self {
        self.elapsed_us = start_time.elapsed().as_micros() as u64;
        self
    }

    pub fn is_degraded(&self) -> bool {
        self.status.is_degraded()
    }
}

/// Rectangular region of an image, in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageRegion {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl ImageRegion {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn full_image(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn left_half(width: u32, height: u32) -> Self {
        Self::new(0, 0, width / 2, height)
    }

    /// The extra column of an odd-width image lands in the right half.
    pub fn right_half(width: u32, height: u32) -> Self {
        Self::new(width / 2, 0, width - width / 2, height)
    }

    pub fn top_half(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height / 2)
    }

    /// The extra row of an odd-height image lands in the bottom half.
    pub fn bottom_half(width: u32, height: u32) -> Self {
        Self::new(0, height / 2, width, height - height / 2)
    }

    /// One cell of the rule-of-thirds grid, `row` and `col` in `0..3`.
    /// Cell edges follow integer division, so the center cell of a
    /// `w x h` image spans `w/3..2*w/3` by `h/3..2*h/3`.
    pub fn thirds_cell(width: u32, height: u32, row: u32, col: u32) -> Self {
        let x = col * width / 3;
        let y = row * height / 3;
        let right = (col + 1) * width / 3;
        let bottom = (row + 1) * height / 3;
        Self::new(x, y, right - x, bottom - y)
    }

    pub fn center_third(width: u32, height: u32) -> Self {
        Self::thirds_cell(width, height, 1, 1)
    }

    pub fn contains_point(&self, x: u32, y: u32) -> bool {
        x >= self.left && x < self.left + self.width && y >= self.top && y < self.top + self.height
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
