//! OCR output filtering and confidence-scale normalization.

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::warn;

use super::core::{AnalysisResult, ImageRegion};
use crate::providers::{RawTextDetection, TextRecognizer};

/// Native confidence scale of an OCR backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceScale {
    /// 0..=100
    Percent,
    /// 0.0..=1.0
    Fraction,
}

impl ConfidenceScale {
    /// Converts a native confidence to the canonical percent scale.
    pub fn to_percent(&self, raw: f32) -> f32 {
        match self {
            ConfidenceScale::Percent => raw,
            ConfidenceScale::Fraction => raw * 100.0,
        }
    }
}

/// Filtered text features. Confidences are always percent, whatever scale
/// the backend reported, and the three vectors index together.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextDetection {
    pub texts: Vec<String>,
    pub confidences: Vec<f32>,
    pub positions: Vec<ImageRegion>,
    /// Kept texts joined with single spaces, in detection order.
    pub full_text: String,
}

impl TextDetection {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// Drops unusable OCR entries and normalizes confidences.
///
/// An entry survives when its normalized confidence is positive and at
/// least the configured minimum, and its text is non-blank. Order is
/// preserved and kept text is stored trimmed.
#[derive(Debug, Clone)]
pub struct TextFeatureFilter {
    scale: ConfidenceScale,
    min_confidence: f32,
}

impl TextFeatureFilter {
    pub fn new(scale: ConfidenceScale) -> Self {
        Self {
            scale,
            min_confidence: 0.0,
        }
    }

    /// Minimum confidence to keep, on the percent scale.
    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn filter(&self, raw: &[RawTextDetection]) -> TextDetection {
        let mut detection = TextDetection::default();

        for entry in raw {
            let confidence = self.scale.to_percent(entry.confidence);
            if confidence <= 0.0 || confidence < self.min_confidence {
                continue;
            }
            let text = entry.text.trim();
            if text.is_empty() {
                continue;
            }
            detection.texts.push(text.to_string());
            detection.confidences.push(confidence);
            detection.positions.push(entry.region);
        }

        detection.full_text = detection.texts.join(" ");
        detection
    }
}

/// Runs an OCR backend and filters its output. The filter is built from
/// the backend's own declared scale, so the canonical percent output never
/// depends on which backend is plugged in. A backend failure is logged and
/// converted to an empty, degraded detection.
pub async fn extract_text(
    recognizer: &dyn TextRecognizer,
    image: &DynamicImage,
    min_confidence: f32,
) -> AnalysisResult<TextDetection> {
    let start_time = Instant::now();
    let filter =
        TextFeatureFilter::new(recognizer.confidence_scale()).with_min_confidence(min_confidence);

    match recognizer.recognize(image).await {
        Ok(raw) => AnalysisResult::complete(filter.filter(&raw)).with_timing(start_time),
        Err(e) => {
            warn!(provider = recognizer.name(), error = %e, "text recognition failed");
            AnalysisResult::degraded(TextDetection::default(), e.to_string())
                .with_timing(start_time)
        }
    }
}
