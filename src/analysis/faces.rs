//! Face-detection output filtering.
//!
//! Face confidences stay on the detector's 0..=1 scale; unlike OCR output
//! there is no percent convention to normalize to.

use image::DynamicImage;
use serde::Serialize;
use std::time::Instant;
use tracing::warn;

use super::core::{AnalysisResult, ImageRegion};
use crate::providers::{FaceDetector, RawFaceDetection};

pub const DEFAULT_MIN_FACE_CONFIDENCE: f32 = 0.5;

/// Filtered face boxes, in detector order. The two vectors index together.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FaceDetection {
    pub regions: Vec<ImageRegion>,
    pub confidences: Vec<f32>,
}

impl FaceDetection {
    pub fn count(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct FaceFeatureFilter {
    min_confidence: f32,
}

impl Default for FaceFeatureFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl FaceFeatureFilter {
    pub fn new() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_FACE_CONFIDENCE,
        }
    }

    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence.clamp(0.0, 1.0);
        self
    }

    pub fn filter(&self, raw: &[RawFaceDetection]) -> FaceDetection {
        let mut detection = FaceDetection::default();
        for face in raw {
            if face.confidence <= 0.0 || face.confidence < self.min_confidence {
                continue;
            }
            detection.regions.push(face.region);
            detection.confidences.push(face.confidence);
        }
        detection
    }
}

/// Runs a face detector and filters its output. A detector failure is
/// logged and converted to an empty, degraded detection.
pub async fn detect_faces(
    detector: &dyn FaceDetector,
    image: &DynamicImage,
    filter: &FaceFeatureFilter,
) -> AnalysisResult<FaceDetection> {
    let start_time = Instant::now();
    match detector.detect(image).await {
        Ok(raw) => AnalysisResult::complete(filter.filter(&raw)).with_timing(start_time),
        Err(e) => {
            warn!(provider = detector.name(), error = %e, "face detection failed");
            AnalysisResult::degraded(FaceDetection::default(), e.to_string())
                .with_timing(start_time)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use async_trait::async_trait;

    fn face(confidence: f32) -> RawFaceDetection {
        RawFaceDetection::new(ImageRegion::new(4, 4, 20, 20), confidence)
    }

    #[test]
    fn drops_faces_below_the_threshold() {
        let raw = vec![face(0.9), face(0.4), face(0.5), face(0.0)];
        let detection = FaceFeatureFilter::new().filter(&raw);

        assert_eq!(detection.count(), 2);
        assert_eq!(detection.confidences, vec![0.9, 0.5]);
    }

    #[test]
    fn threshold_is_inclusive_and_order_preserved() {
        let raw = vec![face(0.3), face(0.8), face(0.3)];
        let detection = FaceFeatureFilter::new().with_min_confidence(0.3).filter(&raw);

        assert_eq!(detection.confidences, vec![0.3, 0.8, 0.3]);
    }

    #[test]
    fn zero_confidence_never_survives() {
        let raw = vec![face(0.0)];
        let detection = FaceFeatureFilter::new().with_min_confidence(0.0).filter(&raw);
        assert!(detection.is_empty());
    }

    struct StubDetector {
        outcome: Result<Vec<RawFaceDetection>, ProviderError>,
    }

    #[async_trait]
    impl FaceDetector for StubDetector {
        async fn detect(
            &self,
            _image: &DynamicImage,
        ) -> Result<Vec<RawFaceDetection>, ProviderError> {
            self.outcome.clone()
        }

        fn name(&self) -> &'static str {
            "StubDetector"
        }
    }

    #[tokio::test]
    async fn detection_filters_backend_output() {
        let detector = StubDetector {
            outcome: Ok(vec![face(0.9), face(0.1)]),
        };
        let image = DynamicImage::new_rgb8(4, 4);

        let result = detect_faces(&detector, &image, &FaceFeatureFilter::new()).await;
        assert!(!result.is_degraded());
        assert_eq!(result.value.count(), 1);
    }

    #[tokio::test]
    async fn backend_failure_degrades_to_empty_detection() {
        let detector = StubDetector {
            outcome: Err(ProviderError::Failed {
                provider: "StubDetector",
                reason: "cascade file missing".to_string(),
            }),
        };
        let image = DynamicImage::new_rgb8(4, 4);

        let result = detect_faces(&detector, &image, &FaceFeatureFilter::new()).await;
        assert!(result.is_degraded());
        assert!(result.value.is_empty());
    }
}
