//! Pluggable detection backends.
//!
//! OCR engines and face detectors are opaque to this crate: any backend
//! plugs in by implementing the matching trait, and the analysis layer
//! only ever sees the raw detections it returns.

use async_trait::async_trait;
use image::DynamicImage;

use crate::analysis::core::ImageRegion;
use crate::analysis::text::ConfidenceScale;
use crate::error::ProviderError;

/// One raw OCR observation, confidence in the provider's native scale.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTextDetection {
    pub text: String,
    pub confidence: f32,
    pub region: ImageRegion,
}

impl RawTextDetection {
    pub fn new(text: impl Into<String>, confidence: f32, region: ImageRegion) -> Self {
        Self {
            text: text.into(),
            confidence,
            region,
        }
    }
}

/// One raw face box, confidence on the 0..=1 scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawFaceDetection {
    pub region: ImageRegion,
    pub confidence: f32,
}

impl RawFaceDetection {
    pub fn new(region: ImageRegion, confidence: f32) -> Self {
        Self { region, confidence }
    }
}

#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: &DynamicImage) -> Result<Vec<RawTextDetection>, ProviderError>;

    /// Scale the confidences in [`Self::recognize`] output use. The
    /// filtering layer normalizes everything to percent from here.
    fn confidence_scale(&self) -> ConfidenceScale;

    fn name(&self) -> &'static str;
}

#[async_trait]
pub trait FaceDetector: Send + Sync {
    async fn detect(&self, image: &DynamicImage) -> Result<Vec<RawFaceDetection>, ProviderError>;

    fn name(&self) -> &'static str;
}
