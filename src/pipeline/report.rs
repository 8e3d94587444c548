use chrono::{DateTime, Utc};
use image::DynamicImage;
use std::sync::Arc;
use uuid::Uuid;

use crate::analysis::color::ColorCluster;
use crate::analysis::composition::CompositionMetrics;
use crate::analysis::core::AnalysisResult;
use crate::analysis::engagement::{EngagementMetrics, VideoStats};
use crate::analysis::faces::FaceDetection;
use crate::analysis::insight::CompositionInsight;
use crate::analysis::text::TextDetection;

/// One thumbnail moving through the pipeline. Each stage fills exactly one
/// slot; a slot left `None` means its stage never ran. The image is shared,
/// so cloning a report never copies pixels.
#[derive(Debug, Clone)]
pub struct ThumbnailReport {
    pub id: Uuid,
    pub image: Arc<DynamicImage>,
    pub created_at: DateTime<Utc>,
    pub stats: Option<VideoStats>,
    pub colors: Option<AnalysisResult<Vec<ColorCluster>>>,
    pub composition: Option<AnalysisResult<CompositionMetrics>>,
    pub insights: Option<CompositionInsight>,
    pub text: Option<AnalysisResult<TextDetection>>,
    pub faces: Option<AnalysisResult<FaceDetection>>,
    pub engagement: Option<EngagementMetrics>,
}

impl ThumbnailReport {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            id: Uuid::new_v4(),
            image: Arc::new(image),
            created_at: Utc::now(),
            stats: None,
            colors: None,
            composition: None,
            insights: None,
            text: None,
            faces: None,
            engagement: None,
        }
    }

    /// Attaches video statistics, which arms the engagement stage.
    pub fn with_stats(mut self, stats: VideoStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn cloning_report_shares_image_buffer() {
        let img: DynamicImage = DynamicImage::ImageRgb8(
            ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(16, 16, Rgb([1, 2, 3])),
        );
        let r1 = ThumbnailReport::new(img);
        let r2 = r1.clone();
        assert!(Arc::ptr_eq(&r1.image, &r2.image));
    }

    #[test]
    fn new_report_has_every_slot_empty() {
        let report = ThumbnailReport::new(DynamicImage::new_rgb8(8, 8));

        assert!(report.stats.is_none());
        assert!(report.colors.is_none());
        assert!(report.composition.is_none());
        assert!(report.insights.is_none());
        assert!(report.text.is_none());
        assert!(report.faces.is_none());
        assert!(report.engagement.is_none());
        assert_eq!(report.dimensions(), (8, 8));
    }
}
