use std::pin::Pin;
use std::sync::Arc;

use futures::task::{Context, Poll};
use futures::Future;
use tower::Service;

use crate::analysis::faces::{detect_faces, FaceFeatureFilter};
use crate::error::AnalysisError;
use crate::pipeline::report::ThumbnailReport;
use crate::providers::FaceDetector;

/// Pipeline stage that runs the configured face detector and fills the
/// face slot. Backend failures degrade the slot instead of failing the
/// report.
#[derive(Clone)]
pub struct FaceAnalysisService {
    detector: Arc<dyn FaceDetector>,
    filter: FaceFeatureFilter,
}

impl FaceAnalysisService {
    pub fn new(detector: Arc<dyn FaceDetector>, filter: FaceFeatureFilter) -> Self {
        Self { detector, filter }
    }
}

impl Service<ThumbnailReport> for FaceAnalysisService {
    type Response = ThumbnailReport;
    type Error = AnalysisError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, mut report: ThumbnailReport) -> Self::Future {
        let detector = self.detector.clone();
        let filter = self.filter.clone();

        Box::pin(async move {
            let detection = detect_faces(detector.as_ref(), &report.image, &filter).await;
            report.faces = Some(detection);
            Ok(report)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::core::ImageRegion;
    use crate::error::ProviderError;
    use crate::providers::RawFaceDetection;
    use async_trait::async_trait;
    use image::DynamicImage;

    struct StubDetector;

    #[async_trait]
    impl FaceDetector for StubDetector {
        async fn detect(
            &self,
            _image: &DynamicImage,
        ) -> Result<Vec<RawFaceDetection>, ProviderError> {
            Ok(vec![
                RawFaceDetection::new(ImageRegion::new(10, 10, 30, 30), 0.95),
                RawFaceDetection::new(ImageRegion::new(50, 10, 30, 30), 0.2),
            ])
        }

        fn name(&self) -> &'static str {
            "StubDetector"
        }
    }

    #[tokio::test]
    async fn fills_the_face_slot_with_filtered_boxes() {
        let mut service = FaceAnalysisService::new(Arc::new(StubDetector), FaceFeatureFilter::new());
        let report = ThumbnailReport::new(DynamicImage::new_rgb8(100, 100));

        let response = service.call(report).await.unwrap();
        let faces = response.faces.unwrap();

        assert!(!faces.is_degraded());
        assert_eq!(faces.value.count(), 1);
        assert_eq!(faces.value.regions[0], ImageRegion::new(10, 10, 30, 30));
    }
}
