use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower::Service;

use crate::analysis::composition::analyze_composition;
use crate::analysis::insight::generate_insights;
use crate::error::AnalysisError;
use crate::pipeline::report::ThumbnailReport;

/// Pipeline stage that fills the composition metrics and, when the
/// metrics are trustworthy, the insights derived from them. Degraded
/// metrics carry no insights: judgments from zeroed placeholders would
/// only mislead.
#[derive(Debug, Clone, Default)]
pub struct CompositionAnalysisService;

impl CompositionAnalysisService {
    pub fn new() -> Self {
        Self
    }
}

impl Service<ThumbnailReport> for CompositionAnalysisService {
    type Response = ThumbnailReport;
    type Error = AnalysisError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, mut report: ThumbnailReport) -> Self::Future {
        let metrics = analyze_composition(&report.image);
        if !metrics.is_degraded() {
            report.insights = Some(generate_insights(&metrics.value));
        }
        report.composition = Some(metrics);

        Box::pin(async move { Ok(report) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, Rgb};

    #[tokio::test]
    async fn fills_metrics_and_insights() {
        let mut service = CompositionAnalysisService::new();
        let report = ThumbnailReport::new(DynamicImage::ImageRgb8(
            ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(24, 24, Rgb([128, 128, 128])),
        ));

        let response = service.call(report).await.unwrap();

        let composition = response.composition.unwrap();
        assert!(!composition.is_degraded());
        assert!(response.insights.is_some());
    }

    #[tokio::test]
    async fn degraded_metrics_carry_no_insights() {
        let mut service = CompositionAnalysisService::new();
        let report = ThumbnailReport::new(DynamicImage::new_rgb8(0, 0));

        let response = service.call(report).await.unwrap();

        assert!(response.composition.unwrap().is_degraded());
        assert!(response.insights.is_none());
    }
}
