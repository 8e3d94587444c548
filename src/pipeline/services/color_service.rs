use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower::Service;

use crate::analysis::color::ColorQuantizer;
use crate::error::AnalysisError;
use crate::pipeline::report::ThumbnailReport;

/// Pipeline stage that fills the dominant-color slot of a report.
#[derive(Debug, Clone)]
pub struct ColorAnalysisService {
    quantizer: ColorQuantizer,
}

impl ColorAnalysisService {
    pub fn new(quantizer: ColorQuantizer) -> Self {
        Self { quantizer }
    }
}

impl Service<ThumbnailReport> for ColorAnalysisService {
    type Response = ThumbnailReport;
    type Error = AnalysisError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, mut report: ThumbnailReport) -> Self::Future {
        let palette = self.quantizer.quantize(&report.image);
        report.colors = Some(palette);

        Box::pin(async move { Ok(report) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, Rgb};

    #[tokio::test]
    async fn fills_the_color_slot() {
        let mut service = ColorAnalysisService::new(ColorQuantizer::new(3));
        let report = ThumbnailReport::new(DynamicImage::ImageRgb8(
            ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(16, 16, Rgb([200, 40, 40])),
        ));

        let response = service.call(report).await.unwrap();
        let colors = response.colors.unwrap();

        assert!(!colors.is_degraded());
        assert_eq!(colors.value.len(), 3);
        assert_eq!(colors.value[0].rgb, [200, 40, 40]);
    }
}
