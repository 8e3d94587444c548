use std::fmt;
use std::pin::Pin;
use std::time::Instant;

use futures::task::{Context, Poll};
use futures::Future;
use tower::Service;
use tower_layer::Layer;
use tracing::debug;

/// A wrapper that automatically instruments a pipeline stage with timing
/// and error tracking.
#[derive(Debug, Clone)]
pub struct TimedService<S> {
    inner: S,
    stage: &'static str,
}

impl<S> TimedService<S> {
    pub fn new(inner: S, stage: &'static str) -> Self {
        Self { inner, stage }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, Request> Service<Request> for TimedService<S>
where
    S: Service<Request>,
    S::Future: Send + 'static,
    S::Error: fmt::Display,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let stage = self.stage;
        let start = Instant::now();
        debug!(stage, "stage started");

        let future = self.inner.call(request);

        Box::pin(async move {
            let result = future.await;
            let elapsed_us = start.elapsed().as_micros() as u64;

            match &result {
                Ok(_) => debug!(stage, elapsed_us, "stage completed"),
                Err(e) => tracing::error!(stage, elapsed_us, error = %e, "stage failed"),
            }

            result
        })
    }
}

/// Layer producing [`TimedService`] wrappers, for use with
/// `tower::ServiceBuilder`.
#[derive(Debug, Clone)]
pub struct TimingLayer {
    stage: &'static str,
}

impl TimingLayer {
    pub fn new(stage: &'static str) -> Self {
        Self { stage }
    }
}

impl<S> Layer<S> for TimingLayer {
    type Service = TimedService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TimedService::new(inner, self.stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::color::ColorQuantizer;
    use crate::pipeline::report::ThumbnailReport;
    use crate::pipeline::services::ColorAnalysisService;
    use image::{DynamicImage, ImageBuffer, Rgb};

    #[tokio::test]
    async fn wrapped_stage_behaves_like_the_inner_stage() {
        let inner = ColorAnalysisService::new(ColorQuantizer::new(2));
        let mut timed = TimingLayer::new("color_analysis").layer(inner);

        let report = ThumbnailReport::new(DynamicImage::ImageRgb8(
            ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(8, 8, Rgb([9, 9, 9])),
        ));

        let response = timed.call(report).await.unwrap();
        assert!(response.colors.is_some());
    }
}
