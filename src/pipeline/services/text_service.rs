use std::pin::Pin;
use std::sync::Arc;

use futures::task::{Context, Poll};
use futures::Future;
use tower::Service;

use crate::analysis::text::extract_text;
use crate::error::AnalysisError;
use crate::pipeline::report::ThumbnailReport;
use crate::providers::TextRecognizer;

/// Pipeline stage that runs the configured OCR backend and fills the text
/// slot. Backend failures degrade the slot instead of failing the report.
#[derive(Clone)]
pub struct TextExtractionService {
    recognizer: Arc<dyn TextRecognizer>,
    min_confidence: f32,
}

impl TextExtractionService {
    pub fn new(recognizer: Arc<dyn TextRecognizer>, min_confidence: f32) -> Self {
        Self {
            recognizer,
            min_confidence,
        }
    }
}

impl Service<ThumbnailReport> for TextExtractionService {
    type Response = ThumbnailReport;
    type Error = AnalysisError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, mut report: ThumbnailReport) -> Self::Future {
        let recognizer = self.recognizer.clone();
        let min_confidence = self.min_confidence;

        Box::pin(async move {
            let detection =
                extract_text(recognizer.as_ref(), &report.image, min_confidence).await;
            report.text = Some(detection);
            Ok(report)
        })
    }
}
