use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower::Service;
use tracing::error;

use crate::analysis::engagement::calculate_metrics;
use crate::error::AnalysisError;
use crate::pipeline::report::ThumbnailReport;

/// Pipeline stage that derives engagement metrics from attached video
/// statistics. Reports without statistics pass through untouched; invalid
/// statistics fail the report, never degrade it.
#[derive(Debug, Clone, Default)]
pub struct EngagementService;

impl EngagementService {
    pub fn new() -> Self {
        Self
    }
}

impl Service<ThumbnailReport> for EngagementService {
    type Response = ThumbnailReport;
    type Error = AnalysisError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, mut report: ThumbnailReport) -> Self::Future {
        let outcome = match report.stats.clone() {
            Some(stats) => match calculate_metrics(&stats) {
                Ok(metrics) => {
                    report.engagement = Some(metrics);
                    Ok(report)
                }
                Err(e) => {
                    error!(report = %report.id, error = %e, "engagement calculation failed");
                    Err(e.into())
                }
            },
            None => Ok(report),
        };

        Box::pin(async move { outcome })
    }
}
