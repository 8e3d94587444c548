use std::sync::Arc;

use tower::util::BoxService;
use tower::{Service, ServiceBuilder, ServiceExt};
use tracing::debug;

use crate::analysis::color::ColorQuantizer;
use crate::analysis::faces::FaceFeatureFilter;
use crate::config::{AnalysisOptions, AnalysisSettings};
use crate::error::AnalysisError;
use crate::pipeline::instrument::TimingLayer;
use crate::pipeline::report::ThumbnailReport;
use crate::pipeline::services::{
    ColorAnalysisService, CompositionAnalysisService, EngagementService, FaceAnalysisService,
    TextExtractionService,
};
use crate::providers::{FaceDetector, TextRecognizer};

type Stage = BoxService<ThumbnailReport, ThumbnailReport, AnalysisError>;

/// A pipeline that runs a report through the enabled analysis stages in a
/// fixed order: colors, composition, text, faces, engagement.
///
/// Detection stages degrade their own slot on backend failure, so the only
/// error `process` returns is the fail-fast engagement one.
#[derive(Debug)]
pub struct AnalysisPipeline {
    stages: Vec<(&'static str, Stage)>,
}

impl AnalysisPipeline {
    pub fn builder() -> AnalysisPipelineBuilder {
        AnalysisPipelineBuilder::new()
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|(name, _)| *name).collect()
    }

    pub async fn process(
        &mut self,
        mut report: ThumbnailReport,
    ) -> Result<ThumbnailReport, AnalysisError> {
        for (name, stage) in &mut self.stages {
            debug!(stage = *name, report = %report.id, "processing stage");
            report = stage.call(report).await?;
        }
        Ok(report)
    }
}

/// Assembles an [`AnalysisPipeline`] from options, settings and backends.
///
/// An axis that is enabled but has no backend to run on is skipped rather
/// than treated as a configuration error, so the pipeline stays usable
/// without any detection backend at all.
pub struct AnalysisPipelineBuilder {
    options: AnalysisOptions,
    settings: AnalysisSettings,
    recognizer: Option<Arc<dyn TextRecognizer>>,
    detector: Option<Arc<dyn FaceDetector>>,
}

impl Default for AnalysisPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisPipelineBuilder {
    pub fn new() -> Self {
        Self {
            options: AnalysisOptions::default(),
            settings: AnalysisSettings::default(),
            recognizer: None,
            detector: None,
        }
    }

    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_settings(mut self, settings: AnalysisSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_text_recognizer(mut self, recognizer: Arc<dyn TextRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn with_face_detector(mut self, detector: Arc<dyn FaceDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn build(self) -> Result<AnalysisPipeline, AnalysisError> {
        self.settings.validate().map_err(AnalysisError::Config)?;

        let mut stages: Vec<(&'static str, Stage)> = Vec::new();

        if self.options.color_analysis {
            let quantizer = ColorQuantizer::new(self.settings.color_count)
                .with_seed(self.settings.cluster_seed)
                .with_stride(self.settings.sample_stride);
            stages.push((
                "color_analysis",
                ServiceBuilder::new()
                    .layer(TimingLayer::new("color_analysis"))
                    .service(ColorAnalysisService::new(quantizer))
                    .boxed(),
            ));
        }

        if self.options.composition {
            stages.push((
                "composition",
                ServiceBuilder::new()
                    .layer(TimingLayer::new("composition"))
                    .service(CompositionAnalysisService::new())
                    .boxed(),
            ));
        }

        if self.options.text_detection {
            match &self.recognizer {
                Some(recognizer) => stages.push((
                    "text_extraction",
                    ServiceBuilder::new()
                        .layer(TimingLayer::new("text_extraction"))
                        .service(TextExtractionService::new(
                            recognizer.clone(),
                            self.settings.min_text_confidence,
                        ))
                        .boxed(),
                )),
                None => debug!("text detection enabled without a recognizer, stage skipped"),
            }
        }

        if self.options.face_detection {
            match &self.detector {
                Some(detector) => stages.push((
                    "face_detection",
                    ServiceBuilder::new()
                        .layer(TimingLayer::new("face_detection"))
                        .service(FaceAnalysisService::new(
                            detector.clone(),
                            FaceFeatureFilter::new()
                                .with_min_confidence(self.settings.min_face_confidence),
                        ))
                        .boxed(),
                )),
                None => debug!("face detection enabled without a detector, stage skipped"),
            }
        }

        // Engagement always runs last; it is a no-op without statistics.
        stages.push((
            "engagement",
            ServiceBuilder::new()
                .layer(TimingLayer::new("engagement"))
                .service(EngagementService::new())
                .boxed(),
        ));

        Ok(AnalysisPipeline { stages })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::core::ImageRegion;
    use crate::analysis::engagement::VideoStats;
    use crate::analysis::text::ConfidenceScale;
    use crate::error::ProviderError;
    use crate::providers::{RawFaceDetection, RawTextDetection};
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use image::{DynamicImage, ImageBuffer, Rgb};

    struct StubRecognizer;

    #[async_trait]
    impl TextRecognizer for StubRecognizer {
        async fn recognize(
            &self,
            _image: &DynamicImage,
        ) -> Result<Vec<RawTextDetection>, ProviderError> {
            Ok(vec![RawTextDetection::new(
                "GIVEAWAY",
                95.0,
                ImageRegion::new(5, 5, 50, 14),
            )])
        }

        fn confidence_scale(&self) -> ConfidenceScale {
            ConfidenceScale::Percent
        }

        fn name(&self) -> &'static str {
            "StubRecognizer"
        }
    }

    struct StubDetector;

    #[async_trait]
    impl FaceDetector for StubDetector {
        async fn detect(
            &self,
            _image: &DynamicImage,
        ) -> Result<Vec<RawFaceDetection>, ProviderError> {
            Ok(vec![RawFaceDetection::new(
                ImageRegion::new(20, 20, 40, 40),
                0.9,
            )])
        }

        fn name(&self) -> &'static str {
            "StubDetector"
        }
    }

    fn thumbnail() -> ThumbnailReport {
        ThumbnailReport::new(DynamicImage::ImageRgb8(
            ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(96, 96, Rgb([180, 60, 60])),
        ))
    }

    fn ten_day_old_stats() -> VideoStats {
        VideoStats {
            view_count: Some(1000),
            like_count: Some(40),
            comment_count: Some(5),
            subscriber_count: Some(2000),
            published_at: Some(Utc::now() - Duration::days(10)),
        }
    }

    #[test]
    fn default_build_runs_local_stages_only() {
        let pipeline = AnalysisPipeline::builder().build().unwrap();
        assert_eq!(
            pipeline.stage_names(),
            vec!["color_analysis", "composition", "engagement"]
        );
    }

    #[test]
    fn invalid_settings_fail_the_build() {
        let result = AnalysisPipeline::builder()
            .with_settings(AnalysisSettings {
                color_count: 0,
                ..AnalysisSettings::default()
            })
            .build();
        assert!(matches!(result, Err(AnalysisError::Config(_))));
    }

    #[tokio::test]
    async fn disabled_axes_leave_their_slots_empty() {
        let mut pipeline = AnalysisPipeline::builder()
            .with_options(AnalysisOptions::none())
            .build()
            .unwrap();

        let report = pipeline.process(thumbnail()).await.unwrap();

        assert!(report.colors.is_none());
        assert!(report.composition.is_none());
        assert!(report.insights.is_none());
        assert!(report.text.is_none());
        assert!(report.faces.is_none());
        assert!(report.engagement.is_none());
    }

    #[tokio::test]
    async fn full_pipeline_fills_every_slot() {
        let mut pipeline = AnalysisPipeline::builder()
            .with_text_recognizer(Arc::new(StubRecognizer))
            .with_face_detector(Arc::new(StubDetector))
            .build()
            .unwrap();

        let report = pipeline
            .process(thumbnail().with_stats(ten_day_old_stats()))
            .await
            .unwrap();

        assert!(report.colors.is_some());
        assert!(report.composition.is_some());
        assert!(report.insights.is_some());
        assert_eq!(report.text.unwrap().value.texts, vec!["GIVEAWAY"]);
        assert_eq!(report.faces.unwrap().value.count(), 1);
        assert_eq!(report.engagement.unwrap().sub_conversion, 50.0);
    }

    #[tokio::test]
    async fn enabled_axis_without_backend_is_skipped() {
        let mut pipeline = AnalysisPipeline::builder().build().unwrap();
        assert!(!pipeline.stage_names().contains(&"text_extraction"));
        assert!(!pipeline.stage_names().contains(&"face_detection"));

        let report = pipeline.process(thumbnail()).await.unwrap();
        assert!(report.text.is_none());
        assert!(report.faces.is_none());
    }

    #[tokio::test]
    async fn engagement_errors_fail_the_whole_report() {
        let mut pipeline = AnalysisPipeline::builder().build().unwrap();
        let stats = VideoStats {
            view_count: Some(0),
            ..ten_day_old_stats()
        };

        let result = pipeline.process(thumbnail().with_stats(stats)).await;
        assert!(matches!(result, Err(AnalysisError::Metrics(_))));
    }
}
