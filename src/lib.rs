pub mod analysis;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod providers;

pub use error::{AnalysisError, MetricsError, ProviderError};

pub use analysis::color::{ColorCluster, ColorQuantizer};
pub use analysis::composition::{analyze_composition, CompositionMetrics};
pub use analysis::core::{AnalysisResult, AnalysisStatus, ImageRegion};
pub use analysis::engagement::{
    calculate_metrics, calculate_metrics_at, EngagementMetrics, PerformanceRatings,
    PerformanceTier, VideoStats,
};
pub use analysis::faces::{detect_faces, FaceDetection, FaceFeatureFilter};
pub use analysis::insight::{generate_insights, CompositionInsight};
pub use analysis::overlay::ThirdsOverlay;
pub use analysis::text::{extract_text, ConfidenceScale, TextDetection, TextFeatureFilter};
pub use config::{AnalysisOptions, AnalysisSettings, Settings};
pub use pipeline::{AnalysisPipeline, AnalysisPipelineBuilder, ThumbnailReport};
pub use providers::{FaceDetector, RawFaceDetection, RawTextDetection, TextRecognizer};
