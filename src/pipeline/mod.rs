pub mod instrument;
pub mod pipeline;
pub mod report;
pub mod services;

pub use instrument::{TimedService, TimingLayer};
pub use pipeline::{AnalysisPipeline, AnalysisPipelineBuilder};
pub use report::ThumbnailReport;
