pub mod color_service;
pub mod composition_service;
pub mod engagement_service;
pub mod face_service;
pub mod text_service;

pub use color_service::ColorAnalysisService;
pub use composition_service::CompositionAnalysisService;
pub use engagement_service::EngagementService;
pub use face_service::FaceAnalysisService;
pub use text_service::TextExtractionService;
