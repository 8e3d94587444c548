use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Metrics Error: {0}")]
    Metrics(#[from] MetricsError),
    #[error("Provider Error: {0}")]
    Provider(#[from] ProviderError),
    #[error("Image Error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Malformed statistics input: {0}")]
    Stats(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),
}

// Fail-fast errors from engagement metric calculation. These never degrade
// silently: bad statistics must surface to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    #[error("statistics are missing required field `{0}`")]
    MissingField(&'static str),
    #[error("`{0}` is zero, ratios would divide by zero")]
    ZeroDenominator(&'static str),
}

// Failures reported by pluggable detection backends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("{provider} is unavailable: {reason}")]
    Unavailable {
        provider: &'static str,
        reason: String,
    },
    #[error("{provider} failed: {reason}")]
    Failed {
        provider: &'static str,
        reason: String,
    },
}
