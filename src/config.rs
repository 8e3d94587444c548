use serde::Deserialize;

use crate::analysis::color::DEFAULT_SEED;
use crate::analysis::faces::DEFAULT_MIN_FACE_CONFIDENCE;
use crate::error::AnalysisError;

/// Which analysis axes run for a thumbnail. Each flag maps to one
/// pipeline stage; a disabled axis leaves its report slot empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub color_analysis: bool,
    pub composition: bool,
    pub text_detection: bool,
    pub face_detection: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            color_analysis: true,
            composition: true,
            text_detection: true,
            face_detection: true,
        }
    }
}

impl AnalysisOptions {
    pub fn none() -> Self {
        Self {
            color_analysis: false,
            composition: false,
            text_detection: false,
            face_detection: false,
        }
    }

    pub fn with_color_analysis(mut self, enabled: bool) -> Self {
        self.color_analysis = enabled;
        self
    }

    pub fn with_composition(mut self, enabled: bool) -> Self {
        self.composition = enabled;
        self
    }

    pub fn with_text_detection(mut self, enabled: bool) -> Self {
        self.text_detection = enabled;
        self
    }

    pub fn with_face_detection(mut self, enabled: bool) -> Self {
        self.face_detection = enabled;
        self
    }
}

/// Tunable parameters for the individual analyses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Palette size; 3 to 10 is the useful range for a thumbnail strip.
    pub color_count: usize,
    /// Minimum OCR confidence to keep, percent.
    pub min_text_confidence: f32,
    /// Minimum face confidence to keep, 0.0 to 1.0.
    pub min_face_confidence: f32,
    /// Clustering seed. Fixed by default so palettes are reproducible.
    pub cluster_seed: u64,
    /// Pixel sampling stride for clustering; 1 keeps every pixel.
    pub sample_stride: u32,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            color_count: 5,
            min_text_confidence: 50.0,
            min_face_confidence: DEFAULT_MIN_FACE_CONFIDENCE,
            cluster_seed: DEFAULT_SEED,
            sample_stride: 1,
        }
    }
}

impl AnalysisSettings {
    /// Settings tuned for large frames: smaller palette, coarser sampling.
    pub fn fast() -> Self {
        Self {
            color_count: 3,
            sample_stride: 4,
            ..Self::default()
        }
    }

    pub fn with_color_count(mut self, color_count: usize) -> Self {
        self.color_count = color_count;
        self
    }

    pub fn with_min_text_confidence(mut self, min_text_confidence: f32) -> Self {
        self.min_text_confidence = min_text_confidence.clamp(0.0, 100.0);
        self
    }

    pub fn with_min_face_confidence(mut self, min_face_confidence: f32) -> Self {
        self.min_face_confidence = min_face_confidence.clamp(0.0, 1.0);
        self
    }

    pub fn with_cluster_seed(mut self, cluster_seed: u64) -> Self {
        self.cluster_seed = cluster_seed;
        self
    }

    pub fn with_sample_stride(mut self, sample_stride: u32) -> Self {
        self.sample_stride = sample_stride.max(1);
        self
    }

    /// Validate settings parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.color_count == 0 {
            return Err("Color count must be at least 1".to_string());
        }

        if self.min_text_confidence < 0.0 || self.min_text_confidence > 100.0 {
            return Err("Minimum text confidence must be between 0 and 100".to_string());
        }

        if self.min_face_confidence < 0.0 || self.min_face_confidence > 1.0 {
            return Err("Minimum face confidence must be between 0.0 and 1.0".to_string());
        }

        if self.sample_stride == 0 {
            return Err("Sample stride must be greater than 0".to_string());
        }

        Ok(())
    }
}

/// Everything the binary needs, loadable from an optional file with
/// `THUMBSCOPE_`-prefixed environment overrides layered on top.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub options: AnalysisOptions,
    pub analysis: AnalysisSettings,
}

impl Settings {
    pub fn load(name: &str) -> Result<Self, AnalysisError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(name).required(false))
            .add_source(config::Environment::with_prefix("THUMBSCOPE").separator("__"))
            .build()
            .map_err(|e| AnalysisError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AnalysisError::Config(e.to_string()))?;
        Ok(settings)
    }
}
