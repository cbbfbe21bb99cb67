use serde::{Deserialize, Serialize};

use super::acuity::AcuityConfig;
use super::thresholds::{AmslerThresholds, ColorVisionThresholds};

/// Root configuration structure for visionscreen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VisionConfig {
    /// Level ladder and staircase settings
    #[serde(default)]
    pub acuity: AcuityConfig,

    /// Plate accuracy breakpoints
    #[serde(default)]
    pub color_vision: ColorVisionThresholds,

    /// Amsler grid weighting
    #[serde(default)]
    pub amsler: AmslerThresholds,

    /// Output configuration
    #[serde(default)]
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// `terminal` or `json`
    pub default_format: Option<String>,

    /// JSON-lines file every finished result is appended to
    pub history_file: Option<String>,
}
