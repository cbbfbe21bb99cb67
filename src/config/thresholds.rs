use serde::{Deserialize, Serialize};

/// Accuracy breakpoints (integer percent) for the color-vision plates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorVisionThresholds {
    /// Accuracy at or above this is NONE
    #[serde(default = "default_none_min")]
    pub none_min: u32,

    /// Accuracy at or above this is LOW
    #[serde(default = "default_low_min")]
    pub low_min: u32,

    /// Accuracy at or above this is MEDIUM, below is HIGH
    #[serde(default = "default_medium_min")]
    pub medium_min: u32,
}

impl Default for ColorVisionThresholds {
    fn default() -> Self {
        Self {
            none_min: default_none_min(),
            low_min: default_low_min(),
            medium_min: default_medium_min(),
        }
    }
}

fn default_none_min() -> u32 {
    90
}
fn default_low_min() -> u32 {
    75
}
fn default_medium_min() -> u32 {
    50
}

/// Weighting and cut-offs for the Amsler grid score
///
/// The weighted score is `areas + symptoms * symptom_weight`. HIGH when any
/// `high_*` cut-off is reached, MEDIUM when any `medium_*` cut-off is reached,
/// LOW otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmslerThresholds {
    #[serde(default = "default_symptom_weight")]
    pub symptom_weight: f64,

    #[serde(default = "default_high_score")]
    pub high_score: f64,
    #[serde(default = "default_high_areas")]
    pub high_areas: usize,
    #[serde(default = "default_high_symptoms")]
    pub high_symptoms: usize,

    #[serde(default = "default_medium_score")]
    pub medium_score: f64,
    #[serde(default = "default_medium_areas")]
    pub medium_areas: usize,
    #[serde(default = "default_medium_symptoms")]
    pub medium_symptoms: usize,
}

impl Default for AmslerThresholds {
    fn default() -> Self {
        Self {
            symptom_weight: default_symptom_weight(),
            high_score: default_high_score(),
            high_areas: default_high_areas(),
            high_symptoms: default_high_symptoms(),
            medium_score: default_medium_score(),
            medium_areas: default_medium_areas(),
            medium_symptoms: default_medium_symptoms(),
        }
    }
}

fn default_symptom_weight() -> f64 {
    1.5
}
fn default_high_score() -> f64 {
    5.0
}
fn default_high_areas() -> usize {
    4
}
fn default_high_symptoms() -> usize {
    3
}
fn default_medium_score() -> f64 {
    2.5
}
fn default_medium_areas() -> usize {
    2
}
fn default_medium_symptoms() -> usize {
    2
}
