use serde::{Deserialize, Serialize};

use crate::acuity::level::{default_snellen_levels, Level};

/// Staircase settings for the acuity test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcuityConfig {
    /// Extra trials granted at a level after the threshold is missed
    #[serde(default = "default_bonus_attempts")]
    pub bonus_attempts: u32,

    /// Score label reported when no level was passed
    #[serde(default = "default_below_lowest_label")]
    pub below_lowest_label: String,

    /// Ladder from easiest to hardest
    #[serde(default = "default_snellen_levels")]
    pub levels: Vec<Level>,

    #[serde(default)]
    pub severity: AcuitySeverityBands,
}

impl Default for AcuityConfig {
    fn default() -> Self {
        Self {
            bonus_attempts: default_bonus_attempts(),
            below_lowest_label: default_below_lowest_label(),
            levels: default_snellen_levels(),
            severity: AcuitySeverityBands::default(),
        }
    }
}

/// Severity bands over the fraction of the ladder passed (0.0-1.0).
///
/// A fraction at or above `none_ratio` is NONE, at or above `low_ratio` is
/// LOW, at or above `medium_ratio` is MEDIUM, anything lower is HIGH.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcuitySeverityBands {
    #[serde(default = "default_none_ratio")]
    pub none_ratio: f64,

    #[serde(default = "default_low_ratio")]
    pub low_ratio: f64,

    #[serde(default = "default_medium_ratio")]
    pub medium_ratio: f64,
}

impl Default for AcuitySeverityBands {
    fn default() -> Self {
        Self {
            none_ratio: default_none_ratio(),
            low_ratio: default_low_ratio(),
            medium_ratio: default_medium_ratio(),
        }
    }
}

pub fn default_bonus_attempts() -> u32 {
    2
}
pub fn default_below_lowest_label() -> String {
    "< 20/200".to_string()
}
fn default_none_ratio() -> f64 {
    1.0
}
fn default_low_ratio() -> f64 {
    0.6
}
fn default_medium_ratio() -> f64 {
    0.3
}
