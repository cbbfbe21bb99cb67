//! Duochrome (red/green) refraction classifier.
//!
//! Letters on the red half look sharper to a myopic eye, letters on the green
//! half to a hyperopic eye; equal sharpness means no refractive bias.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::{Error, ResultEnvelope, Severity, TestTiming};

/// Which half of the chart looked sharper to one eye.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuochromeSelection {
    Red,
    Green,
    Equal,
}

impl DuochromeSelection {
    pub const ALL: [DuochromeSelection; 3] = [
        DuochromeSelection::Red,
        DuochromeSelection::Green,
        DuochromeSelection::Equal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DuochromeSelection::Red => "red",
            DuochromeSelection::Green => "green",
            DuochromeSelection::Equal => "equal",
        }
    }

    pub fn condition(&self) -> RefractiveCondition {
        match self {
            DuochromeSelection::Red => RefractiveCondition::Myopic,
            DuochromeSelection::Green => RefractiveCondition::Hyperopic,
            DuochromeSelection::Equal => RefractiveCondition::Normal,
        }
    }
}

impl std::fmt::Display for DuochromeSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DuochromeSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "red" => Ok(DuochromeSelection::Red),
            "green" => Ok(DuochromeSelection::Green),
            "equal" | "same" => Ok(DuochromeSelection::Equal),
            _ => Err(Error::invalid_input(
                "duochrome selection",
                s,
                "red, green, equal",
            )),
        }
    }
}

/// Per-eye refractive reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefractiveCondition {
    Normal,
    Myopic,
    Hyperopic,
}

impl RefractiveCondition {
    pub fn is_abnormal(&self) -> bool {
        *self != RefractiveCondition::Normal
    }
}

/// Combined reading over both eyes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuochromeCondition {
    Normal,
    Myopic,
    Hyperopic,
    /// Each eye needs a different correction (anisometropia-like).
    Mixed,
}

impl From<RefractiveCondition> for DuochromeCondition {
    fn from(condition: RefractiveCondition) -> Self {
        match condition {
            RefractiveCondition::Normal => DuochromeCondition::Normal,
            RefractiveCondition::Myopic => DuochromeCondition::Myopic,
            RefractiveCondition::Hyperopic => DuochromeCondition::Hyperopic,
        }
    }
}

impl std::fmt::Display for DuochromeCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DuochromeCondition::Normal => "normal",
            DuochromeCondition::Myopic => "myopic",
            DuochromeCondition::Hyperopic => "hyperopic",
            DuochromeCondition::Mixed => "mixed",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EyeRefraction {
    pub selection: DuochromeSelection,
    pub condition: RefractiveCondition,
}

impl From<DuochromeSelection> for EyeRefraction {
    fn from(selection: DuochromeSelection) -> Self {
        Self {
            selection,
            condition: selection.condition(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuochromeDetails {
    pub right_eye: EyeRefraction,
    pub left_eye: EyeRefraction,
    pub condition: DuochromeCondition,
}

/// Combine the two eyes into an overall condition and severity.
pub fn combine_eyes(
    right: RefractiveCondition,
    left: RefractiveCondition,
) -> (DuochromeCondition, Severity) {
    match (right.is_abnormal(), left.is_abnormal()) {
        (true, true) if right == left => (right.into(), Severity::Medium),
        (true, true) => (DuochromeCondition::Mixed, Severity::High),
        (true, false) => (right.into(), Severity::Low),
        (false, true) => (left.into(), Severity::Low),
        (false, false) => (DuochromeCondition::Normal, Severity::None),
    }
}

pub fn classify_duochrome(
    right: DuochromeSelection,
    left: DuochromeSelection,
    timing: TestTiming,
) -> ResultEnvelope<DuochromeDetails> {
    let right_eye = EyeRefraction::from(right);
    let left_eye = EyeRefraction::from(left);
    let (condition, severity) = combine_eyes(right_eye.condition, left_eye.condition);

    tracing::info!(%right, %left, %condition, %severity, "duochrome classified");
    ResultEnvelope::new(
        severity,
        timing,
        DuochromeDetails {
            right_eye,
            left_eye,
            condition,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use DuochromeSelection::*;

    fn classify(
        right: DuochromeSelection,
        left: DuochromeSelection,
    ) -> ResultEnvelope<DuochromeDetails> {
        classify_duochrome(right, left, TestTiming::instant(Utc::now()))
    }

    #[test]
    fn test_red_green_is_mixed_high() {
        let result = classify(Red, Green);
        assert_eq!(result.details.condition, DuochromeCondition::Mixed);
        assert_eq!(result.severity, Severity::High);
    }

    #[test]
    fn test_both_red_is_myopic_medium() {
        let result = classify(Red, Red);
        assert_eq!(result.details.condition, DuochromeCondition::Myopic);
        assert_eq!(result.severity, Severity::Medium);
    }

    #[test]
    fn test_one_eye_green_is_low() {
        let result = classify(Equal, Green);
        assert_eq!(result.details.condition, DuochromeCondition::Hyperopic);
        assert_eq!(result.severity, Severity::Low);
        assert_eq!(result.details.left_eye.condition, RefractiveCondition::Hyperopic);
    }

    #[test]
    fn test_equal_both_is_normal() {
        let result = classify(Equal, Equal);
        assert_eq!(result.details.condition, DuochromeCondition::Normal);
        assert_eq!(result.severity, Severity::None);
    }

    #[test]
    fn test_parse() {
        assert_eq!(" Same ".parse::<DuochromeSelection>().unwrap(), Equal);
        assert!("blue".parse::<DuochromeSelection>().is_err());
    }

    #[test]
    fn test_all_pairs_are_symmetric_in_severity() {
        for right in DuochromeSelection::ALL {
            for left in DuochromeSelection::ALL {
                let (_, a) = combine_eyes(right.condition(), left.condition());
                let (_, b) = combine_eyes(left.condition(), right.condition());
                assert_eq!(a, b);
            }
        }
    }
}
