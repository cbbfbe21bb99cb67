//! Astigmatism dial classifier.
//!
//! Each eye reports which lines of the dial look darker: none, vertical,
//! horizontal or oblique. Oblique astigmatism is harder to correct, so it
//! escalates severity whether one or both eyes report it.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::{Error, ResultEnvelope, Severity, TestTiming};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AstigmatismSelection {
    None,
    Vertical,
    Horizontal,
    Oblique,
}

impl AstigmatismSelection {
    pub const ALL: [AstigmatismSelection; 4] = [
        AstigmatismSelection::None,
        AstigmatismSelection::Vertical,
        AstigmatismSelection::Horizontal,
        AstigmatismSelection::Oblique,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AstigmatismSelection::None => "none",
            AstigmatismSelection::Vertical => "vertical",
            AstigmatismSelection::Horizontal => "horizontal",
            AstigmatismSelection::Oblique => "oblique",
        }
    }

    pub fn has_astigmatism(&self) -> bool {
        *self != AstigmatismSelection::None
    }

    pub fn is_oblique(&self) -> bool {
        *self == AstigmatismSelection::Oblique
    }
}

impl std::fmt::Display for AstigmatismSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AstigmatismSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(AstigmatismSelection::None),
            "vertical" => Ok(AstigmatismSelection::Vertical),
            "horizontal" => Ok(AstigmatismSelection::Horizontal),
            "oblique" => Ok(AstigmatismSelection::Oblique),
            _ => Err(Error::invalid_input(
                "astigmatism selection",
                s,
                "none, vertical, horizontal, oblique",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EyeAstigmatism {
    pub selection: AstigmatismSelection,
    pub has_astigmatism: bool,
}

impl From<AstigmatismSelection> for EyeAstigmatism {
    fn from(selection: AstigmatismSelection) -> Self {
        Self {
            selection,
            has_astigmatism: selection.has_astigmatism(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstigmatismDetails {
    pub right_eye: EyeAstigmatism,
    pub left_eye: EyeAstigmatism,
    pub affected_eyes: u8,
}

/// Rule table, first match wins:
///
/// | affected eyes | oblique among affected | severity |
/// |---------------|------------------------|----------|
/// | 2             | yes                    | HIGH     |
/// | 2             | no                     | MEDIUM   |
/// | 1             | yes                    | MEDIUM   |
/// | 1             | no                     | LOW      |
/// | 0             | -                      | NONE     |
pub fn astigmatism_severity(right: AstigmatismSelection, left: AstigmatismSelection) -> Severity {
    let any_oblique = right.is_oblique() || left.is_oblique();
    match (right.has_astigmatism(), left.has_astigmatism()) {
        (true, true) if any_oblique => Severity::High,
        (true, true) => Severity::Medium,
        (true, false) | (false, true) if any_oblique => Severity::Medium,
        (true, false) | (false, true) => Severity::Low,
        (false, false) => Severity::None,
    }
}

pub fn classify_astigmatism(
    right: AstigmatismSelection,
    left: AstigmatismSelection,
    timing: TestTiming,
) -> ResultEnvelope<AstigmatismDetails> {
    let severity = astigmatism_severity(right, left);
    let details = AstigmatismDetails {
        right_eye: right.into(),
        left_eye: left.into(),
        affected_eyes: u8::from(right.has_astigmatism()) + u8::from(left.has_astigmatism()),
    };
    tracing::info!(%right, %left, %severity, "astigmatism classified");
    ResultEnvelope::new(severity, timing, details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use AstigmatismSelection::*;

    #[test]
    fn test_rule_table() {
        assert_eq!(astigmatism_severity(Oblique, Vertical), Severity::High);
        assert_eq!(astigmatism_severity(Horizontal, Oblique), Severity::High);
        assert_eq!(astigmatism_severity(Vertical, Horizontal), Severity::Medium);
        assert_eq!(astigmatism_severity(Oblique, None), Severity::Medium);
        assert_eq!(astigmatism_severity(None, Oblique), Severity::Medium);
        assert_eq!(astigmatism_severity(None, Vertical), Severity::Low);
        assert_eq!(astigmatism_severity(None, None), Severity::None);
    }

    #[test]
    fn test_unilateral_oblique_details() {
        let result = classify_astigmatism(Oblique, None, TestTiming::instant(Utc::now()));
        assert_eq!(result.severity, Severity::Medium);
        assert!(result.details.right_eye.has_astigmatism);
        assert!(!result.details.left_eye.has_astigmatism);
        assert_eq!(result.details.affected_eyes, 1);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!("Oblique".parse::<AstigmatismSelection>().unwrap(), Oblique);
        let err = "diagonal".parse::<AstigmatismSelection>().unwrap_err();
        assert!(err.is_rejection());
    }

    #[test]
    fn test_every_pair_classifies() {
        for right in AstigmatismSelection::ALL {
            for left in AstigmatismSelection::ALL {
                let severity = astigmatism_severity(right, left);
                assert!(Severity::ALL.contains(&severity));
                assert_eq!(severity, astigmatism_severity(left, right));
            }
        }
    }
}
