//! Color-vision plate classifier.
//!
//! The user reads a battery of pseudo-isochromatic plates in random order.
//! Accuracy over the battery maps to a severity and a descriptive type.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ColorVisionThresholds;
use crate::core::{percentage, ResultEnvelope, Severity, TestTiming};

/// Canonical answer for plates that show no figure to a normal observer.
pub const NOTHING_ANSWER: &str = "nothing";

/// A single test image with one canonical answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plate {
    pub id: u32,
    pub answer: String,
}

impl Plate {
    pub fn new(id: u32, answer: impl Into<String>) -> Self {
        Self {
            id,
            answer: answer.into(),
        }
    }

    /// Whether `response` matches, ignoring case and surrounding whitespace.
    /// A blank response reads as "nothing".
    pub fn accepts(&self, response: &str) -> bool {
        normalize_answer(response) == normalize_answer(&self.answer)
    }
}

fn normalize_answer(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        NOTHING_ANSWER.to_string()
    } else {
        trimmed.to_lowercase()
    }
}

/// Ordered set of plates presented in one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlateBattery {
    plates: Vec<Plate>,
}

impl PlateBattery {
    pub fn new(plates: Vec<Plate>) -> Self {
        Self { plates }
    }

    /// The stock 12-plate battery, in canonical order.
    pub fn standard() -> Self {
        let answers = [
            "12", "8", "29", "5", "3", "15", "74", "6", "45", "7", "16", NOTHING_ANSWER,
        ];
        Self::new(
            answers
                .iter()
                .zip(1u32..)
                .map(|(answer, id)| Plate::new(id, *answer))
                .collect(),
        )
    }

    /// A uniformly shuffled copy, drawn once per test start.
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        let mut plates = self.plates.clone();
        plates.shuffle(rng);
        Self { plates }
    }

    pub fn plates(&self) -> &[Plate] {
        &self.plates
    }

    pub fn len(&self) -> usize {
        self.plates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plates.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorVisionType {
    Normal,
    RedGreenDeficiency,
    PossibleTotalColorBlindness,
}

impl ColorVisionType {
    pub fn label(&self) -> &'static str {
        match self {
            ColorVisionType::Normal => "Normal",
            ColorVisionType::RedGreenDeficiency => "Red-Green Deficiency",
            ColorVisionType::PossibleTotalColorBlindness => "Possible Total Color Blindness",
        }
    }

    fn from_severity(severity: Severity) -> Self {
        match severity {
            Severity::None => ColorVisionType::Normal,
            Severity::Low | Severity::Medium => ColorVisionType::RedGreenDeficiency,
            Severity::High => ColorVisionType::PossibleTotalColorBlindness,
        }
    }
}

impl std::fmt::Display for ColorVisionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A plate the user read incorrectly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissedPlate {
    pub plate_id: u32,
    pub expected: String,
    pub actual: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorVisionDetails {
    pub correct: u32,
    pub total: u32,
    pub accuracy: u32,
    #[serde(rename = "type")]
    pub vision_type: ColorVisionType,
    pub missed: Vec<MissedPlate>,
}

/// Severity for an integer accuracy percentage.
pub fn severity_for_accuracy(accuracy: u32, thresholds: &ColorVisionThresholds) -> Severity {
    if accuracy >= thresholds.none_min {
        Severity::None
    } else if accuracy >= thresholds.low_min {
        Severity::Low
    } else if accuracy >= thresholds.medium_min {
        Severity::Medium
    } else {
        Severity::High
    }
}

/// Score `answers` against `plates`, position by position.
///
/// Missing trailing answers count as blank. An empty battery is a degenerate
/// attempt and classifies as NONE.
pub fn classify_color_vision<S: AsRef<str>>(
    plates: &[Plate],
    answers: &[S],
    thresholds: &ColorVisionThresholds,
    timing: TestTiming,
) -> ResultEnvelope<ColorVisionDetails> {
    let missed: Vec<MissedPlate> = plates
        .iter()
        .enumerate()
        .filter_map(|(index, plate)| {
            let actual = answers.get(index).map(|a| a.as_ref()).unwrap_or("");
            (!plate.accepts(actual)).then(|| MissedPlate {
                plate_id: plate.id,
                expected: plate.answer.clone(),
                actual: actual.trim().to_string(),
            })
        })
        .collect();

    let total = plates.len();
    let correct = total - missed.len();
    let accuracy = percentage(correct, total);
    let severity = if total == 0 {
        Severity::None
    } else {
        severity_for_accuracy(accuracy, thresholds)
    };

    let details = ColorVisionDetails {
        correct: correct as u32,
        total: total as u32,
        accuracy,
        vision_type: ColorVisionType::from_severity(severity),
        missed,
    };
    tracing::info!(correct, total, accuracy, %severity, "color vision classified");
    ResultEnvelope::new(severity, timing, details)
}
