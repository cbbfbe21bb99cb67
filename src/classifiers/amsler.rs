//! Amsler grid classifier.
//!
//! The classifier only counts flagged regions and symptoms. Both scores are
//! plain list lengths: repeated entries count every time. Turning a tapped
//! grid cell into a region name, and merging cells that share a region,
//! happens beforehand via [`GridRegion::for_cell`].

use serde::{Deserialize, Serialize};

use crate::config::AmslerThresholds;
use crate::core::{ResultEnvelope, Severity, TestTiming};

/// Nine named regions of the grid, a 3x3 partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GridRegion {
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl GridRegion {
    const LAYOUT: [[GridRegion; 3]; 3] = [
        [GridRegion::TopLeft, GridRegion::Top, GridRegion::TopRight],
        [GridRegion::Left, GridRegion::Center, GridRegion::Right],
        [
            GridRegion::BottomLeft,
            GridRegion::Bottom,
            GridRegion::BottomRight,
        ],
    ];

    /// Region containing cell (`row`, `col`) of a `grid_size` x `grid_size`
    /// grid, or `None` when the cell lies outside it.
    pub fn for_cell(row: usize, col: usize, grid_size: usize) -> Option<GridRegion> {
        if row >= grid_size || col >= grid_size {
            return None;
        }
        let band = |i: usize| i * 3 / grid_size;
        Some(Self::LAYOUT[band(row)][band(col)])
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GridRegion::TopLeft => "top-left",
            GridRegion::Top => "top",
            GridRegion::TopRight => "top-right",
            GridRegion::Left => "left",
            GridRegion::Center => "center",
            GridRegion::Right => "right",
            GridRegion::BottomLeft => "bottom-left",
            GridRegion::Bottom => "bottom",
            GridRegion::BottomRight => "bottom-right",
        }
    }
}

impl std::fmt::Display for GridRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmslerDetails {
    pub issue_detected: bool,
    pub distorted_areas: Vec<String>,
    pub symptoms: Vec<String>,
    pub area_score: usize,
    pub symptom_score: usize,
    pub weighted_score: f64,
}

fn owned<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items.iter().map(|item| item.as_ref().to_string()).collect()
}

/// Severity from the counts. Zero areas and zero symptoms is always NONE.
pub fn amsler_severity(
    area_score: usize,
    symptom_score: usize,
    thresholds: &AmslerThresholds,
) -> Severity {
    if area_score == 0 && symptom_score == 0 {
        return Severity::None;
    }

    let score = weighted_score(area_score, symptom_score, thresholds);
    if score >= thresholds.high_score
        || area_score >= thresholds.high_areas
        || symptom_score >= thresholds.high_symptoms
    {
        Severity::High
    } else if score >= thresholds.medium_score
        || area_score >= thresholds.medium_areas
        || symptom_score >= thresholds.medium_symptoms
    {
        Severity::Medium
    } else {
        Severity::Low
    }
}

fn weighted_score(area_score: usize, symptom_score: usize, thresholds: &AmslerThresholds) -> f64 {
    area_score as f64 + symptom_score as f64 * thresholds.symptom_weight
}

pub fn classify_amsler<A: AsRef<str>, S: AsRef<str>>(
    distorted_areas: &[A],
    symptoms: &[S],
    thresholds: &AmslerThresholds,
    timing: TestTiming,
) -> ResultEnvelope<AmslerDetails> {
    let distorted_areas = owned(distorted_areas);
    let symptoms = owned(symptoms);
    let area_score = distorted_areas.len();
    let symptom_score = symptoms.len();
    let severity = amsler_severity(area_score, symptom_score, thresholds);

    let details = AmslerDetails {
        issue_detected: area_score > 0 || symptom_score > 0,
        distorted_areas,
        symptoms,
        area_score,
        symptom_score,
        weighted_score: weighted_score(area_score, symptom_score, thresholds),
    };
    tracing::info!(area_score, symptom_score, %severity, "amsler grid classified");
    ResultEnvelope::new(severity, timing, details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    fn classify(areas: &[&str], symptoms: &[&str]) -> ResultEnvelope<AmslerDetails> {
        classify_amsler(
            areas,
            symptoms,
            &AmslerThresholds::default(),
            TestTiming::instant(Utc::now()),
        )
    }

    #[test]
    fn test_two_areas_one_symptom_is_medium() {
        let result = classify(&["top-left", "top-right"], &["wavy"]);
        assert_eq!(result.details.area_score, 2);
        assert_eq!(result.details.symptom_score, 1);
        assert_eq!(result.details.weighted_score, 3.5);
        assert_eq!(result.severity, Severity::Medium);
    }

    #[test]
    fn test_no_input_is_none() {
        let result = classify(&[], &[]);
        assert!(!result.details.issue_detected);
        assert_eq!(result.severity, Severity::None);
        assert_eq!(result.details.weighted_score, 0.0);
    }

    #[test]
    fn test_single_area_is_low() {
        assert_eq!(classify(&["center"], &[]).severity, Severity::Low);
    }

    #[test]
    fn test_single_symptom_is_low() {
        // 1.5 < 2.5 and below both count cut-offs
        assert_eq!(classify(&[], &["blurry"]).severity, Severity::Low);
    }

    #[test]
    fn test_high_cutoffs() {
        assert_eq!(
            classify(&["top", "left", "right", "bottom"], &[]).severity,
            Severity::High
        );
        assert_eq!(
            classify(&[], &["wavy", "missing", "blurry"]).severity,
            Severity::High
        );
        // 3 + 2 * 1.5 = 6.0
        assert_eq!(
            classify(&["top", "left", "right"], &["wavy", "blurry"]).severity,
            Severity::High
        );
    }

    #[test]
    fn test_repeated_symptom_counts_twice() {
        let result = classify(&[], &["wavy", "wavy"]);
        assert_eq!(result.details.symptom_score, 2);
        assert_eq!(result.details.weighted_score, 3.0);
        assert_eq!(result.severity, Severity::Medium);
    }

    #[test]
    fn test_scores_are_list_lengths() {
        let result = classify(&["top-left", "top-left"], &["wavy"]);
        assert_eq!(result.details.distorted_areas, vec!["top-left", "top-left"]);
        assert_eq!(result.details.area_score, 2);
        assert_eq!(result.details.symptom_score, 1);
    }

    #[test]
    fn test_region_mapping() {
        assert_eq!(GridRegion::for_cell(0, 0, 20), Some(GridRegion::TopLeft));
        assert_eq!(GridRegion::for_cell(10, 10, 20), Some(GridRegion::Center));
        assert_eq!(GridRegion::for_cell(19, 0, 20), Some(GridRegion::BottomLeft));
        assert_eq!(GridRegion::for_cell(6, 19, 20), Some(GridRegion::TopRight));
        assert_eq!(GridRegion::for_cell(20, 0, 20), None);
        assert_eq!(GridRegion::for_cell(0, 0, 0), None);
    }

    proptest! {
        #[test]
        fn prop_severity_total_and_deterministic(areas in 0usize..12, symptoms in 0usize..12) {
            let t = AmslerThresholds::default();
            let first = amsler_severity(areas, symptoms, &t);
            prop_assert!(Severity::ALL.contains(&first));
            prop_assert_eq!(first, amsler_severity(areas, symptoms, &t));
            prop_assert_eq!(first == Severity::None, areas == 0 && symptoms == 0);
        }
    }
}
