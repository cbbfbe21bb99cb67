//! Classifier behaviour through the public API, including the serialized
//! record shape consumers read back from history.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use visionscreen::classifiers::{
    classify_amsler, classify_astigmatism, classify_color_vision, classify_duochrome,
    AstigmatismSelection, ColorVisionType, DuochromeCondition, DuochromeSelection, PlateBattery,
};
use visionscreen::config::{AmslerThresholds, ColorVisionThresholds};
use visionscreen::{Severity, TestRecord, TestTiming};

fn timing() -> TestTiming {
    TestTiming::instant(Utc.with_ymd_and_hms(2026, 5, 4, 12, 0, 0).unwrap())
}

fn answers_with_misses(battery: &PlateBattery, misses: usize) -> Vec<String> {
    battery
        .plates()
        .iter()
        .enumerate()
        .map(|(i, plate)| {
            if i < misses {
                "wrong".to_string()
            } else {
                plate.answer.to_uppercase()
            }
        })
        .collect()
}

#[test]
fn color_vision_eleven_of_twelve_is_normal() {
    let battery = PlateBattery::standard();
    let answers = answers_with_misses(&battery, 1);
    let result = classify_color_vision(
        battery.plates(),
        &answers,
        &ColorVisionThresholds::default(),
        timing(),
    );

    assert_eq!(result.details.correct, 11);
    assert_eq!(result.details.accuracy, 92);
    assert_eq!(result.severity, Severity::None);
    assert_eq!(result.details.vision_type, ColorVisionType::Normal);
    assert_eq!(result.details.vision_type.label(), "Normal");
    assert_eq!(result.details.missed.len(), 1);
}

#[test]
fn color_vision_seven_of_twelve_is_medium() {
    let battery = PlateBattery::standard();
    let answers = answers_with_misses(&battery, 5);
    let result = classify_color_vision(
        battery.plates(),
        &answers,
        &ColorVisionThresholds::default(),
        timing(),
    );

    assert_eq!(result.details.accuracy, 58);
    assert_eq!(result.severity, Severity::Medium);
    assert_eq!(result.details.vision_type, ColorVisionType::RedGreenDeficiency);
}

#[test]
fn color_vision_score_ignores_plate_order() {
    use rand::SeedableRng;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(17);
    let shuffled = PlateBattery::standard().shuffled(&mut rng);
    let answers: Vec<&str> = shuffled.plates().iter().map(|p| p.answer.as_str()).collect();

    let result = classify_color_vision(
        shuffled.plates(),
        &answers,
        &ColorVisionThresholds::default(),
        timing(),
    );
    assert_eq!(result.details.accuracy, 100);
}

#[test]
fn astigmatism_one_oblique_eye_is_medium() {
    let result = classify_astigmatism(
        AstigmatismSelection::Oblique,
        AstigmatismSelection::None,
        timing(),
    );
    assert_eq!(result.severity, Severity::Medium);
    assert_eq!(result.details.affected_eyes, 1);
}

#[test]
fn duochrome_red_and_green_is_mixed_high() {
    let result = classify_duochrome(DuochromeSelection::Red, DuochromeSelection::Green, timing());
    assert_eq!(result.details.condition, DuochromeCondition::Mixed);
    assert_eq!(result.severity, Severity::High);
}

#[test]
fn amsler_two_areas_one_symptom_is_medium() {
    let result = classify_amsler(
        &["top-left", "top-right"],
        &["wavy"],
        &AmslerThresholds::default(),
        timing(),
    );
    assert!(result.details.issue_detected);
    assert_eq!(result.details.area_score, 2);
    assert_eq!(result.details.symptom_score, 1);
    assert_eq!(result.details.weighted_score, 3.5);
    assert_eq!(result.severity, Severity::Medium);
}

#[test]
fn amsler_without_findings_is_none() {
    let empty: [&str; 0] = [];
    let result = classify_amsler(&empty, &empty, &AmslerThresholds::default(), timing());
    assert!(!result.details.issue_detected);
    assert_eq!(result.severity, Severity::None);
}

#[test]
fn record_json_carries_envelope_fields() {
    let record: TestRecord =
        classify_duochrome(DuochromeSelection::Green, DuochromeSelection::Equal, timing()).into();
    let value = serde_json::to_value(&record).unwrap();

    assert_eq!(value["test"], "duochrome");
    assert_eq!(value["result"]["severity"], "LOW");
    assert_eq!(value["result"]["duration_seconds"], 0);
    assert_eq!(value["result"]["condition"], "hyperopic");
    assert!(value["result"]["date"].is_string());

    let back: TestRecord = serde_json::from_value(value).unwrap();
    assert_eq!(back, record);
}

fn astigmatism_selection() -> impl Strategy<Value = AstigmatismSelection> {
    prop::sample::select(AstigmatismSelection::ALL.to_vec())
}

fn duochrome_selection() -> impl Strategy<Value = DuochromeSelection> {
    prop::sample::select(DuochromeSelection::ALL.to_vec())
}

proptest! {
    #[test]
    fn astigmatism_is_total_and_idempotent(
        right in astigmatism_selection(),
        left in astigmatism_selection(),
    ) {
        let first = classify_astigmatism(right, left, timing());
        let second = classify_astigmatism(right, left, timing());
        prop_assert_eq!(&first, &second);
        let healthy = !right.has_astigmatism() && !left.has_astigmatism();
        prop_assert_eq!(first.severity == Severity::None, healthy);
    }

    #[test]
    fn duochrome_is_symmetric_in_severity(
        right in duochrome_selection(),
        left in duochrome_selection(),
    ) {
        let a = classify_duochrome(right, left, timing());
        let b = classify_duochrome(left, right, timing());
        prop_assert_eq!(a.severity, b.severity);
        prop_assert_eq!(a.details.condition, b.details.condition);
    }

    #[test]
    fn color_vision_severity_never_improves_with_more_misses(misses in 0usize..12) {
        let battery = PlateBattery::standard();
        let thresholds = ColorVisionThresholds::default();
        let fewer = classify_color_vision(
            battery.plates(),
            &answers_with_misses(&battery, misses),
            &thresholds,
            timing(),
        );
        let more = classify_color_vision(
            battery.plates(),
            &answers_with_misses(&battery, misses + 1),
            &thresholds,
            timing(),
        );
        prop_assert!(more.severity >= fewer.severity);
        prop_assert!(more.details.accuracy <= fewer.details.accuracy);
    }
}
