//! Shared data model: the severity axis and the result envelope every test
//! type produces.

pub mod errors;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::acuity::AcuityDetails;
use crate::classifiers::{AmslerDetails, AstigmatismDetails, ColorVisionDetails, DuochromeDetails};

pub use errors::{Error, Result, ResultExt};

/// Common outcome axis shared by all five tests. Ordered `None < Low < Medium < High`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Copy, Ord, PartialOrd)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::None,
        Severity::Low,
        Severity::Medium,
        Severity::High,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "NONE",
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Integer percentage, rounded half away from zero; 0 when `total` is 0.
pub fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u32
}

/// The five screening modalities.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Copy)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    Acuity,
    ColorVision,
    Astigmatism,
    Amsler,
    Duochrome,
}

impl std::fmt::Display for TestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(TestKind, &str)] = &[
            (TestKind::Acuity, "Visual Acuity"),
            (TestKind::ColorVision, "Color Vision"),
            (TestKind::Astigmatism, "Astigmatism"),
            (TestKind::Amsler, "Amsler Grid"),
            (TestKind::Duochrome, "Duochrome"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(kind, _)| kind == self)
            .map(|(_, s)| *s)
            .unwrap_or("Unknown");

        write!(f, "{display_str}")
    }
}

/// Wall-clock bounds of one test attempt. Only used for reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TestTiming {
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl TestTiming {
    pub fn new(started_at: DateTime<Utc>, completed_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            completed_at,
        }
    }

    /// A zero-length attempt, for classifiers whose inputs arrive all at once.
    pub fn instant(at: DateTime<Utc>) -> Self {
        Self::new(at, at)
    }

    /// Whole seconds elapsed; a clock that went backwards yields 0.
    pub fn duration_seconds(&self) -> u64 {
        let secs = (self.completed_at - self.started_at).num_seconds();
        u64::try_from(secs).unwrap_or(0)
    }
}

/// The shape every finished test hands to reporting and storage.
///
/// Created once per completed attempt and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope<T> {
    pub severity: Severity,
    pub date: DateTime<Utc>,
    pub duration_seconds: u64,
    #[serde(flatten)]
    pub details: T,
}

impl<T> ResultEnvelope<T> {
    pub fn new(severity: Severity, timing: TestTiming, details: T) -> Self {
        Self {
            severity,
            date: timing.completed_at,
            duration_seconds: timing.duration_seconds(),
            details,
        }
    }
}

/// A finished result of any test type, as stored in history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "test", content = "result", rename_all = "snake_case")]
pub enum TestRecord {
    Acuity(ResultEnvelope<AcuityDetails>),
    ColorVision(ResultEnvelope<ColorVisionDetails>),
    Astigmatism(ResultEnvelope<AstigmatismDetails>),
    Amsler(ResultEnvelope<AmslerDetails>),
    Duochrome(ResultEnvelope<DuochromeDetails>),
}

impl TestRecord {
    pub fn kind(&self) -> TestKind {
        match self {
            TestRecord::Acuity(_) => TestKind::Acuity,
            TestRecord::ColorVision(_) => TestKind::ColorVision,
            TestRecord::Astigmatism(_) => TestKind::Astigmatism,
            TestRecord::Amsler(_) => TestKind::Amsler,
            TestRecord::Duochrome(_) => TestKind::Duochrome,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            TestRecord::Acuity(r) => r.severity,
            TestRecord::ColorVision(r) => r.severity,
            TestRecord::Astigmatism(r) => r.severity,
            TestRecord::Amsler(r) => r.severity,
            TestRecord::Duochrome(r) => r.severity,
        }
    }

    pub fn date(&self) -> DateTime<Utc> {
        match self {
            TestRecord::Acuity(r) => r.date,
            TestRecord::ColorVision(r) => r.date,
            TestRecord::Astigmatism(r) => r.date,
            TestRecord::Amsler(r) => r.date,
            TestRecord::Duochrome(r) => r.date,
        }
    }

    pub fn duration_seconds(&self) -> u64 {
        match self {
            TestRecord::Acuity(r) => r.duration_seconds,
            TestRecord::ColorVision(r) => r.duration_seconds,
            TestRecord::Astigmatism(r) => r.duration_seconds,
            TestRecord::Amsler(r) => r.duration_seconds,
            TestRecord::Duochrome(r) => r.duration_seconds,
        }
    }
}

impl From<ResultEnvelope<AcuityDetails>> for TestRecord {
    fn from(result: ResultEnvelope<AcuityDetails>) -> Self {
        TestRecord::Acuity(result)
    }
}

impl From<ResultEnvelope<ColorVisionDetails>> for TestRecord {
    fn from(result: ResultEnvelope<ColorVisionDetails>) -> Self {
        TestRecord::ColorVision(result)
    }
}

impl From<ResultEnvelope<AstigmatismDetails>> for TestRecord {
    fn from(result: ResultEnvelope<AstigmatismDetails>) -> Self {
        TestRecord::Astigmatism(result)
    }
}

impl From<ResultEnvelope<AmslerDetails>> for TestRecord {
    fn from(result: ResultEnvelope<AmslerDetails>) -> Self {
        TestRecord::Amsler(result)
    }
}

impl From<ResultEnvelope<DuochromeDetails>> for TestRecord {
    fn from(result: ResultEnvelope<DuochromeDetails>) -> Self {
        TestRecord::Duochrome(result)
    }
}
