//! Severity classifiers for the four non-adaptive tests.
//!
//! Each classifier is a pure function from finalized user selections to a
//! [`ResultEnvelope`](crate::core::ResultEnvelope). They hold no state, so
//! identical inputs always yield identical envelopes.

pub mod amsler;
pub mod astigmatism;
pub mod color_vision;
pub mod duochrome;

pub use amsler::{amsler_severity, classify_amsler, AmslerDetails, GridRegion};
pub use astigmatism::{
    astigmatism_severity, classify_astigmatism, AstigmatismDetails, AstigmatismSelection,
    EyeAstigmatism,
};
pub use color_vision::{
    classify_color_vision, severity_for_accuracy, ColorVisionDetails, ColorVisionType,
    MissedPlate, Plate, PlateBattery, NOTHING_ANSWER,
};
pub use duochrome::{
    classify_duochrome, combine_eyes, DuochromeCondition, DuochromeDetails, DuochromeSelection,
    EyeRefraction, RefractiveCondition,
};
