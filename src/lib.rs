// Export modules for library usage
pub mod acuity;
pub mod classifiers;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod io;

// Re-export commonly used types
pub use crate::core::{
    Error, Result, ResultEnvelope, ResultExt, Severity, TestKind, TestRecord, TestTiming,
};

pub use crate::acuity::{
    AcuityDetails, AcuityOutcome, Level, LevelTable, Orientation, Question, SessionState,
    StaircaseController, StaircaseSettings,
};

pub use crate::classifiers::{
    classify_amsler, classify_astigmatism, classify_color_vision, classify_duochrome,
    AmslerDetails, AstigmatismDetails, AstigmatismSelection, ColorVisionDetails,
    DuochromeDetails, DuochromeSelection, GridRegion, PlateBattery,
};

pub use crate::config::{load_config, VisionConfig};

pub use crate::io::{
    create_writer, JsonLinesSink, MemorySink, OutputFormat, OutputWriter, ResultSink,
};
