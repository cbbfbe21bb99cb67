//! Visual acuity test: level ladder, stimulus picker and the staircase
//! controller that walks a test-taker up the ladder.
//!
//! The UI drives a controller with
//! `start -> get_next_question -> submit_answer -> ... -> calculate_result`:
//!
//! ```rust
//! use visionscreen::acuity::{LevelTable, StaircaseController, StaircaseSettings};
//!
//! let mut controller =
//!     StaircaseController::seeded(LevelTable::snellen(), StaircaseSettings::default(), 7);
//! controller.start();
//! while let Some(question) = controller.get_next_question() {
//!     // a perfect observer always reports the true orientation
//!     controller.submit_answer(question.orientation).unwrap();
//! }
//! let result = controller.calculate_result();
//! assert_eq!(result.details.score, "20/20");
//! ```

pub mod level;
pub mod picker;
pub mod staircase;

pub use level::{default_snellen_levels, Level, LevelTable};
pub use picker::{next_orientation, Orientation};
pub use staircase::{
    severity_for_progress, split_config, AcuityDetails, AcuityOutcome, Question, SessionState,
    StaircaseController, StaircaseSession, StaircaseSettings, Trial,
};
