//! Configuration for the screening engine.
//!
//! Every scoring constant (level ladder, bonus attempts, accuracy
//! breakpoints, Amsler weighting) lives here rather than in the engine, so a
//! deployment can tune them from `.visionscreen.toml`. The defaults are the
//! empirically chosen values the screening app shipped with; they are not
//! clinically validated.

mod acuity;
mod core;
mod loader;
mod thresholds;
pub mod validation;

pub use acuity::{AcuityConfig, AcuitySeverityBands};
pub use self::core::{OutputConfig, VisionConfig};
pub use loader::{
    directory_ancestors, load_config, load_config_from, load_config_from_path_validated,
    parse_and_validate_config, parse_config, user_config_path, CONFIG_FILE_NAME,
};
pub use thresholds::{AmslerThresholds, ColorVisionThresholds};
pub use validation::{
    combine_validations, format_config_errors, validate_config, validate_config_result,
    ConfigValidation, ConfigValidationError, MAX_BONUS_ATTEMPTS,
};

/// Commented default configuration written by `visionscreen init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# Visionscreen Configuration
#
# Scoring constants below are empirically chosen defaults, not clinical
# guidance. Adjust with care.

[acuity]
# Extra trials granted at a level before it counts as failed
bonus_attempts = 2
below_lowest_label = "< 20/200"

[acuity.severity]
# Fraction of the ladder passed
none_ratio = 1.0
low_ratio = 0.6
medium_ratio = 0.3

[[acuity.levels]]
label = "20/200"
stimulus_size = 200.0
trials_required = 4
pass_threshold = 3

[[acuity.levels]]
label = "20/100"
stimulus_size = 100.0
trials_required = 4
pass_threshold = 3

[[acuity.levels]]
label = "20/70"
stimulus_size = 70.0
trials_required = 4
pass_threshold = 3

[[acuity.levels]]
label = "20/50"
stimulus_size = 50.0
trials_required = 4
pass_threshold = 3

[[acuity.levels]]
label = "20/40"
stimulus_size = 40.0
trials_required = 4
pass_threshold = 3

[[acuity.levels]]
label = "20/30"
stimulus_size = 30.0
trials_required = 4
pass_threshold = 3

[[acuity.levels]]
label = "20/25"
stimulus_size = 25.0
trials_required = 4
pass_threshold = 3

[[acuity.levels]]
label = "20/20"
stimulus_size = 20.0
trials_required = 4
pass_threshold = 3

[color_vision]
# Integer accuracy percentages
none_min = 90
low_min = 75
medium_min = 50

[amsler]
symptom_weight = 1.5
high_score = 5.0
high_areas = 4
high_symptoms = 3
medium_score = 2.5
medium_areas = 2
medium_symptoms = 2
"#;
