//! Validation with error accumulation for configuration.
//!
//! Every check runs and all problems are reported together, so a user can
//! fix a broken `.visionscreen.toml` in one pass. Section validators return
//! a stillwater [`Validation`] and are combined with [`combine_validations`].

use stillwater::{NonEmptyVec, Validation};

use super::acuity::{AcuityConfig, AcuitySeverityBands};
use super::thresholds::{AmslerThresholds, ColorVisionThresholds};
use super::{OutputConfig, VisionConfig};

/// Largest accepted `acuity.bonus_attempts`.
pub const MAX_BONUS_ATTEMPTS: u32 = 20;

/// A single configuration problem with its dotted field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl ConfigValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result carrying every configuration problem found.
pub type ConfigValidation<T> = Validation<T, NonEmptyVec<ConfigValidationError>>;

/// Validate entire config, accumulating ALL errors.
pub fn validate_config(config: &VisionConfig) -> ConfigValidation<()> {
    let mut validations = vec![
        validate_acuity(&config.acuity),
        validate_color_vision(&config.color_vision),
        validate_amsler(&config.amsler),
    ];
    if let Some(output) = &config.output {
        validations.push(validate_output(output));
    }

    combine_validations(validations)
}

/// Validate config with a plain `Result`, for callers that only branch on success.
pub fn validate_config_result(config: &VisionConfig) -> Result<(), Vec<ConfigValidationError>> {
    match validate_config(config) {
        Validation::Success(()) => Ok(()),
        Validation::Failure(errors) => Err(errors.into_vec()),
    }
}

/// Combine section validations, accumulating all errors.
pub fn combine_validations(validations: Vec<ConfigValidation<()>>) -> ConfigValidation<()> {
    let failures: Vec<ConfigValidationError> = validations
        .into_iter()
        .flat_map(|validation| match validation {
            Validation::Success(()) => Vec::new(),
            Validation::Failure(errors) => errors.into_vec(),
        })
        .collect();

    validation_from_errors(failures)
}

fn validation_from_errors(errors: Vec<ConfigValidationError>) -> ConfigValidation<()> {
    match NonEmptyVec::from_vec(errors) {
        Some(errors) => Validation::Failure(errors),
        None => Validation::Success(()),
    }
}

/// Render accumulated errors one per line.
pub fn format_config_errors(errors: &[ConfigValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn validate_acuity(acuity: &AcuityConfig) -> ConfigValidation<()> {
    let mut errors = Vec::new();

    if acuity.levels.is_empty() {
        errors.push(ConfigValidationError::new(
            "acuity.levels",
            "ladder must contain at least one level",
        ));
    }

    for (index, level) in acuity.levels.iter().enumerate() {
        for problem in level.problems() {
            errors.push(ConfigValidationError::new(
                format!("acuity.levels[{index}]"),
                problem,
            ));
        }
    }

    if acuity.bonus_attempts > MAX_BONUS_ATTEMPTS {
        errors.push(ConfigValidationError::new(
            "acuity.bonus_attempts",
            format!(
                "at most {MAX_BONUS_ATTEMPTS} bonus attempts, got {}",
                acuity.bonus_attempts
            ),
        ));
    }

    if acuity.below_lowest_label.trim().is_empty() {
        errors.push(ConfigValidationError::new(
            "acuity.below_lowest_label",
            "label must not be empty",
        ));
    }

    errors.extend(validate_severity_bands(&acuity.severity));
    validation_from_errors(errors)
}

fn validate_severity_bands(bands: &AcuitySeverityBands) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    let in_range = |v: f64| (0.0..=1.0).contains(&v);

    for (name, value) in [
        ("none_ratio", bands.none_ratio),
        ("low_ratio", bands.low_ratio),
        ("medium_ratio", bands.medium_ratio),
    ] {
        if !in_range(value) {
            errors.push(ConfigValidationError::new(
                format!("acuity.severity.{name}"),
                format!("ratio out of range: {value} (must be 0.0-1.0)"),
            ));
        }
    }

    if !(bands.none_ratio >= bands.low_ratio && bands.low_ratio >= bands.medium_ratio) {
        errors.push(ConfigValidationError::new(
            "acuity.severity",
            "ratios must satisfy none_ratio >= low_ratio >= medium_ratio",
        ));
    }

    errors
}

fn validate_color_vision(thresholds: &ColorVisionThresholds) -> ConfigValidation<()> {
    let mut errors = Vec::new();

    if thresholds.none_min > 100 {
        errors.push(ConfigValidationError::new(
            "color_vision.none_min",
            format!("accuracy above 100: {}", thresholds.none_min),
        ));
    }

    if !(thresholds.none_min >= thresholds.low_min && thresholds.low_min >= thresholds.medium_min)
    {
        errors.push(ConfigValidationError::new(
            "color_vision",
            "breakpoints must satisfy none_min >= low_min >= medium_min",
        ));
    }

    validation_from_errors(errors)
}

fn validate_amsler(thresholds: &AmslerThresholds) -> ConfigValidation<()> {
    let mut errors = Vec::new();

    if !(thresholds.symptom_weight.is_finite() && thresholds.symptom_weight >= 0.0) {
        errors.push(ConfigValidationError::new(
            "amsler.symptom_weight",
            format!("weight must be non-negative, got {}", thresholds.symptom_weight),
        ));
    }

    if thresholds.medium_score > thresholds.high_score {
        errors.push(ConfigValidationError::new(
            "amsler.medium_score",
            "medium_score must not exceed high_score",
        ));
    }

    if thresholds.medium_areas > thresholds.high_areas {
        errors.push(ConfigValidationError::new(
            "amsler.medium_areas",
            "medium_areas must not exceed high_areas",
        ));
    }

    if thresholds.medium_symptoms > thresholds.high_symptoms {
        errors.push(ConfigValidationError::new(
            "amsler.medium_symptoms",
            "medium_symptoms must not exceed high_symptoms",
        ));
    }

    validation_from_errors(errors)
}

fn validate_output(output: &OutputConfig) -> ConfigValidation<()> {
    match output.default_format.as_deref() {
        Some(format) if !["json", "terminal"].contains(&format.to_ascii_lowercase().as_str()) => {
            Validation::Failure(NonEmptyVec::new(
                ConfigValidationError::new(
                    "output.default_format",
                    format!("unknown format '{format}' (expected json or terminal)"),
                ),
                Vec::new(),
            ))
        }
        _ => Validation::Success(()),
    }
}
