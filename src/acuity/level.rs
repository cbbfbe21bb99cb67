//! Level Table: the ordered difficulty ladder for the acuity test.
//!
//! The ladder is configuration data. The staircase controller works for any
//! ladder that passes [`LevelTable::new`] validation.

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// One rung of the acuity ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Display label, e.g. a Snellen fraction.
    pub label: String,
    /// Optotype size in presentation units (larger is easier).
    pub stimulus_size: f64,
    /// Trials presented before the pass/fail decision.
    pub trials_required: u32,
    /// Correct answers needed among those trials.
    pub pass_threshold: u32,
}

impl Level {
    pub fn new(
        label: impl Into<String>,
        stimulus_size: f64,
        trials_required: u32,
        pass_threshold: u32,
    ) -> Self {
        Self {
            label: label.into(),
            stimulus_size,
            trials_required,
            pass_threshold,
        }
    }

    /// Reasons this level cannot be used, empty when valid.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.label.trim().is_empty() {
            problems.push("label must not be empty".to_string());
        }
        if !(self.stimulus_size.is_finite() && self.stimulus_size > 0.0) {
            problems.push(format!(
                "stimulus_size must be positive, got {}",
                self.stimulus_size
            ));
        }
        if self.trials_required == 0 {
            problems.push("trials_required must be at least 1".to_string());
        }
        if self.pass_threshold > self.trials_required {
            problems.push(format!(
                "pass_threshold {} exceeds trials_required {}",
                self.pass_threshold, self.trials_required
            ));
        }
        problems
    }
}

/// Immutable ladder ordered from easiest to hardest.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelTable {
    levels: Vec<Level>,
}

impl LevelTable {
    /// Build a ladder, rejecting empty ladders and levels with
    /// `pass_threshold > trials_required`.
    pub fn new(levels: Vec<Level>) -> Result<Self> {
        if levels.is_empty() {
            return Err(Error::Validation(
                "level ladder must contain at least one level".to_string(),
            ));
        }

        let problems: Vec<String> = levels
            .iter()
            .enumerate()
            .flat_map(|(index, level)| {
                level
                    .problems()
                    .into_iter()
                    .map(move |p| format!("level {index} ('{}'): {p}", level.label))
            })
            .collect();

        if !problems.is_empty() {
            return Err(Error::Validation(problems.join("; ")));
        }

        Ok(Self { levels })
    }

    /// Default Snellen ladder, 20/200 down to 20/20.
    pub fn snellen() -> Self {
        Self {
            levels: default_snellen_levels(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::snellen()
    }
}

/// The stock ladder used when no configuration overrides it.
pub fn default_snellen_levels() -> Vec<Level> {
    [
        ("20/200", 200.0),
        ("20/100", 100.0),
        ("20/70", 70.0),
        ("20/50", 50.0),
        ("20/40", 40.0),
        ("20/30", 30.0),
        ("20/25", 25.0),
        ("20/20", 20.0),
    ]
    .into_iter()
    .map(|(label, size)| Level::new(label, size, 4, 3))
    .collect()
}
