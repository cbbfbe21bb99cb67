//! Staircase Controller for the acuity test.
//!
//! Drives one test attempt through `Idle -> InProgress -> Completed`:
//!
//! - a level is presented `trials_required` times;
//! - reaching `pass_threshold` correct answers passes it and moves one rung up
//!   the ladder, with per-level counters reset;
//! - missing the threshold grants up to `bonus_attempts` further trials at the
//!   same level (counters keep running) before the session ends as failed.
//!
//! A controller owns exactly one session. Build a fresh one per attempt;
//! never share an instance between concurrent test-takers.

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::level::{Level, LevelTable};
use super::picker::{next_orientation, Orientation};
use crate::config::{AcuityConfig, AcuitySeverityBands};
use crate::core::{percentage, Error, Result, ResultEnvelope, Severity, TestTiming};

/// Tunables that are not part of the ladder itself.
#[derive(Debug, Clone, PartialEq)]
pub struct StaircaseSettings {
    pub bonus_attempts: u32,
    pub below_lowest_label: String,
    pub severity: AcuitySeverityBands,
}

impl Default for StaircaseSettings {
    fn default() -> Self {
        let config = AcuityConfig::default();
        Self {
            bonus_attempts: config.bonus_attempts,
            below_lowest_label: config.below_lowest_label,
            severity: config.severity,
        }
    }
}

/// A stimulus for the UI to render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Question {
    pub level_index: usize,
    pub stimulus_size: f64,
    pub orientation: Orientation,
}

/// One answered stimulus. Append-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trial {
    pub level_index: usize,
    pub stimulus: Orientation,
    pub answer: Orientation,
    pub correct: bool,
}

/// How a completed session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AcuityOutcome {
    PassedAllLevels,
    FailedAtLevel { level_index: usize },
    /// The caller asked for a result while the session was still running.
    StoppedEarly { level_index: usize },
    /// No trial was ever answered.
    NotTaken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    InProgress,
    Completed(AcuityOutcome),
}

/// Mutable state of the attempt in progress.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaircaseSession {
    pub started_at: Option<DateTime<Utc>>,
    pub current_level_index: usize,
    pub trial_count_at_level: u32,
    pub correct_count_at_level: u32,
    pub last_passed_level_index: Option<usize>,
    pub bonus_attempts_used_at_level: u32,
    pub last_orientation: Option<Orientation>,
    pub pending: Option<Question>,
    pub trial_log: Vec<Trial>,
}

impl StaircaseSession {
    fn begin(at: DateTime<Utc>) -> Self {
        Self {
            started_at: Some(at),
            ..Self::default()
        }
    }

    fn advance_level(&mut self) {
        self.current_level_index += 1;
        self.trial_count_at_level = 0;
        self.correct_count_at_level = 0;
        self.bonus_attempts_used_at_level = 0;
    }

    pub fn total_trials(&self) -> usize {
        self.trial_log.len()
    }

    pub fn total_correct(&self) -> usize {
        self.trial_log.iter().filter(|t| t.correct).count()
    }
}

/// Test-specific fields of the acuity result envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcuityDetails {
    /// Label of the hardest level passed, or the below-lowest sentinel.
    pub score: String,
    /// Integer percentage of correct answers over the whole session.
    pub accuracy: u32,
    pub correct: u32,
    pub total: u32,
    pub last_passed_level_index: Option<usize>,
    pub levels_passed: usize,
    pub total_levels: usize,
    pub outcome: AcuityOutcome,
    pub trials: Vec<Trial>,
}

/// Adaptive level-progression controller.
#[derive(Debug, Clone)]
pub struct StaircaseController<R = ChaCha8Rng> {
    table: LevelTable,
    settings: StaircaseSettings,
    rng: R,
    state: SessionState,
    session: StaircaseSession,
}

impl StaircaseController<ChaCha8Rng> {
    /// Controller with an entropy-seeded generator.
    pub fn new(table: LevelTable, settings: StaircaseSettings) -> Self {
        Self::with_rng(table, settings, ChaCha8Rng::from_entropy())
    }

    /// Controller with a reproducible stimulus sequence.
    pub fn seeded(table: LevelTable, settings: StaircaseSettings, seed: u64) -> Self {
        Self::with_rng(table, settings, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Build from configuration, validating the ladder.
    pub fn from_config(config: &AcuityConfig) -> Result<Self> {
        let (table, settings) = split_config(config)?;
        Ok(Self::new(table, settings))
    }
}

/// Validated ladder plus settings from an `[acuity]` section.
pub fn split_config(config: &AcuityConfig) -> Result<(LevelTable, StaircaseSettings)> {
    let table = LevelTable::new(config.levels.clone())?;
    let settings = StaircaseSettings {
        bonus_attempts: config.bonus_attempts,
        below_lowest_label: config.below_lowest_label.clone(),
        severity: config.severity.clone(),
    };
    Ok((table, settings))
}

impl<R: Rng> StaircaseController<R> {
    pub fn with_rng(table: LevelTable, settings: StaircaseSettings, rng: R) -> Self {
        Self {
            table,
            settings,
            rng,
            state: SessionState::Idle,
            session: StaircaseSession::default(),
        }
    }

    /// Begin (or restart) the attempt, clearing all counters and the trial log.
    pub fn start(&mut self) {
        self.start_at(Utc::now());
    }

    pub fn start_at(&mut self, at: DateTime<Utc>) {
        self.session = StaircaseSession::begin(at);
        self.state = SessionState::InProgress;
        debug!(levels = self.table.len(), "acuity session started");
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, SessionState::Completed(_))
    }

    pub fn session(&self) -> &StaircaseSession {
        &self.session
    }

    pub fn table(&self) -> &LevelTable {
        &self.table
    }

    pub fn current_level(&self) -> Option<&Level> {
        self.table.get(self.session.current_level_index)
    }

    /// The stimulus to present next, or `None` once the session is over.
    ///
    /// An unanswered question is returned again rather than replaced.
    pub fn get_next_question(&mut self) -> Option<Question> {
        match self.state {
            SessionState::InProgress => {}
            SessionState::Idle => {
                warn!("get_next_question called before start");
                return None;
            }
            SessionState::Completed(_) => return None,
        }

        if let Some(pending) = self.session.pending {
            return Some(pending);
        }

        let index = self.session.current_level_index;
        let Some(level) = self.table.get(index) else {
            self.complete(AcuityOutcome::PassedAllLevels);
            return None;
        };
        let trials_required = level.trials_required;
        let pass_threshold = level.pass_threshold;

        if self.session.trial_count_at_level < trials_required {
            return Some(self.issue_question(index));
        }

        if self.session.correct_count_at_level >= pass_threshold {
            self.session.last_passed_level_index = Some(index);
            if index < self.table.last_index() {
                self.session.advance_level();
                debug!(
                    passed = index,
                    next = self.session.current_level_index,
                    "level passed, advancing"
                );
                return Some(self.issue_question(self.session.current_level_index));
            }
            self.complete(AcuityOutcome::PassedAllLevels);
            return None;
        }

        let trial_cap = trials_required.saturating_add(self.settings.bonus_attempts);
        if self.session.trial_count_at_level >= trial_cap {
            self.complete(AcuityOutcome::FailedAtLevel { level_index: index });
            return None;
        }

        self.session.bonus_attempts_used_at_level =
            self.session.trial_count_at_level - trials_required + 1;
        debug!(
            level = index,
            bonus_used = self.session.bonus_attempts_used_at_level,
            budget = self.settings.bonus_attempts,
            "threshold missed, granting bonus attempt"
        );
        Some(self.issue_question(index))
    }

    /// Score an answer against the pending stimulus.
    ///
    /// Returns whether it was correct. With no pending question the call is
    /// rejected and nothing changes.
    pub fn submit_answer(&mut self, answer: Orientation) -> Result<bool> {
        if self.state == SessionState::Idle {
            warn!(%answer, "answer submitted before start, ignoring");
            return Err(Error::NotStarted);
        }

        let Some(question) = self.session.pending.take() else {
            warn!(%answer, "answer submitted with no pending question, ignoring");
            return Err(Error::NoPendingQuestion);
        };

        let correct = answer == question.orientation;
        self.session.trial_count_at_level += 1;
        if correct {
            self.session.correct_count_at_level += 1;
        }
        self.session.trial_log.push(Trial {
            level_index: question.level_index,
            stimulus: question.orientation,
            answer,
            correct,
        });

        Ok(correct)
    }

    /// Parse a raw UI answer, rejecting anything outside the four orientations.
    pub fn submit_answer_str(&mut self, raw: &str) -> Result<bool> {
        let answer = raw.parse::<Orientation>().inspect_err(|e| {
            warn!(error = %e, "rejected answer");
        })?;
        self.submit_answer(answer)
    }

    pub fn calculate_result(&self) -> ResultEnvelope<AcuityDetails> {
        self.calculate_result_at(Utc::now())
    }

    /// Build the result envelope as of `now`. Safe to call at any point.
    pub fn calculate_result_at(&self, now: DateTime<Utc>) -> ResultEnvelope<AcuityDetails> {
        let session = &self.session;
        let total = session.total_trials();
        let correct = session.total_correct();

        let outcome = match self.state {
            _ if total == 0 => AcuityOutcome::NotTaken,
            SessionState::Completed(outcome) => outcome,
            SessionState::InProgress | SessionState::Idle => AcuityOutcome::StoppedEarly {
                level_index: session.current_level_index,
            },
        };

        let levels_passed = session.last_passed_level_index.map_or(0, |i| i + 1);
        let score = session
            .last_passed_level_index
            .and_then(|i| self.table.get(i))
            .map(|level| level.label.clone())
            .unwrap_or_else(|| self.settings.below_lowest_label.clone());

        let severity = if total == 0 {
            Severity::None
        } else {
            severity_for_progress(&self.settings.severity, levels_passed, self.table.len())
        };

        let timing = TestTiming::new(session.started_at.unwrap_or(now), now);
        let details = AcuityDetails {
            score,
            accuracy: percentage(correct, total),
            correct: correct as u32,
            total: total as u32,
            last_passed_level_index: session.last_passed_level_index,
            levels_passed,
            total_levels: self.table.len(),
            outcome,
            trials: session.trial_log.clone(),
        };

        info!(score = %details.score, accuracy = details.accuracy, %severity, "acuity result");
        ResultEnvelope::new(severity, timing, details)
    }

    fn issue_question(&mut self, level_index: usize) -> Question {
        let orientation = next_orientation(&mut self.rng, self.session.last_orientation);
        let stimulus_size = self
            .table
            .get(level_index)
            .map_or(0.0, |level| level.stimulus_size);
        let question = Question {
            level_index,
            stimulus_size,
            orientation,
        };
        self.session.last_orientation = Some(orientation);
        self.session.pending = Some(question);
        question
    }

    fn complete(&mut self, outcome: AcuityOutcome) {
        self.session.pending = None;
        self.state = SessionState::Completed(outcome);
        debug!(
            ?outcome,
            last_passed = ?self.session.last_passed_level_index,
            "acuity session completed"
        );
    }
}

/// Severity from the share of the ladder passed.
pub fn severity_for_progress(
    bands: &AcuitySeverityBands,
    levels_passed: usize,
    total_levels: usize,
) -> Severity {
    if total_levels == 0 {
        return Severity::None;
    }
    let ratio = levels_passed as f64 / total_levels as f64;
    if ratio >= bands.none_ratio {
        Severity::None
    } else if ratio >= bands.low_ratio {
        Severity::Low
    } else if ratio >= bands.medium_ratio {
        Severity::Medium
    } else {
        Severity::High
    }
}
