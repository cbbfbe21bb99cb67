//! CLI command implementations.
//!
//! Available commands:
//! - **init**: write a default `.visionscreen.toml`
//! - **acuity**: run the staircase acuity test over stdin
//! - **color-vision**, **astigmatism**, **amsler**, **duochrome**: classify one attempt
//! - **history**: list stored results
//!
//! Every test command finishes through [`CommandContext::emit`], which renders
//! the envelope and forwards it to the configured result sink.

pub mod acuity;
pub mod classify;
pub mod history;
pub mod init;

pub use acuity::{run_acuity, run_acuity_session};
pub use classify::{
    parse_cell, run_amsler, run_astigmatism, run_color_vision, run_duochrome,
    prompt_plate_answers,
};
pub use history::show_history;
pub use init::init_config;

use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;

use crate::config::VisionConfig;
use crate::core::TestRecord;
use crate::io::{create_writer, JsonLinesSink, OutputFormat, ResultSink};

/// Settings shared by every command invocation.
pub struct CommandContext {
    pub config: VisionConfig,
    pub format: OutputFormat,
    pub history: Option<PathBuf>,
}

impl CommandContext {
    pub fn new(config: VisionConfig, format: OutputFormat, history: Option<PathBuf>) -> Self {
        Self {
            config,
            format,
            history,
        }
    }

    /// History file from the flag, else from `[output] history_file`.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history.clone().or_else(|| {
            self.config
                .output
                .as_ref()
                .and_then(|o| o.history_file.as_ref())
                .map(PathBuf::from)
        })
    }

    /// Render a finished result to `out` and append it to history if configured.
    pub fn emit<W: Write>(&self, record: TestRecord, out: W) -> Result<()> {
        create_writer(self.format, out).write_record(&record)?;

        if let Some(path) = self.history_path() {
            let mut sink = JsonLinesSink::new(path);
            sink.record(&record)
                .with_context(|| format!("Failed to store result in {}", sink.description()))?;
        }
        Ok(())
    }
}
