//! Result sinks: where finished envelopes go once a test completes.
//!
//! The engine only knows the [`ResultSink`] trait. Storage format and
//! location belong to the sink implementation.
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use visionscreen::classifiers::{classify_duochrome, DuochromeSelection};
//! use visionscreen::core::TestTiming;
//! use visionscreen::io::{MemorySink, ResultSink};
//!
//! let result = classify_duochrome(
//!     DuochromeSelection::Red,
//!     DuochromeSelection::Equal,
//!     TestTiming::instant(Utc::now()),
//! );
//! let mut sink = MemorySink::new();
//! sink.record(&result.into()).unwrap();
//! assert_eq!(sink.records().len(), 1);
//! ```

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::core::{Error, Result, ResultExt, TestRecord};

/// Receiver of finished test results.
pub trait ResultSink {
    /// Persist or forward one record.
    fn record(&mut self, record: &TestRecord) -> Result<()>;

    /// Get a description of the sink for error messages.
    fn description(&self) -> String;
}

/// In-memory sink for testing and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Vec<TestRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[TestRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TestRecord> {
        self.records
    }
}

impl ResultSink for MemorySink {
    fn record(&mut self, record: &TestRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn description(&self) -> String {
        "memory".to_string()
    }
}

/// Appends one JSON object per line to a history file.
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for JsonLinesSink {
    fn record(&mut self, record: &TestRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let line = serde_json::to_string(record)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(Error::from)
            .context(format!("Failed to open {}", self.description()))?;
        writeln!(file, "{line}")?;

        tracing::debug!(path = %self.path.display(), test = %record.kind(), "result appended");
        Ok(())
    }

    fn description(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// Load every record from a JSON-lines history file, skipping blank lines.
///
/// A missing file is an empty history.
pub fn read_history(path: &Path) -> Result<Vec<TestRecord>> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    BufReader::new(file)
        .lines()
        .enumerate()
        .filter(|(_, line)| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
        .map(|(index, line)| {
            let line = line?;
            serde_json::from_str::<TestRecord>(&line)
                .map_err(Error::from)
                .context(format!("{}:{}", path.display(), index + 1))
        })
        .collect()
}
