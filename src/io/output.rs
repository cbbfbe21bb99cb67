use crate::acuity::{AcuityDetails, AcuityOutcome};
use crate::classifiers::{AmslerDetails, AstigmatismDetails, ColorVisionDetails, DuochromeDetails};
use crate::core::{Severity, TestRecord};
use colored::*;
use comfy_table::{presets::UTF8_FULL, Table};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Terminal,
}

pub trait OutputWriter {
    fn write_record(&mut self, record: &TestRecord) -> anyhow::Result<()>;
    fn write_history(&mut self, records: &[TestRecord]) -> anyhow::Result<()>;
}

pub fn create_writer<'a, W: Write + 'a>(
    format: OutputFormat,
    writer: W,
) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_record(&mut self, record: &TestRecord) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(record)?;
        writeln!(self.writer, "{json}")?;
        Ok(())
    }

    fn write_history(&mut self, records: &[TestRecord]) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        writeln!(self.writer, "{json}")?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_record(&mut self, record: &TestRecord) -> anyhow::Result<()> {
        let title = format!("{} Result", record.kind());
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", "═══════════════════════════════════════════".cyan())?;
        writeln!(self.writer, "  {}", title.to_uppercase().bold().cyan())?;
        writeln!(self.writer, "{}", "═══════════════════════════════════════════".cyan())?;

        self.write_field("Severity", &colorize_severity(record.severity()).to_string())?;
        self.write_field(
            "Date",
            &record.date().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        )?;
        self.write_field("Duration", &format!("{}s", record.duration_seconds()))?;
        writeln!(self.writer, "───────────────────────────────────────────")?;

        let rows = match record {
            TestRecord::Acuity(r) => acuity_rows(&r.details),
            TestRecord::ColorVision(r) => color_vision_rows(&r.details),
            TestRecord::Astigmatism(r) => astigmatism_rows(&r.details),
            TestRecord::Amsler(r) => amsler_rows(&r.details),
            TestRecord::Duochrome(r) => duochrome_rows(&r.details),
        };
        for (label, value) in rows {
            self.write_field(label, &value)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_history(&mut self, records: &[TestRecord]) -> anyhow::Result<()> {
        if records.is_empty() {
            writeln!(self.writer, "No results recorded yet.")?;
            return Ok(());
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["#", "Date", "Test", "Severity", "Duration"]);
        for (index, record) in records.iter().enumerate() {
            table.add_row(vec![
                (index + 1).to_string(),
                record.date().format("%Y-%m-%d %H:%M").to_string(),
                record.kind().to_string(),
                record.severity().to_string(),
                format!("{}s", record.duration_seconds()),
            ]);
        }
        writeln!(self.writer, "{table}")?;
        Ok(())
    }
}

impl<W: Write> TerminalWriter<W> {
    fn write_field(&mut self, label: &str, value: &str) -> anyhow::Result<()> {
        writeln!(self.writer, "  {:<18} {}", format!("{label}:"), value)?;
        Ok(())
    }
}

fn colorize_severity(severity: Severity) -> ColoredString {
    match severity {
        Severity::None => severity.as_str().green(),
        Severity::Low => severity.as_str().yellow(),
        Severity::Medium => severity.as_str().bright_red(),
        Severity::High => severity.as_str().red().bold(),
    }
}

fn acuity_rows(details: &AcuityDetails) -> Vec<(&'static str, String)> {
    let outcome = match details.outcome {
        AcuityOutcome::PassedAllLevels => "passed all levels".to_string(),
        AcuityOutcome::FailedAtLevel { level_index } => {
            format!("failed at level {}", level_index + 1)
        }
        AcuityOutcome::StoppedEarly { level_index } => {
            format!("stopped at level {}", level_index + 1)
        }
        AcuityOutcome::NotTaken => "not taken".to_string(),
    };
    vec![
        ("Score", details.score.clone()),
        (
            "Levels passed",
            format!("{} / {}", details.levels_passed, details.total_levels),
        ),
        (
            "Accuracy",
            format!(
                "{}% ({} / {})",
                details.accuracy, details.correct, details.total
            ),
        ),
        ("Outcome", outcome),
    ]
}

fn color_vision_rows(details: &ColorVisionDetails) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Type", details.vision_type.to_string()),
        (
            "Accuracy",
            format!(
                "{}% ({} / {})",
                details.accuracy, details.correct, details.total
            ),
        ),
    ];
    if !details.missed.is_empty() {
        let missed = details
            .missed
            .iter()
            .map(|m| format!("#{} expected '{}' got '{}'", m.plate_id, m.expected, m.actual))
            .collect::<Vec<_>>()
            .join(", ");
        rows.push(("Missed plates", missed));
    }
    rows
}

fn astigmatism_rows(details: &AstigmatismDetails) -> Vec<(&'static str, String)> {
    vec![
        ("Right eye", details.right_eye.selection.to_string()),
        ("Left eye", details.left_eye.selection.to_string()),
        ("Affected eyes", details.affected_eyes.to_string()),
    ]
}

fn amsler_rows(details: &AmslerDetails) -> Vec<(&'static str, String)> {
    let list_or_none = |items: &[String]| {
        if items.is_empty() {
            "none".to_string()
        } else {
            items.join(", ")
        }
    };
    vec![
        ("Distorted areas", list_or_none(&details.distorted_areas)),
        ("Symptoms", list_or_none(&details.symptoms)),
        ("Weighted score", format!("{:.1}", details.weighted_score)),
    ]
}

fn duochrome_rows(details: &DuochromeDetails) -> Vec<(&'static str, String)> {
    vec![
        (
            "Right eye",
            format!(
                "{} ({:?})",
                details.right_eye.selection, details.right_eye.condition
            ),
        ),
        (
            "Left eye",
            format!(
                "{} ({:?})",
                details.left_eye.selection, details.left_eye.condition
            ),
        ),
        ("Overall", details.condition.to_string()),
    ]
}
