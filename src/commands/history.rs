use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::io::{create_writer, read_history, OutputFormat};

/// Print every stored record in `path`.
pub fn show_history<W: Write>(path: &Path, format: OutputFormat, out: W) -> Result<()> {
    let records = read_history(path)
        .with_context(|| format!("Failed to read history from {}", path.display()))?;
    tracing::debug!(count = records.len(), path = %path.display(), "loaded history");
    create_writer(format, out).write_history(&records)
}
