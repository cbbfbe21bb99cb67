use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use std::io::{BufRead, Write};

use super::CommandContext;
use crate::classifiers::{
    classify_amsler, classify_astigmatism, classify_color_vision, classify_duochrome,
    AstigmatismSelection, DuochromeSelection, GridRegion, Plate, PlateBattery,
};
use crate::core::TestTiming;

pub fn run_color_vision(
    ctx: &CommandContext,
    answers: Option<Vec<String>>,
    seed: Option<u64>,
) -> Result<()> {
    let battery = PlateBattery::standard();
    let thresholds = &ctx.config.color_vision;

    let result = match answers {
        Some(answers) => {
            if answers.len() > battery.len() {
                bail!(
                    "Got {} answers for a battery of {} plates",
                    answers.len(),
                    battery.len()
                );
            }
            classify_color_vision(
                battery.plates(),
                &answers,
                thresholds,
                TestTiming::instant(Utc::now()),
            )
        }
        None => {
            let mut rng = match seed {
                Some(seed) => ChaCha8Rng::seed_from_u64(seed),
                None => ChaCha8Rng::from_entropy(),
            };
            let battery = battery.shuffled(&mut rng);
            let started_at = Utc::now();
            let stdin = std::io::stdin();
            let answers =
                prompt_plate_answers(battery.plates(), stdin.lock(), std::io::stderr())?;
            classify_color_vision(
                battery.plates(),
                &answers,
                thresholds,
                TestTiming::new(started_at, Utc::now()),
            )
        }
    };

    ctx.emit(result.into(), std::io::stdout())
}

/// Ask for one answer per plate. End of input leaves the remaining plates blank.
pub fn prompt_plate_answers<I: BufRead, W: Write>(
    plates: &[Plate],
    mut input: I,
    mut out: W,
) -> Result<Vec<String>> {
    writeln!(
        out,
        "Type the number you see on each plate, or press Enter if you see nothing."
    )?;

    let mut answers = Vec::with_capacity(plates.len());
    let mut line = String::new();
    for (position, plate) in plates.iter().enumerate() {
        write!(out, "Plate {} (#{}): ", position + 1, plate.id)?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }
        answers.push(line.trim().to_string());
    }
    Ok(answers)
}

pub fn run_astigmatism(
    ctx: &CommandContext,
    right: AstigmatismSelection,
    left: AstigmatismSelection,
) -> Result<()> {
    let result = classify_astigmatism(right, left, TestTiming::instant(Utc::now()));
    ctx.emit(result.into(), std::io::stdout())
}

pub fn run_amsler(
    ctx: &CommandContext,
    areas: &[String],
    cells: &[String],
    grid_size: usize,
    symptoms: &[String],
) -> Result<()> {
    let mut marked: Vec<String> = areas.to_vec();
    for cell in cells {
        let (row, col) = parse_cell(cell)?;
        let region = GridRegion::for_cell(row, col, grid_size).ok_or_else(|| {
            anyhow!("Cell {row}:{col} is outside a {grid_size}x{grid_size} grid")
        })?;
        marked.push(region.as_str().to_string());
    }
    let distorted = distinct_regions(&marked);

    let result = classify_amsler(
        &distorted,
        symptoms,
        &ctx.config.amsler,
        TestTiming::instant(Utc::now()),
    );
    ctx.emit(result.into(), std::io::stdout())
}

/// Collapse repeated region names, case-insensitively, keeping first-seen order.
///
/// Several marked cells can fall in one region; the region still counts once.
pub fn distinct_regions(marked: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    marked
        .iter()
        .map(|area| area.trim())
        .filter(|area| !area.is_empty() && seen.insert(area.to_lowercase()))
        .map(str::to_string)
        .collect()
}

/// Parse a `ROW:COL` grid cell reference.
pub fn parse_cell(raw: &str) -> Result<(usize, usize)> {
    let (row, col) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("Expected ROW:COL, got '{raw}'"))?;
    let row = row
        .trim()
        .parse::<usize>()
        .with_context(|| format!("Invalid row in cell '{raw}'"))?;
    let col = col
        .trim()
        .parse::<usize>()
        .with_context(|| format!("Invalid column in cell '{raw}'"))?;
    Ok((row, col))
}

pub fn run_duochrome(
    ctx: &CommandContext,
    right: DuochromeSelection,
    left: DuochromeSelection,
) -> Result<()> {
    let result = classify_duochrome(right, left, TestTiming::instant(Utc::now()));
    ctx.emit(result.into(), std::io::stdout())
}
