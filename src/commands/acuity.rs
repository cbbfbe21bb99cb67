use anyhow::{Context, Result};
use rand::Rng;
use std::io::{BufRead, Write};

use super::CommandContext;
use crate::acuity::{split_config, AcuityDetails, Orientation, StaircaseController};
use crate::core::ResultEnvelope;

/// Run an interactive acuity test: answers on stdin, prompts on stderr.
pub fn run_acuity(ctx: &CommandContext, seed: Option<u64>) -> Result<()> {
    let (table, settings) =
        split_config(&ctx.config.acuity).context("Invalid acuity configuration")?;
    let mut controller = match seed {
        Some(seed) => StaircaseController::seeded(table, settings, seed),
        None => StaircaseController::new(table, settings),
    };

    let stdin = std::io::stdin();
    let result = run_acuity_session(&mut controller, stdin.lock(), std::io::stderr())?;
    ctx.emit(result.into(), std::io::stdout())
}

/// Tumbling-E optotype whose open side faces `orientation`.
fn optotype(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::Up => "Ш",
        Orientation::Right => "E",
        Orientation::Down => "M",
        Orientation::Left => "Ǝ",
    }
}

/// Drive `controller` with answers read line by line from `input`.
///
/// `q` or end of input stops the test early; unrecognised answers are
/// re-prompted without counting as a trial.
pub fn run_acuity_session<R: Rng, I: BufRead, W: Write>(
    controller: &mut StaircaseController<R>,
    mut input: I,
    mut out: W,
) -> Result<ResultEnvelope<AcuityDetails>> {
    controller.start();
    writeln!(
        out,
        "Cover one eye. For each symbol, type the side its open end faces: \
         u(p), r(ight), d(own), l(eft). q quits."
    )?;

    let mut line = String::new();
    while let Some(question) = controller.get_next_question() {
        let label = controller
            .table()
            .get(question.level_index)
            .map(|level| level.label.as_str())
            .unwrap_or("?");
        write!(
            out,
            "\n[{label}] size {:.0}   {}   > ",
            question.stimulus_size,
            optotype(question.orientation)
        )?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 || line.trim().eq_ignore_ascii_case("q") {
            writeln!(out)?;
            break;
        }

        if controller.submit_answer_str(&line).is_err() {
            writeln!(out, "Please answer u, r, d or l.")?;
        }
    }

    Ok(controller.calculate_result())
}
