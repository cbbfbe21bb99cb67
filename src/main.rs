use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use visionscreen::cli::{Cli, Commands, OutputFormat};
use visionscreen::commands::{self, CommandContext};
use visionscreen::config::{self, VisionConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    if let Commands::Init { force } = cli.command {
        return commands::init_config(force);
    }

    let config = load_config(&cli)?;
    let configured_format = config
        .output
        .as_ref()
        .and_then(|o| o.default_format.as_deref());
    let format = OutputFormat::resolve(cli.format, configured_format).into();
    let ctx = CommandContext::new(config, format, cli.history);

    match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Acuity { seed } => commands::run_acuity(&ctx, seed),
        Commands::ColorVision { answers, seed } => commands::run_color_vision(&ctx, answers, seed),
        Commands::Astigmatism { right, left } => commands::run_astigmatism(&ctx, right, left),
        Commands::Amsler {
            areas,
            cells,
            grid_size,
            symptoms,
        } => commands::run_amsler(&ctx, &areas, &cells, grid_size, &symptoms),
        Commands::Duochrome { right, left } => commands::run_duochrome(&ctx, right, left),
        Commands::History { file } => {
            let path = file.or_else(|| ctx.history_path()).ok_or_else(|| {
                anyhow::anyhow!("No history file given. Pass a path or use --history.")
            })?;
            commands::show_history(&path, ctx.format, std::io::stdout())
        }
    }
}

// Setup logging based on verbosity
fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

// An explicit --config must exist and validate; discovery falls back to defaults.
fn load_config(cli: &Cli) -> Result<VisionConfig> {
    match &cli.config {
        Some(path) => Ok(config::load_config_from_path_validated(path)?),
        None => Ok(config::load_config()),
    }
}
