use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::classifiers::{AstigmatismSelection, DuochromeSelection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    Terminal,
    /// Tagged JSON envelope
    Json,
}

impl OutputFormat {
    /// Resolve the effective format: flag first, then the configured default.
    pub fn resolve(flag: Option<OutputFormat>, configured: Option<&str>) -> OutputFormat {
        flag.or_else(|| {
            configured.and_then(|name| <OutputFormat as ValueEnum>::from_str(name, true).ok())
        })
        .unwrap_or(OutputFormat::Terminal)
    }
}

impl From<OutputFormat> for crate::io::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => crate::io::OutputFormat::Terminal,
            OutputFormat::Json => crate::io::OutputFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "visionscreen")]
#[command(
    about = "Self-administered vision screening: acuity staircase and severity classifiers",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to .visionscreen.toml discovery)
    #[arg(short, long, global = true, env = "VISIONSCREEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format [default: `[output] default_format`, else terminal]
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Append each finished result to this JSON-lines history file
    #[arg(long, global = true, env = "VISIONSCREEN_HISTORY")]
    pub history: Option<PathBuf>,

    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default .visionscreen.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Run the adaptive acuity test interactively (answers: u, r, d, l; q stops)
    Acuity {
        /// Seed for a reproducible stimulus sequence
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Score the color-vision plate battery
    ColorVision {
        /// Answers in canonical plate order; omit to be prompted plate by plate
        #[arg(long, value_delimiter = ',')]
        answers: Option<Vec<String>>,

        /// Seed for the plate order in interactive mode
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Classify astigmatism dial selections
    Astigmatism {
        /// Right eye: none, vertical, horizontal, oblique
        #[arg(long)]
        right: AstigmatismSelection,

        /// Left eye: none, vertical, horizontal, oblique
        #[arg(long)]
        left: AstigmatismSelection,
    },

    /// Classify Amsler grid findings
    Amsler {
        /// Distorted regions by name (e.g. top-left,center)
        #[arg(long, value_delimiter = ',')]
        areas: Vec<String>,

        /// Distorted grid cells as ROW:COL, mapped to named regions
        #[arg(long = "cell")]
        cells: Vec<String>,

        /// Cells per side of the grid used with --cell
        #[arg(long, default_value = "20")]
        grid_size: usize,

        /// Reported symptoms (e.g. wavy,blurry,missing)
        #[arg(long, value_delimiter = ',')]
        symptoms: Vec<String>,
    },

    /// Classify duochrome (red/green) selections
    Duochrome {
        /// Right eye: red, green, equal
        #[arg(long)]
        right: DuochromeSelection,

        /// Left eye: red, green, equal
        #[arg(long)]
        left: DuochromeSelection,
    },

    /// Show stored results from a history file
    History {
        /// History file (defaults to --history)
        file: Option<PathBuf>,
    },
}
