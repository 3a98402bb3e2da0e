//! watermark-eval CLI - watermark benchmark scoring tool

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

mod commands;

/// Score watermarking models on robustness benchmark results.
#[derive(Parser)]
#[command(name = "watermark-eval")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    scoring: ScoringArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every scoring command.
#[derive(Args)]
pub struct ScoringArgs {
    /// Scoring configuration file (JSON)
    #[arg(long, global = true, env = "WATERMARK_EVAL_CONFIG")]
    config: Option<PathBuf>,

    /// PSNR assumed for an unattacked image (dB)
    #[arg(long, global = true)]
    no_attack_psnr: Option<f64>,

    /// Headroom above the highest observed PSNR (dB)
    #[arg(long, global = true)]
    psnr_margin: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the PSNR normalization ranges
    Range {
        /// Result file or directory of result files
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Show robustness curve points
    Curves {
        /// Result file or directory of result files
        #[arg(short, long)]
        input: PathBuf,

        /// Only show this model
        #[arg(long)]
        model: Option<String>,
    },

    /// Show AUC scores and the overall ranking
    Scores {
        /// Result file or directory of result files
        #[arg(short, long)]
        input: PathBuf,

        /// Show the leaderboard of a single attack
        #[arg(long)]
        attack: Option<String>,

        /// Output file (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show attack effectiveness and R/E scores
    Effectiveness {
        /// Result file or directory of result files
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Show visual-quality summaries and FID results
    Quality {
        /// Result file or directory of result files
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Write a full analysis report
    Report {
        /// Result file or directory of result files
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (JSON)
        #[arg(short, long)]
        output: PathBuf,

        /// Also write the overall ranking as CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Also write the AUC table as CSV
        #[arg(long)]
        auc_csv: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = commands::scoring_config(&cli.scoring)?;

    match cli.command {
        Commands::Range { input } => commands::range::run(input, config),
        Commands::Curves { input, model } => commands::curves::run(input, model.as_deref()),
        Commands::Scores { input, attack, output } => {
            commands::scores::run(input, attack.as_deref(), output, config)
        }
        Commands::Effectiveness { input } => commands::effectiveness::run(input, config),
        Commands::Quality { input } => commands::quality::run(input, config),
        Commands::Report { input, output, csv, auc_csv } => {
            commands::report::run(input, output, csv, auc_csv, config)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
