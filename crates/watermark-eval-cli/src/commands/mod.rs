//! Subcommand implementations.

pub mod curves;
pub mod effectiveness;
pub mod quality;
pub mod range;
pub mod report;
pub mod scores;

use std::path::Path;

use anyhow::{Context, Result};
use watermark_eval::{Dataset, ScoringConfig};

use crate::ScoringArgs;

/// Build the scoring configuration: file values first, then explicit flags.
pub fn scoring_config(args: &ScoringArgs) -> Result<ScoringConfig> {
    let mut config = match &args.config {
        Some(path) => ScoringConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ScoringConfig::default(),
    };

    if let Some(psnr) = args.no_attack_psnr {
        config.range_policy.assumed_no_attack_psnr = psnr;
    }
    if let Some(margin) = args.psnr_margin {
        config.range_policy.margin = margin;
    }

    config.validate().context("Invalid scoring configuration")?;
    log::debug!("Scoring config: {:?}", config);
    Ok(config)
}

/// Load a dataset from a file or directory.
pub fn load_dataset(input: &Path) -> Result<Dataset> {
    log::info!("Loading results from: {}", input.display());
    let dataset = Dataset::open(input)
        .with_context(|| format!("Failed to load results from {}", input.display()))?;
    log::info!("Loaded {} model(s)", dataset.len());
    Ok(dataset)
}

/// Format a score, or "-" when it is not finite.
pub fn fmt_score(value: f64, precision: usize) -> String {
    if value.is_finite() {
        format!("{:.*}", precision, value)
    } else {
        "-".to_string()
    }
}
