//! PSNR range command.

use std::path::PathBuf;

use anyhow::Result;
use watermark_eval::{ScoreSession, ScoringConfig};

use super::load_dataset;

pub fn run(input: PathBuf, config: ScoringConfig) -> Result<()> {
    let dataset = load_dataset(&input)?;
    if dataset.is_empty() {
        println!("No data");
        return Ok(());
    }

    let session = ScoreSession::new(&dataset, config);
    let policy = session.config().range_policy;
    let range = session.range();

    println!("PSNR Normalization:");
    println!("{:-<60}", "");
    println!(
        "Policy: no-attack PSNR {:.1} dB, margin {:.1} dB, fallback [{:.1}, {:.1}]",
        policy.assumed_no_attack_psnr, policy.margin, policy.fallback.min, policy.fallback.max
    );
    println!("AUC / AE range:     [{:.2}, {:.2}] dB", range.min, range.max);
    match session.observed_range() {
        Some(observed) => {
            println!("Observed (R/E):     [{:.2}, {:.2}] dB", observed.min, observed.max);
        }
        None => println!("Observed (R/E):     no PSNR data"),
    }

    Ok(())
}
