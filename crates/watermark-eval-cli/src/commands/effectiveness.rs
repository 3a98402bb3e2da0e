//! Attack effectiveness command.

use std::path::PathBuf;

use anyhow::Result;
use watermark_eval::scoring::{Ranked, average_attack_effectiveness, average_pair_scores};
use watermark_eval::{ScoreSession, ScoringConfig};

use super::load_dataset;

pub fn run(input: PathBuf, config: ScoringConfig) -> Result<()> {
    let dataset = load_dataset(&input)?;
    if dataset.is_empty() {
        println!("No data");
        return Ok(());
    }

    let session = ScoreSession::new(&dataset, config);

    print_table(
        "Attack Effectiveness (AE, higher is stronger)",
        &average_attack_effectiveness(&session.attack_effectiveness()),
    );
    println!();
    print_table(
        "Robustness (R, higher means watermarks survive)",
        &average_pair_scores(&session.robustness_scores()),
    );
    println!();
    print_table(
        "Quality-loss effectiveness (E, higher is stronger)",
        &average_pair_scores(&session.quality_loss_scores()),
    );

    Ok(())
}

fn print_table(title: &str, rows: &[Ranked<f64>]) {
    println!("{}:", title);
    println!("{:-<60}", "");
    if rows.is_empty() {
        println!("No scorable samples");
        return;
    }
    for row in rows {
        println!("{:>4}  {:<36} {:>10.4}", row.rank, row.name, row.score);
    }
}
