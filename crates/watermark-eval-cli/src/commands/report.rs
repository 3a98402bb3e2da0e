//! Report command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use watermark_eval::{AnalysisReport, ScoreSession, ScoringConfig};

use super::load_dataset;

pub fn run(
    input: PathBuf,
    output: PathBuf,
    csv: Option<PathBuf>,
    auc_csv: Option<PathBuf>,
    config: ScoringConfig,
) -> Result<()> {
    let dataset = load_dataset(&input)?;
    if dataset.is_empty() {
        println!("No data");
        return Ok(());
    }

    let session = ScoreSession::new(&dataset, config);
    let report = AnalysisReport::from_session(&session);

    report
        .write_json(&output)
        .with_context(|| format!("Failed to write to {}", output.display()))?;
    println!("Saved to: {}", output.display());

    if let Some(path) = csv {
        report
            .write_ranking_csv(&path)
            .with_context(|| format!("Failed to write ranking CSV to {}", path.display()))?;
        println!("Ranking CSV: {}", path.display());
    }

    if let Some(path) = auc_csv {
        report
            .write_auc_csv(&path)
            .with_context(|| format!("Failed to write AUC CSV to {}", path.display()))?;
        println!("AUC CSV: {}", path.display());
    }

    println!(
        "{} model(s), {} attack(s), {} ranked",
        report.model_count,
        report.attack_names().len(),
        report.overall_ranking.len()
    );

    Ok(())
}
