//! Visual quality command.

use std::path::PathBuf;

use anyhow::Result;
use watermark_eval::quality::{extract_fid_data, summarize_multi_value_metrics};
use watermark_eval::{ScoreSession, ScoringConfig};

use super::load_dataset;

pub fn run(input: PathBuf, config: ScoringConfig) -> Result<()> {
    let dataset = load_dataset(&input)?;
    if dataset.is_empty() {
        println!("No data");
        return Ok(());
    }

    let session = ScoreSession::new(&dataset, config);
    let summaries = summarize_multi_value_metrics(&session.visual_quality());

    for (metric, per_model) in &summaries {
        println!("{}:", metric);
        println!("{:-<60}", "");
        if per_model.is_empty() {
            println!("No samples");
            println!();
            continue;
        }
        println!("{:<20} {:>6} {:>10} {:>10} {:>10}", "Model", "N", "Mean", "Median", "StdDev");
        for (model, s) in per_model {
            println!(
                "{:<20} {:>6} {:>10.4} {:>10.4} {:>10.4}",
                model, s.count, s.mean, s.median, s.std_dev
            );
        }
        println!();
    }

    let fid = extract_fid_data(dataset.models());
    println!("FID:");
    println!("{:-<60}", "");
    if fid.is_empty() {
        println!("No FID results");
        return Ok(());
    }
    println!("{:<20} {:<6} {:<14} {:>8} {:>8}", "Model", "Type", "Dataset", "Stego", "Clean");
    for (model, record) in &fid {
        let clean = record.clean_fid.map_or("-".to_string(), |v| format!("{:.2}", v));
        println!(
            "{:<20} {:<6} {:<14} {:>8.2} {:>8}",
            model,
            record.model_type.abbreviation(),
            record.dataset_name,
            record.stego_fid,
            clean
        );
    }

    Ok(())
}
