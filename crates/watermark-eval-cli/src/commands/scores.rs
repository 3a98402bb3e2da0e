//! AUC and ranking command.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use watermark_eval::scoring::{attack_leaderboard, overall_ranking};
use watermark_eval::{ScoreSession, ScoringConfig};

use super::{fmt_score, load_dataset};

pub fn run(
    input: PathBuf,
    attack: Option<&str>,
    output: Option<PathBuf>,
    config: ScoringConfig,
) -> Result<()> {
    let dataset = load_dataset(&input)?;
    if dataset.is_empty() {
        println!("No data");
        return Ok(());
    }

    let session = ScoreSession::new(&dataset, config);
    let auc = session.auc_scores();

    if let Some(attack) = attack {
        let board = attack_leaderboard(&auc, attack);
        if board.is_empty() {
            bail!(
                "No AUC scores for attack '{}'. Available: {}",
                attack,
                dataset.attack_names().join(", ")
            );
        }

        println!("Leaderboard: {}", attack);
        println!("{:-<60}", "");
        println!("{:>4}  {:<30} {:>10}", "Rank", "Model", "AUC");
        for entry in &board {
            println!("{:>4}  {:<30} {:>10.4}", entry.rank, entry.name, entry.score);
        }
        return Ok(());
    }

    let attacks = dataset.attack_names();
    println!("AUC Scores (PSNR range [{:.2}, {:.2}]):", session.range().min, session.range().max);
    println!("{:-<60}", "");
    print!("{:<20}", "Model");
    for attack in &attacks {
        print!(" {:>12}", truncate(attack, 12));
    }
    println!();
    for (model, scores) in &auc {
        print!("{:<20}", truncate(model, 20));
        for attack in &attacks {
            let cell = scores.get(*attack).map_or("-".to_string(), |v| fmt_score(*v, 4));
            print!(" {:>12}", cell);
        }
        println!();
    }

    let points = session.ranking_scores();
    let ranking = overall_ranking(&points);
    println!();
    println!("Overall Ranking:");
    println!("{:-<60}", "");
    if ranking.is_empty() {
        println!("No model has a finite AUC");
    }
    for entry in &ranking {
        println!("{:>4}  {:<30} {:>6} pts", entry.rank, entry.name, entry.score);
    }

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&serde_json::json!({
            "psnr_range": session.range(),
            "auc_scores": auc,
            "ranking_scores": points,
        }))?;
        std::fs::write(&output_path, json)
            .with_context(|| format!("Failed to write to {}", output_path.display()))?;
        println!("Saved to: {}", output_path.display());
    }

    Ok(())
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let head: String = s.chars().take(width - 3).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}
