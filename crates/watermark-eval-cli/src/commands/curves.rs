//! Robustness curve command.

use std::path::PathBuf;

use anyhow::{Result, bail};
use watermark_eval::scoring::{self, baseline_detection};

use super::load_dataset;

pub fn run(input: PathBuf, model: Option<&str>) -> Result<()> {
    let dataset = load_dataset(&input)?;
    if dataset.is_empty() {
        println!("No data");
        return Ok(());
    }

    let models = match model {
        Some(name) => match dataset.get(name) {
            Some(m) => std::slice::from_ref(m),
            None => bail!(
                "Unknown model '{}'. Available: {}",
                name,
                dataset.model_names().join(", ")
            ),
        },
        None => dataset.models(),
    };

    let curves = scoring::extract_robustness_curve_data(models);
    if curves.is_empty() {
        println!("No robustness results");
        return Ok(());
    }

    for m in models {
        let Some(attacks) = curves.get(&m.model_name) else {
            continue;
        };

        let baseline = baseline_detection(m).map_or("-".to_string(), |v| format!("{:.4}", v));
        println!(
            "{} ({}), baseline detection {}",
            m.model_name,
            m.model_type.abbreviation(),
            baseline
        );
        println!("{:-<60}", "");
        println!("{:<24} {:>10} {:>12}", "Attack", "PSNR", "Detection");

        for (attack, points) in attacks {
            if points.is_empty() {
                println!("{:<24} {:>10} {:>12}", attack, "-", "-");
            }
            for point in points {
                println!("{:<24} {:>10.2} {:>12.4}", attack, point.psnr, point.detection);
            }
        }
        println!();
    }

    Ok(())
}
