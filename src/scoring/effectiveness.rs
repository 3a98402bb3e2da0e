//! Attack strength indices.
//!
//! [`compute_attack_effectiveness`] yields the attack-effectiveness index
//! `AE = (1 - detection) * psnr_norm`, normalized with the AUC range policy. An
//! attack scores high when it defeats detection while leaving the image close
//! to undistorted.
//!
//! The R and E scores are a separate pair with their own conventions: PSNR is
//! normalized by the plain observed min/max, TPR values are remapped from
//! [-1, 1] with `(v + 1) / 2`, and Extract Accuracy is used without dividing
//! by 100. A TPR key without a usable value falls back to Extract Accuracy,
//! which AE never does. They are computed separately from AE.

use std::collections::BTreeMap;

use super::range::{PsnrRange, determine_global_psnr_range, observed_psnr_range};
use super::ranking::Ranked;
use crate::dataset::ModelResult;
use crate::stats;

/// AE samples keyed by attack name, pooled over models and factors.
pub type EffectivenessScores = BTreeMap<String, Vec<f64>>;

/// Per-sample scores keyed by attack name, then model name.
pub type PairScores = BTreeMap<String, BTreeMap<String, Vec<f64>>>;

/// Compute AE samples using the default range policy.
#[must_use]
pub fn compute_attack_effectiveness(models: &[ModelResult]) -> EffectivenessScores {
    compute_attack_effectiveness_with_range(models, determine_global_psnr_range(models))
}

/// Compute AE samples against a precomputed normalization range.
///
/// Every attack seen gets an entry, even if none of its samples is usable.
#[must_use]
pub fn compute_attack_effectiveness_with_range(
    models: &[ModelResult],
    range: PsnrRange,
) -> EffectivenessScores {
    let range = range.or_fallback(PsnrRange::FALLBACK);
    let mut scores = EffectivenessScores::new();

    for model in models {
        for (attack, record) in model.attacks() {
            let samples = scores.entry(attack.to_string()).or_default();
            for sample in record.samples() {
                let (Some(detection), Some(psnr)) = (sample.detection(), sample.psnr()) else {
                    continue;
                };
                let detection = detection.clamp(0.0, 1.0);
                samples.push((1.0 - detection) * range.normalize(psnr));
            }
        }
    }

    scores
}

/// Mean AE per attack, strongest attack first.
///
/// Attacks without samples are left out.
#[must_use]
pub fn average_attack_effectiveness(scores: &EffectivenessScores) -> Vec<Ranked<f64>> {
    rank_means(scores.iter().map(|(attack, values)| (attack.as_str(), values.clone())))
}

/// Robustness scores `R = accuracy * (1 - psnr_norm)` per attack and model.
///
/// High when detection survives heavy distortion.
#[must_use]
pub fn compute_robustness_scores(models: &[ModelResult]) -> PairScores {
    quality_loss_scores(models, |accuracy, psnr_norm| accuracy * (1.0 - psnr_norm))
}

/// Effectiveness scores `E = psnr_norm * (1 - accuracy)` per attack and model.
///
/// High when an attack defeats detection with little quality loss.
#[must_use]
pub fn compute_quality_loss_effectiveness(models: &[ModelResult]) -> PairScores {
    quality_loss_scores(models, |accuracy, psnr_norm| psnr_norm * (1.0 - accuracy))
}

/// Pooled mean of per-model scores per attack, highest first.
///
/// Attacks without samples are left out.
#[must_use]
pub fn average_pair_scores(scores: &PairScores) -> Vec<Ranked<f64>> {
    rank_means(scores.iter().map(|(attack, per_model)| {
        let pooled: Vec<f64> = per_model.values().flatten().copied().collect();
        (attack.as_str(), pooled)
    }))
}

fn quality_loss_scores(models: &[ModelResult], score: impl Fn(f64, f64) -> f64) -> PairScores {
    let mut scores = PairScores::new();
    let Some(range) = observed_psnr_range(models) else {
        log::warn!("No PSNR values found for normalization");
        return scores;
    };

    for model in models {
        for (attack, record) in model.attacks() {
            let samples = scores
                .entry(attack.to_string())
                .or_default()
                .entry(model.model_name.clone())
                .or_default();
            for sample in record.samples() {
                let (Some(accuracy), Some(psnr)) = (sample.quality_loss_accuracy(), sample.psnr())
                else {
                    continue;
                };
                samples.push(score(accuracy.clamp(0.0, 1.0), range.normalize(psnr)));
            }
        }
    }

    scores
}

fn rank_means<'a>(groups: impl Iterator<Item = (&'a str, Vec<f64>)>) -> Vec<Ranked<f64>> {
    let mut means: Vec<(&str, f64)> = groups
        .filter(|(_, values)| !values.is_empty())
        .map(|(name, values)| (name, stats::mean(&values)))
        .collect();
    means.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    means
        .into_iter()
        .enumerate()
        .map(|(i, (name, score))| Ranked {
            rank: i + 1,
            name: name.to_string(),
            score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model(name: &str, attacks: serde_json::Value) -> ModelResult {
        ModelResult::from_json(&json!({"modelname": name, "robustnessresult": attacks}), None)
    }

    #[test]
    fn test_attack_effectiveness_values() {
        let m = model(
            "A",
            json!({
                "No Attacking": {"factors": {"0": {"TPR@1%FPR": 1.0, "visualquality": {"PSNR": 65}}}},
                "Blur": {"factors": {
                    "1": {"TPR@1%FPR": 0.2, "visualquality": {"PSNR": 45}},
                    "2": {"Extract Accuracy": 50, "visualquality": {"PSNR": 20}},
                    "3": {"TPR@1%FPR": 0.2}
                }},
                "Crop": {"factors": {}}
            }),
        );
        let ae = compute_attack_effectiveness_with_range(&[m], PsnrRange::new(20.0, 70.0));
        let blur = &ae["Blur"];
        assert_eq!(blur.len(), 2);
        assert!((blur[0] - 0.4).abs() < 1e-12);
        assert_eq!(blur[1], 0.0);
        assert!(ae["Crop"].is_empty());
        assert!(!ae.contains_key("No Attacking"));
    }

    #[test]
    fn test_detection_is_clamped() {
        let m = model(
            "A",
            json!({"Noise": {"factors": {"1": {"TPR@1%FPR": -0.5, "visualquality": {"PSNR": 70}}}}}),
        );
        let ae = compute_attack_effectiveness_with_range(&[m], PsnrRange::new(20.0, 70.0));
        assert_eq!(ae["Noise"], vec![1.0]);
    }

    #[test]
    fn test_pooled_across_models() {
        let blur = |tpr: f64| {
            json!({"Blur": {"factors": {"1": {"TPR@1%FPR": tpr, "visualquality": {"PSNR": 45}}}}})
        };
        let a = model("A", blur(0.0));
        let b = model("B", blur(1.0));
        let ae = compute_attack_effectiveness(&[a, b]);
        assert_eq!(ae["Blur"].len(), 2);

        let avg = average_attack_effectiveness(&ae);
        assert_eq!(avg.len(), 1);
        assert_eq!(avg[0].name, "Blur");
    }

    #[test]
    fn test_average_ranking_skips_empty() {
        let mut ae = EffectivenessScores::new();
        ae.insert("Blur".into(), vec![0.2, 0.4]);
        ae.insert("JPEG".into(), vec![0.5]);
        ae.insert("Crop".into(), vec![]);
        let avg = average_attack_effectiveness(&ae);
        assert_eq!(avg.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(), vec!["JPEG", "Blur"]);
        assert!((avg[1].score - 0.3).abs() < 1e-12);
        assert_eq!(avg[0].rank, 1);
    }

    #[test]
    fn test_r_and_e_scores() {
        let m = model(
            "A",
            json!({
                "No Attacking": {"factors": {"0": {"TPR@1%FPR": 1.0, "visualquality": {"PSNR": 99}}}},
                "Blur": {"factors": {
                    "1": {"TPR@1%FPR": 0.0, "visualquality": {"PSNR": 40}},
                    "2": {"TPR@1%FPR": 1.0, "visualquality": {"PSNR": 20}},
                    "3": {"Extract Accuracy": 0.25, "visualquality": {"PSNR": 30}}
                }}
            }),
        );

        // Observed range [20, 40]; the baseline's 99 dB is not part of it.
        let r = compute_robustness_scores(std::slice::from_ref(&m));
        let e = compute_quality_loss_effectiveness(std::slice::from_ref(&m));
        let r = &r["Blur"]["A"];
        let e = &e["Blur"]["A"];

        // factor 1: accuracy (0+1)/2 = 0.5, psnr_norm 1.0
        assert!((r[0] - 0.0).abs() < 1e-12);
        assert!((e[0] - 0.5).abs() < 1e-12);
        // factor 2: accuracy 1.0, psnr_norm 0.0
        assert!((r[1] - 1.0).abs() < 1e-12);
        assert!((e[1] - 0.0).abs() < 1e-12);
        // factor 3: Extract Accuracy used as-is, psnr_norm 0.5
        assert!((r[2] - 0.125).abs() < 1e-12);
        assert!((e[2] - 0.375).abs() < 1e-12);

        let avg = average_pair_scores(&compute_robustness_scores(&[m]));
        assert!((avg[0].score - 1.125 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_r_scores_fall_back_to_extract_accuracy() {
        let m = model(
            "A",
            json!({"Blur": {"factors": {
                "1": {"TPR@1%FPR": "N/A", "Extract Accuracy": 0.8, "visualquality": {"PSNR": 20}},
                "2": {"TPR@1%FPR": 1.0, "visualquality": {"PSNR": 40}}
            }}}),
        );

        let r = compute_robustness_scores(std::slice::from_ref(&m));
        let r = &r["Blur"]["A"];
        assert_eq!(r.len(), 2);
        assert!((r[0] - 0.8).abs() < 1e-12);
        assert!((r[1] - 0.0).abs() < 1e-12);

        // AE has no fallback: the first factor yields no sample.
        let ae = compute_attack_effectiveness_with_range(&[m], PsnrRange::new(20.0, 70.0));
        assert_eq!(ae["Blur"].len(), 1);
    }

    #[test]
    fn test_degenerate_range_falls_back() {
        let m = model(
            "A",
            json!({"Blur": {"factors": {"1": {"TPR@1%FPR": 0.2, "visualquality": {"PSNR": 45}}}}}),
        );
        let ae = compute_attack_effectiveness_with_range(&[m], PsnrRange::new(5.0, 5.0));
        assert_eq!(ae["Blur"].len(), 1);
        assert!((ae["Blur"][0] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_r_scores_without_psnr() {
        let m = model("A", json!({"Blur": {"factors": {"1": {"TPR@1%FPR": 0.5}}}}));
        assert!(compute_robustness_scores(&[m]).is_empty());
    }

    #[test]
    fn test_empty_dataset() {
        assert!(compute_attack_effectiveness(&[]).is_empty());
        assert!(compute_quality_loss_effectiveness(&[]).is_empty());
        assert!(average_pair_scores(&PairScores::new()).is_empty());
    }
}
