//! Area under the normalized-quality vs detection curve.
//!
//! For each (model, attack) the curve is anchored at `(0, 0)` (no quality,
//! no detection) and, when the model has a usable no-attack baseline, at
//! `(1, baseline)`. PSNR is normalized with one global [`PsnrRange`] so AUCs
//! are comparable across attacks of very different strength.

use std::collections::BTreeMap;

use super::curve::{CurvePoint, baseline_detection, extract_robustness_curve_data};
use super::range::{PsnrRange, determine_global_psnr_range};
use crate::dataset::ModelResult;
use crate::stats;

/// AUC keyed by model name, then attack name. `NaN` marks insufficient data.
pub type AucScores = BTreeMap<String, BTreeMap<String, f64>>;

/// Compute AUC scores using the default range policy.
#[must_use]
pub fn compute_auc_scores(models: &[ModelResult]) -> AucScores {
    compute_auc_scores_with_range(models, determine_global_psnr_range(models))
}

/// Compute AUC scores against a precomputed normalization range.
///
/// A degenerate range is replaced by [`PsnrRange::FALLBACK`]. When model names
/// repeat, the first record's baseline is used.
#[must_use]
pub fn compute_auc_scores_with_range(models: &[ModelResult], range: PsnrRange) -> AucScores {
    let range = range.or_fallback(PsnrRange::FALLBACK);
    let mut baselines: BTreeMap<&str, Option<f64>> = BTreeMap::new();
    for model in models {
        baselines
            .entry(model.model_name.as_str())
            .or_insert_with(|| baseline_detection(model));
    }

    extract_robustness_curve_data(models)
        .into_iter()
        .map(|(model, curves)| {
            let baseline = baselines.get(model.as_str()).copied().flatten();
            let scores = curves
                .into_iter()
                .map(|(attack, points)| (attack, curve_auc(&points, range, baseline)))
                .collect();
            (model, scores)
        })
        .collect()
}

/// Normalized, anchored and x-sorted points of one curve.
#[must_use]
pub fn normalized_curve(
    points: &[CurvePoint],
    range: PsnrRange,
    baseline: Option<f64>,
) -> Vec<(f64, f64)> {
    let mut normalized = Vec::with_capacity(points.len() + 2);
    normalized.push((0.0, 0.0));
    normalized.extend(
        points
            .iter()
            .filter(|p| p.psnr.is_finite() && p.detection.is_finite())
            .map(|p| (range.normalize(p.psnr), p.detection)),
    );
    if let Some(tpr) = baseline.filter(|v| v.is_finite()) {
        normalized.push((1.0, tpr));
    }
    normalized.sort_by(|a, b| a.0.total_cmp(&b.0));
    normalized
}

/// Trapezoidal AUC of one curve, or `NaN` with fewer than two points.
#[must_use]
pub fn curve_auc(points: &[CurvePoint], range: PsnrRange, baseline: Option<f64>) -> f64 {
    let normalized = normalized_curve(points, range, baseline);
    if normalized.len() < 2 {
        return f64::NAN;
    }
    stats::trapezoid_area(&normalized)
}
