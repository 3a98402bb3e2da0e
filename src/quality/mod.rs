//! Visual-quality and per-factor robustness tables.
//!
//! These are the inputs of the distribution and curve charts: replicate
//! samples of each visual-quality metric, FID records, and the mean and spread
//! of a robustness metric at every attack factor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::{ModelResult, ModelType, VisualQualityEntry};
use crate::stats::{self, Summary};

/// Replicate values keyed by metric name, then model name.
pub type MultiValueMetrics = BTreeMap<String, BTreeMap<String, Vec<f64>>>;

/// Collect the per-image samples of every listed visual-quality metric.
///
/// Only metrics a model lists in `testvisualqualitymetrics` are read. Entries
/// that are not lists, or hold no valid values, are skipped.
#[must_use]
pub fn extract_multi_value_metrics(models: &[ModelResult]) -> MultiValueMetrics {
    let mut metrics = MultiValueMetrics::new();

    for model in models {
        if model.visual_quality_result.is_empty() {
            log::warn!("No visualqualityresult found for model: {}", model.model_name);
            continue;
        }

        for metric in &model.tested_visual_quality_metrics {
            let per_model = metrics.entry(metric.clone()).or_default();
            match model.visual_quality(metric) {
                Some(VisualQualityEntry::Samples(m)) if m.is_replicates() => {
                    if m.values().is_empty() {
                        log::warn!("No valid values for {} - {}", metric, model.model_name);
                    } else {
                        per_model.insert(model.model_name.clone(), m.values().to_vec());
                    }
                }
                Some(_) => {
                    log::debug!("Expected a list for {} - {}", metric, model.model_name);
                }
                None => {
                    log::debug!("No data for metric {} in model {}", metric, model.model_name);
                }
            }
        }
    }

    metrics
}

/// Descriptive statistics for every (metric, model) sample set.
#[must_use]
pub fn summarize_multi_value_metrics(
    metrics: &MultiValueMetrics,
) -> BTreeMap<String, BTreeMap<String, Summary>> {
    metrics
        .iter()
        .map(|(metric, per_model)| {
            let summaries = per_model
                .iter()
                .filter_map(|(model, values)| Some((model.clone(), Summary::compute(values)?)))
                .collect();
            (metric.clone(), summaries)
        })
        .collect()
}

/// FID results of one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FidSummary {
    /// Reference dataset, "Unknown" if not recorded.
    pub dataset_name: String,
    /// FID of the watermarked images.
    pub stego_fid: f64,
    /// FID of the clean images, if recorded.
    pub clean_fid: Option<f64>,
    /// Model family.
    pub model_type: ModelType,
}

/// Collect FID records of models that report a valid stego FID.
#[must_use]
pub fn extract_fid_data(models: &[ModelResult]) -> BTreeMap<String, FidSummary> {
    models
        .iter()
        .filter_map(|model| {
            let Some(VisualQualityEntry::Fid(fid)) = model.visual_quality("FID") else {
                return None;
            };
            let summary = FidSummary {
                dataset_name: fid.dataset_name.clone().unwrap_or_else(|| "Unknown".to_string()),
                stego_fid: fid.stego?,
                clean_fid: fid.clean,
                model_type: model.model_type,
            };
            Some((model.model_name.clone(), summary))
        })
        .collect()
}

/// Mean and sample standard deviation of a metric at one factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorStat {
    /// Mean over replicates.
    pub value: f64,
    /// Sample standard deviation; 0 for a scalar or a single replicate.
    pub std: f64,
    /// Family of the model the stat belongs to.
    pub model_type: ModelType,
}

/// A robustness metric across the factors of one attack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackSeries {
    /// Strength-axis label.
    pub factor_symbol: String,
    /// Display name.
    pub noise_name: String,
    /// Whether a larger factor means a weaker attack.
    pub factor_inversely_related: bool,
    /// Per factor (first-seen order), the stat of every model reporting it.
    pub factors: Vec<(String, BTreeMap<String, FactorStat>)>,
}

impl AttackSeries {
    /// Stats at one factor.
    #[must_use]
    pub fn factor(&self, factor: &str) -> Option<&BTreeMap<String, FactorStat>> {
        self.factors.iter().find(|(f, _)| f == factor).map(|(_, s)| s)
    }
}

/// Tabulate one robustness metric per attack, factor and model.
///
/// All attacks are included, the no-attack baseline too. Attack metadata comes
/// from the first model that reports the attack.
#[must_use]
pub fn extract_robustness_data(
    models: &[ModelResult],
    metric: &str,
) -> BTreeMap<String, AttackSeries> {
    let mut series: BTreeMap<String, AttackSeries> = BTreeMap::new();

    for model in models {
        for (attack, record) in &model.robustness_result {
            let entry = series.entry(attack.clone()).or_insert_with(|| AttackSeries {
                factor_symbol: record.factor_symbol.clone().unwrap_or_else(|| "Factor".to_string()),
                noise_name: record.noise_name.clone().unwrap_or_else(|| attack.clone()),
                factor_inversely_related: record.factor_inversely_related,
                factors: Vec::new(),
            });

            for (factor, sample) in &record.factors {
                let index = match entry.factors.iter().position(|(f, _)| f == factor) {
                    Some(i) => i,
                    None => {
                        entry.factors.push((factor.clone(), BTreeMap::new()));
                        entry.factors.len() - 1
                    }
                };

                let Some(values) = sample.metric(metric).map(|m| m.values()) else {
                    continue;
                };
                if values.is_empty() {
                    continue;
                }
                entry.factors[index].1.insert(
                    model.model_name.clone(),
                    FactorStat {
                        value: stats::mean(values),
                        std: stats::std_dev(values),
                        model_type: model.model_type,
                    },
                );
            }
        }
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn models() -> Vec<ModelResult> {
        vec![
            ModelResult::from_json(
                &json!({
                    "modelname": "A",
                    "modeltype": "Post-Generation",
                    "testvisualqualitymetrics": ["PSNR", "SSIM", "LPIPS", "FID"],
                    "visualqualityresult": {
                        "PSNR": [40.0, 42.0, "bad"],
                        "SSIM": 0.98,
                        "LPIPS": ["x"],
                        "FID": {"datasetname": "COCO", "FID": {"stego": 10.5, "clean": 9.0}}
                    },
                    "robustnessresult": {
                        "Blur": {"factorsymbol": "σ", "factors": {
                            "1": {"TPR@1%FPR": [0.8, 1.0]},
                            "2": {"TPR@1%FPR": 0.5}
                        }}
                    }
                }),
                None,
            ),
            ModelResult::from_json(
                &json!({
                    "modelname": "B",
                    "modeltype": "In-Generation",
                    "testvisualqualitymetrics": ["PSNR"],
                    "visualqualityresult": {
                        "PSNR": [30.0],
                        "FID": {"FID": {"stego": "N/A"}}
                    },
                    "robustnessresult": {
                        "Blur": {"factors": {
                            "3": {"TPR@1%FPR": 0.1},
                            "1": {"Extract Accuracy": 90}
                        }}
                    }
                }),
                None,
            ),
        ]
    }

    #[test]
    fn test_multi_value_metrics() {
        let metrics = extract_multi_value_metrics(&models());
        assert_eq!(metrics["PSNR"]["A"], vec![40.0, 42.0]);
        assert_eq!(metrics["PSNR"]["B"], vec![30.0]);
        assert!(metrics["SSIM"].is_empty());
        assert!(metrics["LPIPS"].is_empty());

        let summaries = summarize_multi_value_metrics(&metrics);
        assert!((summaries["PSNR"]["A"].mean - 41.0).abs() < 1e-12);
        assert!(summaries["SSIM"].is_empty());
    }

    #[test]
    fn test_fid_data() {
        let fid = extract_fid_data(&models());
        assert_eq!(fid.len(), 1);
        let a = &fid["A"];
        assert_eq!(a.dataset_name, "COCO");
        assert_eq!(a.stego_fid, 10.5);
        assert_eq!(a.clean_fid, Some(9.0));
        assert_eq!(a.model_type, ModelType::PostGeneration);
    }

    #[test]
    fn test_robustness_data() {
        let data = extract_robustness_data(&models(), "TPR@1%FPR");
        let blur = &data["Blur"];
        assert_eq!(blur.factor_symbol, "σ");
        assert_eq!(blur.noise_name, "Blur");
        let order: Vec<_> = blur.factors.iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(order, vec!["1", "2", "3"]);

        let f1 = blur.factor("1").unwrap();
        assert!((f1["A"].value - 0.9).abs() < 1e-12);
        assert!((f1["A"].std - 0.1414).abs() < 1e-3);
        assert!(!f1.contains_key("B"));
        assert_eq!(blur.factor("2").unwrap()["A"].std, 0.0);
        assert_eq!(blur.factor("3").unwrap()["B"].model_type, ModelType::InGeneration);
    }
}
