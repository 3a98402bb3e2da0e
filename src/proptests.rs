//! Property tests over randomly generated datasets.

use proptest::prelude::*;
use serde_json::{Map, Value, json};

use crate::dataset::{Dataset, NO_ATTACK};
use crate::scoring::{
    compute_attack_effectiveness, compute_auc_scores, compute_ranking_based_scores,
    determine_global_psnr_range, extract_robustness_curve_data,
};

const ATTACKS: [&str; 3] = ["Blur", "JPEG", "Crop"];

type Factors = Vec<(f64, f64)>;

fn factors() -> impl Strategy<Value = Factors> {
    prop::collection::vec((0.0f64..=1.0, 15.0f64..80.0), 0..5)
}

fn model() -> impl Strategy<Value = (Option<f64>, Vec<Factors>)> {
    (
        prop::option::of(0.0f64..=1.0),
        prop::collection::vec(factors(), ATTACKS.len()),
    )
}

fn dataset() -> impl Strategy<Value = Dataset> {
    prop::collection::vec(model(), 0..6).prop_map(|models| {
        let records: Vec<Value> = models
            .into_iter()
            .enumerate()
            .map(|(i, (baseline, attacks))| model_json(i, baseline, &attacks))
            .collect();
        Dataset::from_value(&Value::Array(records)).expect("generated dataset is an array")
    })
}

fn model_json(index: usize, baseline: Option<f64>, attacks: &[Factors]) -> Value {
    let mut robustness = Map::new();
    if let Some(tpr) = baseline {
        robustness.insert(
            NO_ATTACK.to_string(),
            json!({"factors": {"0": {"TPR@1%FPR": tpr}}}),
        );
    }
    for (name, samples) in ATTACKS.iter().zip(attacks) {
        let factors: Map<String, Value> = samples
            .iter()
            .enumerate()
            .map(|(f, (tpr, psnr))| {
                let sample = json!({"TPR@1%FPR": tpr, "visualquality": {"PSNR": psnr}});
                (f.to_string(), sample)
            })
            .collect();
        robustness.insert((*name).to_string(), json!({"factors": factors}));
    }
    json!({"modelname": format!("model-{index}"), "robustnessresult": robustness})
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_range_reaches_no_attack_psnr(dataset in dataset()) {
        let range = determine_global_psnr_range(dataset.models());
        prop_assert!(range.min <= range.max);
        prop_assert!(range.max >= 60.0);
    }

    #[test]
    fn prop_auc_within_unit_interval(dataset in dataset()) {
        for scores in compute_auc_scores(dataset.models()).values() {
            for auc in scores.values().filter(|v| v.is_finite()) {
                prop_assert!((0.0..=1.0 + 1e-9).contains(auc), "auc {} out of range", auc);
            }
        }
    }

    #[test]
    fn prop_curve_extraction_is_repeatable(dataset in dataset()) {
        let first = extract_robustness_curve_data(dataset.models());
        let second = extract_robustness_curve_data(dataset.models());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_borda_points_total(dataset in dataset()) {
        let auc = compute_auc_scores(dataset.models());
        let expected: usize = ATTACKS
            .iter()
            .map(|attack| {
                let n = auc
                    .values()
                    .filter(|scores| scores.get(*attack).is_some_and(|v| v.is_finite()))
                    .count();
                n * (n + 1) / 2
            })
            .sum();
        let totals = compute_ranking_based_scores(&auc);
        prop_assert_eq!(totals.values().sum::<usize>(), expected);
        prop_assert_eq!(totals.len(), auc.len());
    }

    #[test]
    fn prop_attack_effectiveness_within_unit_interval(dataset in dataset()) {
        for samples in compute_attack_effectiveness(dataset.models()).values() {
            for ae in samples {
                prop_assert!((0.0..=1.0).contains(ae), "ae {} out of range", ae);
            }
        }
    }
}
