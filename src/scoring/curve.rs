//! Quality-vs-detection curve extraction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::{AttackRecord, ModelResult};

/// One operating point of an attack: distorted-image PSNR and detection rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Mean PSNR of the attacked images (dB).
    pub psnr: f64,
    /// Detection value on the unit interval.
    pub detection: f64,
}

/// Curves keyed by model name, then attack name.
pub type CurveData = BTreeMap<String, BTreeMap<String, Vec<CurvePoint>>>;

/// Extract robustness curves for every model and attack.
///
/// The no-attack baseline is excluded. Models without a `robustnessresult`
/// section get no entry, while an empty section gives an empty map. Attacks
/// without usable samples get an empty curve. Points keep
/// factor order and are not sorted.
#[must_use]
pub fn extract_robustness_curve_data(models: &[ModelResult]) -> CurveData {
    models
        .iter()
        .filter(|m| m.has_robustness())
        .map(|m| (m.model_name.clone(), model_curves(m)))
        .collect()
}

/// Curves of one model, keyed by attack name.
#[must_use]
pub fn model_curves(model: &ModelResult) -> BTreeMap<String, Vec<CurvePoint>> {
    model
        .attacks()
        .map(|(name, attack)| (name.to_string(), attack_curve(attack)))
        .collect()
}

/// Points of one attack: one per factor with both a detection value and a PSNR.
#[must_use]
pub fn attack_curve(attack: &AttackRecord) -> Vec<CurvePoint> {
    attack
        .samples()
        .filter_map(|sample| {
            let detection = sample.detection()?;
            let psnr = sample.psnr()?;
            Some(CurvePoint { psnr, detection })
        })
        .collect()
}

/// Detection value of the undistorted baseline.
///
/// The first baseline factor that reports any detection metric decides; if its
/// value is unusable there is no baseline.
#[must_use]
pub fn baseline_detection(model: &ModelResult) -> Option<f64> {
    model
        .baseline()?
        .samples()
        .find_map(|sample| sample.detection_source())
        .and_then(|source| source.unit_value())
}
