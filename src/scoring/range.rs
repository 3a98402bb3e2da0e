//! Global PSNR normalization range.
//!
//! Two range policies exist and must not be mixed:
//!
//! - [`RangePolicy::determine`] feeds AUC and attack-effectiveness scoring. It
//!   stretches the observed range so the no-attack anchor fits inside it.
//! - [`observed_psnr_range`] is the plain min/max used by the R/E scores.

use serde::{Deserialize, Serialize};

use crate::dataset::{ModelResult, NO_ATTACK};
use crate::stats;

/// Closed PSNR interval used to map PSNR onto [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PsnrRange {
    /// Lower bound (dB).
    pub min: f64,
    /// Upper bound (dB).
    pub max: f64,
}

impl PsnrRange {
    /// Range used when a dataset has no PSNR data at all.
    pub const FALLBACK: Self = Self { min: 20.0, max: 70.0 };

    /// Create a range.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether the range is empty, inverted or non-finite.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.min.is_finite() && self.max.is_finite() && self.max > self.min)
    }

    /// Map a PSNR onto [0, 1], clamping values outside the range.
    ///
    /// A degenerate range maps everything to 0.
    #[must_use]
    pub fn normalize(&self, psnr: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        ((psnr - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    /// Substitute `fallback` for a degenerate range.
    #[must_use]
    pub fn or_fallback(self, fallback: Self) -> Self {
        if self.is_degenerate() {
            log::error!(
                "Invalid PSNR range [{}, {}], using fallback [{}, {}]",
                self.min,
                self.max,
                fallback.min,
                fallback.max
            );
            fallback
        } else {
            self
        }
    }
}

impl Default for PsnrRange {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Constants of the AUC normalization policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangePolicy {
    /// PSNR assumed for an undistorted image; the range always reaches it.
    pub assumed_no_attack_psnr: f64,
    /// Headroom added above the observed maximum when it exceeds the assumption.
    pub margin: f64,
    /// Range used when there is no PSNR data, or the computed range is degenerate.
    pub fallback: PsnrRange,
}

impl Default for RangePolicy {
    fn default() -> Self {
        Self {
            assumed_no_attack_psnr: 60.0,
            margin: 10.0,
            fallback: PsnrRange::FALLBACK,
        }
    }
}

impl RangePolicy {
    /// Compute the normalization range for a dataset snapshot.
    ///
    /// Scans the PSNR of every factor sample of every attack, the no-attack
    /// baseline included. With no PSNR data the fallback range is returned.
    /// Otherwise `min` is the observed minimum and `max` is the assumed
    /// no-attack PSNR if the observed maximum is below it, or the observed
    /// maximum plus the margin.
    #[must_use]
    pub fn determine(&self, models: &[ModelResult]) -> PsnrRange {
        let values = collect_psnr(models, true);
        let Some((min, max)) = stats::min_max(&values) else {
            log::warn!(
                "No PSNR data found, using default range [{}, {}]",
                self.fallback.min,
                self.fallback.max
            );
            return self.fallback;
        };

        let max = if max < self.assumed_no_attack_psnr {
            self.assumed_no_attack_psnr
        } else {
            max + self.margin
        };

        PsnrRange::new(min, max)
    }
}

/// Normalization range for AUC scoring under the default policy.
#[must_use]
pub fn determine_global_psnr_range(models: &[ModelResult]) -> PsnrRange {
    RangePolicy::default().determine(models)
}

/// True min/max PSNR over all attacks except the no-attack baseline.
///
/// This is the range of the R/E scores. Returns `None` with no PSNR data.
#[must_use]
pub fn observed_psnr_range(models: &[ModelResult]) -> Option<PsnrRange> {
    let values = collect_psnr(models, false);
    stats::min_max(&values).map(|(min, max)| PsnrRange::new(min, max))
}

/// Mean PSNR of every factor sample that has one.
fn collect_psnr(models: &[ModelResult], include_baseline: bool) -> Vec<f64> {
    models
        .iter()
        .flat_map(|m| m.robustness_result.iter())
        .filter(|(name, _)| include_baseline || name != NO_ATTACK)
        .flat_map(|(_, attack)| attack.samples())
        .filter_map(|sample| sample.psnr())
        .collect()
}
