//! Scoring session with a shared normalization range.
//!
//! This module provides [`ScoreSession`], the main entry point for scoring a
//! dataset. The session computes the PSNR normalization range once, so every
//! chart of one pass is scored against the same range.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::quality::{self, MultiValueMetrics};
use crate::scoring::{
    self, AucScores, CurveData, EffectivenessScores, PairScores, PsnrRange, RangePolicy,
    RankingScores,
};

/// Configuration for a scoring session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Normalization policy for AUC and attack effectiveness.
    pub range_policy: RangePolicy,
}

impl ScoringConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ScoringConfigBuilder {
        ScoringConfigBuilder::default()
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the fallback range is usable.
    pub fn validate(&self) -> Result<()> {
        let fallback = self.range_policy.fallback;
        if fallback.is_degenerate() {
            return Err(Error::InvalidRange {
                min: fallback.min,
                max: fallback.max,
            });
        }
        Ok(())
    }
}

/// Builder for [`ScoringConfig`].
#[derive(Debug, Default)]
pub struct ScoringConfigBuilder {
    assumed_no_attack_psnr: Option<f64>,
    margin: Option<f64>,
    fallback: Option<PsnrRange>,
}

impl ScoringConfigBuilder {
    /// Set the PSNR assumed for an undistorted image.
    #[must_use]
    pub fn assumed_no_attack_psnr(mut self, psnr: f64) -> Self {
        self.assumed_no_attack_psnr = Some(psnr);
        self
    }

    /// Set the headroom above the observed maximum PSNR.
    #[must_use]
    pub fn margin(mut self, margin: f64) -> Self {
        self.margin = Some(margin);
        self
    }

    /// Set the range used when no usable PSNR range exists.
    #[must_use]
    pub fn fallback_range(mut self, min: f64, max: f64) -> Self {
        self.fallback = Some(PsnrRange::new(min, max));
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<ScoringConfig> {
        let defaults = RangePolicy::default();
        let config = ScoringConfig {
            range_policy: RangePolicy {
                assumed_no_attack_psnr: self
                    .assumed_no_attack_psnr
                    .unwrap_or(defaults.assumed_no_attack_psnr),
                margin: self.margin.unwrap_or(defaults.margin),
                fallback: self.fallback.unwrap_or(defaults.fallback),
            },
        };
        config.validate()?;
        Ok(config)
    }
}

/// Scoring session over one dataset snapshot.
///
/// # Example
///
/// ```rust,ignore
/// use watermark_eval::{Dataset, ScoreSession, ScoringConfig};
///
/// let dataset = Dataset::open("data/models")?;
/// let session = ScoreSession::new(&dataset, ScoringConfig::default());
///
/// let auc = session.auc_scores();
/// let points = session.ranking_scores();
/// ```
#[derive(Debug)]
pub struct ScoreSession<'a> {
    dataset: &'a Dataset,
    config: ScoringConfig,
    range: PsnrRange,
}

impl<'a> ScoreSession<'a> {
    /// Create a session and compute its normalization range.
    #[must_use]
    pub fn new(dataset: &'a Dataset, config: ScoringConfig) -> Self {
        let range = config
            .range_policy
            .determine(dataset.models())
            .or_fallback(config.range_policy.fallback);
        log::debug!(
            "Scoring {} model(s) with PSNR range [{:.2}, {:.2}]",
            dataset.len(),
            range.min,
            range.max
        );
        Self { dataset, config, range }
    }

    /// The dataset being scored.
    #[must_use]
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// The session configuration.
    #[must_use]
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Normalization range shared by AUC and attack effectiveness.
    #[must_use]
    pub fn range(&self) -> PsnrRange {
        self.range
    }

    /// Plain observed PSNR range of the R/E scores.
    #[must_use]
    pub fn observed_range(&self) -> Option<PsnrRange> {
        scoring::observed_psnr_range(self.dataset.models())
    }

    /// Robustness curves per model and attack.
    #[must_use]
    pub fn curves(&self) -> CurveData {
        scoring::extract_robustness_curve_data(self.dataset.models())
    }

    /// AUC per model and attack.
    #[must_use]
    pub fn auc_scores(&self) -> AucScores {
        scoring::compute_auc_scores_with_range(self.dataset.models(), self.range)
    }

    /// Borda ranking points per model.
    #[must_use]
    pub fn ranking_scores(&self) -> RankingScores {
        scoring::compute_ranking_based_scores(&self.auc_scores())
    }

    /// AE samples per attack.
    #[must_use]
    pub fn attack_effectiveness(&self) -> EffectivenessScores {
        scoring::compute_attack_effectiveness_with_range(self.dataset.models(), self.range)
    }

    /// R scores per attack and model.
    #[must_use]
    pub fn robustness_scores(&self) -> PairScores {
        scoring::compute_robustness_scores(self.dataset.models())
    }

    /// E scores per attack and model.
    #[must_use]
    pub fn quality_loss_scores(&self) -> PairScores {
        scoring::compute_quality_loss_effectiveness(self.dataset.models())
    }

    /// Replicate samples of the visual-quality metrics.
    #[must_use]
    pub fn visual_quality(&self) -> MultiValueMetrics {
        quality::extract_multi_value_metrics(self.dataset.models())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = r#"[
        {
            "modelname": "A",
            "robustnessresult": {
                "No Attacking": {"factors": {"0": {"TPR@1%FPR": 0.95}}},
                "Blur": {"factors": {
                    "1": {"TPR@1%FPR": 0.9, "visualquality": {"PSNR": 40}},
                    "2": {"TPR@1%FPR": 0.5, "visualquality": {"PSNR": 30}}
                }}
            }
        },
        {
            "modelname": "B",
            "robustnessresult": {
                "No Attacking": {"factors": {"0": {"Extract Accuracy": 100}}},
                "Blur": {"factors": {
                    "1": {"Extract Accuracy": 60, "visualquality": {"PSNR": 42}}
                }}
            }
        }
    ]"#;

    #[test]
    fn test_builder_defaults() {
        let config = ScoringConfig::builder().build().unwrap();
        assert_eq!(config, ScoringConfig::default());
        assert_eq!(config.range_policy.assumed_no_attack_psnr, 60.0);
    }

    #[test]
    fn test_builder_rejects_bad_fallback() {
        let err = ScoringConfig::builder().fallback_range(70.0, 20.0).build().unwrap_err();
        assert!(matches!(err, Error::InvalidRange { .. }));
    }

    #[test]
    fn test_config_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scoring.json");
        std::fs::write(&path, r#"{"range_policy": {"margin": 5.0}}"#).unwrap();
        let config = ScoringConfig::from_json_file(&path).unwrap();
        assert_eq!(config.range_policy.margin, 5.0);
        assert_eq!(config.range_policy.assumed_no_attack_psnr, 60.0);
    }

    #[test]
    fn test_session_shares_range() {
        let dataset = Dataset::from_json_str(DATA).unwrap();
        let session = ScoreSession::new(&dataset, ScoringConfig::default());
        assert_eq!(session.range(), PsnrRange::new(30.0, 60.0));

        let auc = session.auc_scores();
        assert_eq!(auc.len(), 2);
        assert!(auc["A"]["Blur"].is_finite());

        let points = session.ranking_scores();
        assert_eq!(points.values().sum::<usize>(), 3);
    }

    #[test]
    fn test_session_keeps_config_and_reads_visual_quality() {
        let dataset = Dataset::from_json_str(
            r#"[{
                "modelname": "A",
                "testvisualqualitymetrics": ["PSNR"],
                "visualqualityresult": {"PSNR": [40.0, 42.0]}
            }]"#,
        )
        .unwrap();
        let config = ScoringConfig::builder().margin(5.0).build().unwrap();
        let session = ScoreSession::new(&dataset, config.clone());
        assert_eq!(session.config(), &config);
        assert_eq!(session.visual_quality()["PSNR"]["A"], vec![40.0, 42.0]);
    }

    #[test]
    fn test_session_on_empty_dataset() {
        let dataset = Dataset::default();
        let session = ScoreSession::new(&dataset, ScoringConfig::default());
        assert_eq!(session.range(), PsnrRange::FALLBACK);
        assert!(session.curves().is_empty());
        assert!(session.auc_scores().is_empty());
        assert!(session.ranking_scores().is_empty());
        assert!(session.attack_effectiveness().is_empty());
        assert!(session.robustness_scores().is_empty());
        assert!(session.observed_range().is_none());
    }
}
