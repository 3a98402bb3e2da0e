//! Report types for scoring results.
//!
//! An [`AnalysisReport`] bundles every score the dashboard charts consume so
//! it can be written to JSON in one go, with CSV exports for the tables.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset::ModelType;
use crate::error::{Error, Result};
use crate::eval::session::ScoreSession;
use crate::scoring::{
    self, AucScores, PsnrRange, Ranked, RankingScores, average_attack_effectiveness,
    average_pair_scores,
};

/// All scores of one pass over a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// When this report was generated.
    #[serde(with = "chrono_serde")]
    pub generated_at: chrono::DateTime<chrono::Utc>,

    /// Number of models in the dataset.
    pub model_count: usize,

    /// Family of every model.
    pub model_types: BTreeMap<String, ModelType>,

    /// Normalization range used for AUC and attack effectiveness.
    pub psnr_range: PsnrRange,

    /// AUC per model and attack; `None` where there was too little data.
    pub auc_scores: BTreeMap<String, BTreeMap<String, Option<f64>>>,

    /// Borda ranking points per model.
    pub ranking_scores: RankingScores,

    /// Models with points, best first.
    pub overall_ranking: Vec<Ranked<usize>>,

    /// Mean AE per attack, strongest first.
    pub attack_effectiveness: Vec<Ranked<f64>>,

    /// Mean R score per attack.
    pub robustness: Vec<Ranked<f64>>,

    /// Mean E score per attack.
    pub quality_loss_effectiveness: Vec<Ranked<f64>>,
}

impl AnalysisReport {
    /// Compute a report from a session.
    #[must_use]
    pub fn from_session(session: &ScoreSession<'_>) -> Self {
        let dataset = session.dataset();
        let auc_scores = session.auc_scores();
        let ranking_scores = scoring::compute_ranking_based_scores(&auc_scores);

        Self {
            generated_at: chrono::Utc::now(),
            model_count: dataset.len(),
            model_types: dataset
                .models()
                .iter()
                .map(|m| (m.model_name.clone(), m.model_type))
                .collect(),
            psnr_range: session.range(),
            overall_ranking: scoring::overall_ranking(&ranking_scores),
            attack_effectiveness: average_attack_effectiveness(&session.attack_effectiveness()),
            robustness: average_pair_scores(&session.robustness_scores()),
            quality_loss_effectiveness: average_pair_scores(&session.quality_loss_scores()),
            auc_scores: finite_auc(&auc_scores),
            ranking_scores,
        }
    }

    /// Whether the report carries any ranking.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overall_ranking.is_empty() && self.attack_effectiveness.is_empty()
    }

    /// Sorted attack names appearing in the AUC table.
    #[must_use]
    pub fn attack_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .auc_scores
            .values()
            .flat_map(|scores| scores.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Write the overall ranking as CSV (`rank,model,model_type,points`).
    pub fn write_ranking_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for entry in &self.overall_ranking {
            writer.serialize(RankingRow {
                rank: entry.rank,
                model: &entry.name,
                model_type: self
                    .model_types
                    .get(&entry.name)
                    .map_or("Unknown", ModelType::abbreviation),
                points: entry.score,
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write the AUC table as CSV (`model,attack,auc`), one row per pair.
    ///
    /// Pairs without enough data get an empty `auc` field.
    pub fn write_auc_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for (model, scores) in &self.auc_scores {
            for (attack, auc) in scores {
                writer.serialize(AucRow {
                    model,
                    attack,
                    auc: *auc,
                })?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Read a report previously written with [`Self::write_json`].
    pub fn read_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Report(format!("{}: {}", path.display(), e)))
    }
}

fn finite_auc(auc_scores: &AucScores) -> BTreeMap<String, BTreeMap<String, Option<f64>>> {
    auc_scores
        .iter()
        .map(|(model, scores)| {
            let scores = scores
                .iter()
                .map(|(attack, auc)| (attack.clone(), auc.is_finite().then_some(*auc)))
                .collect();
            (model.clone(), scores)
        })
        .collect()
}

#[derive(Serialize)]
struct RankingRow<'a> {
    rank: usize,
    model: &'a str,
    model_type: &'a str,
    points: usize,
}

#[derive(Serialize)]
struct AucRow<'a> {
    model: &'a str,
    attack: &'a str,
    auc: Option<f64>,
}

mod chrono_serde {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        dt.to_rfc3339().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
