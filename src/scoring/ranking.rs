//! Cross-attack ranking points.
//!
//! Each attack is scored independently: the models with a finite AUC for it
//! are ranked by AUC, and the i-th of N (0-indexed) earns `N - i` points. Only
//! the ordinal rank counts, so one attack with an extreme AUC spread cannot
//! dominate the total (a Borda count).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::auc::AucScores;
use crate::dataset::NO_ATTACK;

/// Total ranking points keyed by model name.
pub type RankingScores = BTreeMap<String, usize>;

/// One row of a sorted leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranked<T> {
    /// 1-based position.
    pub rank: usize,
    /// Model or attack name.
    pub name: String,
    /// Score the position is based on.
    pub score: T,
}

/// Sum Borda points over all attacks.
///
/// Every model present in `auc_scores` gets an entry, possibly 0. NaN and
/// infinite AUCs mean the model does not take part in that attack. Equal AUCs
/// are ordered by model name.
#[must_use]
pub fn compute_ranking_based_scores(auc_scores: &AucScores) -> RankingScores {
    let mut totals: RankingScores = auc_scores.keys().map(|m| (m.clone(), 0)).collect();

    let attacks: BTreeSet<&str> = auc_scores
        .values()
        .flat_map(|scores| scores.keys().map(String::as_str))
        .filter(|attack| *attack != NO_ATTACK)
        .collect();

    for attack in attacks {
        let ranked = rank_attack(auc_scores, attack);
        let participants = ranked.len();
        for (index, (model, _)) in ranked.into_iter().enumerate() {
            if let Some(total) = totals.get_mut(model) {
                *total += participants - index;
            }
        }
    }

    totals
}

/// Models sorted by total points, highest first.
///
/// Models with zero points are left out. Ties are ordered by model name.
#[must_use]
pub fn overall_ranking(scores: &RankingScores) -> Vec<Ranked<usize>> {
    let mut entries: Vec<(&String, usize)> = scores
        .iter()
        .filter(|(_, points)| **points > 0)
        .map(|(name, points)| (name, *points))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    entries
        .into_iter()
        .enumerate()
        .map(|(i, (name, score))| Ranked {
            rank: i + 1,
            name: name.clone(),
            score,
        })
        .collect()
}

/// Leaderboard of the finite AUCs for a single attack.
#[must_use]
pub fn attack_leaderboard(auc_scores: &AucScores, attack: &str) -> Vec<Ranked<f64>> {
    rank_attack(auc_scores, attack)
        .into_iter()
        .enumerate()
        .map(|(i, (name, score))| Ranked {
            rank: i + 1,
            name: name.to_string(),
            score,
        })
        .collect()
}

/// Models with a finite AUC for `attack`, best first.
fn rank_attack<'a>(auc_scores: &'a AucScores, attack: &str) -> Vec<(&'a str, f64)> {
    let mut ranked: Vec<(&str, f64)> = auc_scores
        .iter()
        .filter_map(|(model, scores)| {
            let auc = *scores.get(attack)?;
            auc.is_finite().then_some((model.as_str(), auc))
        })
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
}
