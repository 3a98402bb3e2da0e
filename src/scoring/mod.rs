//! Robustness scoring.
//!
//! The pipeline turns raw per-model attack results into comparable numbers:
//!
//! 1. [`range`]: one global PSNR normalization interval per dataset snapshot.
//! 2. [`curve`]: PSNR vs detection points per (model, attack).
//! 3. [`auc`]: trapezoidal area under the normalized curve.
//! 4. [`ranking`]: Borda-count points across attacks.
//! 5. [`effectiveness`]: attack-strength indices (AE, R, E).
//!
//! The `*_with_range` variants take the normalization range as a parameter so
//! a caller can compute it once and share it between scores; see
//! [`crate::eval::ScoreSession`].

pub mod auc;
pub mod curve;
pub mod effectiveness;
pub mod range;
pub mod ranking;

pub use auc::{AucScores, compute_auc_scores, compute_auc_scores_with_range, curve_auc};
pub use curve::{CurveData, CurvePoint, baseline_detection, extract_robustness_curve_data};
pub use effectiveness::{
    EffectivenessScores, PairScores, average_attack_effectiveness, average_pair_scores,
    compute_attack_effectiveness, compute_attack_effectiveness_with_range,
    compute_quality_loss_effectiveness, compute_robustness_scores,
};
pub use range::{PsnrRange, RangePolicy, determine_global_psnr_range, observed_psnr_range};
pub use ranking::{
    Ranked, RankingScores, attack_leaderboard, compute_ranking_based_scores, overall_ranking,
};
