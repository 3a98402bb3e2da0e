//! # watermark-eval
//!
//! Analytics core of a watermark robustness benchmark.
//!
//! The library reads per-model benchmark results (detection rates and image
//! quality under a set of attacks) and turns them into the numbers a
//! leaderboard displays: robustness curves, their normalized AUC, Borda
//! ranking points, and attack-strength indices.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use watermark_eval::{AnalysisReport, Dataset, ScoreSession, ScoringConfig};
//!
//! let dataset = Dataset::open("results/")?;
//! let session = ScoreSession::new(&dataset, ScoringConfig::default());
//!
//! for entry in watermark_eval::scoring::overall_ranking(&session.ranking_scores()) {
//!     println!("{} {} {}", entry.rank, entry.name, entry.score);
//! }
//!
//! AnalysisReport::from_session(&session).write_json("report.json")?;
//! ```
//!
//! ## Modules
//!
//! - [`error`]: Error types for the library
//! - [`dataset`]: Loading and decoding model result documents
//! - [`scoring`]: Range estimation, curves, AUC, ranking and effectiveness
//! - [`quality`]: Visual-quality and per-factor robustness tables
//! - [`eval`]: Scoring session and report generation
//! - [`stats`]: Descriptive statistics

pub mod dataset;
pub mod error;
pub mod eval;
pub mod quality;
pub mod scoring;
pub mod stats;

#[cfg(test)]
mod proptests;

// Re-export commonly used types
pub use dataset::{AttackRecord, Dataset, FactorSample, Measurement, ModelResult, ModelType};
pub use error::{Error, Result};
pub use eval::{AnalysisReport, ScoreSession, ScoringConfig, ScoringConfigBuilder};
pub use scoring::{
    CurvePoint, PsnrRange, RangePolicy, Ranked, compute_attack_effectiveness, compute_auc_scores,
    compute_ranking_based_scores, determine_global_psnr_range, extract_robustness_curve_data,
};
pub use stats::Summary;
