//! Scoring session and report generation.
//!
//! - [`session::ScoreSession`]: scores one dataset against a shared range
//! - [`session::ScoringConfig`]: configuration for a session
//! - [`report`]: report types for scoring results

pub mod report;
pub mod session;

pub use report::AnalysisReport;
pub use session::{ScoreSession, ScoringConfig, ScoringConfigBuilder};
