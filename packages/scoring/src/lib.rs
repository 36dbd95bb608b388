#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-cell personalized walkscore computation.
//!
//! Applies the importance scalers to every fishnet cell, rescales the raw
//! personalized scores onto the 0-5 rank scale, and provides the baseline
//! (unadjusted) walkscore builder, the score histogram, and the scoring
//! configuration shared by the neighborhood and precalculation stages.
//!
//! Everything here is a pure function of its inputs. Data-quality problems
//! on individual cells degrade to neutral defaults; only structural
//! problems (bad configuration, bad baseline weights) produce errors.

pub mod baseline;
pub mod config;
pub mod distribution;
pub mod progress;
pub mod rank;
pub mod recalculate;

pub use config::ScoringConfig;
pub use distribution::ScoreDistribution;
pub use progress::{NullProgress, ProgressCallback, null_progress};
pub use rank::{RANK_SCALE_MAX, rank_normalize, rank_normalize_cells};
pub use recalculate::{ScoreFormula, cell_scalers, personalized_score, recalculate};

use thiserror::Error;

/// Errors that can occur while configuring or preparing a scoring run.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// Reading a configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file is not valid TOML for [`ScoringConfig`].
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what went wrong.
        message: String,
    },

    /// Baseline component weights are unusable.
    #[error("Invalid baseline weights: {message}")]
    InvalidWeights {
        /// Description of what went wrong.
        message: String,
    },
}
