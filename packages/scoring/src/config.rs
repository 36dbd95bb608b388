//! Scoring configuration.
//!
//! The defaults are embedded at compile time from `config/default.toml`.
//! Operators override individual keys with their own TOML file; the
//! override table is layered over the embedded one, so missing keys keep
//! the embedded defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ScoringError;
use crate::recalculate::ScoreFormula;

/// Embedded default configuration.
const DEFAULT_TOML: &str = include_str!("../config/default.toml");

/// Tunable constants for a scoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Added to every personalized cell score.
    pub floor: f64,
    /// Lower clamp applied after adding the floor.
    pub minimum: f64,
    /// Exponent applied to neighborhood area before dividing.
    pub area_exponent: f64,
    /// Number of neighborhoods in the top list.
    pub top_k: usize,
    /// Neighborhood names never shown in the top list.
    pub excluded_neighborhoods: Vec<String>,
}

impl Default for ScoringConfig {
    /// Returns the embedded default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML fails to parse. It is a compile-time
    /// constant, so a failure is a development error caught by tests.
    fn default() -> Self {
        Self::parse("").unwrap_or_else(|e| panic!("Failed to parse embedded scoring config: {e}"))
    }
}

impl ScoringConfig {
    /// Parses a TOML override on top of the embedded defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::Toml`] for malformed TOML or unknown keys and
    /// [`ScoringError::InvalidConfig`] for out-of-range values.
    pub fn parse(toml_str: &str) -> Result<Self, ScoringError> {
        let mut table: toml::Table = DEFAULT_TOML.parse()?;
        let overrides: toml::Table = toml_str.parse()?;
        table.extend(overrides);

        let config: Self = toml::Value::Table(table).try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a TOML override file.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::Io`] if the file cannot be read, otherwise
    /// the same errors as [`Self::parse`].
    pub fn from_path(path: &Path) -> Result<Self, ScoringError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::parse(&contents)?;
        log::info!("Loaded scoring config from {}", path.display());
        Ok(config)
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::InvalidConfig`] describing the first bad
    /// value.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if !(self.floor.is_finite() && self.floor > 0.0) {
            return Err(invalid(format!("floor must be positive, got {}", self.floor)));
        }
        if !(self.minimum.is_finite() && self.minimum >= 0.0) {
            return Err(invalid(format!(
                "minimum must be non-negative, got {}",
                self.minimum
            )));
        }
        if !(self.area_exponent.is_finite() && self.area_exponent >= 0.0) {
            return Err(invalid(format!(
                "area_exponent must be non-negative, got {}",
                self.area_exponent
            )));
        }
        if self.top_k == 0 {
            return Err(invalid("top_k must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Returns the per-cell score formula constants.
    #[must_use]
    pub const fn formula(&self) -> ScoreFormula {
        ScoreFormula {
            floor: self.floor,
            minimum: self.minimum,
        }
    }
}

const fn invalid(message: String) -> ScoringError {
    ScoringError::InvalidConfig { message }
}
