//! One-point histogram of personalized scores.

use serde::Serialize;
use walkscore_models::CellFeature;

/// Number of histogram bins: ten one-point bins plus an open-ended top bin.
pub const BIN_COUNT: usize = 11;

/// Counts of scores per one-point bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDistribution {
    /// `bins[i]` counts scores in `[i, i + 1)`; the last bin is `[10, inf)`.
    pub bins: [u64; BIN_COUNT],
    /// Negative or `NaN` scores that were not counted.
    pub skipped: u64,
    /// Smallest counted score.
    pub min: Option<f64>,
    /// Largest counted score.
    pub max: Option<f64>,
}

impl Default for ScoreDistribution {
    fn default() -> Self {
        Self {
            bins: [0; BIN_COUNT],
            skipped: 0,
            min: None,
            max: None,
        }
    }
}

impl ScoreDistribution {
    /// Builds a histogram from raw scores.
    #[must_use]
    pub fn from_scores(scores: impl IntoIterator<Item = f64>) -> Self {
        let mut dist = Self::default();
        for score in scores {
            dist.record(score);
        }
        dist
    }

    /// Builds a histogram from the personalized scores of `cells`.
    ///
    /// Cells without a score are ignored entirely.
    #[must_use]
    pub fn from_cells(cells: &[CellFeature]) -> Self {
        Self::from_scores(cells.iter().filter_map(|c| c.personalized_walkscore))
    }

    /// Adds one score.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn record(&mut self, score: f64) {
        if score.is_nan() || score < 0.0 {
            self.skipped += 1;
            return;
        }

        let bin = score.floor().min((BIN_COUNT - 1) as f64) as usize;
        self.bins[bin] += 1;
        self.min = Some(self.min.map_or(score, |m| m.min(score)));
        self.max = Some(self.max.map_or(score, |m| m.max(score)));
    }

    /// Total number of counted scores.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.bins.iter().sum()
    }

    /// Human-readable label for each bin, e.g. `"3-4"` or `"10+"`.
    #[must_use]
    pub fn labels() -> [String; BIN_COUNT] {
        std::array::from_fn(|i| {
            if i == BIN_COUNT - 1 {
                format!("{i}+")
            } else {
                format!("{i}-{}", i + 1)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bins_by_integer_part() {
        let dist = ScoreDistribution::from_scores([0.0, 0.999, 1.0, 4.5, 9.99, 10.0, 250.0]);
        assert_eq!(dist.bins[0], 2);
        assert_eq!(dist.bins[1], 1);
        assert_eq!(dist.bins[4], 1);
        assert_eq!(dist.bins[9], 1);
        assert_eq!(dist.bins[10], 2);
        assert_eq!(dist.total(), 7);
        assert_eq!(dist.min, Some(0.0));
        assert_eq!(dist.max, Some(250.0));
    }

    #[test]
    fn skips_negative_and_nan() {
        let dist = ScoreDistribution::from_scores([-0.5, f64::NAN, 2.0]);
        assert_eq!(dist.skipped, 2);
        assert_eq!(dist.total(), 1);
    }

    #[test]
    fn empty_has_no_extremes() {
        let dist = ScoreDistribution::from_scores(std::iter::empty());
        assert_eq!(dist.total(), 0);
        assert_eq!(dist.min, None);
        assert_eq!(dist.max, None);
    }

    #[test]
    fn counts_scored_cells_only() {
        let mut cells: Vec<CellFeature> = (0..3).map(CellFeature::new).collect();
        cells[0].personalized_walkscore = Some(5.0);
        cells[2].personalized_walkscore = Some(0.3);
        let dist = ScoreDistribution::from_cells(&cells);
        assert_eq!(dist.total(), 2);
        assert_eq!(dist.skipped, 0);
        assert_eq!(dist.bins[5], 1);
    }

    #[test]
    fn labels_cover_every_bin() {
        let labels = ScoreDistribution::labels();
        assert_eq!(labels[0], "0-1");
        assert_eq!(labels[9], "9-10");
        assert_eq!(labels[10], "10+");
    }
}
