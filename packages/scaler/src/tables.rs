//! Calibration tables for every `(factor, importance level)` pair.
//!
//! Each table lists bands in ascending order of their upper bound. A raw
//! value takes the weight of the first band that admits it, or the table's
//! fallback weight when no band does. Values are calibration data taken
//! from the offline precalculator and must not be edited without
//! recalibrating the whole model.

use walkscore_models::{Factor, ImportanceLevel};

/// Upper bound of a band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Upper {
    /// Admits values strictly below the bound (half-open band).
    Below(f64),
    /// Admits values up to and including the bound.
    AtMost(f64),
}

impl Upper {
    /// Whether `value` falls under this bound.
    #[must_use]
    pub fn admits(self, value: f64) -> bool {
        match self {
            Self::Below(bound) => value < bound,
            Self::AtMost(bound) => value <= bound,
        }
    }

    /// Returns the numeric bound.
    #[must_use]
    pub const fn bound(self) -> f64 {
        match self {
            Self::Below(bound) | Self::AtMost(bound) => bound,
        }
    }
}

/// One interval of a piecewise-constant response curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Upper bound of the interval. The lower bound is the previous band's
    /// upper bound (or zero for the first band).
    pub upper: Upper,
    /// Weight returned for values inside the interval.
    pub weight: f64,
}

/// A piecewise-constant response curve for one factor at one level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalerTable {
    /// Bands in ascending order of upper bound.
    pub bands: &'static [Band],
    /// Weight for values past the last band.
    pub fallback: f64,
}

impl ScalerTable {
    /// A table that returns `1.0` for every value.
    pub const NEUTRAL: Self = Self {
        bands: &[],
        fallback: 1.0,
    };

    /// Looks up the weight for a raw value.
    #[must_use]
    pub fn weight(&self, value: f64) -> f64 {
        self.bands
            .iter()
            .find(|band| band.upper.admits(value))
            .map_or(self.fallback, |band| band.weight)
    }

    /// Returns every weight this table can produce, in band order followed
    /// by the fallback.
    pub fn weights(&self) -> impl Iterator<Item = f64> + '_ {
        self.bands
            .iter()
            .map(|band| band.weight)
            .chain(std::iter::once(self.fallback))
    }
}

const fn below(bound: f64, weight: f64) -> Band {
    Band {
        upper: Upper::Below(bound),
        weight,
    }
}

const fn at_most(bound: f64, weight: f64) -> Band {
    Band {
        upper: Upper::AtMost(bound),
        weight,
    }
}

/// Terrain slope, in percent grade.
pub static SLOPE: [ScalerTable; 5] = [
    ScalerTable::NEUTRAL,
    ScalerTable {
        bands: &[
            below(2.0, 1.0),
            below(3.0, 1.0),
            below(4.0, 1.0),
            below(5.0, 0.99),
            below(7.0, 0.95),
            below(10.0, 0.9),
            below(15.0, 0.8),
            below(20.0, 0.7),
            below(25.0, 0.5),
        ],
        fallback: 0.25,
    },
    ScalerTable {
        bands: &[
            below(2.0, 1.0),
            below(3.0, 0.9),
            below(4.0, 0.7),
            below(5.0, 0.5),
            below(7.0, 0.3),
            below(10.0, 0.1),
            below(15.0, 0.01),
        ],
        fallback: 0.0,
    },
    ScalerTable {
        bands: &[
            below(2.0, 1.0),
            below(3.0, 1.0),
            below(4.0, 0.5),
            below(5.0, 0.3),
            below(7.0, 0.01),
        ],
        fallback: 0.0,
    },
    ScalerTable {
        bands: &[below(2.0, 1.0), below(3.0, 0.5), below(4.0, 0.1)],
        fallback: 0.0,
    },
];

/// Maximum effective speed limit, in miles per hour.
pub static SPEED_LIMIT: [ScalerTable; 5] = [
    ScalerTable::NEUTRAL,
    ScalerTable {
        bands: &[
            below(15.0, 1.0),
            below(20.0, 1.0),
            below(25.0, 1.0),
            below(30.0, 1.0),
            below(35.0, 1.0),
            below(40.0, 0.6),
            below(45.0, 0.3),
        ],
        fallback: 0.0,
    },
    ScalerTable {
        bands: &[
            below(15.0, 0.95),
            below(20.0, 0.9),
            below(25.0, 0.85),
            below(30.0, 0.75),
            below(35.0, 0.6),
        ],
        fallback: 0.0,
    },
    ScalerTable {
        bands: &[below(15.0, 1.2), below(20.0, 1.0), below(25.0, 0.8)],
        fallback: 0.0,
    },
    ScalerTable {
        bands: &[below(15.0, 1.5), below(20.0, 1.0), below(25.0, 0.9)],
        fallback: 0.0,
    },
];

/// Business density index. The calibrated domain ends at `5.0` inclusive;
/// values beyond it fall back to the lowest-density weight.
pub static BUSINESS_DENSITY: [ScalerTable; 5] = [
    ScalerTable::NEUTRAL,
    ScalerTable {
        bands: &[
            below(0.5, 1.0),
            below(1.0, 1.1),
            below(1.5, 1.25),
            at_most(5.0, 1.5),
        ],
        fallback: 1.0,
    },
    ScalerTable {
        bands: &[
            below(0.5, 1.0),
            below(1.0, 1.25),
            below(1.5, 1.5),
            at_most(5.0, 2.0),
        ],
        fallback: 1.0,
    },
    ScalerTable {
        bands: &[
            below(0.5, 0.5),
            below(1.0, 1.0),
            below(1.5, 1.25),
            at_most(5.0, 2.5),
        ],
        fallback: 0.5,
    },
    ScalerTable {
        bands: &[
            below(0.5, 0.0),
            below(1.0, 1.5),
            below(1.5, 1.75),
            at_most(5.0, 2.5),
        ],
        fallback: 0.0,
    },
];

/// Normalized crime density.
pub static CRIME_DENSITY: [ScalerTable; 5] = [
    ScalerTable::NEUTRAL,
    ScalerTable {
        bands: &[
            below(0.25, 1.0),
            below(0.7, 1.0),
            below(1.5, 0.95),
            below(3.0, 0.90),
        ],
        fallback: 0.85,
    },
    ScalerTable {
        bands: &[
            below(0.25, 1.0),
            below(0.7, 0.95),
            below(1.5, 0.90),
            below(3.0, 0.85),
        ],
        fallback: 0.80,
    },
    ScalerTable {
        bands: &[
            below(0.25, 1.25),
            below(0.7, 1.0),
            below(1.5, 0.25),
            below(3.0, 0.0),
        ],
        fallback: 0.0,
    },
    ScalerTable {
        bands: &[
            below(0.25, 1.5),
            below(0.7, 0.5),
            below(1.5, 0.0),
            below(3.0, 0.0),
        ],
        fallback: 0.0,
    },
];

/// Normalized traffic crash density.
pub static CRASH_DENSITY: [ScalerTable; 5] = [
    ScalerTable::NEUTRAL,
    ScalerTable {
        bands: &[below(0.5, 0.98), below(1.5, 0.95), below(3.0, 0.90)],
        fallback: 0.85,
    },
    ScalerTable {
        bands: &[below(0.5, 0.95), below(1.5, 0.90), below(3.0, 0.85)],
        fallback: 0.80,
    },
    ScalerTable {
        bands: &[below(0.5, 1.0), below(1.5, 0.85), below(3.0, 0.5)],
        fallback: 0.25,
    },
    ScalerTable {
        bands: &[
            below(0.1, 2.0),
            below(0.5, 0.1),
            below(1.0, 0.1),
            below(3.0, 0.0),
        ],
        fallback: 0.0,
    },
];

/// Returns the table for a factor at an importance level.
#[must_use]
pub fn table(factor: Factor, level: ImportanceLevel) -> &'static ScalerTable {
    let tables = match factor {
        Factor::Slope => &SLOPE,
        Factor::SpeedLimit => &SPEED_LIMIT,
        Factor::BusinessDensity => &BUSINESS_DENSITY,
        Factor::CrimeDensity => &CRIME_DENSITY,
        Factor::CrashDensity => &CRASH_DENSITY,
    };
    &tables[level.value() as usize]
}
