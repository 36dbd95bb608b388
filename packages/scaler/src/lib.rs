#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Importance scalers for the personalized walkscore.
//!
//! Each scaler maps one raw cell measurement and the user's importance
//! level for that factor to a multiplicative weight. The response curves are
//! piecewise constant and live as data in [`tables`]; this module only
//! handles input validation and table lookup.
//!
//! Scalers never fail. A missing, negative or `NaN` measurement disables
//! the factor (weight `1.0`), as does importance level 0. Values past the
//! last band, infinity included, take the table's fallback weight.

pub mod curve;
pub mod tables;

use walkscore_models::{Factor, ImportanceLevel};

/// Weight returned when a factor has no influence.
pub const NEUTRAL_WEIGHT: f64 = 1.0;

/// Computes the weight for `factor` given a raw measurement and importance
/// level.
#[must_use]
pub fn scaler_for(factor: Factor, raw: Option<f64>, level: ImportanceLevel) -> f64 {
    let Some(value) = raw.filter(|v| !v.is_nan() && *v >= 0.0) else {
        return NEUTRAL_WEIGHT;
    };
    tables::table(factor, level).weight(value)
}

/// Computes the weight for `factor` from an unvalidated numeric level.
///
/// Levels outside 0-4 return [`NEUTRAL_WEIGHT`].
#[must_use]
pub fn scaler_for_raw_level(factor: Factor, raw: Option<f64>, level: u8) -> f64 {
    ImportanceLevel::from_value(level)
        .map_or(NEUTRAL_WEIGHT, |level| scaler_for(factor, raw, level))
}

/// Terrain slope weight. Steeper cells are penalized.
#[must_use]
pub fn slope_scaler(slope: Option<f64>, level: ImportanceLevel) -> f64 {
    scaler_for(Factor::Slope, slope, level)
}

/// Effective speed limit weight. Faster streets are penalized; very calm
/// streets are rewarded at high importance.
#[must_use]
pub fn speed_limit_scaler(speed_limit: Option<f64>, level: ImportanceLevel) -> f64 {
    scaler_for(Factor::SpeedLimit, speed_limit, level)
}

/// Business density weight. Denser cells are rewarded.
#[must_use]
pub fn business_density_scaler(density: Option<f64>, level: ImportanceLevel) -> f64 {
    scaler_for(Factor::BusinessDensity, density, level)
}

/// Crime density weight. Higher crime is penalized.
#[must_use]
pub fn crime_density_scaler(density: Option<f64>, level: ImportanceLevel) -> f64 {
    scaler_for(Factor::CrimeDensity, density, level)
}

/// Crash density weight. Higher crash density is penalized.
#[must_use]
pub fn crash_density_scaler(density: Option<f64>, level: ImportanceLevel) -> f64 {
    scaler_for(Factor::CrashDensity, density, level)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBES: &[f64] = &[
        0.0, 0.05, 0.1, 0.25, 0.5, 0.7, 1.0, 1.2, 1.5, 2.0, 2.5, 3.0, 4.0, 4.99, 5.0, 5.01, 6.0,
        7.0, 10.0, 12.0, 15.0, 20.0, 24.9, 25.0, 28.0, 30.0, 35.0, 40.0, 45.0, 60.0, 1.0e6,
    ];

    #[test]
    fn level_zero_is_always_neutral() {
        for factor in Factor::ALL {
            for &value in PROBES {
                assert!(
                    (scaler_for(factor, Some(value), ImportanceLevel::NotImportant) - 1.0).abs()
                        < f64::EPSILON,
                    "{factor} at {value} must be neutral at level 0"
                );
            }
        }
    }

    #[test]
    fn invalid_measurements_are_neutral() {
        for factor in Factor::ALL {
            for level in ImportanceLevel::ALL {
                for raw in [None, Some(-0.5), Some(f64::NAN), Some(f64::NEG_INFINITY)] {
                    assert!(
                        (scaler_for(factor, raw, level) - 1.0).abs() < f64::EPSILON,
                        "{factor} level {level} with {raw:?} must be neutral"
                    );
                }
            }
        }
    }

    #[test]
    fn infinite_measurements_take_the_fallback() {
        for factor in Factor::ALL {
            for level in ImportanceLevel::ALL {
                let expected = tables::table(factor, level).fallback;
                assert!(
                    (scaler_for(factor, Some(f64::INFINITY), level) - expected).abs()
                        < f64::EPSILON,
                    "{factor} level {level} at infinity must use the fallback {expected}"
                );
            }
        }
        assert!(slope_scaler(Some(f64::INFINITY), ImportanceLevel::VeryImportant).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_levels_are_neutral() {
        for factor in Factor::ALL {
            for level in [5_u8, 9, 255] {
                assert!(
                    (scaler_for_raw_level(factor, Some(30.0), level) - 1.0).abs() < f64::EPSILON
                );
            }
        }
        assert!(
            (scaler_for_raw_level(Factor::Slope, Some(6.0), 2) - 0.3).abs() < f64::EPSILON
        );
    }

    #[test]
    fn penalty_factors_never_increase() {
        for factor in Factor::ALL.into_iter().filter(|f| !f.is_bonus()) {
            for level in ImportanceLevel::ALL {
                let weights: Vec<f64> = PROBES
                    .iter()
                    .map(|&v| scaler_for(factor, Some(v), level))
                    .collect();
                assert!(
                    weights.windows(2).all(|w| w[1] <= w[0]),
                    "{factor} level {level} is not non-increasing: {weights:?}"
                );
            }
        }
    }

    #[test]
    fn business_density_never_decreases_within_calibrated_domain() {
        for level in ImportanceLevel::ALL {
            let weights: Vec<f64> = PROBES
                .iter()
                .copied()
                .filter(|v| *v <= 5.0)
                .map(|v| business_density_scaler(Some(v), level))
                .collect();
            assert!(
                weights.windows(2).all(|w| w[1] >= w[0]),
                "business density level {level} is not non-decreasing: {weights:?}"
            );
        }
    }

    #[test]
    fn business_density_upper_bound_is_inclusive() {
        assert!((business_density_scaler(Some(5.0), ImportanceLevel::Neutral) - 2.0).abs() < 1e-12);
        assert!((business_density_scaler(Some(5.5), ImportanceLevel::Neutral) - 1.0).abs() < 1e-12);
        assert!(
            business_density_scaler(Some(5.5), ImportanceLevel::VeryImportant).abs() < 1e-12
        );
    }

    #[test]
    fn higher_importance_penalizes_steep_slopes_harder() {
        let slope = Some(8.0);
        let weights: Vec<f64> = ImportanceLevel::ALL
            .iter()
            .map(|&level| slope_scaler(slope, level))
            .collect();
        assert!(
            weights.windows(2).all(|w| w[1] <= w[0]),
            "slope weights should fall with importance: {weights:?}"
        );
    }

    #[test]
    fn tabulated_values() {
        let cases = [
            (slope_scaler(Some(1.9), ImportanceLevel::VeryImportant), 1.0),
            (slope_scaler(Some(2.0), ImportanceLevel::VeryImportant), 0.5),
            (slope_scaler(Some(30.0), ImportanceLevel::Slightly), 0.25),
            (speed_limit_scaler(Some(10.0), ImportanceLevel::VeryImportant), 1.5),
            (speed_limit_scaler(Some(28.0), ImportanceLevel::Neutral), 0.75),
            (speed_limit_scaler(Some(42.0), ImportanceLevel::Slightly), 0.3),
            (business_density_scaler(Some(1.2), ImportanceLevel::Neutral), 1.5),
            (business_density_scaler(Some(0.2), ImportanceLevel::Important), 0.5),
            (crime_density_scaler(Some(0.1), ImportanceLevel::Important), 1.25),
            (crime_density_scaler(Some(0.6), ImportanceLevel::Neutral), 0.95),
            (crash_density_scaler(Some(0.05), ImportanceLevel::VeryImportant), 2.0),
            (crash_density_scaler(Some(0.6), ImportanceLevel::Neutral), 0.90),
            (crash_density_scaler(Some(4.0), ImportanceLevel::Important), 0.25),
        ];
        for (i, (actual, expected)) in cases.into_iter().enumerate() {
            assert!(
                (actual - expected).abs() < 1e-12,
                "case {i}: expected {expected}, got {actual}"
            );
        }
    }
}
