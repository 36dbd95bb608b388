#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared data types for the personalized walkscore pipeline.
//!
//! Defines the importance sliders a user adjusts, the scoring factors they
//! control, the per-cell and per-neighborhood records flowing through the
//! pipeline, and the canonical combination key used to persist
//! precalculated results.

pub mod cell;
pub mod combo;
pub mod de;
pub mod neighborhood;

pub use cell::{CellFeature, CellScalers, ScoreRecord};
pub use combo::{ComboKey, InvalidComboKeyError};
pub use neighborhood::{NeighborhoodRecord, NeighborhoodScore, TopNeighborhood};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How strongly a user wants one factor to influence their score.
///
/// Serialized as its numeric value (0-4) so slider payloads stay compact.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(try_from = "u8", into = "u8")]
#[strum(serialize_all = "snake_case")]
pub enum ImportanceLevel {
    /// Level 0: the factor has no influence at all.
    NotImportant = 0,
    /// Level 1: gentle response curve.
    Slightly = 1,
    /// Level 2: the default importance.
    #[default]
    Neutral = 2,
    /// Level 3: steep response curve.
    Important = 3,
    /// Level 4: the most aggressive response curve.
    VeryImportant = 4,
}

impl ImportanceLevel {
    /// All levels in ascending order.
    pub const ALL: [Self; 5] = [
        Self::NotImportant,
        Self::Slightly,
        Self::Neutral,
        Self::Important,
        Self::VeryImportant,
    ];

    /// Returns the numeric slider value of this level.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a level from a numeric slider value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 0-4.
    pub const fn from_value(value: u8) -> Result<Self, InvalidImportanceError> {
        match value {
            0 => Ok(Self::NotImportant),
            1 => Ok(Self::Slightly),
            2 => Ok(Self::Neutral),
            3 => Ok(Self::Important),
            4 => Ok(Self::VeryImportant),
            _ => Err(InvalidImportanceError { value }),
        }
    }
}

impl TryFrom<u8> for ImportanceLevel {
    type Error = InvalidImportanceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<ImportanceLevel> for u8 {
    fn from(level: ImportanceLevel) -> Self {
        level.value()
    }
}

/// Error returned when a slider value falls outside 0-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidImportanceError {
    /// The rejected slider value.
    pub value: u8,
}

impl std::fmt::Display for InvalidImportanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid importance level {}: expected 0-4", self.value)
    }
}

impl std::error::Error for InvalidImportanceError {}

/// A physical or social factor that scales the baseline walkscore.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Factor {
    /// Terrain grade of the cell.
    Slope,
    /// Highest effective speed limit of nearby streets.
    SpeedLimit,
    /// Density of businesses and amenities.
    BusinessDensity,
    /// Normalized crime density.
    CrimeDensity,
    /// Normalized traffic crash density.
    CrashDensity,
}

impl Factor {
    /// All factors, in the order their scalers are multiplied.
    pub const ALL: [Self; 5] = [
        Self::Slope,
        Self::SpeedLimit,
        Self::BusinessDensity,
        Self::CrimeDensity,
        Self::CrashDensity,
    ];

    /// Whether higher raw values raise the score rather than lower it.
    #[must_use]
    pub const fn is_bonus(self) -> bool {
        matches!(self, Self::BusinessDensity)
    }
}

/// The four importance sliders a user controls.
///
/// Field order is significant: it is the canonical axis order used for
/// combination enumeration and [`ComboKey`] serialization.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Sliders {
    /// Terrain slope importance.
    pub slope: ImportanceLevel,
    /// Calm streets importance (speed limits and crash density).
    pub streets: ImportanceLevel,
    /// Business density importance.
    pub amenity: ImportanceLevel,
    /// Crime density importance.
    pub crime: ImportanceLevel,
}

impl Sliders {
    /// Slider axis names in canonical order.
    pub const AXES: [&'static str; 4] = ["slope", "streets", "amenity", "crime"];

    /// Creates a slider set from explicit levels.
    #[must_use]
    pub const fn new(
        slope: ImportanceLevel,
        streets: ImportanceLevel,
        amenity: ImportanceLevel,
        crime: ImportanceLevel,
    ) -> Self {
        Self {
            slope,
            streets,
            amenity,
            crime,
        }
    }

    /// Sets every slider to the same level.
    #[must_use]
    pub const fn uniform(level: ImportanceLevel) -> Self {
        Self::new(level, level, level, level)
    }

    /// Creates a slider set from raw numeric values.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is not in the range 0-4.
    pub const fn from_values(
        slope: u8,
        streets: u8,
        amenity: u8,
        crime: u8,
    ) -> Result<Self, InvalidImportanceError> {
        let slope = match ImportanceLevel::from_value(slope) {
            Ok(level) => level,
            Err(e) => return Err(e),
        };
        let streets = match ImportanceLevel::from_value(streets) {
            Ok(level) => level,
            Err(e) => return Err(e),
        };
        let amenity = match ImportanceLevel::from_value(amenity) {
            Ok(level) => level,
            Err(e) => return Err(e),
        };
        let crime = match ImportanceLevel::from_value(crime) {
            Ok(level) => level,
            Err(e) => return Err(e),
        };
        Ok(Self::new(slope, streets, amenity, crime))
    }

    /// Returns the slider that drives `factor`.
    ///
    /// The `streets` slider feeds both the speed limit and crash density
    /// scalers.
    #[must_use]
    pub const fn level_for(&self, factor: Factor) -> ImportanceLevel {
        match factor {
            Factor::Slope => self.slope,
            Factor::SpeedLimit | Factor::CrashDensity => self.streets,
            Factor::BusinessDensity => self.amenity,
            Factor::CrimeDensity => self.crime,
        }
    }

    /// Returns the slider values as numbers in canonical axis order.
    #[must_use]
    pub const fn values(&self) -> [u8; 4] {
        [
            self.slope.value(),
            self.streets.value(),
            self.amenity.value(),
            self.crime.value(),
        ]
    }
}
