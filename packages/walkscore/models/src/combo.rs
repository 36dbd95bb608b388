//! Canonical keys for slider combinations.
//!
//! Precalculated results are persisted in a map keyed by the serialized
//! slider combination, so the serialization must be deterministic: a client
//! reconstructing the same slider tuple has to produce the same key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Sliders;

/// A slider combination used as a lookup key.
///
/// Displays as compact JSON with the axes in canonical order, e.g.
/// `{"slope":2,"streets":2,"amenity":2,"crime":2}`, which is what a browser
/// client produces with `JSON.stringify`. Parsing accepts any axis order and
/// whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComboKey(Sliders);

impl ComboKey {
    /// Creates the key for a slider combination.
    #[must_use]
    pub const fn new(sliders: Sliders) -> Self {
        Self(sliders)
    }

    /// Returns the slider combination this key encodes.
    #[must_use]
    pub const fn sliders(&self) -> Sliders {
        self.0
    }
}

impl From<Sliders> for ComboKey {
    fn from(sliders: Sliders) -> Self {
        Self(sliders)
    }
}

impl fmt::Display for ComboKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [slope, streets, amenity, crime] = self.0.values();
        write!(
            f,
            r#"{{"slope":{slope},"streets":{streets},"amenity":{amenity},"crime":{crime}}}"#
        )
    }
}

impl FromStr for ComboKey {
    type Err = InvalidComboKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str::<Sliders>(s)
            .map(Self)
            .map_err(|e| InvalidComboKeyError {
                key: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl Serialize for ComboKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ComboKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Error returned when a string is not a valid combination key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidComboKeyError {
    /// The rejected key.
    pub key: String,
    /// Why it was rejected.
    pub reason: String,
}

impl fmt::Display for InvalidComboKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid combination key {}: {}", self.key, self.reason)
    }
}

impl std::error::Error for InvalidComboKeyError {}
