#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Neighborhood-level aggregation of personalized walkscores.
//!
//! Groups rank-scaled cell scores by neighborhood, divides by a power of
//! the neighborhood area, rank-normalizes across neighborhoods, and
//! extracts the top-K list shown to users. Neighborhood centroids are
//! derived from boundary geometry when the input does not carry them.

pub mod aggregate;
pub mod centroid;
pub mod pipeline;
pub mod top;

pub use aggregate::aggregate;
pub use pipeline::{ScoringOutcome, evaluate, personalize};
pub use top::top_neighborhoods;
