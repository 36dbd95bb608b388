#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command line entry point for the personalized walkscore toolchain.
//!
//! Every subcommand reads its inputs from disk, so the same binary covers
//! the offline jobs (baseline, precalculation) and ad-hoc scoring of a
//! single slider state.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use walkscore_cli_utils::IndicatifProgress;
use walkscore_models::{Factor, Sliders};
use walkscore_neighborhood::ScoringOutcome;
use walkscore_precalculate::PrecalculatedStore;
use walkscore_scoring::{ScoreDistribution, ScoringConfig};
use walkscore_scoring::baseline::{BaselineFields, BaselineWeights, compute_baseline};

#[derive(Parser)]
#[command(name = "walkscore", about = "Personalized walkscore toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Importance of each factor, from 0 (not important) to 4 (very important).
#[derive(Args, Debug, Clone, Copy)]
struct SliderArgs {
    /// Terrain slope importance
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(0..=4))]
    slope: u8,
    /// Calm streets importance (speed limits and crashes)
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(0..=4))]
    streets: u8,
    /// Business and amenity density importance
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(0..=4))]
    amenity: u8,
    /// Crime density importance
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(0..=4))]
    crime: u8,
}

impl SliderArgs {
    fn sliders(self) -> Result<Sliders, Box<dyn std::error::Error>> {
        Ok(Sliders::from_values(
            self.slope,
            self.streets,
            self.amenity,
            self.crime,
        )?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Score cells and neighborhoods for one slider state
    Score {
        /// Cell feature set with baseline scores and factor attributes
        #[arg(long)]
        cells: PathBuf,
        /// Neighborhood feature set with names and areas
        #[arg(long)]
        neighborhoods: PathBuf,
        #[command(flatten)]
        sliders: SliderArgs,
        /// TOML file overriding the default scoring configuration
        #[arg(long)]
        config: Option<PathBuf>,
        /// Where to write the scored cells, neighborhoods and top list
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Precalculate raw scores for all 625 slider combinations
    Precalculate {
        /// Cell feature set
        #[arg(long, default_value = "walkscores.json")]
        input: PathBuf,
        /// Where to write the precalculated store
        #[arg(long, default_value = "walkscore_combinations.json")]
        output: PathBuf,
        /// TOML file overriding the default scoring configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Score one slider state from a precalculated store
    Lookup {
        /// Store written by `precalculate`
        #[arg(long)]
        store: PathBuf,
        /// Cell feature set the store was computed from
        #[arg(long)]
        cells: PathBuf,
        /// Neighborhood feature set with names and areas
        #[arg(long)]
        neighborhoods: PathBuf,
        #[command(flatten)]
        sliders: SliderArgs,
        /// TOML file overriding the default scoring configuration
        #[arg(long)]
        config: Option<PathBuf>,
        /// Where to write the scored cells, neighborhoods and top list
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Compute the unadjusted walkscore from sidewalk, park and trail area
    Baseline {
        /// Cell feature set with component area attributes
        #[arg(long)]
        input: PathBuf,
        /// Where to write the cells with `unadjusted_walkscore` set
        #[arg(long)]
        output: PathBuf,
        /// Sidewalk area weight
        #[arg(long, default_value = "0.5")]
        sidewalk_weight: f64,
        /// Park area weight
        #[arg(long, default_value = "0.3")]
        park_weight: f64,
        /// Trail area weight
        #[arg(long, default_value = "0.2")]
        trail_weight: f64,
    },
    /// Print the response curve of a factor at every importance level
    Curves {
        /// Factor to sample (e.g. `slope`, `speed_limit`, `crime_density`)
        #[arg(long, value_parser = parse_factor)]
        factor: Factor,
        /// First raw value (defaults to the start of the factor's domain)
        #[arg(long)]
        start: Option<f64>,
        /// Last raw value (defaults to the end of the factor's domain)
        #[arg(long)]
        end: Option<f64>,
        /// Number of evenly spaced samples
        #[arg(long, default_value = "61")]
        samples: usize,
    },
}

fn parse_factor(value: &str) -> Result<Factor, String> {
    value.trim().parse::<Factor>().map_err(|_| {
        let known: Vec<String> = Factor::ALL.iter().map(ToString::to_string).collect();
        format!("unknown factor `{value}`, expected one of: {}", known.join(", "))
    })
}

fn load_config(path: Option<&Path>) -> Result<ScoringConfig, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(path) => ScoringConfig::from_path(path)?,
        None => ScoringConfig::default(),
    })
}

fn report(outcome: &ScoringOutcome, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    for top in &outcome.top {
        log::info!("  {}. {} ({:.3})", top.rank, top.name, top.score);
    }

    let distribution = &outcome.distribution;
    for (label, count) in ScoreDistribution::labels()
        .iter()
        .zip(distribution.bins)
    {
        log::info!("  {label:>5}: {count}");
    }
    if distribution.skipped > 0 {
        log::warn!("{} cells had no usable score", distribution.skipped);
    }

    if let Some(path) = output {
        walkscore_dataset::write_json(path, outcome)?;
        log::info!("Scores written to {}", path.display());
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = walkscore_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            cells,
            neighborhoods,
            sliders,
            config,
            output,
        } => {
            let config = load_config(config.as_deref())?;
            let sliders = sliders.sliders()?;
            let cells = walkscore_dataset::read_cells(&cells)?;
            let neighborhoods = walkscore_dataset::read_neighborhoods(&neighborhoods)?;

            log::info!("Scoring sliders {:?}", sliders.values());
            let outcome =
                walkscore_neighborhood::personalize(&cells, &neighborhoods, sliders, &config);
            report(&outcome, output.as_deref())?;
        }
        Commands::Precalculate {
            input,
            output,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let progress = IndicatifProgress::batch_bar(&multi, "Precalculating combinations");
            let written = walkscore_precalculate::precalculate_file(
                &input,
                &output,
                &config.formula(),
                Some(progress),
            )?;
            log::info!(
                "Walkscore combinations ({written}) saved to {}",
                output.display()
            );
        }
        Commands::Lookup {
            store,
            cells,
            neighborhoods,
            sliders,
            config,
            output,
        } => {
            let config = load_config(config.as_deref())?;
            let sliders = sliders.sliders()?;
            let store = PrecalculatedStore::load(&store)?;
            let cells = walkscore_dataset::read_cells(&cells)?;
            let neighborhoods = walkscore_dataset::read_neighborhoods(&neighborhoods)?;

            let outcome = walkscore_precalculate::serve::evaluate_combination(
                &store,
                sliders,
                &cells,
                &neighborhoods,
                &config,
            )
            .ok_or_else(|| format!("No precalculated scores for sliders {:?}", sliders.values()))?;
            report(&outcome, output.as_deref())?;
        }
        Commands::Baseline {
            input,
            output,
            sidewalk_weight,
            park_weight,
            trail_weight,
        } => {
            let weights = BaselineWeights {
                sidewalk: sidewalk_weight,
                park: park_weight,
                trail: trail_weight,
            };
            let mut cells = walkscore_dataset::read_cells(&input)?;
            compute_baseline(&mut cells, &BaselineFields::default(), &weights)?;
            walkscore_dataset::write_feature_set(&output, &cells)?;
            log::info!(
                "Baseline walkscores for {} cells saved to {}",
                cells.len(),
                output.display()
            );
        }
        Commands::Curves {
            factor,
            start,
            end,
            samples,
        } => {
            let (default_start, default_end) = walkscore_scaler::curve::default_domain(factor);
            let curves = walkscore_scaler::curve::sample_all_levels(
                factor,
                start.unwrap_or(default_start),
                end.unwrap_or(default_end),
                samples,
            );
            println!("{}", serde_json::to_string_pretty(&curves)?);
        }
    }

    Ok(())
}
