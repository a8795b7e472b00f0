//! csvdist core - distance/duration enrichment for CSV files
//!
//! Reads a CSV of origin/destination pairs, looks up each unique pair
//! once per run, and writes the table back with `Distance (Miles)` and
//! `Duration (Minutes)` columns appended.
//!
//! # Example
//!
//! ```ignore
//! use csvdist_core::{Config, DistanceMatrixClient, ProgressContext, run};
//!
//! let config = Config::in_place("trips.csv", "From", "To");
//! let client = DistanceMatrixClient::new(csvdist_core::DEFAULT_API_URL, Some(key))?;
//! let summary = run(&config, &client, &ProgressContext::new())?;
//! println!("{} rows enriched", summary.stats.enriched);
//! ```

pub mod config;
pub mod enrich;
pub mod error;
pub mod http;
pub mod logging;
pub mod lookup;
pub mod progress;
pub mod runner;
pub mod table;

// Re-exports
pub use config::{Config, default_base_dir};
pub use enrich::{
    DISTANCE_COLUMN, DURATION_COLUMN, EnrichStats, Enricher, LookupKey, PairColumns, RouteSummary,
};
pub use error::{LookupError, PipelineError};
pub use logging::init_logging;
pub use lookup::{
    API_KEY_ENV, DEFAULT_API_URL, DistanceLookup, DistanceMatrixClient, RouteMeasurement,
};
pub use progress::{ProgressContext, fmt_num};
pub use runner::{Summary, run};
pub use table::Table;
