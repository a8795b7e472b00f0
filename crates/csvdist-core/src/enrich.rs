//! Per-row enrichment with a run-scoped cache of origin/destination pairs

use std::collections::HashMap;

use indicatif::ProgressBar;

use crate::lookup::{DistanceLookup, RouteMeasurement};
use crate::table::Table;

pub const DISTANCE_COLUMN: &str = "Distance (Miles)";
pub const DURATION_COLUMN: &str = "Duration (Minutes)";

const METERS_PER_MILE: f64 = 1609.34;
const SECONDS_PER_MINUTE: f64 = 60.0;

/// Converted values appended to an enriched row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSummary {
    /// Miles, always two decimals
    pub distance_miles: String,
    pub duration_minutes: i64,
}

impl From<RouteMeasurement> for RouteSummary {
    fn from(m: RouteMeasurement) -> Self {
        Self {
            distance_miles: format!("{:.2}", m.distance_meters / METERS_PER_MILE),
            duration_minutes: (m.duration_seconds / SECONDS_PER_MINUTE).round() as i64,
        }
    }
}

impl RouteSummary {
    fn append_to(&self, row: &mut Vec<String>) {
        row.push(self.distance_miles.clone());
        row.push(self.duration_minutes.to_string());
    }
}

/// Exact, case-sensitive origin/destination pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupKey {
    pub origin: String,
    pub destination: String,
}

/// Successful lookups for the current run. Failures are not stored.
pub type RouteCache = HashMap<LookupKey, RouteSummary>;

/// Per-run data quality counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichStats {
    /// Rows that received distance and duration
    pub enriched: usize,
    /// Enriched rows served from the cache
    pub cache_hits: usize,
    /// Lookups issued (cache misses)
    pub lookups: usize,
    /// Rows without an origin or destination value
    pub skipped: usize,
    /// Rows whose lookup failed
    pub failed: usize,
}

/// Column positions of the origin and destination values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairColumns {
    pub origin: Option<usize>,
    pub destination: Option<usize>,
}

impl PairColumns {
    pub fn resolve(table: &Table, origin_header: &str, destination_header: &str) -> Self {
        Self {
            origin: table.column_index(origin_header),
            destination: table.column_index(destination_header),
        }
    }

    /// Both values of `row`, or `None` if either is absent or empty.
    fn extract<'a>(&self, row: &'a [String]) -> Option<(&'a str, &'a str)> {
        let cell = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i))
                .map(String::as_str)
                .filter(|v| !v.is_empty())
        };
        Some((cell(self.origin)?, cell(self.destination)?))
    }
}

/// Sequential enricher owning the run's cache.
pub struct Enricher<L> {
    lookup: L,
    cache: RouteCache,
    stats: EnrichStats,
}

impl<L: DistanceLookup> Enricher<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            cache: RouteCache::new(),
            stats: EnrichStats::default(),
        }
    }

    /// Enrich one row in place. Never fails; outcomes go to the stats.
    pub fn enrich_row(&mut self, columns: PairColumns, row: &mut Vec<String>) {
        let Some((origin, destination)) = columns.extract(row) else {
            self.stats.skipped += 1;
            return;
        };
        let key = LookupKey {
            origin: origin.to_string(),
            destination: destination.to_string(),
        };

        if let Some(cached) = self.cache.get(&key) {
            cached.append_to(row);
            self.stats.cache_hits += 1;
            self.stats.enriched += 1;
            return;
        }

        self.stats.lookups += 1;
        match self.lookup.lookup(&key.origin, &key.destination) {
            Ok(measurement) => {
                let summary = RouteSummary::from(measurement);
                summary.append_to(row);
                self.cache.insert(key, summary);
                self.stats.enriched += 1;
            }
            Err(e) => {
                log::debug!("{} -> {}: {e}", key.origin, key.destination);
                self.stats.failed += 1;
            }
        }
    }

    /// Enrich every row in order, ticking `pb` once per row.
    pub fn enrich_rows(&mut self, columns: PairColumns, rows: &mut [Vec<String>], pb: &ProgressBar) {
        for row in rows.iter_mut() {
            self.enrich_row(columns, row);
            pb.inc(1);
        }
    }

    pub fn stats(&self) -> EnrichStats {
        self.stats
    }

    pub fn cache(&self) -> &RouteCache {
        &self.cache
    }
}

/// Append the two result columns to the header.
pub fn extend_header(header: &mut Vec<String>) {
    header.push(DISTANCE_COLUMN.to_string());
    header.push(DURATION_COLUMN.to_string());
}
