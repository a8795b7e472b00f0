//! Enrichment pipeline: load, enrich, write

use std::time::{Duration, Instant};

use crate::config::Config;
use crate::enrich::{EnrichStats, Enricher, PairColumns, extend_header};
use crate::error::PipelineError;
use crate::lookup::DistanceLookup;
use crate::progress::{ProgressContext, fmt_num};
use crate::table::{read_table, write_table};

/// Pipeline execution summary
#[derive(Debug, Clone)]
pub struct Summary {
    /// Data rows, header excluded
    pub rows: usize,
    pub stats: EnrichStats,
    pub bytes_written: usize,
    pub elapsed: Duration,
}

/// Run the pipeline once. The route cache lives only for this call.
///
/// Only I/O and parse failures are errors; lookup failures are counted
/// in [`Summary::stats`].
pub fn run(
    config: &Config,
    lookup: &dyn DistanceLookup,
    progress: &ProgressContext,
) -> Result<Summary, PipelineError> {
    let start = Instant::now();
    let input = config.input_path();
    let output = config.output_path();

    log::debug!("Reading {}", input.display());
    let mut table = read_table(&input)?;
    log::info!("{}: {} rows", input.display(), fmt_num(table.rows.len()));

    let columns = PairColumns::resolve(&table, &config.origin_header, &config.destination_header);
    warn_unresolved("origin", &config.origin_header, columns.origin);
    warn_unresolved("destination", &config.destination_header, columns.destination);

    extend_header(&mut table.header);

    let mut enricher = Enricher::new(lookup);
    let pb = progress.rows_bar(table.rows.len());
    enricher.enrich_rows(columns, &mut table.rows, &pb);
    pb.finish_and_clear();

    let bytes_written = write_table(&table, &output)?;
    log::debug!("Wrote {bytes_written} bytes to {}", output.display());

    let summary = Summary {
        rows: table.rows.len(),
        stats: enricher.stats(),
        bytes_written,
        elapsed: start.elapsed(),
    };
    log_summary(&summary);
    Ok(summary)
}

fn warn_unresolved(side: &str, header: &str, index: Option<usize>) {
    if index.is_none() {
        log::warn!("No {side} column named {header:?}; rows will not be enriched");
    }
}

fn log_summary(summary: &Summary) {
    let s = &summary.stats;
    log::info!(
        "Rows: {} enriched ({} cached, {} lookups), {} skipped, {} failed",
        fmt_num(s.enriched),
        fmt_num(s.cache_hits),
        fmt_num(s.lookups),
        fmt_num(s.skipped),
        fmt_num(s.failed)
    );
    log::info!("Time: {:.1}s", summary.elapsed.as_secs_f64());
    if s.failed > 0 {
        log::warn!("{} rows left without distance (run with --debug for reasons)", s.failed);
    }
}
