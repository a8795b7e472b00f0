//! csvdist - append distance and duration columns to a CSV
//!
//! Each row's origin/destination pair is looked up with the Google
//! Distance Matrix API; repeated pairs are fetched once per run.

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

mod args;
mod config;

use args::{Cli, normalize_args};
use config::Config;
use csvdist_core::{DistanceMatrixClient, ProgressContext, Summary, fmt_num};

fn main() -> Result<()> {
    // .env may hold GOOGLE_MAPS_API_KEY; a missing file is fine
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse_from(normalize_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    // Logging:
    //   TTY:     warn unless --debug, the row bar shows activity
    //   non-TTY: info unless --debug
    let progress = ProgressContext::new();
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = is_tty && !cli.debug;
    csvdist_core::init_logging(quiet, cli.debug, multi).context("Failed to init logging")?;

    let config = if let Some(path) = &cli.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    let output = cli.output.clone().unwrap_or_else(|| cli.input.clone());
    let run_config = csvdist_core::Config {
        input: cli.input,
        origin_header: cli.origin_header,
        destination_header: cli.destination_header,
        output,
        base_dir: config.base_dir(),
    };
    log::debug!(
        "API URL: {}, API key: {}, base dir: {}",
        config.google.api_url,
        if config.google.api_key.is_some() {
            "configured"
        } else {
            "not set"
        },
        run_config.base_dir.display()
    );

    let client = DistanceMatrixClient::new(&config.google.api_url, config.google.api_key.clone())
        .context("Failed to create HTTP client")?;
    if !client.has_api_key() {
        log::warn!(
            "{} is not set; no rows will be enriched",
            csvdist_core::API_KEY_ENV
        );
    }

    let summary = csvdist_core::run(&run_config, &client, &progress)
        .with_context(|| format!("Failed to enrich {}", run_config.input.display()))?;

    print_summary(&summary, &run_config.output_path());
    Ok(())
}

fn print_summary(summary: &Summary, output: &std::path::Path) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Rows").fg(Color::Cyan),
            Cell::new("Count").fg(Color::Cyan),
        ]);

    let s = &summary.stats;
    table.add_row(vec!["Total", &fmt_num(summary.rows)]);
    table.add_row(vec!["Enriched", &fmt_num(s.enriched)]);
    table.add_row(vec!["  from cache", &fmt_num(s.cache_hits)]);
    table.add_row(vec!["Lookups", &fmt_num(s.lookups)]);
    table.add_row(vec!["Skipped (no pair)", &fmt_num(s.skipped)]);
    table.add_row(vec!["Failed", &fmt_num(s.failed)]);

    eprintln!("\n{table}");
    eprintln!(
        "Wrote {} in {:.1}s",
        output.display(),
        summary.elapsed.as_secs_f64()
    );
}
