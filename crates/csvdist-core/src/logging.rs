//! Logging setup: env_logger, routed around the row bar on a TTY

use indicatif::MultiProgress;

/// Fixed-width level label so messages line up.
fn level_label(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERROR",
        log::Level::Warn => "WARN ",
        log::Level::Info => "INFO ",
        log::Level::Debug => "DEBUG",
        log::Level::Trace => "TRACE",
    }
}

/// Log line as printed on a TTY: coloured label for warnings and errors.
fn tty_line(level: log::Level, args: &std::fmt::Arguments<'_>) -> String {
    let label = level_label(level);
    match level {
        log::Level::Error => format!("[\x1b[31m{label}\x1b[0m] {args}"),
        log::Level::Warn => format!("[\x1b[33m{label}\x1b[0m] {args}"),
        _ => format!("[{label}] {args}"),
    }
}

/// Default filter when `RUST_LOG` is unset.
fn default_filter(quiet: bool, debug: bool) -> &'static str {
    if debug {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    }
}

/// Logger that hides the row bar while a line is printed.
struct BarLogger {
    filter: env_logger::Logger,
    multi: MultiProgress,
}

impl log::Log for BarLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.filter.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if self.filter.matches(record) {
            let line = tty_line(record.level(), record.args());
            self.multi.suspend(|| eprintln!("{line}"));
        }
    }

    fn flush(&self) {}
}

/// Install the global logger.
///
/// With `multi` (TTY), lines are printed around the progress display;
/// otherwise plain `[LEVEL] message` lines. Fails if a logger is already
/// installed.
pub fn init_logging(
    quiet: bool,
    debug: bool,
    multi: Option<&MultiProgress>,
) -> Result<(), log::SetLoggerError> {
    use std::io::Write;

    let env = env_logger::Env::default().default_filter_or(default_filter(quiet, debug));
    let mut builder = env_logger::Builder::from_env(env);

    let Some(multi) = multi else {
        return builder
            .format(|buf, record| {
                writeln!(buf, "[{}] {}", level_label(record.level()), record.args())
            })
            .try_init();
    };

    let filter = builder.build();
    let max_level = filter.filter();
    log::set_boxed_logger(Box::new(BarLogger {
        filter,
        multi: multi.clone(),
    }))?;
    log::set_max_level(max_level);
    Ok(())
}
