use std::time::{Duration, Instant};

use log::LevelFilter;
use tracing::Level;

/// Target used for all statement events.
pub(crate) const TARGET: &str = "query";

#[derive(Clone, Debug)]
#[non_exhaustive]
/// Logging configuration for statements.
pub struct LogSettings {
    /// Log level for statements.
    pub statements_level: LevelFilter,
    /// Log level for slow statements.
    pub slow_statements_level: LevelFilter,
    /// Threshold for slow statements.
    pub slow_statements_duration: Duration,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            statements_level: LevelFilter::Debug,
            slow_statements_level: LevelFilter::Warn,
            slow_statements_duration: Duration::from_secs(1),
        }
    }
}

impl LogSettings {
    /// Configure statement logging level.
    pub fn log_statements(&mut self, level: LevelFilter) {
        self.statements_level = level;
    }

    /// Configure slow statement logging level and threshold.
    pub fn log_slow_statements(&mut self, level: LevelFilter, duration: Duration) {
        self.slow_statements_level = level;
        self.slow_statements_duration = duration;
    }

    /// Returns `true` if any logging level is enabled.
    pub fn is_enabled(&self) -> bool {
        self.statements_level != LevelFilter::Off || self.slow_statements_level != LevelFilter::Off
    }

    /// Choose the logging level based on elapsed execution time.
    fn level_for_elapsed(&self, elapsed: Duration) -> LevelFilter {
        if elapsed >= self.slow_statements_duration {
            self.slow_statements_level
        } else {
            self.statements_level
        }
    }
}

fn to_levels(filter: LevelFilter) -> Option<(Level, log::Level)> {
    let tracing_level = match filter {
        LevelFilter::Error => Some(Level::ERROR),
        LevelFilter::Warn => Some(Level::WARN),
        LevelFilter::Info => Some(Level::INFO),
        LevelFilter::Debug => Some(Level::DEBUG),
        LevelFilter::Trace => Some(Level::TRACE),
        LevelFilter::Off => None,
    };

    tracing_level.zip(filter.to_level())
}

// `tracing::event!` and `tracing::enabled!` need the level as a constant, so
// dispatch on it once here.
macro_rules! with_level {
    ($level:expr, enabled) => {
        match $level {
            Level::ERROR => tracing::enabled!(target: TARGET, Level::ERROR),
            Level::WARN => tracing::enabled!(target: TARGET, Level::WARN),
            Level::INFO => tracing::enabled!(target: TARGET, Level::INFO),
            Level::DEBUG => tracing::enabled!(target: TARGET, Level::DEBUG),
            Level::TRACE => tracing::enabled!(target: TARGET, Level::TRACE),
        }
    };
    ($level:expr, event($($field:tt)*)) => {
        match $level {
            Level::ERROR => tracing::event!(target: TARGET, Level::ERROR, $($field)*),
            Level::WARN => tracing::event!(target: TARGET, Level::WARN, $($field)*),
            Level::INFO => tracing::event!(target: TARGET, Level::INFO, $($field)*),
            Level::DEBUG => tracing::event!(target: TARGET, Level::DEBUG, $($field)*),
            Level::TRACE => tracing::event!(target: TARGET, Level::TRACE, $($field)*),
        }
    };
}

/// Tracks execution statistics for one run of a statement and logs them
/// when the run finishes.
#[derive(Debug)]
pub(crate) struct QueryLogger {
    rows_returned: u64,
    rows_affected: u64,
    start: Option<Instant>,
    settings: LogSettings,
}

impl QueryLogger {
    pub(crate) fn new(settings: LogSettings) -> Self {
        Self {
            rows_returned: 0,
            rows_affected: 0,
            start: None,
            settings,
        }
    }

    /// Begin timing a run. A no-op if a run is already in progress.
    pub(crate) fn start(&mut self) {
        if self.start.is_none() {
            self.rows_returned = 0;
            self.rows_affected = 0;
            self.start = Some(Instant::now());
        }
    }

    pub(crate) fn increment_rows_returned(&mut self) {
        self.rows_returned += 1;
    }

    pub(crate) fn increase_rows_affected(&mut self, n: u64) {
        self.rows_affected += n;
    }

    /// Emit a log event for the run in progress, if any, and end it.
    pub(crate) fn finish(&mut self, sql: &str) {
        let Some(start) = self.start.take() else {
            return;
        };
        if !self.settings.is_enabled() {
            return;
        }

        let elapsed = start.elapsed();
        let Some((tracing_level, log_level)) =
            to_levels(self.settings.level_for_elapsed(elapsed))
        else {
            return;
        };

        // The enabled level could be set from either the tracing or the log
        // side, so check both.
        let enabled = log::log_enabled!(target: TARGET, log_level)
            || with_level!(tracing_level, enabled);
        if !enabled {
            return;
        }

        let (summary, formatted) = build_log_payload(sql);
        let rows_affected = self.rows_affected;
        let rows_returned = self.rows_returned;
        with_level!(
            tracing_level,
            event(
                summary = summary.as_str(),
                db.statement = formatted.as_str(),
                rows_affected,
                rows_returned,
                ?elapsed,
            )
        );
    }
}

/// Build the summary line and, for statements that do not fit in it, the
/// pretty-printed SQL.
fn build_log_payload(sql: &str) -> (String, String) {
    let mut summary = parse_query_summary(sql);
    if summary != sql {
        summary.push_str(" …");
        let formatted = sqlformat::format(
            sql,
            &sqlformat::QueryParams::None,
            &sqlformat::FormatOptions::default(),
        );
        (summary, format!("\n\n{formatted}\n"))
    } else {
        (summary, String::new())
    }
}

/// Produce a short summary of a SQL statement for logging.
fn parse_query_summary(sql: &str) -> String {
    sql.split_whitespace()
        .take(4)
        .collect::<Vec<&str>>()
        .join(" ")
}
