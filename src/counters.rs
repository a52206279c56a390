//! Entry counters
//!
//! Recorded through the `metrics` facade; nothing is exported unless the
//! application installs a recorder.

use crate::level::Level;

/// Counter metric types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterMetric {
    /// Entries encoded and written to the sink
    EntriesWritten,
    /// Entries that failed to encode or write
    WriteErrors,
}

impl CounterMetric {
    pub fn name(self) -> &'static str {
        match self {
            CounterMetric::EntriesWritten => "orbit_log_entries_total",
            CounterMetric::WriteErrors => "orbit_log_write_errors_total",
        }
    }
}

/// Increment a counter, labelled by entry level
pub fn increment(metric: CounterMetric, level: Level) {
    metrics::counter!(metric.name(), "level" => level.as_str()).increment(1);
}
