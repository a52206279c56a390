//! Logger options, clock and termination hooks

use crate::entry::Entry;
use crate::field::Field;
use crate::level::Level;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Source of entry timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Runs after a [`Level::Panic`] or [`Level::Fatal`] entry, whether or not it
/// was emitted.
pub trait TerminationHook: Send + Sync {
    fn terminate(&self, entry: &Entry);
}

/// Panics on [`Level::Panic`], exits with status 1 on [`Level::Fatal`]
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTermination;

impl TerminationHook for DefaultTermination {
    fn terminate(&self, entry: &Entry) {
        match entry.level {
            Level::Fatal => std::process::exit(1),
            _ => panic!("{}", entry.message),
        }
    }
}

/// Options applied by [`Logger::with_options`](super::Logger::with_options)
pub enum LoggerOption {
    /// Record the call site on every entry
    AddCaller(bool),
    /// Capture a stacktrace for entries at or above this level
    AddStacktrace(Level),
    /// Add context fields
    Fields(Vec<Field>),
    /// Raise the minimum level; a lower level is ignored
    IncreaseLevel(Level),
    /// Replace what happens after panic and fatal entries
    Termination(Arc<dyn TerminationHook>),
    Clock(Arc<dyn Clock>),
}
