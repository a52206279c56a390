//! Executable loggers
//!
//! A [`Logger`] wraps a [`Core`] with the per-call behavior: call-site
//! capture, stacktraces, naming and what happens after panic/fatal entries.
//!
//! Every entry point is `#[track_caller]`, so the recorded call site is the
//! first frame outside this crate no matter how many facade layers the call
//! passed through. Loggers derived with [`Logger::with`] or [`Logger::named`]
//! report their own call sites the same way.

mod core;
mod options;
mod output;
mod pipeline;

pub use self::core::{Core, WriteError};
pub use options::{Clock, DefaultTermination, LoggerOption, SystemClock, TerminationHook};
pub use output::Output;
pub use pipeline::{Pipeline, PipelineConfig};

use crate::counters::{self, CounterMetric};
use crate::entry::{Caller, Entry};
use crate::field::Field;
use crate::level::Level;
use chrono::Utc;
use std::backtrace::Backtrace;
use std::fmt;
use std::io::{self, Write};
use std::panic::Location;
use std::sync::Arc;

/// A structured logger. Cheap to clone; safe to share across threads.
#[derive(Clone)]
pub struct Logger {
    core: Arc<Core>,
    name: Option<String>,
    add_caller: bool,
    add_stacktrace: Option<Level>,
    termination: Arc<dyn TerminationHook>,
    clock: Arc<dyn Clock>,
}

impl Logger {
    /// A logger over `core` with no call sites and no stacktraces
    pub fn new(core: Core) -> Self {
        Self {
            core: Arc::new(core),
            name: None,
            add_caller: false,
            add_stacktrace: None,
            termination: Arc::new(DefaultTermination),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn level(&self) -> Level {
        self.core.level()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.core.enabled(level)
    }

    /// Logs a message at [`Level::Debug`], with the given fields and any
    /// fields accumulated on the logger.
    #[track_caller]
    pub fn debug(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Debug, msg, fields, Location::caller());
    }

    #[track_caller]
    pub fn info(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Info, msg, fields, Location::caller());
    }

    #[track_caller]
    pub fn warn(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Warn, msg, fields, Location::caller());
    }

    #[track_caller]
    pub fn error(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Error, msg, fields, Location::caller());
    }

    /// Logs a message at [`Level::Panic`], then runs the termination hook,
    /// which panics by default. The hook runs even if the level is disabled.
    #[track_caller]
    pub fn panic(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Panic, msg, fields, Location::caller());
    }

    /// Logs a message at [`Level::Fatal`], then runs the termination hook,
    /// which exits the process with status 1 by default. The hook runs even
    /// if the level is disabled.
    #[track_caller]
    pub fn fatal(&self, msg: &str, fields: &[Field]) {
        self.log(Level::Fatal, msg, fields, Location::caller());
    }

    /// Returns a [`CheckedEntry`] if logging at `level` is enabled, or if the
    /// level terminates. Lets hot paths skip building fields.
    #[track_caller]
    pub fn check(&self, level: Level, msg: &str) -> Option<CheckedEntry<'_>> {
        self.check_at(level, msg, Some(Caller::from(Location::caller())))
    }

    /// Adds a segment to the logger's name; segments are joined by periods.
    pub fn named(&self, name: &str) -> Logger {
        if name.is_empty() {
            return self.clone();
        }
        let mut logger = self.clone();
        logger.name = Some(match &self.name {
            Some(parent) => format!("{parent}.{name}"),
            None => name.to_string(),
        });
        logger
    }

    /// A child logger with structured context. The parent is unaffected.
    pub fn with(&self, fields: &[Field]) -> Logger {
        if fields.is_empty() {
            return self.clone();
        }
        let mut logger = self.clone();
        logger.core = Arc::new(self.core.with(fields));
        logger
    }

    pub fn with_options(&self, options: impl IntoIterator<Item = LoggerOption>) -> Logger {
        let mut logger = self.clone();
        for option in options {
            match option {
                LoggerOption::AddCaller(enabled) => logger.add_caller = enabled,
                LoggerOption::AddStacktrace(level) => logger.add_stacktrace = Some(level),
                LoggerOption::Fields(fields) => {
                    logger.core = Arc::new(logger.core.with(&fields));
                }
                LoggerOption::IncreaseLevel(level) => {
                    logger.core = Arc::new(logger.core.increase_level(level));
                }
                LoggerOption::Termination(hook) => logger.termination = hook,
                LoggerOption::Clock(clock) => logger.clock = clock,
            }
        }
        logger
    }

    /// Flush the underlying sink
    pub fn sync(&self) -> io::Result<()> {
        self.core.sync()
    }

    fn log(&self, level: Level, msg: &str, fields: &[Field], location: &'static Location<'static>) {
        if let Some(checked) = self.check_at(level, msg, Some(Caller::from(location))) {
            checked.write(fields);
        }
    }

    /// Log with an explicit call site, for entries that did not originate in
    /// a call to this logger.
    pub(crate) fn log_with_caller(
        &self,
        level: Level,
        msg: &str,
        fields: &[Field],
        caller: Option<Caller>,
    ) {
        if let Some(checked) = self.check_at(level, msg, caller) {
            checked.write(fields);
        }
    }

    fn check_at(&self, level: Level, msg: &str, caller: Option<Caller>) -> Option<CheckedEntry<'_>> {
        let emit = self.core.enabled(level);
        if !emit && !level.terminates() {
            return None;
        }

        let stack = match self.add_stacktrace {
            Some(min) if emit && level >= min => Some(Backtrace::force_capture().to_string()),
            _ => None,
        };
        let entry = Entry {
            level,
            time: self.clock.now(),
            logger_name: self.name.clone(),
            message: msg.to_string(),
            caller: caller.filter(|_| self.add_caller),
            stack,
        };
        Some(CheckedEntry {
            logger: self,
            entry,
            emit,
        })
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.core.level())
            .field("encoder", &self.core.encoder().kind())
            .field("add_caller", &self.add_caller)
            .field("add_stacktrace", &self.add_stacktrace)
            .finish_non_exhaustive()
    }
}

/// An entry that passed the level check and is waiting for its fields
pub struct CheckedEntry<'a> {
    logger: &'a Logger,
    entry: Entry,
    emit: bool,
}

impl CheckedEntry<'_> {
    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    /// Write the entry, then terminate if its level demands it.
    ///
    /// Write failures go to stderr; they are never returned to the caller.
    pub fn write(self, fields: &[Field]) {
        if self.emit {
            if let Err(err) = self.logger.core.write(&self.entry, fields) {
                counters::increment(CounterMetric::WriteErrors, self.entry.level);
                let _ = writeln!(
                    io::stderr(),
                    "{} write error: {}",
                    Utc::now().format("%Y-%m-%d %H:%M:%S%.6f UTC"),
                    err
                );
            }
        }
        if self.entry.level.terminates() {
            self.logger.termination.terminate(&self.entry);
        }
    }
}
