//! Process-wide logger registration and facade
//!
//! The first successful [`register`] installs a logger for the lifetime of
//! the process; later calls return `Ok(())` and change nothing. The free
//! functions in this module delegate to the installed logger.
//!
//! # Panics
//!
//! Every facade function except [`register`], [`try_logger`] and
//! [`is_registered`] panics if no logger has been registered yet.

use crate::error::Error;
use crate::field::Field;
use crate::level::Level;
use crate::logger::{CheckedEntry, Core, Logger, LoggerOption, Pipeline};
use crate::redirect;
use std::sync::{Mutex, OnceLock, PoisonError};

static REGISTER_LOCK: Mutex<()> = Mutex::new(());
static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Build a logger from `pipeline` and install it, unless one is installed.
///
/// On first installation `tracing` events and `log` records are redirected
/// into the new logger. If the process already has a global subscriber or
/// `log` logger, registration still succeeds and the new logger records a
/// warning for what could not be redirected. A build failure leaves the process unregistered, so
/// the call can be retried.
pub fn register(pipeline: &Pipeline) -> Result<(), Error> {
    let _guard = REGISTER_LOCK
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if GLOBAL.get().is_some() {
        return Ok(());
    }

    let logger = pipeline.logger().map_err(Error::Registration)?;
    if GLOBAL.set(logger.clone()).is_err() {
        return Ok(());
    }

    match redirect::install_tracing(logger.clone()) {
        Ok(()) => {
            if let Err(err) = redirect::install_log() {
                logger.warn(
                    "log: log records not redirected",
                    &[Field::named_error("reason", &err)],
                );
            }
        }
        // A `log` bridge here would feed the other subscriber, not this logger.
        Err(err) => logger.warn(
            "log: tracing events and log records not redirected",
            &[Field::named_error("reason", &err)],
        ),
    }
    Ok(())
}

/// Whether a logger has been installed
pub fn is_registered() -> bool {
    GLOBAL.get().is_some()
}

/// The installed logger, if any
pub fn try_logger() -> Option<&'static Logger> {
    GLOBAL.get()
}

/// The installed logger.
///
/// # Panics
///
/// Panics if [`register`] has not succeeded yet.
#[track_caller]
pub fn logger() -> &'static Logger {
    match GLOBAL.get() {
        Some(logger) => logger,
        None => panic!("orbit_log: no logger registered; call orbit_log::register first"),
    }
}

/// Core of the installed logger
#[track_caller]
pub fn core() -> &'static Core {
    logger().core()
}

#[track_caller]
pub fn debug(msg: &str, fields: &[Field]) {
    logger().debug(msg, fields);
}

#[track_caller]
pub fn info(msg: &str, fields: &[Field]) {
    logger().info(msg, fields);
}

#[track_caller]
pub fn warn(msg: &str, fields: &[Field]) {
    logger().warn(msg, fields);
}

#[track_caller]
pub fn error(msg: &str, fields: &[Field]) {
    logger().error(msg, fields);
}

/// Logs at [`Level::Panic`], then panics
#[track_caller]
pub fn panic(msg: &str, fields: &[Field]) {
    logger().panic(msg, fields);
}

/// Logs at [`Level::Fatal`], then exits the process with status 1
#[track_caller]
pub fn fatal(msg: &str, fields: &[Field]) {
    logger().fatal(msg, fields);
}

#[track_caller]
pub fn check(level: Level, msg: &str) -> Option<CheckedEntry<'static>> {
    logger().check(level, msg)
}

/// A named child of the installed logger
#[track_caller]
pub fn named(name: &str) -> Logger {
    logger().named(name)
}

/// A child of the installed logger with added context
#[track_caller]
pub fn with(fields: &[Field]) -> Logger {
    logger().with(fields)
}

#[track_caller]
pub fn with_options(options: impl IntoIterator<Item = LoggerOption>) -> Logger {
    logger().with_options(options)
}

/// Flush the installed logger's sink. Errors are discarded.
#[track_caller]
pub fn sync() {
    let _ = logger().sync();
}

/// Flushes the installed logger when dropped.
///
/// Returned by the setup helpers; keep it alive for the life of `main`.
#[must_use = "dropping the guard flushes the logger immediately"]
#[derive(Debug)]
pub struct SyncGuard {
    _priv: (),
}

impl SyncGuard {
    pub(crate) fn new() -> Self {
        Self { _priv: () }
    }
}

impl Drop for SyncGuard {
    fn drop(&mut self) {
        if let Some(logger) = GLOBAL.get() {
            let _ = logger.sync();
        }
    }
}
