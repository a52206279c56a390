//! Routing of `tracing` events and `log` records into a registered logger
//!
//! [`install_tracing`] sets a global `tracing` subscriber whose only output
//! layer forwards each event to a [`Logger`]. [`install_log`] sets the
//! `tracing-log` bridge as the global `log` logger, which turns `log` records
//! into `tracing` events on the same path. Either can fail on its own when
//! the process already has a subscriber or a logger.

use crate::entry::Caller;
use crate::field::Field;
use crate::level::Level;
use crate::logger::Logger;
use std::error::Error as StdError;
use std::fmt;
use tracing::field::{Field as EventField, Visit};
use tracing::{Event, Metadata, Subscriber};
use tracing::subscriber::SetGlobalDefaultError;
use tracing_log::log::SetLoggerError;
use tracing_log::LogTracer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{EnvFilter, Layer};

/// Layer that writes every enabled event through a [`Logger`]
#[derive(Debug, Clone)]
pub struct RedirectLayer {
    logger: Logger,
}

impl RedirectLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

/// Map a `tracing` level onto ours; TRACE folds into [`Level::Debug`]
pub fn level_from_tracing(level: &tracing::Level) -> Level {
    if *level == tracing::Level::ERROR {
        Level::Error
    } else if *level == tracing::Level::WARN {
        Level::Warn
    } else if *level == tracing::Level::INFO {
        Level::Info
    } else {
        Level::Debug
    }
}

impl<S: Subscriber> Layer<S> for RedirectLayer {
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        self.logger.enabled(level_from_tracing(metadata.level()))
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let caller = match (metadata.file(), metadata.line()) {
            (Some(file), Some(line)) => Some(Caller::new(file, line)),
            _ => visitor
                .log_file
                .take()
                .zip(visitor.log_line)
                .map(|(file, line)| Caller::new(file, line)),
        };
        let target = visitor
            .log_target
            .take()
            .unwrap_or_else(|| metadata.target().to_string());

        let mut fields = Vec::with_capacity(visitor.fields.len() + 1);
        fields.push(Field::string("target", target));
        fields.append(&mut visitor.fields);

        self.logger.log_with_caller(
            level_from_tracing(metadata.level()),
            &visitor.message,
            &fields,
            caller,
        );
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    log_target: Option<String>,
    log_file: Option<String>,
    log_line: Option<u32>,
    fields: Vec<Field>,
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &EventField, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "log.target" => self.log_target = Some(value.to_string()),
            "log.file" => self.log_file = Some(value.to_string()),
            "log.module_path" => {}
            name => self.fields.push(Field::string(name, value)),
        }
    }

    fn record_u64(&mut self, field: &EventField, value: u64) {
        match field.name() {
            "log.line" => self.log_line = u32::try_from(value).ok(),
            name => self.fields.push(Field::uint(name, value)),
        }
    }

    fn record_i64(&mut self, field: &EventField, value: i64) {
        self.fields.push(Field::int(field.name(), value));
    }

    fn record_f64(&mut self, field: &EventField, value: f64) {
        self.fields.push(Field::float(field.name(), value));
    }

    fn record_bool(&mut self, field: &EventField, value: bool) {
        self.fields.push(Field::bool(field.name(), value));
    }

    fn record_error(&mut self, field: &EventField, value: &(dyn StdError + 'static)) {
        self.fields.push(Field::named_error(field.name(), value));
    }

    fn record_debug(&mut self, field: &EventField, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            name if name.starts_with("log.") => {}
            name => self.fields.push(Field::string(name, format!("{value:?}"))),
        }
    }
}

/// Directive used when `RUST_LOG` is unset
fn default_directive(level: Level) -> &'static str {
    match level {
        Level::Debug => "debug",
        Level::Info => "info",
        Level::Warn => "warn",
        _ => "error",
    }
}

/// Install `logger` as the destination of `tracing` events.
///
/// Fails if another global subscriber is already set.
pub fn install_tracing(logger: Logger) -> Result<(), SetGlobalDefaultError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(logger.level())));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(RedirectLayer::new(logger));
    tracing::subscriber::set_global_default(subscriber)
}

/// Route `log` records into `tracing`, and from there into whatever
/// [`install_tracing`] installed.
///
/// Fails if another `log` logger is already set.
pub fn install_log() -> Result<(), SetLoggerError> {
    LogTracer::init()
}
