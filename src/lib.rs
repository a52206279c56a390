//! orbit-log: process-wide structured logging facade
//!
//! This library provides:
//! - Encoder configuration with house defaults and sparse overrides
//! - Console, JSON and logfmt encoders
//! - Loggers with structured context, call sites and stacktraces
//! - One-time global registration with a free-function facade
//! - Redirection of `tracing` events and `log` records
//! - Command-line flags and TOML settings for selecting the logger
//!
//! ```no_run
//! use orbit_log::{EncoderConfig, EncoderKind, Field, Level, Output, Pipeline, PipelineConfig};
//!
//! let mut encoder = EncoderKind::Json.encoder(EncoderConfig::default());
//! encoder.provision()?;
//! let pipeline = Pipeline::new(PipelineConfig {
//!     encoder: Some(encoder),
//!     level: Level::Info,
//!     output: Some(Output::stderr()),
//! })?;
//! orbit_log::register(&pipeline)?;
//!
//! orbit_log::info("listening", &[Field::uint("port", 8080)]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod counters;
pub mod encoder;
pub mod entry;
mod error;
pub mod field;
pub mod global;
pub mod level;
pub mod logger;
pub mod redirect;

#[cfg(test)]
mod test_util;

pub use encoder::{
    Console, EncodeError, Encoder, EncoderConfig, EncoderKind, Json, Logfmt, ProvisionError,
    ResolvedEncoderConfig,
};
pub use entry::{Caller, Entry};
pub use error::{BuildError, ConfigError, Error};
pub use field::{Field, Value};
pub use global::{
    check, core, debug, error, fatal, info, is_registered, logger, named, panic, register, sync,
    try_logger, warn, with, with_options, SyncGuard,
};
pub use level::{Level, LEVELS};
pub use logger::{CheckedEntry, Logger, LoggerOption, Output, Pipeline, PipelineConfig};
