//! Command-line flags for selecting the global logger
//!
//! Applications flatten [`Flags`] into their own clap parser and call
//! [`register_from_flags`] early in `main`:
//!
//! ```no_run
//! use clap::Parser;
//!
//! #[derive(Parser)]
//! struct App {
//!     #[command(flatten)]
//!     log: orbit_log::cli::Flags,
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     let app = App::parse();
//!     let _guard = orbit_log::cli::register_from_flags(&app.log)?;
//!     orbit_log::info("started", &[]);
//!     Ok(())
//! }
//! ```

use crate::encoder::{EncoderConfig, EncoderKind};
use crate::error::Error;
use crate::global::{self, SyncGuard};
use crate::level::Level;
use crate::logger::{Output, Pipeline, PipelineConfig};
use clap::{Args, Parser};
use std::path::PathBuf;

/// Logger selection flags
#[derive(Args, Debug, Clone)]
pub struct Flags {
    /// Log encoder to use
    #[arg(
        long = "log-encoder",
        default_value = "logfmt",
        value_parser = ["console", "json", "logfmt"]
    )]
    pub encoder: String,

    /// Minimum level to log
    #[arg(
        long = "log-level",
        default_value = "info",
        value_parser = ["debug", "info", "warn", "error", "panic", "fatal"]
    )]
    pub level: String,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            encoder: EncoderKind::default().to_string(),
            level: Level::default().to_string(),
        }
    }
}

/// Demo binary arguments
#[derive(Parser, Debug)]
#[command(name = "orbit-log")]
#[command(about = "Emit sample records through the orbit-log facade")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub log: Flags,

    /// Settings file; replaces the log flags when given
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of sample requests to log
    #[arg(long, default_value_t = 3)]
    pub count: u32,
}

/// Register the global logger selected by `flags`, writing to stderr.
///
/// Both names are validated before any encoder is built.
pub fn register_from_flags(flags: &Flags) -> Result<SyncGuard, Error> {
    let level: Level = flags.level.parse()?;
    let kind: EncoderKind = flags.encoder.parse()?;
    register_encoder(kind, EncoderConfig::default(), level, Output::stderr())
}

/// Provision an encoder of `kind`, build a pipeline on `output` and register it
pub fn register_encoder(
    kind: EncoderKind,
    config: EncoderConfig,
    level: Level,
    output: Output,
) -> Result<SyncGuard, Error> {
    let mut encoder = kind.encoder(config);
    encoder.provision().map_err(Error::Provision)?;

    let pipeline = Pipeline::new(PipelineConfig {
        encoder: Some(encoder),
        level,
        output: Some(output),
    })
    .map_err(Error::Configure)?;

    global::register(&pipeline)?;
    Ok(SyncGuard::new())
}
