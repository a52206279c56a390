//! Logger core: encoder, level gate and sink

use super::Output;
use crate::counters::{self, CounterMetric};
use crate::encoder::{EncodeError, Encoder};
use crate::entry::Entry;
use crate::field::Field;
use crate::level::Level;
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Failure while writing one entry to the sink
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("encode: {0}")]
    Encode(#[from] EncodeError),
    #[error("write: {0}")]
    Io(#[from] io::Error),
}

/// The format → filter → write stage of a logger.
///
/// Immutable once built; derived cores share the encoder and sink.
#[derive(Debug, Clone)]
pub struct Core {
    encoder: Arc<dyn Encoder>,
    output: Output,
    level: Level,
    context: Vec<Field>,
}

impl Core {
    pub fn new(encoder: Arc<dyn Encoder>, output: Output, level: Level) -> Self {
        Self {
            encoder,
            output,
            level,
            context: Vec::new(),
        }
    }

    /// Minimum level this core emits
    pub fn level(&self) -> Level {
        self.level
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level
    }

    pub fn encoder(&self) -> &dyn Encoder {
        self.encoder.as_ref()
    }

    /// Fields added to every entry written through this core
    pub fn context(&self) -> &[Field] {
        &self.context
    }

    /// A core with additional context fields
    pub fn with(&self, fields: &[Field]) -> Self {
        let mut core = self.clone();
        core.context.extend_from_slice(fields);
        core
    }

    /// A core whose level is at least `level`; levels are never lowered
    pub fn increase_level(&self, level: Level) -> Self {
        let mut core = self.clone();
        core.level = core.level.max(level);
        core
    }

    /// Encode and write an entry, ignoring the level gate.
    ///
    /// Entries above [`Level::Error`] flush the sink before returning.
    pub fn write(&self, entry: &Entry, fields: &[Field]) -> Result<(), WriteError> {
        let all: Vec<&Field> = self.context.iter().chain(fields).collect();
        let mut buf = Vec::with_capacity(256);
        self.encoder.encode_entry(entry, &all, &mut buf)?;
        self.output.write_all(&buf)?;
        if entry.level > Level::Error {
            self.output.sync()?;
        }
        counters::increment(CounterMetric::EntriesWritten, entry.level);
        Ok(())
    }

    pub fn sync(&self) -> io::Result<()> {
        self.output.sync()
    }
}
