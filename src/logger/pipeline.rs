//! Validated logger configuration

use super::{Core, Logger, LoggerOption, Output};
use crate::encoder::Encoder;
use crate::error::{BuildError, ConfigError};
use crate::level::Level;
use std::sync::Arc;

/// Configuration for a [`Pipeline`]
#[derive(Debug, Default)]
pub struct PipelineConfig {
    /// Encoder used to encode log output; should already be provisioned
    pub encoder: Option<Box<dyn Encoder>>,
    /// Level at which logs will be output
    pub level: Level,
    /// Writer that encoded logs are written to
    pub output: Option<Output>,
}

/// An encoder, a level and an output, checked to all be present
#[derive(Debug, Clone)]
pub struct Pipeline {
    encoder: Arc<dyn Encoder>,
    level: Level,
    output: Output,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        let encoder = config.encoder.ok_or(ConfigError::MissingEncoder)?;
        let output = config.output.ok_or(ConfigError::MissingOutput)?;
        Ok(Self {
            encoder: Arc::from(encoder),
            level: config.level,
            output,
        })
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn encoder(&self) -> &dyn Encoder {
        self.encoder.as_ref()
    }

    /// Build the executable logger.
    ///
    /// Call sites are always recorded; stacktraces only for panic and fatal
    /// entries.
    pub fn logger(&self) -> Result<Logger, BuildError> {
        if self.encoder.resolved().is_none() {
            return Err(BuildError::EncoderNotProvisioned(self.encoder.kind()));
        }

        let core = Core::new(Arc::clone(&self.encoder), self.output.clone(), self.level);
        Ok(Logger::new(core).with_options([
            LoggerOption::AddCaller(true),
            LoggerOption::AddStacktrace(Level::Panic),
        ]))
    }
}
