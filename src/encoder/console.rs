//! Human-readable console encoder

use super::json::JsonObject;
use super::{
    render_value, CallerFormat, EncodeError, Encoder, EncoderConfig, EncoderKind,
    ProvisionError, ResolvedEncoderConfig,
};
use crate::entry::Entry;
use crate::field::Field;
use std::fmt::Display;
use std::io::Write;

/// Encoder for human-readable colored console output. Meant for development,
/// where only humans read the output.
///
/// Entry elements are tab separated; structured fields follow as a single
/// JSON object.
#[derive(Debug, Clone, Default)]
pub struct Console {
    pub config: EncoderConfig,
    resolved: Option<ResolvedEncoderConfig>,
}

impl Console {
    pub fn new(config: EncoderConfig) -> Self {
        Self {
            config,
            resolved: None,
        }
    }
}

impl Encoder for Console {
    fn kind(&self) -> EncoderKind {
        EncoderKind::Console
    }

    fn provision(&mut self) -> Result<(), ProvisionError> {
        self.config.caller_format = CallerFormat::Short.selector().to_string();
        self.resolved = Some(self.config.resolve());
        Ok(())
    }

    fn resolved(&self) -> Option<&ResolvedEncoderConfig> {
        self.resolved.as_ref()
    }

    fn encode_entry(
        &self,
        entry: &Entry,
        fields: &[&Field],
        buf: &mut Vec<u8>,
    ) -> Result<(), EncodeError> {
        let cfg = self.resolved.as_ref().ok_or(EncodeError::NotProvisioned)?;
        let mut line = Line { buf, empty: true };

        if !cfg.time_key.is_empty() {
            line.element(cfg.time_format.render(entry.time))?;
        }
        if !cfg.level_key.is_empty() {
            line.element(cfg.level_format.render(entry.level))?;
        }
        if let Some(name) = entry.logger_name.as_deref() {
            if !cfg.name_key.is_empty() {
                line.element(name)?;
            }
        }
        if let Some(caller) = &entry.caller {
            if !cfg.caller_key.is_empty() {
                line.element(cfg.caller_format.render(caller))?;
            }
        }
        if !cfg.message_key.is_empty() {
            line.element(&entry.message)?;
        }

        if !fields.is_empty() {
            line.separator();
            let mut obj = JsonObject::begin(line.buf);
            for field in fields {
                obj.rendered(&field.key, &render_value(&field.value, cfg))?;
            }
            obj.end();
        }

        if let Some(stack) = entry.stack.as_deref() {
            if !cfg.stacktrace_key.is_empty() {
                line.buf.push(b'\n');
                line.buf.extend_from_slice(stack.as_bytes());
            }
        }

        line.buf.extend_from_slice(cfg.line_ending.as_bytes());
        Ok(())
    }
}

struct Line<'b> {
    buf: &'b mut Vec<u8>,
    empty: bool,
}

impl Line<'_> {
    fn separator(&mut self) {
        if !self.empty {
            self.buf.push(b'\t');
        }
        self.empty = false;
    }

    fn element(&mut self, value: impl Display) -> Result<(), EncodeError> {
        self.separator();
        write!(self.buf, "{value}")?;
        Ok(())
    }
}
