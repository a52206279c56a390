//! logfmt encoder: space separated `key=value` tokens

use super::{
    render_value, EncodeError, Encoder, EncoderConfig, EncoderKind, ProvisionError, Rendered,
    ResolvedEncoderConfig,
};
use crate::entry::Entry;
use crate::field::Field;
use std::io::Write;

/// Encoder producing one line of `key=value` tokens per entry.
///
/// Values with spaces, `=`, quotes or control characters are quoted and
/// escaped. This encoder applies no house default of its own.
#[derive(Debug, Clone, Default)]
pub struct Logfmt {
    pub config: EncoderConfig,
    resolved: Option<ResolvedEncoderConfig>,
}

impl Logfmt {
    pub fn new(config: EncoderConfig) -> Self {
        Self {
            config,
            resolved: None,
        }
    }
}

impl Encoder for Logfmt {
    fn kind(&self) -> EncoderKind {
        EncoderKind::Logfmt
    }

    fn provision(&mut self) -> Result<(), ProvisionError> {
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
        let mut line = Tokens { buf, empty: true };

        if !cfg.time_key.is_empty() {
            line.pair(&cfg.time_key, &cfg.time_format.render(entry.time).to_string())?;
        }
        if !cfg.level_key.is_empty() {
            line.pair(&cfg.level_key, &cfg.level_format.render(entry.level).to_string())?;
        }
        if let Some(name) = entry.logger_name.as_deref() {
            if !cfg.name_key.is_empty() {
                line.pair(&cfg.name_key, name)?;
            }
        }
        if let Some(caller) = &entry.caller {
            if !cfg.caller_key.is_empty() {
                line.pair(&cfg.caller_key, &cfg.caller_format.render(caller))?;
            }
        }
        if !cfg.message_key.is_empty() {
            line.pair(&cfg.message_key, &entry.message)?;
        }
        for field in fields {
            let value = match render_value(&field.value, cfg) {
                Rendered::Scalar(scalar) => scalar.to_string(),
                Rendered::Json(json) => serde_json::to_string(json)?,
            };
            line.pair(&field.key, &value)?;
        }
        if let Some(stack) = entry.stack.as_deref() {
            if !cfg.stacktrace_key.is_empty() {
                line.pair(&cfg.stacktrace_key, stack)?;
            }
        }

        line.buf.extend_from_slice(cfg.line_ending.as_bytes());
        Ok(())
    }
}

struct Tokens<'b> {
    buf: &'b mut Vec<u8>,
    empty: bool,
}

impl Tokens<'_> {
    fn pair(&mut self, key: &str, value: &str) -> Result<(), EncodeError> {
        if !self.empty {
            self.buf.push(b' ');
        }
        self.empty = false;

        for c in key.chars() {
            let c = if needs_quoting(c) { '_' } else { c };
            write!(self.buf, "{c}")?;
        }
        self.buf.push(b'=');

        if !value.chars().any(needs_quoting) {
            self.buf.extend_from_slice(value.as_bytes());
            return Ok(());
        }

        self.buf.push(b'"');
        for c in value.chars() {
            match c {
                '"' => self.buf.extend_from_slice(b"\\\""),
                '\\' => self.buf.extend_from_slice(b"\\\\"),
                '\n' => self.buf.extend_from_slice(b"\\n"),
                '\r' => self.buf.extend_from_slice(b"\\r"),
                '\t' => self.buf.extend_from_slice(b"\\t"),
                c if c.is_control() => write!(self.buf, "\\u{:04x}", c as u32)?,
                c => write!(self.buf, "{c}")?,
            }
        }
        self.buf.push(b'"');
        Ok(())
    }
}

fn needs_quoting(c: char) -> bool {
    c == ' ' || c == '=' || c == '"' || c.is_control()
}
