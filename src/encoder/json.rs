//! Newline-delimited JSON encoder

use super::{
    render_value, CallerFormat, EncodeError, Encoder, EncoderConfig, EncoderKind,
    ProvisionError, Rendered, ResolvedEncoderConfig, Scalar,
};
use crate::entry::Entry;
use crate::field::Field;
use std::io::Write;

/// Encoder for machine-readable JSON objects.
///
/// Each line is a separate JSON object, making the whole output JSON-ND. This
/// encoder is meant for production, where logs are ingested by aggregation
/// systems.
#[derive(Debug, Clone, Default)]
pub struct Json {
    pub config: EncoderConfig,
    resolved: Option<ResolvedEncoderConfig>,
}

impl Json {
    pub fn new(config: EncoderConfig) -> Self {
        Self {
            config,
            resolved: None,
        }
    }
}

impl Encoder for Json {
    fn kind(&self) -> EncoderKind {
        EncoderKind::Json
    }

    fn provision(&mut self) -> Result<(), ProvisionError> {
        self.config.caller_format = CallerFormat::Full.selector().to_string();
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
        let mut obj = JsonObject::begin(buf);

        if !cfg.level_key.is_empty() {
            obj.scalar(&cfg.level_key, &cfg.level_format.render(entry.level))?;
        }
        if !cfg.time_key.is_empty() {
            obj.scalar(&cfg.time_key, &cfg.time_format.render(entry.time))?;
        }
        if let Some(name) = entry.logger_name.as_deref() {
            if !cfg.name_key.is_empty() {
                obj.scalar(&cfg.name_key, &Scalar::Text(name.into()))?;
            }
        }
        if let Some(caller) = &entry.caller {
            if !cfg.caller_key.is_empty() {
                let rendered = cfg.caller_format.render(caller);
                obj.scalar(&cfg.caller_key, &Scalar::Text(rendered.into()))?;
            }
        }
        if !cfg.message_key.is_empty() {
            obj.scalar(&cfg.message_key, &Scalar::Text(entry.message.as_str().into()))?;
        }
        for field in fields {
            obj.rendered(&field.key, &render_value(&field.value, cfg))?;
        }
        if let Some(stack) = entry.stack.as_deref() {
            if !cfg.stacktrace_key.is_empty() {
                obj.scalar(&cfg.stacktrace_key, &Scalar::Text(stack.into()))?;
            }
        }

        obj.end();
        buf.extend_from_slice(cfg.line_ending.as_bytes());
        Ok(())
    }
}

/// Incremental writer for a single flat JSON object
pub(crate) struct JsonObject<'b> {
    buf: &'b mut Vec<u8>,
    empty: bool,
}

impl<'b> JsonObject<'b> {
    pub(crate) fn begin(buf: &'b mut Vec<u8>) -> Self {
        buf.push(b'{');
        Self { buf, empty: true }
    }

    fn key(&mut self, key: &str) -> Result<(), EncodeError> {
        if !self.empty {
            self.buf.push(b',');
        }
        self.empty = false;
        serde_json::to_writer(&mut *self.buf, key)?;
        self.buf.push(b':');
        Ok(())
    }

    pub(crate) fn scalar(&mut self, key: &str, value: &Scalar<'_>) -> Result<(), EncodeError> {
        self.key(key)?;
        write_scalar(self.buf, value)
    }

    pub(crate) fn rendered(&mut self, key: &str, value: &Rendered<'_>) -> Result<(), EncodeError> {
        match value {
            Rendered::Scalar(scalar) => self.scalar(key, scalar),
            Rendered::Json(json) => {
                self.key(key)?;
                serde_json::to_writer(&mut *self.buf, json)?;
                Ok(())
            }
        }
    }

    pub(crate) fn end(self) {
        self.buf.push(b'}');
    }
}

fn write_scalar(buf: &mut Vec<u8>, value: &Scalar<'_>) -> Result<(), EncodeError> {
    match value {
        Scalar::Text(s) => serde_json::to_writer(&mut *buf, s.as_ref())?,
        Scalar::Int(v) => write!(buf, "{v}")?,
        Scalar::Uint(v) => write!(buf, "{v}")?,
        Scalar::Bool(v) => write!(buf, "{v}")?,
        Scalar::Float(v) if v.is_finite() => serde_json::to_writer(&mut *buf, v)?,
        // JSON has no NaN or infinity literals
        Scalar::Float(v) => serde_json::to_writer(&mut *buf, &v.to_string())?,
    }
    Ok(())
}
