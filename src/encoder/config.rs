//! Sparse encoder configuration and its resolution
//!
//! [`EncoderConfig`] is what users write: any subset of key overrides and
//! format selectors. [`EncoderConfig::resolve`] turns it into a
//! [`ResolvedEncoderConfig`] where every key and formatter is bound. Resolution
//! is pure and has no failure path.

use super::format::{CallerFormat, DurationFormat, LevelFormat, TimeFormat};
use serde::{Deserialize, Serialize};

/// Configuration for a log encoder.
///
/// Key overrides are optional so that an explicitly empty key, which
/// suppresses that element of the entry, is distinct from an unset key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stacktrace_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_ending: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub time_format: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub duration_format: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub level_format: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub caller_format: String,
}

/// Fully bound encoder configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEncoderConfig {
    pub message_key: String,
    pub level_key: String,
    pub time_key: String,
    pub name_key: String,
    pub caller_key: String,
    pub stacktrace_key: String,
    pub line_ending: String,
    pub time_format: TimeFormat,
    pub duration_format: DurationFormat,
    pub level_format: LevelFormat,
    pub caller_format: CallerFormat,
}

impl Default for ResolvedEncoderConfig {
    /// House defaults used under every encoder
    fn default() -> Self {
        Self {
            message_key: "msg".to_string(),
            level_key: "level".to_string(),
            time_key: "ts".to_string(),
            name_key: "logger".to_string(),
            caller_key: "caller".to_string(),
            stacktrace_key: "stacktrace".to_string(),
            line_ending: "\n".to_string(),
            time_format: TimeFormat::default(),
            duration_format: DurationFormat::default(),
            level_format: LevelFormat::default(),
            caller_format: CallerFormat::default(),
        }
    }
}

fn apply_key(target: &mut String, key: &Option<String>) {
    if let Some(key) = key {
        target.clone_from(key);
    }
}

impl EncoderConfig {
    /// Resolve onto the house defaults
    pub fn resolve(&self) -> ResolvedEncoderConfig {
        self.resolve_onto(ResolvedEncoderConfig::default())
    }

    /// Resolve onto the given defaults.
    ///
    /// Keys are taken from `defaults` unless overridden. Formatters always
    /// come from the selectors, whose empty value has its own default.
    pub fn resolve_onto(&self, defaults: ResolvedEncoderConfig) -> ResolvedEncoderConfig {
        let mut cfg = defaults;

        apply_key(&mut cfg.message_key, &self.message_key);
        apply_key(&mut cfg.level_key, &self.level_key);
        apply_key(&mut cfg.time_key, &self.time_key);
        apply_key(&mut cfg.name_key, &self.name_key);
        apply_key(&mut cfg.caller_key, &self.caller_key);
        apply_key(&mut cfg.stacktrace_key, &self.stacktrace_key);
        apply_key(&mut cfg.line_ending, &self.line_ending);

        cfg.time_format = TimeFormat::from(self.time_format.as_str());
        cfg.duration_format = DurationFormat::from(self.duration_format.as_str());
        cfg.level_format = LevelFormat::from(self.level_format.as_str());
        cfg.caller_format = CallerFormat::from(self.caller_format.as_str());

        cfg
    }
}
