//! Log encoders
//!
//! Three encoder variants share one [`Encoder`] capability: each is built
//! unprovisioned from an [`EncoderConfig`], applies its house default in
//! [`Encoder::provision`], then serializes entries into a byte buffer.
//!
//! | Variant | House default | Output |
//! |---|---|---|
//! | [`Console`] | short caller | tab separated, colored |
//! | [`Json`] | full caller | one JSON object per line |
//! | [`Logfmt`] | none | `key=value` tokens |

mod config;
mod console;
mod format;
mod json;
mod logfmt;
mod types;

pub use config::{EncoderConfig, ResolvedEncoderConfig};
pub use console::Console;
pub use format::{CallerFormat, DurationFormat, LevelFormat, Scalar, TimeFormat};
pub use json::Json;
pub use logfmt::Logfmt;
pub use types::{EncodeError, ProvisionError};

use crate::entry::Entry;
use crate::error::ConfigError;
use crate::field::{Field, Value};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Trait for log encoder implementations
pub trait Encoder: Send + Sync + fmt::Debug {
    /// Which variant this is
    fn kind(&self) -> EncoderKind;

    /// Apply the house default and resolve the configuration.
    ///
    /// Intended to be called once before first use; a second call re-resolves
    /// and replaces the previous result.
    fn provision(&mut self) -> Result<(), ProvisionError>;

    /// The resolved configuration, once provisioned
    fn resolved(&self) -> Option<&ResolvedEncoderConfig>;

    /// Append one encoded entry, including its line ending, to `buf`
    fn encode_entry(
        &self,
        entry: &Entry,
        fields: &[&Field],
        buf: &mut Vec<u8>,
    ) -> Result<(), EncodeError>;
}

/// Encoder variant selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncoderKind {
    /// Tab separated, colored, for humans at a terminal
    Console,
    /// One JSON object per line
    Json,
    /// `key=value` tokens, the default
    #[default]
    Logfmt,
}

/// Encoder names with their associated [`EncoderKind`].
pub const ENCODERS: [(&str, EncoderKind); 3] = [
    ("console", EncoderKind::Console),
    ("json", EncoderKind::Json),
    ("logfmt", EncoderKind::Logfmt),
];

impl EncoderKind {
    /// Name as accepted by [`EncoderKind::from_str`]
    pub fn as_str(self) -> &'static str {
        match self {
            EncoderKind::Console => "console",
            EncoderKind::Json => "json",
            EncoderKind::Logfmt => "logfmt",
        }
    }

    /// Build an unprovisioned encoder of this kind
    pub fn encoder(self, config: EncoderConfig) -> Box<dyn Encoder> {
        match self {
            EncoderKind::Console => Box::new(Console::new(config)),
            EncoderKind::Json => Box::new(Json::new(config)),
            EncoderKind::Logfmt => Box::new(Logfmt::new(config)),
        }
    }
}

impl fmt::Display for EncoderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncoderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ENCODERS
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| ConfigError::UnknownEncoder(s.to_string()))
    }
}

/// A field value after formatting, ready for an encoder to quote
pub(crate) enum Rendered<'a> {
    Scalar(Scalar<'a>),
    Json(&'a serde_json::Value),
}

pub(crate) fn render_value<'a>(value: &'a Value, cfg: &ResolvedEncoderConfig) -> Rendered<'a> {
    let scalar = match value {
        Value::Str(s) | Value::Error(s) => Scalar::Text(Cow::Borrowed(s)),
        Value::Bool(v) => Scalar::Bool(*v),
        Value::Int(v) => Scalar::Int(*v),
        Value::Uint(v) => Scalar::Uint(*v),
        Value::Float(v) => Scalar::Float(*v),
        Value::Duration(d) => cfg.duration_format.render(*d),
        Value::Time(t) => cfg.time_format.render(*t),
        Value::Json(json) => return Rendered::Json(json),
    };
    Rendered::Scalar(scalar)
}
