//! Logging priorities

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A logging priority, higher levels are more important.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Debug logs are typically voluminous, and are usually disabled in
    /// production.
    Debug,
    /// Info is the default logging priority.
    #[default]
    Info,
    /// Warn logs are more important than Info, but don't need individual
    /// human review.
    Warn,
    /// Error logs are high-priority; if an application is running smoothly,
    /// it shouldn't generate any error-level logs.
    Error,
    /// Panic logs a message, then panics.
    Panic,
    /// Fatal logs a message, then exits the process with status 1.
    Fatal,
}

/// Level names with their associated [`Level`].
pub const LEVELS: [(&str, Level); 6] = [
    ("debug", Level::Debug),
    ("info", Level::Info),
    ("warn", Level::Warn),
    ("error", Level::Error),
    ("panic", Level::Panic),
    ("fatal", Level::Fatal),
];

impl Level {
    /// Lowercase name, as accepted by [`Level::from_str`]
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Panic => "panic",
            Level::Fatal => "fatal",
        }
    }

    /// Uppercase name
    pub fn as_upper_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Panic => "PANIC",
            Level::Fatal => "FATAL",
        }
    }

    /// Whether logging at this level ends in panic or process exit
    pub fn terminates(self) -> bool {
        self >= Level::Panic
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LEVELS
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, level)| *level)
            .ok_or_else(|| ConfigError::UnknownLevel(s.to_string()))
    }
}
