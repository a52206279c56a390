//! Log entries and call-site information

use crate::level::Level;
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

/// Source location of a logging call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub file: Cow<'static, str>,
    pub line: u32,
}

impl Caller {
    pub fn new(file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// `path:line` using the full path
    pub fn full(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }

    /// `dir/file:line`, keeping only the last two path segments
    pub fn short(&self) -> String {
        let file = self.file.as_ref();
        let mut separators = file.rmatch_indices(|c| c == '/' || c == '\\');
        let trimmed = match (separators.next(), separators.next()) {
            (Some(_), Some((idx, _))) => &file[idx + 1..],
            _ => file,
        };
        format!("{}:{}", trimmed, self.line)
    }
}

impl From<&'static Location<'static>> for Caller {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A single log record, before fields are encoded
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub level: Level,
    pub time: DateTime<Utc>,
    /// Dot-joined logger name, if the logger was named
    pub logger_name: Option<String>,
    pub message: String,
    pub caller: Option<Caller>,
    pub stack: Option<String>,
}
