//! Logger settings loaded from TOML
//!
//! ```toml
//! encoder = "json"
//! level = "warn"
//!
//! [format]
//! time_format = "rfc3339"
//! level_format = "lower"
//! ```

use crate::cli;
use crate::encoder::{EncoderConfig, EncoderKind};
use crate::error::Error;
use crate::global::SyncGuard;
use crate::level::Level;
use crate::logger::Output;
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// Root settings structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub encoder: EncoderKind,
    #[serde(default)]
    pub level: Level,
    /// Encoder keys and formatters
    #[serde(default)]
    pub format: EncoderConfig,
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        Self::read(path).map_err(|source| Error::Settings {
            path: path.to_path_buf(),
            source,
        })
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).context("failed to read settings file")?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        Ok(settings)
    }

    /// Register the global logger described by these settings, writing to `output`
    pub fn register(&self, output: Output) -> Result<SyncGuard, Error> {
        cli::register_encoder(self.encoder, self.format.clone(), self.level, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_settings_deserialize() {
        let toml = r#"
encoder = "console"
level = "debug"

[format]
message_key = "message"
time_key = ""
time_format = "iso8601"
duration_format = "nano"
"#;

        let settings = Settings::from_toml_str(toml).unwrap();
        assert_eq!(settings.encoder, EncoderKind::Console);
        assert_eq!(settings.level, Level::Debug);
        assert_eq!(settings.format.message_key.as_deref(), Some("message"));
        assert_eq!(settings.format.time_key.as_deref(), Some(""));
        assert_eq!(settings.format.level_key, None);
        assert_eq!(settings.format.time_format, "iso8601");
        assert_eq!(settings.format.duration_format, "nano");
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.encoder, EncoderKind::Logfmt);
        assert_eq!(settings.level, Level::Info);
    }

    #[test]
    fn test_settings_unknown_level() {
        let err = Settings::from_toml_str(r#"level = "verbose""#).unwrap_err();
        assert!(err.to_string().contains("verbose"));
    }

    #[test]
    fn test_settings_unknown_encoder() {
        assert!(Settings::from_toml_str(r#"encoder = "xml""#).is_err());
    }

    #[test]
    fn test_settings_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "encoder = \"json\"\nlevel = \"error\"").unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.encoder, EncoderKind::Json);
        assert_eq!(settings.level, Level::Error);
    }

    #[test]
    fn test_settings_load_nonexistent() {
        let err = Settings::load("/nonexistent/path/log.toml").unwrap_err();
        assert!(matches!(err, Error::Settings { .. }));
        assert_eq!(
            err.to_string(),
            "log: failed to load settings from /nonexistent/path/log.toml"
        );
    }
}
