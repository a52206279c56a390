//! Setup-time error types

use crate::encoder::{EncoderKind, ProvisionError};
use std::path::PathBuf;
use thiserror::Error;

/// Invalid or incomplete logger configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Encoder name not one of console, json, logfmt
    #[error("log: unknown log encoder: \"{0}\"")]
    UnknownEncoder(String),
    /// Level name not one of the [`LEVELS`](crate::LEVELS)
    #[error("log: unknown log level: \"{0}\"")]
    UnknownLevel(String),
    /// No encoder was supplied
    #[error("log: no encoder configured")]
    MissingEncoder,
    /// No output sink was supplied
    #[error("log: no output configured")]
    MissingOutput,
}

/// Failure while building an executable logger from a pipeline
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    /// `provision` was never called on the encoder
    #[error("log: {0} encoder has not been provisioned")]
    EncoderNotProvisioned(EncoderKind),
}

/// Top-level error returned by setup and registration entry points
#[derive(Debug, Error)]
pub enum Error {
    /// Unknown encoder or level name
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Encoder could not be provisioned
    #[error("log: failed to provision encoder")]
    Provision(#[source] ProvisionError),
    /// Pipeline validation failed
    #[error("log: failed to configure logger")]
    Configure(#[source] ConfigError),
    /// Logger could not be built for registration; nothing was installed
    #[error("log: failed to register logger")]
    Registration(#[source] BuildError),
    /// Settings file unreadable or malformed
    #[error("log: failed to load settings from {path}")]
    Settings {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::UnknownEncoder("xml".into()).to_string(),
            "log: unknown log encoder: \"xml\""
        );
        assert_eq!(
            ConfigError::MissingEncoder.to_string(),
            "log: no encoder configured"
        );
        assert_eq!(
            ConfigError::MissingOutput.to_string(),
            "log: no output configured"
        );
    }

    #[test]
    fn test_registration_error_keeps_source() {
        let err = Error::Registration(BuildError::EncoderNotProvisioned(EncoderKind::Json));
        assert_eq!(err.to_string(), "log: failed to register logger");
        let source = err.source().unwrap();
        assert_eq!(
            source.to_string(),
            "log: json encoder has not been provisioned"
        );
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: Error = ConfigError::UnknownLevel("loud".into()).into();
        assert_eq!(err.to_string(), "log: unknown log level: \"loud\"");
    }

    #[test]
    fn test_configure_error_chain() {
        let err = Error::Configure(ConfigError::MissingOutput);
        let chain = format!("{:#}", anyhow::Error::from(err));
        assert_eq!(
            chain,
            "log: failed to configure logger: log: no output configured"
        );
    }
}
