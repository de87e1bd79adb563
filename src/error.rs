//! Error types.
//!
//! One top-level [`Error`] wraps a sub-enum per concern so callers can match on
//! the failure domain without string inspection.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::Direction;

/// Top-level error for every fallible operation in the crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Problems with what the caller asked for or pointed us at.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("no input specified for {0}")]
    NoInput(Direction),

    #[error("input file is empty: '{}'", .0.display())]
    EmptyFile(PathBuf),

    #[error("unable to read input file: '{}': {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to write output file: '{}': {source}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scope: '{0}' (expected 'CurrentUser' or 'LocalMachine')")]
    UnknownScope(String),
}

/// Text-encoded input could not be turned back into bytes.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("input is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Failures reported by the platform protection service.
///
/// The service does not give reasons worth showing to a user, so the
/// operation failures carry only a detail string for debug logs.
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("encryption failed")]
    ProtectFailed(String),

    #[error("decryption failed")]
    UnprotectFailed(String),

    #[error("decryption failed: data was protected for the {expected} scope, not {requested}")]
    ScopeMismatch {
        expected: &'static str,
        requested: &'static str,
    },

    #[error("protection backend unavailable: {0}")]
    Unavailable(String),
}

impl PlatformError {
    /// Backend-specific detail, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::ProtectFailed(d) | Self::UnprotectFailed(d) => Some(d),
            _ => None,
        }
    }
}

/// Settings could not be located or loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unable to determine a home directory for dpapi-cli (set DPAPI_CLI_HOME)")]
    NoHomeDir,

    #[error("failed to read config file '{}': {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown backend: {0} (supported: auto, local, dpapi)")]
    UnknownBackend(String),
}

pub type Result<T> = std::result::Result<T, Error>;
