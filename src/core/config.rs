//! Settings management.
//!
//! Handles the optional `config.toml` in the dpapi-cli home directory and the
//! environment overrides layered on top of it.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Which protection backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// DPAPI on Windows, the local backend elsewhere.
    #[default]
    Auto,
    /// Local backend on every platform.
    Local,
    /// Windows DPAPI; unavailable on other platforms.
    Dpapi,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "local" => Ok(Self::Local),
            "dpapi" => Ok(Self::Dpapi),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Settings loaded from `config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Default scope name when `--scope` is not given.
    pub scope: Option<String>,
    /// Reject unknown scope names instead of falling back to `CurrentUser`.
    pub strict_scope: bool,
    /// Protection backend.
    pub backend: Backend,
    /// Machine identity for the local backend.
    pub machine_id: Option<String>,
    /// Directory holding this file and the local backend's key material.
    #[serde(skip)]
    pub home: PathBuf,
}

impl Settings {
    /// Home directory: `DPAPI_CLI_HOME`, else `<data-local-dir>/dpapi-cli`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoHomeDir` if no data directory can be found.
    pub fn home_dir() -> Result<PathBuf> {
        if let Some(home) = std::env::var_os(constants::HOME_ENV).filter(|h| !h.is_empty()) {
            return Ok(PathBuf::from(home));
        }
        let base = dirs::data_local_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(base.join(constants::APP_DIR))
    }

    /// Load settings from the home directory and apply environment overrides.
    ///
    /// A missing `config.toml` yields defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read or parsed,
    /// or an override names an unknown backend.
    pub fn load() -> Result<Self> {
        let mut settings = Self::load_from(&Self::home_dir()?)?;

        if let Ok(backend) = std::env::var(constants::BACKEND_ENV) {
            if !backend.is_empty() {
                settings.backend = backend.parse()?;
            }
        }
        if let Ok(machine_id) = std::env::var(constants::MACHINE_ID_ENV) {
            if !machine_id.is_empty() {
                settings.machine_id = Some(machine_id);
            }
        }

        Ok(settings)
    }

    /// Load settings from `home/config.toml` without consulting the environment.
    pub fn load_from(home: &Path) -> Result<Self> {
        let path = home.join(constants::CONFIG_FILE);
        debug!(path = %path.display(), "loading settings");

        let mut settings = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|source| {
                ConfigError::ReadFile {
                    path: path.clone(),
                    source,
                }
            })?;
            toml::from_str::<Self>(&contents).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?
        } else {
            Self::default()
        };
        settings.home = home.to_path_buf();

        debug!(
            backend = ?settings.backend,
            strict_scope = settings.strict_scope,
            "settings loaded"
        );
        Ok(settings)
    }
}
