//! Constants used throughout dpapi-cli.
//!
//! Centralizes magic strings and configuration values.

/// Name of the tool's directory under the platform data dir.
pub const APP_DIR: &str = "dpapi-cli";

/// Settings file name inside the home directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Per-user secret used by the local backend.
pub const USER_KEY_FILE: &str = "user.key";

/// Overrides the home directory.
pub const HOME_ENV: &str = "DPAPI_CLI_HOME";

/// Overrides the default scope.
pub const SCOPE_ENV: &str = "DPAPI_CLI_SCOPE";

/// Overrides the backend selection.
pub const BACKEND_ENV: &str = "DPAPI_CLI_BACKEND";

/// Overrides the machine identity used by the local backend.
pub const MACHINE_ID_ENV: &str = "DPAPI_CLI_MACHINE_ID";

/// Log filter directive.
pub const LOG_ENV: &str = "DPAPI_CLI_LOG";

/// Files consulted, in order, for the machine identity on Unix hosts.
pub const MACHINE_ID_PATHS: &[&str] = &["/etc/machine-id", "/var/lib/dbus/machine-id"];
