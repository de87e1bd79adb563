//! Protection scope selection.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::error::InputError;

/// Whose identity the platform binds protected data to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Only the invoking user can unprotect.
    #[default]
    CurrentUser,
    /// Any process on this machine can unprotect.
    LocalMachine,
}

impl Scope {
    /// Name accepted on the command line and shown in messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::CurrentUser => "CurrentUser",
            Self::LocalMachine => "LocalMachine",
        }
    }

    /// Resolve a user-supplied scope name.
    ///
    /// Matching is exact and case-sensitive. Anything unrecognized, including
    /// the empty string, falls back to [`Scope::CurrentUser`] with a warning.
    pub fn resolve(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!("Invalid scope '{}'. Using 'CurrentUser'.", name);
            Self::CurrentUser
        })
    }
}

impl FromStr for Scope {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CurrentUser" => Ok(Self::CurrentUser),
            "LocalMachine" => Ok(Self::LocalMachine),
            other => Err(InputError::UnknownScope(other.to_string())),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
