//! Platform data protection services.
//!
//! The protection primitive is a black box: it takes a payload, optional
//! entropy and a scope, and hands back bytes or a failure. Key material never
//! crosses this boundary.
//!
//! ## Backends
//!
//! - **dpapi**: Windows only. `CryptProtectData` / `CryptUnprotectData`.
//! - **local**: every platform. Scope-bound keys held by the backend itself,
//!   for hosts without DPAPI.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Platform` trait
//! 2. Add the implementation in a new file (e.g., `keyring.rs`)
//! 3. Gate it with `cfg` if it only exists on some targets
//! 4. Select it in `from_settings`

use tracing::debug;
use zeroize::Zeroizing;

use crate::core::config::{Backend, Settings};
use crate::core::scope::Scope;
use crate::error::{PlatformError, Result};

mod local;

#[cfg(windows)]
mod dpapi;

pub use local::Local;

#[cfg(windows)]
pub use dpapi::Dpapi;

/// Identity-bound protection service.
pub trait Platform {
    /// Protect `plaintext` for `scope`, mixing in `entropy` if given.
    ///
    /// Implementations must never fall back to an interactive prompt.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` if the service refuses or fails.
    fn protect(
        &self,
        plaintext: &[u8],
        entropy: Option<&[u8]>,
        scope: Scope,
    ) -> std::result::Result<Vec<u8>, PlatformError>;

    /// Recover plaintext from data produced by [`Platform::protect`].
    ///
    /// The scope and entropy must match the ones used to protect.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError` on any mismatch, tampering or service failure.
    fn unprotect(
        &self,
        ciphertext: &[u8],
        entropy: Option<&[u8]>,
        scope: Scope,
    ) -> std::result::Result<Zeroizing<Vec<u8>>, PlatformError>;

    /// Backend name for logs.
    fn name(&self) -> &'static str;
}

/// Create the backend selected by `settings`.
///
/// # Errors
///
/// Returns `PlatformError::Unavailable` when DPAPI is requested on a host that
/// does not have it.
pub fn from_settings(settings: &Settings) -> Result<Box<dyn Platform>> {
    match settings.backend {
        Backend::Local => {
            debug!("creating local protection backend");
            Ok(Box::new(Local::from_settings(settings)))
        }
        Backend::Dpapi => dpapi_backend(),
        Backend::Auto => {
            if cfg!(windows) {
                dpapi_backend()
            } else {
                debug!("creating local protection backend");
                Ok(Box::new(Local::from_settings(settings)))
            }
        }
    }
}

#[cfg(windows)]
fn dpapi_backend() -> Result<Box<dyn Platform>> {
    debug!("creating dpapi protection backend");
    Ok(Box::new(Dpapi))
}

#[cfg(not(windows))]
fn dpapi_backend() -> Result<Box<dyn Platform>> {
    Err(PlatformError::Unavailable(
        "DPAPI is only available on Windows; use backend = \"local\"".to_string(),
    )
    .into())
}
