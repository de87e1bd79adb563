//! Protection orchestration.
//!
//! Dispatches one protect or unprotect call to the platform service with the
//! assembled buffers and the resolved scope.

use tracing::debug;
use zeroize::Zeroizing;

use crate::core::platform::Platform;
use crate::core::scope::Scope;
use crate::core::secret::Secrets;
use crate::core::types::Direction;
use crate::error::Result;

/// Run `direction` on the primary buffer.
///
/// Returns raw ciphertext for [`Direction::Protect`] and raw plaintext for
/// [`Direction::Unprotect`]. Formatting the result is the caller's job.
///
/// # Errors
///
/// Returns `PlatformError` if the service fails, including a scope or entropy
/// mismatch on unprotect.
pub fn run(
    platform: &dyn Platform,
    direction: Direction,
    secrets: &Secrets,
    scope: Scope,
) -> Result<Zeroizing<Vec<u8>>> {
    debug!(
        backend = platform.name(),
        ?direction,
        %scope,
        payload_len = secrets.primary.len(),
        entropy = secrets.entropy.is_some(),
        "running platform operation"
    );

    let primary = secrets.primary.as_bytes();
    let entropy = secrets.entropy_bytes();

    let result = match direction {
        Direction::Protect => platform.protect(primary, entropy, scope).map(Zeroizing::new),
        Direction::Unprotect => platform.unprotect(primary, entropy, scope),
    };

    match result {
        Ok(output) => {
            debug!(output_len = output.len(), "platform operation succeeded");
            Ok(output)
        }
        Err(e) => {
            debug!(
                error = %e,
                detail = e.detail().unwrap_or(""),
                "platform operation failed"
            );
            Err(e.into())
        }
    }
}
