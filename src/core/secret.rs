//! Secret buffers handed to the platform service.

use std::fmt;

use zeroize::Zeroizing;

/// Immutable byte buffer that is wiped when dropped.
///
/// `Debug` never prints the contents.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretBuffer(Zeroizing<Vec<u8>>);

impl SecretBuffer {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for SecretBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl AsRef<[u8]> for SecretBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for SecretBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBuffer([REDACTED; {}])", self.len())
    }
}

/// The primary payload plus the optional entropy.
#[derive(Debug, Clone)]
pub struct Secrets {
    pub primary: SecretBuffer,
    pub entropy: Option<SecretBuffer>,
}

impl Secrets {
    pub fn entropy_bytes(&self) -> Option<&[u8]> {
        self.entropy.as_ref().map(SecretBuffer::as_bytes)
    }
}

/// Package the buffers for one protect or unprotect call.
///
/// An empty entropy string is the same as no entropy: no buffer is built.
/// The caller is responsible for rejecting an empty primary payload.
pub fn assemble(primary: Vec<u8>, entropy: Option<&str>) -> Secrets {
    let entropy = entropy
        .filter(|e| !e.is_empty())
        .map(|e| SecretBuffer::new(e.as_bytes().to_vec()));

    Secrets {
        primary: SecretBuffer::new(primary),
        entropy,
    }
}
