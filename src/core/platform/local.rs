//! Local protection backend.
//!
//! Stands in for the platform service on hosts without DPAPI. Each scope has
//! a root secret the backend owns:
//!
//! - `CurrentUser`: 32 random bytes in `<home>/user.key` (0600 on Unix),
//!   bound to the login name.
//! - `LocalMachine`: the host's machine identity (`/etc/machine-id`,
//!   `/var/lib/dbus/machine-id`, else the hostname), or the configured
//!   `machine_id` override.
//!
//! The data key is HKDF-SHA256(root secret, salt = SHA-256(entropy)) and the
//! payload is sealed with XChaCha20-Poly1305. Blob layout:
//!
//! ```text
//! "DPC" 0x01 | scope (1) | flags (1) | nonce (24) | ciphertext + tag
//! ```
//!
//! The first six bytes are authenticated as associated data.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chacha20poly1305::aead::rand_core::RngCore;
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng, Payload};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use hkdf::Hkdf;
use sha2::{Digest, Sha256};
use tracing::{debug, trace, warn};
use zeroize::Zeroizing;

use super::Platform;
use crate::core::config::Settings;
use crate::core::constants;
use crate::core::scope::Scope;
use crate::error::PlatformError;

const MAGIC: &[u8; 4] = b"DPC\x01";
const HEADER_LEN: usize = 6;
const NONCE_LEN: usize = 24;
const TAG_LEN: usize = 16;
const KEY_LEN: usize = 32;
const FLAG_ENTROPY: u8 = 0b0000_0001;
const KDF_INFO: &[u8] = b"dpapi-cli/local/v1/";

fn scope_byte(scope: Scope) -> u8 {
    match scope {
        Scope::CurrentUser => 0,
        Scope::LocalMachine => 1,
    }
}

fn scope_from_byte(byte: u8) -> Option<Scope> {
    match byte {
        0 => Some(Scope::CurrentUser),
        1 => Some(Scope::LocalMachine),
        _ => None,
    }
}

/// Check that the user key is private to its owner (Unix only).
#[cfg(unix)]
fn check_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(metadata) = fs::metadata(path) {
        let mode = metadata.permissions().mode() & 0o777;
        if mode != 0o600 {
            warn!(
                path = %path.display(),
                mode = %format!("{:o}", mode),
                "user key is readable by others; run: chmod 600 {}",
                path.display()
            );
        }
    }
}

/// Local, file- and host-keyed protection backend.
pub struct Local {
    home: PathBuf,
    machine_id: Option<String>,
}

impl Local {
    pub fn new(home: impl Into<PathBuf>, machine_id: Option<String>) -> Self {
        Self {
            home: home.into(),
            machine_id,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.home.clone(), settings.machine_id.clone())
    }

    fn user_key_path(&self) -> PathBuf {
        self.home.join(constants::USER_KEY_FILE)
    }

    /// Load the per-user root secret, creating it on first protect.
    fn user_secret(&self, create: bool) -> Result<Zeroizing<Vec<u8>>, String> {
        let path = self.user_key_path();

        if path.exists() {
            return read_user_key(&path);
        }

        if !create {
            return Err(format!("no user key at {}", path.display()));
        }

        debug!(path = %path.display(), "generating user key");
        let key = XChaCha20Poly1305::generate_key(&mut OsRng);
        let secret = Zeroizing::new(key.to_vec());
        match publish_private(&path, &secret) {
            Ok(()) => Ok(secret),
            // Another process won the race; its key is the one to use.
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "user key created concurrently");
                read_user_key(&path)
            }
            Err(e) => Err(format!("writing {}: {}", path.display(), e)),
        }
    }

    /// Machine identity bytes for the `LocalMachine` scope.
    fn machine_secret(&self) -> Result<Zeroizing<Vec<u8>>, String> {
        if let Some(id) = &self.machine_id {
            trace!("using configured machine id");
            return Ok(Zeroizing::new(id.as_bytes().to_vec()));
        }

        for candidate in constants::MACHINE_ID_PATHS {
            if let Ok(contents) = fs::read_to_string(candidate) {
                let id = contents.trim();
                if !id.is_empty() {
                    trace!(path = candidate, "using machine id file");
                    return Ok(Zeroizing::new(id.as_bytes().to_vec()));
                }
            }
        }

        let host = whoami::fallible::hostname()
            .map_err(|e| format!("no machine identity available: {}", e))?;
        trace!("using hostname as machine id");
        Ok(Zeroizing::new(host.into_bytes()))
    }

    fn root_secret(&self, scope: Scope, create: bool) -> Result<Zeroizing<Vec<u8>>, String> {
        match scope {
            Scope::CurrentUser => self.user_secret(create),
            Scope::LocalMachine => self.machine_secret(),
        }
    }

    fn cipher(
        &self,
        scope: Scope,
        entropy: Option<&[u8]>,
        create: bool,
    ) -> Result<XChaCha20Poly1305, String> {
        let root = self.root_secret(scope, create)?;
        let key = derive_key(scope, &root, entropy)?;
        Ok(XChaCha20Poly1305::new(Key::from_slice(key.as_slice())))
    }
}

/// Derive the data key for one scope/entropy combination.
fn derive_key(
    scope: Scope,
    root: &[u8],
    entropy: Option<&[u8]>,
) -> Result<Zeroizing<[u8; KEY_LEN]>, String> {
    let salt = entropy.map(|e| Sha256::digest(e));
    let hk = Hkdf::<Sha256>::new(salt.as_ref().map(|s| s.as_slice()), root);

    let mut info = KDF_INFO.to_vec();
    info.extend_from_slice(scope.name().as_bytes());
    if scope == Scope::CurrentUser {
        info.push(b'/');
        info.extend_from_slice(whoami::username().as_bytes());
    }

    let mut okm = Zeroizing::new([0u8; KEY_LEN]);
    hk.expand(&info, okm.as_mut_slice())
        .map_err(|e| format!("key derivation failed: {}", e))?;
    Ok(okm)
}

fn header(scope: Scope, entropy: Option<&[u8]>) -> [u8; HEADER_LEN] {
    let flags = if entropy.is_some() { FLAG_ENTROPY } else { 0 };
    [
        MAGIC[0],
        MAGIC[1],
        MAGIC[2],
        MAGIC[3],
        scope_byte(scope),
        flags,
    ]
}

fn read_user_key(path: &Path) -> Result<Zeroizing<Vec<u8>>, String> {
    #[cfg(unix)]
    check_permissions(path);

    let secret =
        Zeroizing::new(fs::read(path).map_err(|e| format!("reading {}: {}", path.display(), e))?);
    if secret.len() != KEY_LEN {
        return Err(format!(
            "user key {} has {} bytes, expected {}",
            path.display(),
            secret.len(),
            KEY_LEN
        ));
    }
    trace!(path = %path.display(), "loaded user key");
    Ok(secret)
}

/// Create `path` readable only by its owner, fully written or not at all.
///
/// The contents go to a sibling temp file first, which is then hard-linked
/// into place. Linking never replaces an existing file, so a concurrent
/// creator gets `AlreadyExists` instead of clobbering a key already in use.
fn publish_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = parent.join(format!(".{}.{:016x}.tmp", file_name, OsRng.next_u64()));

    let staged = write_private(&tmp, contents).and_then(|()| fs::hard_link(&tmp, path));
    let _ = fs::remove_file(&tmp);
    staged
}

/// Create or truncate a file readable only by its owner and sync it.
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

impl Platform for Local {
    fn name(&self) -> &'static str {
        "local"
    }

    fn protect(
        &self,
        plaintext: &[u8],
        entropy: Option<&[u8]>,
        scope: Scope,
    ) -> Result<Vec<u8>, PlatformError> {
        trace!(%scope, plaintext_len = plaintext.len(), "protecting");

        let cipher = self
            .cipher(scope, entropy, true)
            .map_err(PlatformError::ProtectFailed)?;
        let header = header(scope, entropy);
        let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);

        let sealed = cipher
            .encrypt(
                &nonce,
                Payload {
                    msg: plaintext,
                    aad: &header,
                },
            )
            .map_err(|e| PlatformError::ProtectFailed(e.to_string()))?;

        let mut blob = Vec::with_capacity(HEADER_LEN + NONCE_LEN + sealed.len());
        blob.extend_from_slice(&header);
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&sealed);

        trace!(blob_len = blob.len(), "protected");
        Ok(blob)
    }

    fn unprotect(
        &self,
        ciphertext: &[u8],
        entropy: Option<&[u8]>,
        scope: Scope,
    ) -> Result<Zeroizing<Vec<u8>>, PlatformError> {
        trace!(%scope, blob_len = ciphertext.len(), "unprotecting");

        if ciphertext.len() < HEADER_LEN + NONCE_LEN + TAG_LEN {
            return Err(PlatformError::UnprotectFailed(format!(
                "blob too short ({} bytes)",
                ciphertext.len()
            )));
        }
        let (head, rest) = ciphertext.split_at(HEADER_LEN);
        if &head[..MAGIC.len()] != MAGIC {
            return Err(PlatformError::UnprotectFailed(
                "not a local protection blob".to_string(),
            ));
        }

        let stored = scope_from_byte(head[4]).ok_or_else(|| {
            PlatformError::UnprotectFailed(format!("unknown scope byte {:#04x}", head[4]))
        })?;
        if stored != scope {
            return Err(PlatformError::ScopeMismatch {
                expected: stored.name(),
                requested: scope.name(),
            });
        }
        if (head[5] & FLAG_ENTROPY != 0) != entropy.is_some() {
            return Err(PlatformError::UnprotectFailed(
                "entropy presence does not match".to_string(),
            ));
        }

        let (nonce, sealed) = rest.split_at(NONCE_LEN);
        let cipher = self
            .cipher(scope, entropy, false)
            .map_err(PlatformError::UnprotectFailed)?;

        let plaintext = cipher
            .decrypt(
                XNonce::from_slice(nonce),
                Payload {
                    msg: sealed,
                    aad: head,
                },
            )
            .map_err(|_| {
                PlatformError::UnprotectFailed("authentication failed".to_string())
            })?;

        trace!(plaintext_len = plaintext.len(), "unprotected");
        Ok(Zeroizing::new(plaintext))
    }
}
