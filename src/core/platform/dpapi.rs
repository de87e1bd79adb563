//! Windows Data Protection API backend.
//!
//! `CryptProtectData` and `CryptUnprotectData` return buffers allocated with
//! `LocalAlloc`. Each one is wrapped in a guard the moment the call returns so
//! it is released with `LocalFree` exactly once, whichever way we leave.
//!
//! Interactive prompts are always forbidden. The scope name is recorded in the
//! blob's data description so a blob protected for one scope is refused when
//! unprotected for the other; DPAPI itself would accept a machine blob under
//! the user scope.

use std::ffi::c_void;
use std::ptr;

use tracing::{debug, trace};
use windows_sys::Win32::Foundation::LocalFree;
use windows_sys::Win32::Security::Cryptography::{
    CryptProtectData, CryptUnprotectData, CRYPTPROTECT_LOCAL_MACHINE,
    CRYPTPROTECT_UI_FORBIDDEN, CRYPT_INTEGER_BLOB,
};
use zeroize::{Zeroize, Zeroizing};

use super::Platform;
use crate::core::scope::Scope;
use crate::error::PlatformError;

/// Data description prefix identifying blobs written by this tool.
const DESCRIPTION_PREFIX: &str = "dpapi-cli:";

/// `LocalAlloc` memory handed back by DPAPI.
struct LocalBlob {
    ptr: *mut u8,
    len: usize,
}

impl LocalBlob {
    /// Take ownership of a blob filled in by DPAPI.
    ///
    /// # Safety
    ///
    /// `blob.pbData` must be null or point to `blob.cbData` bytes allocated
    /// with `LocalAlloc` that nobody else will free.
    unsafe fn from_raw(blob: CRYPT_INTEGER_BLOB) -> Self {
        Self {
            ptr: blob.pbData,
            len: blob.cbData as usize,
        }
    }

    fn as_slice(&self) -> &[u8] {
        if self.ptr.is_null() {
            &[]
        } else {
            // SAFETY: guaranteed by `from_raw`; the memory lives until drop.
            unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
        }
    }
}

impl Drop for LocalBlob {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            // SAFETY: `ptr` came from LocalAlloc via DPAPI and is freed once.
            unsafe {
                std::slice::from_raw_parts_mut(self.ptr, self.len).zeroize();
                LocalFree(self.ptr as *mut c_void);
            }
        }
    }
}

/// `LocalAlloc`'d, NUL-terminated UTF-16 string handed back by DPAPI.
struct LocalWideString(*mut u16);

impl LocalWideString {
    fn to_string_lossy(&self) -> String {
        if self.0.is_null() {
            return String::new();
        }
        // SAFETY: DPAPI returns a NUL-terminated string; we stop at the NUL.
        unsafe {
            let mut len = 0;
            while *self.0.add(len) != 0 {
                len += 1;
            }
            String::from_utf16_lossy(std::slice::from_raw_parts(self.0, len))
        }
    }
}

impl Drop for LocalWideString {
    fn drop(&mut self) {
        if !self.0.is_null() {
            // SAFETY: allocated by DPAPI with LocalAlloc, freed once here.
            unsafe {
                LocalFree(self.0 as *mut c_void);
            }
        }
    }
}

fn input_blob(data: &[u8]) -> Result<CRYPT_INTEGER_BLOB, String> {
    let len = u32::try_from(data.len())
        .map_err(|_| format!("payload of {} bytes is too large for DPAPI", data.len()))?;
    Ok(CRYPT_INTEGER_BLOB {
        cbData: len,
        pbData: data.as_ptr() as *mut u8,
    })
}

fn empty_blob() -> CRYPT_INTEGER_BLOB {
    CRYPT_INTEGER_BLOB {
        cbData: 0,
        pbData: ptr::null_mut(),
    }
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

fn protect_flags(scope: Scope) -> u32 {
    match scope {
        Scope::CurrentUser => CRYPTPROTECT_UI_FORBIDDEN,
        Scope::LocalMachine => CRYPTPROTECT_UI_FORBIDDEN | CRYPTPROTECT_LOCAL_MACHINE,
    }
}

/// Windows DPAPI.
pub struct Dpapi;

impl Platform for Dpapi {
    fn name(&self) -> &'static str {
        "dpapi"
    }

    fn protect(
        &self,
        plaintext: &[u8],
        entropy: Option<&[u8]>,
        scope: Scope,
    ) -> Result<Vec<u8>, PlatformError> {
        trace!(%scope, plaintext_len = plaintext.len(), "CryptProtectData");

        let data_in = input_blob(plaintext).map_err(PlatformError::ProtectFailed)?;
        let entropy_blob = entropy
            .map(input_blob)
            .transpose()
            .map_err(PlatformError::ProtectFailed)?;
        let description = wide(&format!("{}{}", DESCRIPTION_PREFIX, scope.name()));
        let mut data_out = empty_blob();

        // SAFETY: every pointer refers to a live local for the whole call;
        // DPAPI only reads the inputs and fills `data_out`.
        let ok = unsafe {
            CryptProtectData(
                &data_in,
                description.as_ptr(),
                entropy_blob
                    .as_ref()
                    .map_or(ptr::null(), |b| b as *const CRYPT_INTEGER_BLOB),
                ptr::null(),
                ptr::null(),
                protect_flags(scope),
                &mut data_out,
            )
        };
        if ok == 0 {
            let err = std::io::Error::last_os_error();
            debug!(error = %err, "CryptProtectData failed");
            return Err(PlatformError::ProtectFailed(err.to_string()));
        }

        // SAFETY: on success DPAPI hands us ownership of `data_out`.
        let blob = unsafe { LocalBlob::from_raw(data_out) };
        Ok(blob.as_slice().to_vec())
    }

    fn unprotect(
        &self,
        ciphertext: &[u8],
        entropy: Option<&[u8]>,
        scope: Scope,
    ) -> Result<Zeroizing<Vec<u8>>, PlatformError> {
        trace!(%scope, blob_len = ciphertext.len(), "CryptUnprotectData");

        let data_in = input_blob(ciphertext).map_err(PlatformError::UnprotectFailed)?;
        let entropy_blob = entropy
            .map(input_blob)
            .transpose()
            .map_err(PlatformError::UnprotectFailed)?;
        let mut description_ptr: *mut u16 = ptr::null_mut();
        let mut data_out = empty_blob();

        // SAFETY: as in `protect`; DPAPI also fills `description_ptr`.
        let ok = unsafe {
            CryptUnprotectData(
                &data_in,
                &mut description_ptr,
                entropy_blob
                    .as_ref()
                    .map_or(ptr::null(), |b| b as *const CRYPT_INTEGER_BLOB),
                ptr::null(),
                ptr::null(),
                CRYPTPROTECT_UI_FORBIDDEN,
                &mut data_out,
            )
        };
        // Guards first so both buffers are released on every path below.
        let description = LocalWideString(description_ptr);
        // SAFETY: DPAPI owns nothing after return; null if the call failed.
        let blob = unsafe { LocalBlob::from_raw(data_out) };

        if ok == 0 {
            let err = std::io::Error::last_os_error();
            debug!(error = %err, "CryptUnprotectData failed");
            return Err(PlatformError::UnprotectFailed(err.to_string()));
        }

        let description = description.to_string_lossy();
        if let Some(stored) = description.strip_prefix(DESCRIPTION_PREFIX) {
            if let Ok(stored) = stored.parse::<Scope>() {
                if stored != scope {
                    return Err(PlatformError::ScopeMismatch {
                        expected: stored.name(),
                        requested: scope.name(),
                    });
                }
            }
        }

        Ok(Zeroizing::new(blob.as_slice().to_vec()))
    }
}
