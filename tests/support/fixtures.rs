//! Test fixtures and constants.

/// Machine identity given to the local backend in every test.
pub const MACHINE_ID: &str = "0123456789abcdef0123456789abcdef";

/// Plaintext used by the end-to-end scenarios.
pub const HELLO: &str = "Hello, world!";

/// Text that is not valid base64.
pub const NOT_BASE64: &str = "not-valid-base64!!";

/// Binary payload containing every byte value.
pub fn all_bytes() -> Vec<u8> {
    (0..=255).collect()
}
