//! Core library components.
//!
//! Everything needed to protect or unprotect a buffer: scope selection,
//! buffer assembly, encoding, and the platform services behind the
//! orchestrator.

pub mod codec;
pub mod config;
pub mod constants;
pub mod path;
pub mod platform;
pub mod protect;
pub mod scope;
pub mod secret;
pub mod types;
