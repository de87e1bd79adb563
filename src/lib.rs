//! dpapi-cli - Encrypt and decrypt data with the platform's data protection service.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── protect       # encrypt / decrypt handlers
//! │   ├── io            # Input sources and output sinks
//! │   └── output        # Terminal message helpers
//! └── core/             # Core library components
//!     ├── config        # config.toml and environment overrides
//!     ├── codec         # base64 text encoding
//!     ├── path          # Path resolution
//!     ├── scope         # CurrentUser / LocalMachine selection
//!     ├── secret        # Primary and entropy buffers
//!     ├── protect       # Orchestrator
//!     └── platform/     # Protection services
//!         ├── mod       # Platform trait
//!         ├── dpapi     # Windows DPAPI
//!         └── local     # Portable stand-in
//! ```
//!
//! # Features
//!
//! - No key material to manage: keys belong to the platform service
//! - User-bound or machine-bound protection
//! - Optional entropy as an extra secret
//! - base64 for the console, raw bytes (or armored text) for files

pub mod cli;
pub mod core;
pub mod error;
