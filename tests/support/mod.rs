//! Test support utilities for dpapi-cli integration tests.
//!
//! Provides reusable test environment setup and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::PathBuf;

use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// Each test gets its own working dir and its own dpapi-cli home, so user
/// keys and settings never leak between tests. Child processes use
/// `.current_dir()`; no process-global state is mutated.
pub struct Test {
    /// Working directory for the child process
    pub dir: TempDir,
    /// dpapi-cli home (settings and local user key)
    pub home: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        Self { dir, home }
    }

    /// Create a test environment with a `config.toml` in its home.
    pub fn with_config(contents: &str) -> Self {
        let t = Self::new();
        std::fs::write(t.home.path().join("config.toml"), contents)
            .expect("failed to write config.toml");
        t
    }

    /// Absolute path of `name` inside the working directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a file into the working directory.
    pub fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, contents).expect("failed to write test file");
        path
    }

    /// Read a file from the working directory.
    pub fn read(&self, name: &str) -> Vec<u8> {
        std::fs::read(self.path(name)).expect("failed to read test file")
    }
}
