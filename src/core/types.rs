//! Per-invocation domain values.
//!
//! Everything here is built once from the command line and passed explicitly
//! through the call chain.

use std::fmt;
use std::path::PathBuf;

/// Which platform operation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Protect,
    Unprotect,
}

impl Direction {
    /// Past-tense verb used in confirmations (`Encrypted data written to ...`).
    pub fn past_tense(self) -> &'static str {
        match self {
            Self::Protect => "Encrypted",
            Self::Unprotect => "Decrypted",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protect => f.write_str("encryption"),
            Self::Unprotect => f.write_str("decryption"),
        }
    }
}

/// Where the primary payload came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Given on the command line with `--text`.
    Literal(String),
    /// Read from a resolved, absolute path.
    File(PathBuf),
}

impl InputSource {
    /// An input file always wins over literal text.
    pub fn select(text: Option<String>, file: Option<PathBuf>) -> Option<Self> {
        match (file, text) {
            (Some(path), _) => Some(Self::File(path)),
            (None, Some(text)) => Some(Self::Literal(text)),
            (None, None) => None,
        }
    }

    pub fn mode(&self) -> InputMode {
        match self {
            Self::Literal(_) => InputMode::Literal,
            Self::File(_) => InputMode::FromFile,
        }
    }
}

/// Whether input bytes arrive raw or must be decoded first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Literal,
    FromFile,
}

/// On-the-wire form of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Raw,
    Base64,
}

impl Encoding {
    /// Encoding of the primary input.
    ///
    /// Literal text is the plaintext when protecting and base64 ciphertext
    /// when unprotecting. Files are raw unless `armor` is set, in which case
    /// file ciphertext is base64 text.
    pub fn of_input(mode: InputMode, direction: Direction, armor: bool) -> Self {
        match (mode, direction) {
            (InputMode::Literal, Direction::Unprotect) => Self::Base64,
            (InputMode::FromFile, Direction::Unprotect) if armor => Self::Base64,
            _ => Self::Raw,
        }
    }

    /// Encoding of the result.
    ///
    /// Ciphertext on the console is always base64; plaintext is never encoded.
    pub fn of_output(target: &OutputTarget, direction: Direction, armor: bool) -> Self {
        match (target, direction) {
            (OutputTarget::Console, Direction::Protect) => Self::Base64,
            (OutputTarget::File(_), Direction::Protect) if armor => Self::Base64,
            _ => Self::Raw,
        }
    }
}

/// Where the result goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File(PathBuf),
    Console,
}

impl From<Option<PathBuf>> for OutputTarget {
    fn from(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Console, Self::File)
    }
}
