//! Input sources and output sinks.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tracing::debug;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::core::codec;
use crate::core::types::{Direction, Encoding, InputSource, OutputTarget};
use crate::error::{InputError, Result};

/// Read a whole input file.
///
/// # Errors
///
/// Returns `InputError::ReadFile` if the file cannot be read and
/// `InputError::EmptyFile` if it has no content.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path).map_err(|source| InputError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.is_empty() {
        return Err(InputError::EmptyFile(path.to_path_buf()).into());
    }
    debug!(path = %path.display(), len = bytes.len(), "read input file");
    Ok(bytes)
}

/// Produce the primary payload bytes for `direction`.
///
/// # Errors
///
/// Returns `InputError` for unreadable files and `DecodeError` for malformed
/// base64.
pub fn read_primary(source: &InputSource, direction: Direction, armor: bool) -> Result<Vec<u8>> {
    let raw = Zeroizing::new(match source {
        InputSource::Literal(text) => text.as_bytes().to_vec(),
        InputSource::File(path) => read_file(path)?,
    });

    match Encoding::of_input(source.mode(), direction, armor) {
        Encoding::Raw => Ok(raw.to_vec()),
        Encoding::Base64 => {
            let text = String::from_utf8_lossy(&raw);
            Ok(codec::decode(&text)?)
        }
    }
}

/// Create or truncate `path`; new files are private to the owner on Unix.
fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.flush()
}

/// Deliver the result to its target.
///
/// # Errors
///
/// Returns `InputError::WriteFile` if the output file cannot be written, or an
/// I/O error if stdout is closed.
pub fn write_result(
    result: &[u8],
    target: &OutputTarget,
    direction: Direction,
    armor: bool,
) -> Result<()> {
    let encoding = Encoding::of_output(target, direction, armor);

    match target {
        OutputTarget::File(path) => {
            let written = match encoding {
                Encoding::Raw => write_file(path, result),
                Encoding::Base64 => {
                    write_file(path, format!("{}\n", codec::encode(result)).as_bytes())
                }
            };
            written.map_err(|source| InputError::WriteFile {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), ?encoding, "wrote output file");
            output::success(&format!(
                "{} data written to: '{}'.",
                direction.past_tense(),
                path.display()
            ));
        }
        OutputTarget::Console => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            match encoding {
                Encoding::Base64 => writeln!(out, "{}", codec::encode(result))?,
                Encoding::Raw => {
                    out.write_all(result)?;
                    writeln!(out)?;
                }
            }
            out.flush()?;
        }
    }

    Ok(())
}
