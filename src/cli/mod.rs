//! Command-line interface.

pub mod io;
pub mod output;
pub mod protect;

use std::ffi::OsStr;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};

use crate::core::config::Settings;
use crate::core::constants;
use crate::core::types::Direction;
use crate::error::Result;

const LONG_ABOUT: &str = "\
A command-line tool for encrypting and decrypting data using the platform's data protection \
service (DPAPI on Windows).

The encryption key is derived either from the current user's credentials (CurrentUser scope) or \
the machine's credentials (LocalMachine scope). Encrypted ciphertext can be printed to the console \
in base64 format or written to a file in raw binary format. Any relative filepaths are evaluated \
from the current working directory of the console. Absolute filepaths are used as-is.";

const AFTER_HELP: &str = "\
Examples:
  dpapi-cli encrypt --text \"Hello, world!\" --output-file encrypted.bin
  dpapi-cli decrypt --input-file encrypted.bin

The default scope is 'CurrentUser'.";

/// dpapi-cli - Encrypt and decrypt data with the platform's data protection service.
#[derive(Parser, Debug)]
#[command(
    name = "dpapi-cli",
    about = "Encrypt and decrypt data with the platform's data protection service",
    long_about = LONG_ABOUT,
    after_help = AFTER_HELP,
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable debug logging (or set DPAPI_CLI_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encrypt the input data
    Encrypt(IoArgs),

    /// Decrypt the input data
    Decrypt(IoArgs),
}

impl Command {
    pub fn direction(&self) -> Direction {
        match self {
            Self::Encrypt(_) => Direction::Protect,
            Self::Decrypt(_) => Direction::Unprotect,
        }
    }
}

/// Options shared by `encrypt` and `decrypt`.
#[derive(clap::Args, Debug, Default)]
pub struct IoArgs {
    /// Plaintext to encrypt, or base64-encoded ciphertext to decrypt
    #[arg(short, long, value_name = "STRING", allow_hyphen_values = true)]
    pub text: Option<String>,

    /// File containing the data to encrypt or decrypt (overrides --text)
    #[arg(short, long, value_name = "FILE", visible_short_alias = 'f')]
    pub input_file: Option<PathBuf>,

    /// File where the result will be written
    #[arg(short, long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Optional entropy (additional secret); must match between encrypt and decrypt
    #[arg(short, long, value_name = "ENTROPY")]
    pub entropy: Option<String>,

    /// Protection scope: 'CurrentUser' or 'LocalMachine'
    #[arg(short, long, value_name = "SCOPE", env = constants::SCOPE_ENV)]
    pub scope: Option<String>,

    /// Read and write files as base64 text instead of raw bytes
    #[arg(short, long)]
    pub armor: bool,
}

/// Short and long options of [`IoArgs`] that consume the next token.
const VALUE_SHORTS: &[char] = &['t', 'i', 'f', 'o', 'e', 's'];
const VALUE_LONGS: &[&str] = &[
    "--text",
    "--input-file",
    "--output-file",
    "--entropy",
    "--scope",
];

/// A `-h`/`--help` found anywhere on the command line.
#[derive(Debug, PartialEq, Eq)]
pub struct HelpRequest {
    /// First bare word before the help flag, if any (`encrypt`, `decrypt`, ...).
    pub command: Option<String>,
    /// `--help` asks for the long form.
    pub long: bool,
}

/// Look for a help flag anywhere in `args` (program name excluded).
///
/// Help wins over every other token, including unknown options and
/// commands. Option values are skipped, so `--text --help` encrypts the
/// literal text `--help`. Scanning stops at `--`.
pub fn help_request<I, S>(args: I) -> Option<HelpRequest>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = None;
    let mut skip_value = false;

    for arg in args {
        let arg = arg.as_ref().to_string_lossy();
        if skip_value {
            skip_value = false;
            continue;
        }

        match &*arg {
            "--" => return None,
            "--help" => return Some(HelpRequest { command, long: true }),
            "-h" => return Some(HelpRequest { command, long: false }),
            opt if opt.starts_with("--") => {
                skip_value = VALUE_LONGS.contains(&opt);
            }
            cluster if cluster.starts_with('-') && cluster.len() > 1 => {
                // A short cluster such as `-av` or `-at`; the first value
                // option takes the rest of the cluster or the next token.
                for (i, c) in cluster.char_indices().skip(1) {
                    if c == 'h' {
                        return Some(HelpRequest { command, long: false });
                    }
                    if VALUE_SHORTS.contains(&c) {
                        skip_value = i + c.len_utf8() == cluster.len();
                        break;
                    }
                }
            }
            word => {
                if command.is_none() {
                    command = Some(word.to_string());
                }
            }
        }
    }

    None
}

/// Print help to stdout for `request`.
///
/// Known commands get their own help; anything else gets the top-level help.
pub fn print_help(request: &HelpRequest) -> std::io::Result<()> {
    let mut cli = Cli::command();
    cli.build();

    let sub = request
        .command
        .as_deref()
        .and_then(|name| cli.find_subcommand(name))
        .cloned();
    let mut target = sub.unwrap_or(cli);
    if request.long {
        target.print_long_help()
    } else {
        target.print_help()
    }
}

/// Print the top-level usage to stdout.
pub fn print_usage() -> std::io::Result<()> {
    Cli::command().print_help()
}

/// Execute a command.
pub fn execute(command: Command) -> Result<()> {
    let settings = Settings::load()?;
    let direction = command.direction();

    match command {
        Command::Encrypt(args) | Command::Decrypt(args) => {
            protect::execute(direction, args, &settings)
        }
    }
}
