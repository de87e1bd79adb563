//! dpapi-cli - Encrypt and decrypt data with the platform's data protection service.

use std::io::IsTerminal;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dpapi_cli::cli::{self, execute, output, Cli};
use dpapi_cli::core::constants;
use dpapi_cli::error::{Error, InputError, PlatformError};

fn main() {
    if let Some(request) = cli::help_request(std::env::args_os().skip(1)) {
        let _ = cli::print_help(&request);
        std::process::exit(0);
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = e.print();
                    0
                }
                // Usage goes to stdout; the reason, if any, to stderr.
                ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                | ErrorKind::MissingSubcommand => {
                    let _ = cli::print_usage();
                    1
                }
                ErrorKind::InvalidSubcommand => {
                    let _ = e.print();
                    let _ = cli::print_usage();
                    1
                }
                _ => {
                    let _ = e.print();
                    1
                }
            };
            std::process::exit(code);
        }
    };

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("dpapi_cli=debug")
        } else {
            EnvFilter::new("dpapi_cli=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_ansi(std::io::stderr().is_terminal())
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli.command) {
        let suggestion = match &e {
            Error::Platform(PlatformError::UnprotectFailed(_)) => {
                Some("use the same --scope and --entropy as when encrypting")
            }
            Error::Platform(PlatformError::Unavailable(_)) => {
                Some("set backend = \"local\" in config.toml or DPAPI_CLI_BACKEND=local")
            }
            Error::Input(InputError::NoInput(_)) => Some("pass --text <STRING> or --input-file <FILE>"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
