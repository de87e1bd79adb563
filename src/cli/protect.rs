//! `encrypt` and `decrypt` commands.

use tracing::info;

use crate::cli::{io, IoArgs};
use crate::core::config::Settings;
use crate::core::scope::Scope;
use crate::core::types::{Direction, InputSource, OutputTarget};
use crate::core::{path, platform, protect, secret};
use crate::error::{InputError, Result};

/// Pick the scope from `--scope` / `DPAPI_CLI_SCOPE`, then the settings file.
///
/// Unknown names fall back to `CurrentUser` with a warning unless
/// `strict_scope` is set, in which case they are rejected.
pub fn select_scope(flag: Option<&str>, settings: &Settings) -> Result<Scope> {
    match flag.or(settings.scope.as_deref()) {
        None => Ok(Scope::default()),
        Some(name) if settings.strict_scope => Ok(name.parse::<Scope>()?),
        Some(name) => Ok(Scope::resolve(name)),
    }
}

/// Protect or unprotect the input described by `args`.
pub fn execute(direction: Direction, args: IoArgs, settings: &Settings) -> Result<()> {
    let scope = select_scope(args.scope.as_deref(), settings)?;

    let input_file = args.input_file.map(path::resolve).transpose()?;
    let output_file = args.output_file.map(path::resolve).transpose()?;
    let source =
        InputSource::select(args.text, input_file).ok_or(InputError::NoInput(direction))?;
    let target = OutputTarget::from(output_file);

    info!(?direction, %scope, mode = ?source.mode(), "starting {}", direction);

    let primary = io::read_primary(&source, direction, args.armor)?;
    if primary.is_empty() {
        return Err(InputError::NoInput(direction).into());
    }

    let secrets = secret::assemble(primary, args.entropy.as_deref());
    let platform = platform::from_settings(settings)?;
    let result = protect::run(platform.as_ref(), direction, &secrets, scope)?;

    io::write_result(&result, &target, direction, args.armor)
}
