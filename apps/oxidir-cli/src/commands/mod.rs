//! CLI command implementations

use crate::error::{CliError, CliResult};
use dialoguer::Confirm;
use std::io::IsTerminal;

pub mod browse;
pub mod groups;
pub mod login;
pub mod logout;
pub mod search;
pub mod status;
pub mod tree;
pub mod users;
pub mod whoami;

/// Ask the user to confirm a destructive action, unless `force` is set
pub(crate) fn confirm_destruction(prompt: String, force: bool) -> CliResult<bool> {
    if force {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Validation(
            "Cannot confirm in non-interactive mode. Use --force to skip confirmation."
                .to_string(),
        ));
    }

    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    Ok(confirmed)
}
