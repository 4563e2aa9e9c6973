//! Login command - Password authentication against the directory

use crate::api::RestDirectory;
use crate::config::{Config, ConfigPaths};
use crate::credentials::get_credential_store;
use crate::error::{CliError, CliResult};
use crate::output::{print_info, print_next_steps, print_success, print_warning};
use clap::Args;
use dialoguer::{Input, Password};
use oxidir_engine::facade::DirectoryFacade;
use oxidir_engine::session::SessionContext;
use std::io::IsTerminal;

/// Arguments for the login command
#[derive(Args)]
pub struct LoginArgs {
    /// Username to bind as (prompted when omitted)
    pub username: Option<String>,
}

/// Execute the login command
pub async fn execute(args: LoginArgs) -> CliResult<()> {
    let paths = ConfigPaths::new()?;
    let config = Config::load(&paths)?;

    // Check if already logged in
    let store = get_credential_store(&paths);
    if let Some(creds) = store.load()? {
        if !creds.is_expired() {
            print_info("You are already logged in. Run 'oxidir logout' first to log out.");
            return Ok(());
        }
        print_warning("Your previous session has expired. Log in again to continue.");
    }

    let username = match args.username {
        Some(username) => username,
        None => {
            if !std::io::stdin().is_terminal() {
                return Err(CliError::Validation(
                    "Cannot prompt for a username in non-interactive mode. \
                     Pass it as an argument: oxidir login <username>"
                        .to_string(),
                ));
            }
            Input::new().with_prompt("Username").interact_text()?
        }
    };

    if !std::io::stdin().is_terminal() {
        return Err(CliError::Validation(
            "Cannot prompt for a password in non-interactive mode.".to_string(),
        ));
    }
    let password: String = Password::new().with_prompt("Password").interact()?;

    let client = RestDirectory::new(config.clone(), SessionContext::new())?;
    let credentials = client.authenticate(&username, &password).await?;

    // Persist for later invocations
    store.store(&credentials)?;

    // Seed the config file on first use
    if !paths.config_file.exists() {
        config.save(&paths)?;
    }

    print_success(&format!("Logged in as {username}"));
    print_next_steps(&[
        "Run 'oxidir browse' to explore the directory interactively".to_string(),
        "Run 'oxidir users list' to list entries".to_string(),
    ]);

    Ok(())
}
