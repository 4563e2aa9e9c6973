//! Browse command - Interactive directory shell

use crate::api::RestDirectory;
use crate::browse::{BrowseSession, CommandExecutor, ExecuteResult, Prompt};
use crate::config::ConfigPaths;
use crate::credentials::get_credential_store;
use crate::error::{CliError, CliResult};
use crate::output::print_info;
use clap::Args;
use oxidir_engine::facade::DynFacade;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::sync::Arc;

/// Arguments for the browse command
#[derive(Args)]
pub struct BrowseArgs {}

enum ExitReason {
    /// User left the shell; the login session stays valid
    Quit,
    /// The idle guard ended the session
    Idle,
    /// The server rejected the session credential
    AuthFailure,
}

/// Execute the browse command
pub async fn execute(_args: BrowseArgs) -> CliResult<()> {
    let paths = ConfigPaths::new()?;
    let client = Arc::new(RestDirectory::from_defaults().await?);
    if !client.session().is_active().await {
        return Err(CliError::NotAuthenticated);
    }

    // Resolve the account up front; this also verifies the token
    let me = client.me().await?;

    let config = client.config().clone();
    let session = client.session().clone();
    let store = get_credential_store(&paths);
    let facade: DynFacade = client.clone();
    let mut shell = BrowseSession::new(facade, session, store, &config, me.username);

    print_info(&format!("Connecting to {}...", config.server_url));
    shell.initial_load().await?;
    if let Some(root) = shell.tree_root().await {
        println!(
            "Browsing {} ({} containers). Type 'help' to list commands.",
            root.dn,
            root.node_count()
        );
    } else {
        println!("Connected. The directory has no containers.");
    }

    let executor = CommandExecutor::new();
    let mut rl = DefaultEditor::new()?;
    let _ = rl.load_history(&paths.history_file);

    let exit_reason = loop {
        if shell.is_expired() {
            break ExitReason::Idle;
        }

        let prompt = Prompt::generate_auto(&shell);
        match rl.readline(&prompt) {
            Ok(line) => {
                shell.record_activity();
                // The guard may have fired while readline was blocking
                if shell.is_expired() {
                    break ExitReason::Idle;
                }

                let _ = rl.add_history_entry(line.as_str());
                match executor.execute(&line, &mut shell).await {
                    Ok(ExecuteResult::Exit) => break ExitReason::Quit,
                    Ok(_) => {}
                    Err(e) if is_session_fatal(&e) => {
                        e.print();
                        break ExitReason::AuthFailure;
                    }
                    Err(e) => e.print(),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break ExitReason::Quit,
            Err(e) => return Err(e.into()),
        }
    };

    let _ = rl.save_history(&paths.history_file);

    match exit_reason {
        ExitReason::Quit => Ok(()),
        ExitReason::Idle => {
            shell.teardown().await?;
            Err(CliError::IdleTimeout)
        }
        ExitReason::AuthFailure => {
            shell.teardown().await?;
            Err(CliError::SessionExpired)
        }
    }
}

/// Failures that must end the shell and clear the session
fn is_session_fatal(error: &CliError) -> bool {
    matches!(
        error,
        CliError::AuthenticationFailed(_) | CliError::NotAuthenticated | CliError::SessionExpired
    )
}
