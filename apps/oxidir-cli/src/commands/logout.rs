//! Logout command - Clear stored credentials

use crate::config::ConfigPaths;
use crate::credentials::get_credential_store;
use crate::error::CliResult;
use crate::output::{print_info, print_success};
use clap::Args;

/// Arguments for the logout command
#[derive(Args)]
pub struct LogoutArgs {}

/// Execute the logout command
pub async fn execute(_args: LogoutArgs) -> CliResult<()> {
    let paths = ConfigPaths::new()?;

    // Check if logged in
    let store = get_credential_store(&paths);
    if !store.exists() {
        print_info("You are not logged in.");
        return Ok(());
    }

    store.delete()?;
    print_success("Credentials cleared. Logged out successfully.");

    Ok(())
}
