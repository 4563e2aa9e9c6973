//! Status command - Service health and session overview

use crate::api::RestDirectory;
use crate::error::CliResult;
use crate::output::print_key_value;
use clap::Args;
use oxidir_engine::facade::DirectoryFacade;
use serde::Serialize;

/// Arguments for the status command
#[derive(Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for status
#[derive(Serialize)]
struct StatusOutput {
    server: String,
    health: String,
    logged_in: bool,
}

/// Execute the status command
pub async fn execute(args: StatusArgs) -> CliResult<()> {
    let client = RestDirectory::from_defaults().await?;

    let health = match client.health().await {
        Ok(health) => health.status,
        Err(_) => "unreachable".to_string(),
    };
    let logged_in = client.session().is_active().await;

    if args.json {
        let output = StatusOutput {
            server: client.config().server_url.clone(),
            health,
            logged_in,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!();
        print_key_value("Server", &client.config().server_url);
        print_key_value("Health", &health);
        print_key_value("Logged in", if logged_in { "yes" } else { "no" });
    }

    Ok(())
}
