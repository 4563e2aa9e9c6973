//! Search command - Find users and groups by name

use crate::api::RestDirectory;
use crate::error::{CliError, CliResult};
use crate::output::truncate;
use clap::Args;
use oxidir_engine::facade::DirectoryFacade;

/// Shortest query worth sending to the server
const MIN_QUERY_LEN: usize = 2;

/// Arguments for the search command
#[derive(Args)]
pub struct SearchArgs {
    /// Search term; matches login, name, or email
    pub query: String,

    /// Search groups by name instead of users
    #[arg(long)]
    pub groups: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the search command
pub async fn execute(args: SearchArgs) -> CliResult<()> {
    let query = args.query.trim();
    if query.chars().count() < MIN_QUERY_LEN {
        return Err(CliError::Validation(format!(
            "Search term must be at least {MIN_QUERY_LEN} characters."
        )));
    }

    let client = RestDirectory::from_defaults().await?;

    if args.groups {
        let groups = client.search_groups(query).await?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&groups)?);
        } else if groups.is_empty() {
            println!("No groups matched '{query}'.");
        } else {
            for group in &groups {
                println!("{:<22} {}", truncate(&group.name, 20), group.dn);
            }
            println!("\n{} matches", groups.len());
        }
    } else {
        let users = client.search_entries(query).await?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&users)?);
        } else if users.is_empty() {
            println!("No users matched '{query}'.");
        } else {
            for user in &users {
                println!(
                    "{:<16} {:<26} {}",
                    truncate(&user.uid, 14),
                    truncate(&user.name, 24),
                    user.email.as_deref().unwrap_or("-"),
                );
            }
            println!("\n{} matches", users.len());
        }
    }

    Ok(())
}
