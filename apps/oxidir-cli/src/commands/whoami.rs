//! Whoami command - Display the identity behind the session token

use crate::api::RestDirectory;
use crate::error::CliResult;
use crate::output::print_key_value;
use clap::Args;
use serde::Serialize;

/// Arguments for the whoami command
#[derive(Args)]
pub struct WhoamiArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// JSON output for whoami
#[derive(Serialize)]
struct WhoamiOutput {
    username: String,
    server: String,
}

/// Execute the whoami command
pub async fn execute(args: WhoamiArgs) -> CliResult<()> {
    let client = RestDirectory::from_defaults().await?;

    // The server decodes the token, so this also verifies the session
    let me = client.me().await?;

    if args.json {
        let output = WhoamiOutput {
            username: me.username,
            server: client.config().server_url.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!();
        print_key_value("Username", &me.username);
        print_key_value("Server", &client.config().server_url);
    }

    Ok(())
}
