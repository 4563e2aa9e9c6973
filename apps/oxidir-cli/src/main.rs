//! oxidir CLI - Command-line administration for an LDAP directory service
//!
//! This CLI enables directory administrators to:
//! - Authenticate against the directory REST gateway
//! - List, create, update, disable and delete user entries
//! - Manage posix and member groups and their membership
//! - Inspect the container tree and search the directory
//! - Run an interactive browse shell with idle session expiry

use clap::{Parser, Subcommand};

mod api;
mod browse;
mod commands;
mod config;
mod credentials;
mod error;
mod logging;
mod models;
mod output;

use error::CliResult;

/// oxidir CLI - Directory service administration
#[derive(Parser)]
#[command(name = "oxidir")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase diagnostic output (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authenticate against the directory server
    Login(commands::login::LoginArgs),

    /// Clear stored credentials and log out
    Logout(commands::logout::LogoutArgs),

    /// Display the identity behind the stored credentials
    Whoami(commands::whoami::WhoamiArgs),

    /// Manage user entries
    Users(commands::users::UsersArgs),

    /// Manage groups and group membership
    Groups(commands::groups::GroupsArgs),

    /// Print the directory container tree
    Tree(commands::tree::TreeArgs),

    /// Search users or groups by name
    Search(commands::search::SearchArgs),

    /// Show server health and configuration
    Status(commands::status::StatusArgs),

    /// Start an interactive browse session
    Browse(commands::browse::BrowseArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init(cli.verbose);

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Login(args) => commands::login::execute(args).await,
        Commands::Logout(args) => commands::logout::execute(args).await,
        Commands::Whoami(args) => commands::whoami::execute(args).await,
        Commands::Users(args) => commands::users::execute(args).await,
        Commands::Groups(args) => commands::groups::execute(args).await,
        Commands::Tree(args) => commands::tree::execute(args).await,
        Commands::Search(args) => commands::search::execute(args).await,
        Commands::Status(args) => commands::status::execute(args).await,
        Commands::Browse(args) => commands::browse::execute(args).await,
    }
}
