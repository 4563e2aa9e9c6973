//! User management CLI commands

use crate::api::RestDirectory;
use crate::commands::confirm_destruction;
use crate::error::{CliError, CliResult};
use crate::output::{truncate, validate_page_size};
use clap::{Args, Subcommand};
use dialoguer::Password;
use oxidir_engine::dn::Dn;
use oxidir_engine::facade::DirectoryFacade;
use oxidir_engine::fetch::ScopedEntryFetcher;
use oxidir_engine::model::{DirectoryEntry, EntryUpdate, NewEntry, ScopeFilter, UserEntry};
use std::io::IsTerminal;
use std::sync::Arc;

/// User management commands
#[derive(Args, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommands,
}

#[derive(Subcommand, Debug)]
pub enum UsersCommands {
    /// List user entries, optionally scoped to a container
    List(ListArgs),
    /// Get details of a specific user
    Get(GetArgs),
    /// Create a new user entry
    Create(CreateArgs),
    /// Update attributes of an existing user
    Update(UpdateArgs),
    /// Disable a user so it can no longer bind
    Disable(DisableArgs),
    /// Delete a user entry
    Delete(DeleteArgs),
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Entries per page (defaults to the configured page size)
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Container DN to list under (subtree)
    #[arg(long)]
    pub base: Option<String>,

    /// Follow pagination until the listing is exhausted
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the get command
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Login name (uid) of the user
    pub uid: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Login name (uid) for the new user
    pub uid: String,

    /// Full name (cn)
    #[arg(long)]
    pub name: String,

    /// Surname (sn)
    #[arg(long)]
    pub surname: String,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Job title
    #[arg(long)]
    pub title: Option<String>,

    /// Container DN to create the entry under
    #[arg(long)]
    pub parent: Option<String>,

    /// Initial password (prompted when omitted)
    #[arg(long)]
    pub password: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the update command
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Login name (uid) of the user
    pub uid: String,

    /// New full name (cn)
    #[arg(long)]
    pub name: Option<String>,

    /// New email address
    #[arg(long)]
    pub email: Option<String>,

    /// New job title
    #[arg(long)]
    pub title: Option<String>,

    /// Prompt for a new password
    #[arg(long)]
    pub password: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the disable command
#[derive(Args, Debug)]
pub struct DisableArgs {
    /// Login name (uid) of the user
    pub uid: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'f')]
    pub force: bool,
}

/// Arguments for the delete command
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Login name (uid) of the user
    pub uid: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'f')]
    pub force: bool,
}

/// Execute user commands
pub async fn execute(args: UsersArgs) -> CliResult<()> {
    match args.command {
        UsersCommands::List(a) => execute_list(a).await,
        UsersCommands::Get(a) => execute_get(a).await,
        UsersCommands::Create(a) => execute_create(a).await,
        UsersCommands::Update(a) => execute_update(a).await,
        UsersCommands::Disable(a) => execute_disable(a).await,
        UsersCommands::Delete(a) => execute_delete(a).await,
    }
}

async fn execute_list(args: ListArgs) -> CliResult<()> {
    let client = Arc::new(RestDirectory::from_defaults().await?);
    let page_size = args.page_size.unwrap_or(client.config().page_size);
    validate_page_size(page_size)?;

    let fetcher = ScopedEntryFetcher::new(client.clone(), page_size);
    if let Some(base) = &args.base {
        fetcher.set_scope(ScopeFilter::under(Dn::parse(base))).await;
    }

    fetcher.load_first_page().await?;
    if args.all {
        while fetcher.has_more().await {
            fetcher.load_next_page().await?;
        }
    }

    let entries = fetcher.entries().await;
    let has_more = fetcher.has_more().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        println!("No entries found.");
    } else {
        let users: Vec<&UserEntry> = entries
            .iter()
            .filter_map(|e| match e {
                DirectoryEntry::User(u) => Some(u),
                DirectoryEntry::Group(_) => None,
            })
            .collect();
        print_user_table(&users);

        println!("\nShowing {} entries", users.len());
        if has_more {
            println!("More entries are available. Pass --all to fetch every page.");
        }
    }

    Ok(())
}

async fn execute_get(args: GetArgs) -> CliResult<()> {
    let client = RestDirectory::from_defaults().await?;

    let user = client.get_entry(&args.uid).await?;
    let groups = client.entry_groups(&args.uid).await.unwrap_or_default();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        print_user_details(&user, &groups);
    }

    Ok(())
}

async fn execute_create(args: CreateArgs) -> CliResult<()> {
    let client = RestDirectory::from_defaults().await?;

    let password = match args.password {
        Some(password) => password,
        None => {
            if !std::io::stdin().is_terminal() {
                return Err(CliError::Validation(
                    "Cannot prompt for a password in non-interactive mode. Use --password."
                        .to_string(),
                ));
            }
            Password::new()
                .with_prompt("Password for the new user")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()?
        }
    };

    let entry = NewEntry {
        uid: args.uid,
        name: args.name,
        surname: args.surname,
        email: args.email,
        title: args.title,
        password,
        parent: args.parent.as_deref().map(Dn::parse),
    };

    let user = client.create_entry(&entry).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        println!("User created successfully!");
        println!();
        print_user_details(&user, &[]);
    }

    Ok(())
}

async fn execute_update(args: UpdateArgs) -> CliResult<()> {
    let client = RestDirectory::from_defaults().await?;

    let password = if args.password {
        if !std::io::stdin().is_terminal() {
            return Err(CliError::Validation(
                "Cannot prompt for a password in non-interactive mode.".to_string(),
            ));
        }
        Some(
            Password::new()
                .with_prompt("New password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()?,
        )
    } else {
        None
    };

    let update = EntryUpdate {
        name: args.name,
        email: args.email,
        title: args.title,
        password,
    };
    if update.is_empty() {
        return Err(CliError::Validation(
            "No changes requested. Pass at least one attribute option.".to_string(),
        ));
    }

    let user = client.update_entry(&args.uid, &update).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        println!("User updated successfully!");
        println!();
        print_user_details(&user, &[]);
    }

    Ok(())
}

async fn execute_disable(args: DisableArgs) -> CliResult<()> {
    let client = RestDirectory::from_defaults().await?;

    let confirmed = confirm_destruction(
        format!(
            "Disable user '{}'? The account will no longer be able to log in.",
            args.uid
        ),
        args.force,
    )?;
    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    client.disable_entry(&args.uid).await?;
    println!("User disabled: {}", args.uid);

    Ok(())
}

async fn execute_delete(args: DeleteArgs) -> CliResult<()> {
    let client = RestDirectory::from_defaults().await?;

    // Resolve the DN first so the prompt names exactly what will go
    let user = client.get_entry(&args.uid).await?;

    let confirmed = confirm_destruction(
        format!("Delete entry '{}'? This cannot be undone.", user.dn),
        args.force,
    )?;
    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    client.delete_entry(&user.dn).await?;
    println!("Entry deleted: {}", user.dn);

    Ok(())
}

fn print_user_table(users: &[&UserEntry]) {
    println!(
        "{:<16} {:<26} {:<30} {:<20}",
        "UID", "NAME", "EMAIL", "TITLE"
    );
    println!("{}", "-".repeat(94));

    for user in users {
        println!(
            "{:<16} {:<26} {:<30} {:<20}",
            truncate(&user.uid, 14),
            truncate(&user.name, 24),
            truncate(user.email.as_deref().unwrap_or("-"), 28),
            truncate(user.title.as_deref().unwrap_or("-"), 18),
        );
    }
}

fn print_user_details(user: &UserEntry, groups: &[String]) {
    println!("User: {}", user.uid);
    println!("{}", "\u{2501}".repeat(50));
    println!("DN:     {}", user.dn);
    println!("Name:   {}", user.name);

    if let Some(ref email) = user.email {
        println!("Email:  {email}");
    }
    if let Some(ref title) = user.title {
        println!("Title:  {title}");
    }
    if !groups.is_empty() {
        println!("Groups: {}", groups.join(", "));
    }
}
