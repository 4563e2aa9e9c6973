//! Group management CLI commands

use crate::api::RestDirectory;
use crate::commands::confirm_destruction;
use crate::error::{CliError, CliResult};
use crate::output::truncate;
use clap::{Args, Subcommand};
use oxidir_engine::facade::DirectoryFacade;
use oxidir_engine::model::{GroupEntry, GroupKind, NewGroup};

/// Group management commands
#[derive(Args, Debug)]
pub struct GroupsArgs {
    #[command(subcommand)]
    pub command: GroupsCommands,
}

#[derive(Subcommand, Debug)]
pub enum GroupsCommands {
    /// List all groups
    List(ListArgs),
    /// Create a new group
    Create(CreateArgs),
    /// Delete a group
    Delete(DeleteArgs),
    /// Manage group members
    Members(MembersArgs),
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Group name (cn)
    pub name: String,

    /// Create a POSIX group instead of a groupOfNames
    #[arg(long)]
    pub posix: bool,

    /// Numeric group id, required for POSIX groups
    #[arg(long)]
    pub gid: Option<u32>,

    /// Free-text description
    #[arg(long)]
    pub description: Option<String>,
}

/// Arguments for the delete command
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Group name (cn)
    pub name: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'f')]
    pub force: bool,
}

/// Member management commands
#[derive(Args, Debug)]
pub struct MembersArgs {
    #[command(subcommand)]
    pub command: MembersCommands,
}

#[derive(Subcommand, Debug)]
pub enum MembersCommands {
    /// List the members of a group
    List(MembersListArgs),
    /// Add a user to a group
    Add(MemberChangeArgs),
    /// Remove a user from a group
    Remove(MemberChangeArgs),
}

/// Arguments for the members list command
#[derive(Args, Debug)]
pub struct MembersListArgs {
    /// Group name (cn)
    pub group: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the members add and remove commands
#[derive(Args, Debug)]
pub struct MemberChangeArgs {
    /// Group name (cn)
    pub group: String,

    /// Login name (uid) of the user
    pub uid: String,
}

/// Execute group commands
pub async fn execute(args: GroupsArgs) -> CliResult<()> {
    match args.command {
        GroupsCommands::List(a) => execute_list(a).await,
        GroupsCommands::Create(a) => execute_create(a).await,
        GroupsCommands::Delete(a) => execute_delete(a).await,
        GroupsCommands::Members(a) => match a.command {
            MembersCommands::List(a) => execute_members_list(a).await,
            MembersCommands::Add(a) => execute_member_add(a).await,
            MembersCommands::Remove(a) => execute_member_remove(a).await,
        },
    }
}

async fn execute_list(args: ListArgs) -> CliResult<()> {
    let client = RestDirectory::from_defaults().await?;
    let groups = client.list_groups().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
    } else if groups.is_empty() {
        println!("No groups found.");
    } else {
        print_group_table(&groups);
        println!("\nShowing {} groups", groups.len());
    }

    Ok(())
}

async fn execute_create(args: CreateArgs) -> CliResult<()> {
    let kind = if args.posix {
        GroupKind::Posix
    } else {
        GroupKind::GroupOfNames
    };
    if kind.requires_gid() && args.gid.is_none() {
        return Err(CliError::Validation(
            "POSIX groups require a numeric group id. Pass --gid.".to_string(),
        ));
    }

    let client = RestDirectory::from_defaults().await?;
    let group = NewGroup {
        name: args.name,
        kind,
        gid: args.gid,
        description: args.description,
    };

    client.create_group(&group).await?;
    println!("Group created: {}", group.name);

    Ok(())
}

async fn execute_delete(args: DeleteArgs) -> CliResult<()> {
    let client = RestDirectory::from_defaults().await?;

    let confirmed = confirm_destruction(
        format!("Delete group '{}'? This cannot be undone.", args.name),
        args.force,
    )?;
    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    client.delete_group(&args.name).await?;
    println!("Group deleted: {}", args.name);

    Ok(())
}

async fn execute_members_list(args: MembersListArgs) -> CliResult<()> {
    let client = RestDirectory::from_defaults().await?;
    let members = client.group_members(&args.group).await?;

    if args.json {
        let dns: Vec<String> = members.iter().map(|dn| dn.to_string()).collect();
        println!("{}", serde_json::to_string_pretty(&dns)?);
    } else if members.is_empty() {
        println!("Group '{}' has no members.", args.group);
    } else {
        println!("Members of '{}':", args.group);
        for member in &members {
            println!("  {member}");
        }
        println!("\n{} members", members.len());
    }

    Ok(())
}

async fn execute_member_add(args: MemberChangeArgs) -> CliResult<()> {
    let client = RestDirectory::from_defaults().await?;

    let group = resolve_group(&client, &args.group).await?;
    let user = client.get_entry(&args.uid).await?;

    client.add_member(&group.dn, &user.dn, &user.uid).await?;
    println!("Added '{}' to group '{}'.", user.uid, group.name);

    Ok(())
}

async fn execute_member_remove(args: MemberChangeArgs) -> CliResult<()> {
    let client = RestDirectory::from_defaults().await?;

    let group = resolve_group(&client, &args.group).await?;
    let user = client.get_entry(&args.uid).await?;

    client.remove_member(&group.dn, &user.dn, &user.uid).await?;
    println!("Removed '{}' from group '{}'.", user.uid, group.name);

    Ok(())
}

/// Look up a group by name so commands operate on its server-side DN
async fn resolve_group(client: &RestDirectory, name: &str) -> CliResult<GroupEntry> {
    let groups = client.list_groups().await?;
    groups
        .into_iter()
        .find(|g| g.name == name)
        .ok_or_else(|| CliError::NotFound(format!("Group not found: {name}")))
}

fn kind_label(kind: GroupKind) -> &'static str {
    match kind {
        GroupKind::Posix => "posix",
        GroupKind::GroupOfNames => "groupOfNames",
    }
}

fn print_group_table(groups: &[GroupEntry]) {
    println!(
        "{:<22} {:<14} {:<8} {:<8} {:<28}",
        "NAME", "TYPE", "GID", "MEMBERS", "DESCRIPTION"
    );
    println!("{}", "-".repeat(82));

    for group in groups {
        let gid = group
            .gid
            .map(|g| g.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<22} {:<14} {:<8} {:<8} {:<28}",
            truncate(&group.name, 20),
            kind_label(group.kind),
            gid,
            group.member_count,
            truncate(group.description.as_deref().unwrap_or("-"), 26),
        );
    }
}
