//! Line command execution for the browse shell
//!
//! Parses commands entered at the prompt and runs them against the
//! engine coordinator held by the session.

use crate::browse::BrowseSession;
use crate::error::CliResult;
use crate::output::{render_tree, truncate};
use oxidir_engine::dn::Dn;
use oxidir_engine::model::{DirectoryEntry, GroupEntry, GroupKind, UserEntry};

/// Result of executing a command in the shell
#[derive(Debug, PartialEq, Eq)]
pub enum ExecuteResult {
    /// Command executed, continue the shell
    Continue,
    /// User requested exit
    Exit,
    /// Empty input, just show a new prompt
    Empty,
}

/// Command executor for the browse shell
pub struct CommandExecutor;

impl CommandExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Execute a command line entered by the user
    pub async fn execute(
        &self,
        line: &str,
        session: &mut BrowseSession,
    ) -> CliResult<ExecuteResult> {
        let line = line.trim();

        if line.is_empty() {
            return Ok(ExecuteResult::Empty);
        }

        if self.is_exit_command(line) {
            return Ok(ExecuteResult::Exit);
        }

        if self.is_help_command(line) {
            self.show_help();
            return Ok(ExecuteResult::Continue);
        }

        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command.to_lowercase().as_str() {
            "tree" => self.cmd_tree(session).await?,
            "cd" => self.cmd_cd(session, arg).await?,
            "ls" => self.cmd_ls(session).await?,
            "next" => self.cmd_next(session).await?,
            "groups" => self.cmd_groups(session).await?,
            "open" => self.cmd_open(session, arg).await?,
            "members" => self.cmd_members(session).await?,
            "add" => self.cmd_add(session, arg).await?,
            "rm" => self.cmd_rm(session, arg).await?,
            "close" => self.cmd_close(session).await?,
            "search" => self.cmd_search(session, arg).await?,
            "whoami" => self.cmd_whoami(session),
            _ => {
                println!("Unknown command: '{command}'. Type 'help' to see available commands.");
            }
        }

        Ok(ExecuteResult::Continue)
    }

    /// Check if the input is an exit command
    pub fn is_exit_command(&self, line: &str) -> bool {
        let cmd = line.trim().to_lowercase();
        matches!(cmd.as_str(), "exit" | "quit" | "q")
    }

    /// Check if the input is a help command
    pub fn is_help_command(&self, line: &str) -> bool {
        let first = line.split_whitespace().next().unwrap_or("");
        matches!(first.to_lowercase().as_str(), "help" | "?")
    }

    fn show_help(&self) {
        println!("Available commands:");
        println!();
        println!("  tree               Show the container hierarchy");
        println!("  cd <container>     Select a container ('..' up, '/' everywhere)");
        println!("  ls                 List entries in the selected scope");
        println!("  next               Load the next page of entries");
        println!("  groups             List groups");
        println!("  open <group>       Open the membership view for a group");
        println!("  members            Show the members of the open group");
        println!("  add <uid>          Add a user to the open group");
        println!("  rm <uid|dn>        Remove a member from the open group");
        println!("  close              Close the membership view");
        println!("  search <text>      Search users; candidates while a view is open");
        println!("  whoami             Show the logged-in account");
        println!();
        println!("Shell commands:");
        println!("  help, ?            Show this help");
        println!("  exit, quit         Leave the shell");
    }

    async fn cmd_tree(&self, session: &BrowseSession) -> CliResult<()> {
        match session.tree_root().await {
            Some(root) => print!("{}", render_tree(&root)),
            None => println!("The directory has no containers."),
        }
        Ok(())
    }

    async fn cmd_cd(&self, session: &mut BrowseSession, arg: &str) -> CliResult<()> {
        let target = match self.resolve_container(session, arg).await {
            Ok(target) => target,
            Err(message) => {
                println!("{message}");
                return Ok(());
            }
        };

        session.change_selection(target).await?;
        match session.selection() {
            Some(dn) => println!("Scope: {dn}"),
            None => println!("Scope: entire directory"),
        }
        self.cmd_ls(session).await
    }

    /// Resolve a `cd` argument to a container selection.
    ///
    /// Accepts `/` (everywhere), `..`, a full DN, or the label of a child
    /// of the current container.
    async fn resolve_container(
        &self,
        session: &BrowseSession,
        arg: &str,
    ) -> Result<Option<Dn>, String> {
        if arg.is_empty() || arg == "/" {
            return Ok(None);
        }

        let root = session
            .tree_root()
            .await
            .ok_or_else(|| "The container tree is not loaded.".to_string())?;

        if arg == ".." {
            return Ok(match session.selection() {
                Some(selection) => selection
                    .parent()
                    .filter(|parent| root.find(parent).is_some()),
                None => None,
            });
        }

        if arg.contains('=') {
            let dn = Dn::parse(arg);
            return if root.find(&dn).is_some() {
                Ok(Some(dn))
            } else {
                Err(format!("No such container: {arg}"))
            };
        }

        let current = match session.selection() {
            Some(selection) => root
                .find(selection)
                .ok_or_else(|| "The selected container is gone; run 'cd /'.".to_string())?,
            None => &root,
        };
        current
            .children
            .iter()
            .find(|child| child.label == arg)
            .map(|child| Some(child.dn.clone()))
            .ok_or_else(|| format!("No container '{arg}' under {}", current.dn))
    }

    async fn cmd_ls(&self, session: &BrowseSession) -> CliResult<()> {
        let entries = session.coordinator().entries().entries().await;
        if entries.is_empty() {
            println!("No entries in this scope.");
            return Ok(());
        }

        for entry in &entries {
            match entry {
                DirectoryEntry::User(user) => print_user_line(user),
                DirectoryEntry::Group(group) => print_group_line(group),
            }
        }
        println!("\n{} entries", entries.len());
        if session.coordinator().entries().has_more().await {
            println!("More are available; type 'next' to load them.");
        }
        Ok(())
    }

    async fn cmd_next(&self, session: &BrowseSession) -> CliResult<()> {
        if !session.coordinator().entries().has_more().await {
            println!("No further pages.");
            return Ok(());
        }

        session.coordinator().entries().load_next_page().await?;
        self.cmd_ls(session).await
    }

    async fn cmd_groups(&self, session: &BrowseSession) -> CliResult<()> {
        session.coordinator().reload_groups().await?;
        let groups = session.coordinator().groups().await;
        if groups.is_empty() {
            println!("No groups found.");
            return Ok(());
        }

        for group in &groups {
            print_group_line(group);
        }
        println!("\n{} groups", groups.len());
        Ok(())
    }

    async fn cmd_open(&self, session: &BrowseSession, arg: &str) -> CliResult<()> {
        if arg.is_empty() {
            println!("Usage: open <group>");
            return Ok(());
        }

        let mut groups = session.coordinator().groups().await;
        if groups.is_empty() {
            session.coordinator().reload_groups().await?;
            groups = session.coordinator().groups().await;
        }

        let Some(group) = groups.into_iter().find(|g| g.name == arg) else {
            println!("Group not found: {arg}");
            return Ok(());
        };

        let view = session
            .coordinator()
            .open_membership(group.dn.clone())
            .await?;
        println!("Opened membership view for '{}'.", group.name);
        print_members(&view.members().await);
        Ok(())
    }

    async fn cmd_members(&self, session: &BrowseSession) -> CliResult<()> {
        match session.coordinator().membership().await {
            Some(view) => {
                println!("Members of '{}':", view.group_name());
                print_members(&view.members().await);
            }
            None => println!("No membership view is open. Use 'open <group>'."),
        }
        Ok(())
    }

    async fn cmd_add(&self, session: &BrowseSession, arg: &str) -> CliResult<()> {
        if arg.is_empty() {
            println!("Usage: add <uid>");
            return Ok(());
        }

        let candidate = session.facade().get_entry(arg).await?;
        session.coordinator().add_member(&candidate).await?;
        println!("Added '{}'.", candidate.uid);

        if let Some(view) = session.coordinator().membership().await {
            print_members(&view.members().await);
        }
        Ok(())
    }

    async fn cmd_rm(&self, session: &BrowseSession, arg: &str) -> CliResult<()> {
        if arg.is_empty() {
            println!("Usage: rm <uid|dn>");
            return Ok(());
        }

        let Some(view) = session.coordinator().membership().await else {
            println!("No membership view is open. Use 'open <group>'.");
            return Ok(());
        };

        let member_dn = if arg.contains('=') {
            Dn::parse(arg)
        } else {
            let members = view.members().await;
            let attribute = session.login_attribute();
            match members
                .into_iter()
                .find(|dn| dn.leaf_value(attribute) == arg)
            {
                Some(dn) => dn,
                None => {
                    println!("'{arg}' is not a member of '{}'.", view.group_name());
                    return Ok(());
                }
            }
        };

        session.coordinator().remove_member(&member_dn).await?;
        println!("Removed '{member_dn}'.");

        if let Some(view) = session.coordinator().membership().await {
            print_members(&view.members().await);
        }
        Ok(())
    }

    async fn cmd_close(&self, session: &BrowseSession) -> CliResult<()> {
        session.coordinator().close_membership().await;
        println!("Membership view closed.");
        Ok(())
    }

    async fn cmd_search(&self, session: &BrowseSession, arg: &str) -> CliResult<()> {
        if arg.is_empty() {
            println!("Usage: search <text>");
            return Ok(());
        }

        if let Some(view) = session.coordinator().membership().await {
            if arg.trim().chars().count() < 2 {
                println!("Type at least 2 characters to search for candidates.");
                return Ok(());
            }
            let candidates = view.search_candidates(arg).await?;
            if candidates.is_empty() {
                println!("No matching candidates.");
            } else {
                println!("Candidates for '{}':", view.group_name());
                for user in &candidates {
                    print_user_line(user);
                }
            }
            return Ok(());
        }

        let users = session.facade().search_entries(arg).await?;
        if users.is_empty() {
            println!("No users matched '{arg}'.");
        } else {
            for user in &users {
                print_user_line(user);
            }
            println!("\n{} matches", users.len());
        }
        Ok(())
    }

    fn cmd_whoami(&self, session: &BrowseSession) {
        println!("Logged in as {} at {}", session.username(), session.server_url());
    }
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

fn print_user_line(user: &UserEntry) {
    println!(
        "  {:<16} {:<26} {}",
        truncate(&user.uid, 14),
        truncate(&user.name, 24),
        user.email.as_deref().unwrap_or("-"),
    );
}

fn print_group_line(group: &GroupEntry) {
    let kind = match group.kind {
        GroupKind::Posix => "posix",
        GroupKind::GroupOfNames => "groupOfNames",
    };
    println!(
        "  {:<22} {:<14} {:>4} members",
        truncate(&group.name, 20),
        kind,
        group.member_count,
    );
}

fn print_members(members: &[Dn]) {
    if members.is_empty() {
        println!("  (no members)");
        return;
    }
    for member in members {
        println!("  {member}");
    }
}
