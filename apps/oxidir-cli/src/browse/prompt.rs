//! Dynamic prompt generation for the browse shell
//!
//! Shows the selected container so the user always knows what scope
//! `ls` operates on.

use std::io::IsTerminal;

use crate::browse::BrowseSession;

/// Prompt generator for the browse shell
pub struct Prompt;

impl Prompt {
    /// Generate the prompt string based on the current selection
    ///
    /// Format: `oxidir [/]> ` or `oxidir [people]> `
    pub fn generate(session: &BrowseSession) -> String {
        format!("oxidir [{}]> ", session.prompt_context())
    }

    /// Generate a colored prompt for terminals that support ANSI colors
    pub fn generate_colored(session: &BrowseSession) -> String {
        format!(
            "\x1b[32moxidir\x1b[0m [\x1b[36m{}\x1b[0m]> ",
            session.prompt_context()
        )
    }

    /// Check if the terminal supports colors
    pub fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && std::io::stdout().is_terminal()
    }

    /// Generate the appropriate prompt based on terminal capabilities
    pub fn generate_auto(session: &BrowseSession) -> String {
        if Self::supports_color() {
            Self::generate_colored(session)
        } else {
            Self::generate(session)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ConfigPaths};
    use crate::credentials::get_credential_store;
    use async_trait::async_trait;
    use oxidir_engine::dn::Dn;
    use oxidir_engine::error::{EngineError, EngineResult};
    use oxidir_engine::facade::DirectoryFacade;
    use oxidir_engine::model::{
        EntryPage, EntryUpdate, GroupEntry, NewEntry, NewGroup, PageCursor, ScopeFilter,
        ServiceHealth, UserEntry,
    };
    use oxidir_engine::session::{Credentials, SessionContext};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Facade over an empty directory; just enough to host a session.
    struct EmptyDirectory;

    #[async_trait]
    impl DirectoryFacade for EmptyDirectory {
        async fn authenticate(
            &self,
            _username: &str,
            _password: &str,
        ) -> EngineResult<Credentials> {
            Err(EngineError::authentication("invalid credentials"))
        }

        async fn list_entries(
            &self,
            _scope: &ScopeFilter,
            _page_size: u32,
            _cursor: Option<&PageCursor>,
        ) -> EngineResult<EntryPage> {
            Ok(EntryPage {
                entries: Vec::new(),
                next_cursor: None,
            })
        }

        async fn get_entry(&self, uid: &str) -> EngineResult<UserEntry> {
            Err(EngineError::not_found(uid))
        }

        async fn create_entry(&self, _entry: &NewEntry) -> EngineResult<UserEntry> {
            Err(EngineError::validation("read-only"))
        }

        async fn update_entry(&self, uid: &str, _update: &EntryUpdate) -> EngineResult<UserEntry> {
            Err(EngineError::not_found(uid))
        }

        async fn disable_entry(&self, uid: &str) -> EngineResult<()> {
            Err(EngineError::not_found(uid))
        }

        async fn delete_entry(&self, dn: &Dn) -> EngineResult<()> {
            Err(EngineError::not_found(dn.to_string()))
        }

        async fn list_groups(&self) -> EngineResult<Vec<GroupEntry>> {
            Ok(Vec::new())
        }

        async fn create_group(&self, _group: &NewGroup) -> EngineResult<()> {
            Err(EngineError::validation("read-only"))
        }

        async fn delete_group(&self, name: &str) -> EngineResult<()> {
            Err(EngineError::not_found(name))
        }

        async fn group_members(&self, group: &str) -> EngineResult<Vec<Dn>> {
            Err(EngineError::not_found(group))
        }

        async fn entry_groups(&self, _uid: &str) -> EngineResult<Vec<String>> {
            Ok(Vec::new())
        }

        async fn add_member(
            &self,
            group_dn: &Dn,
            _member_dn: &Dn,
            _member_uid: &str,
        ) -> EngineResult<()> {
            Err(EngineError::not_found(group_dn.to_string()))
        }

        async fn remove_member(
            &self,
            group_dn: &Dn,
            _member_dn: &Dn,
            _member_uid: &str,
        ) -> EngineResult<()> {
            Err(EngineError::not_found(group_dn.to_string()))
        }

        async fn container_tree(&self) -> EngineResult<Vec<Dn>> {
            Ok(Vec::new())
        }

        async fn search_entries(&self, _query: &str) -> EngineResult<Vec<UserEntry>> {
            Ok(Vec::new())
        }

        async fn search_groups(&self, _name: &str) -> EngineResult<Vec<GroupEntry>> {
            Ok(Vec::new())
        }

        async fn health(&self) -> EngineResult<ServiceHealth> {
            Ok(ServiceHealth {
                status: "ok".to_string(),
            })
        }
    }

    fn create_test_session(temp_dir: &TempDir) -> BrowseSession {
        let paths = ConfigPaths::from_base(temp_dir.path());
        BrowseSession::new(
            Arc::new(EmptyDirectory),
            SessionContext::new(),
            get_credential_store(&paths),
            &Config::default(),
            "admin".to_string(),
        )
    }

    #[tokio::test]
    async fn test_prompt_without_selection() {
        let temp_dir = TempDir::new().unwrap();
        let session = create_test_session(&temp_dir);
        assert_eq!(Prompt::generate(&session), "oxidir [/]> ");
    }

    #[tokio::test]
    async fn test_prompt_shows_selected_container() {
        let temp_dir = TempDir::new().unwrap();
        let mut session = create_test_session(&temp_dir);
        session
            .change_selection(Some(Dn::parse("ou=people,dc=example,dc=com")))
            .await
            .unwrap();
        assert_eq!(Prompt::generate(&session), "oxidir [people]> ");
    }

    #[tokio::test]
    async fn test_prompt_colored_contains_ansi() {
        let temp_dir = TempDir::new().unwrap();
        let session = create_test_session(&temp_dir);
        let prompt = Prompt::generate_colored(&session);
        assert!(prompt.contains("\x1b["));
    }
}
