//! Browse shell session state
//!
//! Owns the engine coordinator and idle guard for one interactive
//! session, together with the container selection that scopes the
//! entry list.

use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::error::CliResult;
use oxidir_engine::coordinator::ConsistencyCoordinator;
use oxidir_engine::dn::Dn;
use oxidir_engine::facade::DynFacade;
use oxidir_engine::idle::{ActivityKind, IdleSessionGuard};
use oxidir_engine::model::TreeNode;
use oxidir_engine::session::SessionContext;
use std::time::Duration;

/// Live state of an interactive browse session
pub struct BrowseSession {
    coordinator: ConsistencyCoordinator,
    guard: IdleSessionGuard,
    session: SessionContext,
    store: Box<dyn CredentialStore>,
    facade: DynFacade,
    /// Container the entry list is scoped to; `None` lists everywhere
    selection: Option<Dn>,
    /// Account name shown by `whoami`
    username: String,
    server_url: String,
    login_attribute: String,
}

impl BrowseSession {
    /// Build the session and start its idle guard
    pub fn new(
        facade: DynFacade,
        session: SessionContext,
        store: Box<dyn CredentialStore>,
        config: &Config,
        username: String,
    ) -> Self {
        let coordinator = ConsistencyCoordinator::new(
            facade.clone(),
            config.page_size,
            config.login_attribute.clone(),
        );
        let guard = IdleSessionGuard::spawn(
            Duration::from_secs(config.idle_timeout_secs),
            session.clone(),
        );

        Self {
            coordinator,
            guard,
            session,
            store,
            facade,
            selection: None,
            username,
            server_url: config.server_url.clone(),
            login_attribute: config.login_attribute.clone(),
        }
    }

    /// Load the tree, the first entry page, and the group list
    pub async fn initial_load(&self) -> CliResult<()> {
        self.coordinator.tree().refresh().await?;
        self.coordinator.entries().load_first_page().await?;
        self.coordinator.reload_groups().await?;
        Ok(())
    }

    pub fn coordinator(&self) -> &ConsistencyCoordinator {
        &self.coordinator
    }

    pub fn facade(&self) -> &DynFacade {
        &self.facade
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// DN attribute that carries the login name of a user entry
    pub fn login_attribute(&self) -> &str {
        &self.login_attribute
    }

    /// Report user activity to the idle guard
    pub fn record_activity(&self) {
        self.guard.record_activity(ActivityKind::KeyPress);
    }

    /// Whether the idle guard has ended the session
    pub fn is_expired(&self) -> bool {
        self.guard.is_expired()
    }

    pub fn selection(&self) -> Option<&Dn> {
        self.selection.as_ref()
    }

    /// Current tree root, if a refresh has committed one
    pub async fn tree_root(&self) -> Option<TreeNode> {
        self.coordinator.tree().root().await
    }

    /// Move the selection and rescope the entry list accordingly
    pub async fn change_selection(&mut self, selection: Option<Dn>) -> CliResult<()> {
        let scope = self.coordinator.tree().selected_scope(selection.as_ref());
        self.selection = selection;
        self.coordinator.entries().set_scope(scope).await;
        self.coordinator.entries().load_first_page().await?;
        Ok(())
    }

    /// Context shown in the prompt: the selected container label, or `/`
    pub fn prompt_context(&self) -> String {
        match &self.selection {
            Some(dn) => dn.label(),
            None => "/".to_string(),
        }
    }

    /// End the session: drop the persisted credential, clear the live
    /// session, and stop the idle guard
    pub async fn teardown(&self) -> CliResult<()> {
        self.store.delete()?;
        self.session.clear().await;
        self.guard.cancel();
        Ok(())
    }
}
