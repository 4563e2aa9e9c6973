//! Directory façade contract.
//!
//! The engine consumes the directory server through this trait and nothing
//! else; concrete paths and verbs are an implementation detail of the
//! façade. Every credentialed operation reads the injected
//! [`crate::session::SessionContext`]; a missing or rejected credential
//! surfaces as an authentication failure, distinct from a validation
//! failure.

use std::sync::Arc;

use async_trait::async_trait;

use crate::dn::Dn;
use crate::error::EngineResult;
use crate::model::{
    EntryPage, EntryUpdate, GroupEntry, NewEntry, NewGroup, PageCursor, ScopeFilter,
    ServiceHealth, UserEntry,
};
use crate::session::Credentials;

/// Shared handle to a façade implementation.
pub type DynFacade = Arc<dyn DirectoryFacade>;

/// Operations the external directory REST façade must provide.
#[async_trait]
pub trait DirectoryFacade: Send + Sync {
    /// Authenticate and obtain a credential.
    ///
    /// Fails with an authentication error on invalid credentials. The caller
    /// installs the returned credential into the session context; this call
    /// itself requires none.
    async fn authenticate(&self, username: &str, password: &str) -> EngineResult<Credentials>;

    /// Retrieve one page of user entries within `scope`.
    ///
    /// # Arguments
    /// * `scope` - container restriction, or everywhere
    /// * `page_size` - server-enforced page length
    /// * `cursor` - continuation from the previous page; `None` starts a
    ///   new chain
    ///
    /// The returned cursor, when present, continues this exact
    /// `(scope, page_size)` chain and no other.
    async fn list_entries(
        &self,
        scope: &ScopeFilter,
        page_size: u32,
        cursor: Option<&PageCursor>,
    ) -> EngineResult<EntryPage>;

    /// Fetch one user entry by login name.
    async fn get_entry(&self, uid: &str) -> EngineResult<UserEntry>;

    /// Create a user entry.
    ///
    /// Fails with a validation error on a duplicate identifier or invalid
    /// attributes.
    async fn create_entry(&self, entry: &NewEntry) -> EngineResult<UserEntry>;

    /// Apply partial attribute changes to a user entry.
    async fn update_entry(&self, uid: &str, update: &EntryUpdate) -> EngineResult<UserEntry>;

    /// Disable a user entry, blocking further binds without deleting it.
    async fn disable_entry(&self, uid: &str) -> EngineResult<()>;

    /// Delete the entry with the given DN (user or group).
    async fn delete_entry(&self, dn: &Dn) -> EngineResult<()>;

    /// All group records.
    async fn list_groups(&self) -> EngineResult<Vec<GroupEntry>>;

    /// Create a group.
    ///
    /// Fails with a validation error when the kind requires a numeric group
    /// id and none is supplied, or the name already exists.
    async fn create_group(&self, group: &NewGroup) -> EngineResult<()>;

    /// Delete a group by name.
    async fn delete_group(&self, name: &str) -> EngineResult<()>;

    /// Authoritative member list of a group, as DNs.
    async fn group_members(&self, group: &str) -> EngineResult<Vec<Dn>>;

    /// Names of the groups a user belongs to.
    async fn entry_groups(&self, uid: &str) -> EngineResult<Vec<String>>;

    /// Add a member to a group.
    async fn add_member(
        &self,
        group_dn: &Dn,
        member_dn: &Dn,
        member_uid: &str,
    ) -> EngineResult<()>;

    /// Remove a member from a group.
    ///
    /// Fails when the entry is not currently a member.
    async fn remove_member(
        &self,
        group_dn: &Dn,
        member_dn: &Dn,
        member_uid: &str,
    ) -> EngineResult<()>;

    /// The full container hierarchy, as a flat list of container DNs.
    ///
    /// Nesting is resolved client-side by
    /// [`crate::tree::DirectoryTreeModel`].
    async fn container_tree(&self) -> EngineResult<Vec<Dn>>;

    /// Search user entries for membership-candidate lookup.
    ///
    /// Callers reject queries shorter than two characters before invoking
    /// this.
    async fn search_entries(&self, query: &str) -> EngineResult<Vec<UserEntry>>;

    /// Search groups by name.
    async fn search_groups(&self, name: &str) -> EngineResult<Vec<GroupEntry>>;

    /// Lightweight façade health probe; requires no credential.
    async fn health(&self) -> EngineResult<ServiceHealth>;
}
