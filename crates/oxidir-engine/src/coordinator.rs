//! Refresh fan-out after mutating operations.
//!
//! The coordinator owns the client-side views — container tree, scoped
//! entry list, group list, and the optional open membership view — and
//! executes every mutating command. After a confirmed mutation it issues
//! the minimal set of refreshes that keeps the views mutually consistent:
//!
//! | Mutation | Tree | Entry list | Group list | Membership |
//! |---|---|---|---|---|
//! | create/delete entry | yes | yes | - | - |
//! | update/disable entry | - | yes | - | - |
//! | create/delete group | - | - | yes | - |
//! | add/remove member | - | - | yes | yes |
//!
//! Refreshes are independent concurrent requests, each subject to its own
//! stream's supersession rule; a second mutation issued before the first's
//! refreshes land simply supersedes them.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::dn::Dn;
use crate::error::{EngineError, EngineResult};
use crate::facade::DynFacade;
use crate::fetch::ScopedEntryFetcher;
use crate::membership::MembershipReconciler;
use crate::model::{EntryUpdate, GroupEntry, NewEntry, NewGroup, RefreshOutcome, UserEntry};
use crate::seq::StreamSequence;
use crate::tree::DirectoryTreeModel;

/// Mutating operations the coordinator sequences refreshes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    EntryCreated,
    EntryUpdated,
    EntryDisabled,
    EntryDeleted,
    GroupCreated,
    GroupDeleted,
    MemberAdded,
    MemberRemoved,
}

impl Mutation {
    /// Container counts or structure may have changed.
    fn refreshes_tree(self) -> bool {
        matches!(self, Mutation::EntryCreated | Mutation::EntryDeleted)
    }

    fn refreshes_entry_list(self) -> bool {
        matches!(
            self,
            Mutation::EntryCreated
                | Mutation::EntryUpdated
                | Mutation::EntryDisabled
                | Mutation::EntryDeleted
        )
    }

    /// The group table's member-count column depends on membership
    /// mutations as well as group creation and deletion.
    fn refreshes_group_list(self) -> bool {
        matches!(
            self,
            Mutation::GroupCreated
                | Mutation::GroupDeleted
                | Mutation::MemberAdded
                | Mutation::MemberRemoved
        )
    }

    fn refreshes_membership(self) -> bool {
        matches!(self, Mutation::MemberAdded | Mutation::MemberRemoved)
    }
}

/// Executes mutations and keeps the dependent views consistent.
pub struct ConsistencyCoordinator {
    facade: DynFacade,
    tree: DirectoryTreeModel,
    entries: ScopedEntryFetcher,
    group_seq: StreamSequence,
    group_list: RwLock<Vec<GroupEntry>>,
    membership: RwLock<Option<Arc<MembershipReconciler>>>,
    login_attribute: String,
}

impl ConsistencyCoordinator {
    pub fn new(facade: DynFacade, page_size: u32, login_attribute: impl Into<String>) -> Self {
        ConsistencyCoordinator {
            tree: DirectoryTreeModel::new(facade.clone()),
            entries: ScopedEntryFetcher::new(facade.clone(), page_size),
            facade,
            group_seq: StreamSequence::new(),
            group_list: RwLock::new(Vec::new()),
            membership: RwLock::new(None),
            login_attribute: login_attribute.into(),
        }
    }

    /// The container tree view.
    pub fn tree(&self) -> &DirectoryTreeModel {
        &self.tree
    }

    /// The scoped entry list view.
    pub fn entries(&self) -> &ScopedEntryFetcher {
        &self.entries
    }

    /// Snapshot of the cached group list.
    pub async fn groups(&self) -> Vec<GroupEntry> {
        self.group_list.read().await.clone()
    }

    /// Re-fetch the group list, replacing the cached view.
    pub async fn reload_groups(&self) -> EngineResult<RefreshOutcome> {
        let ticket = self.group_seq.issue();
        debug!(ticket, "reloading group list");

        let result = self.facade.list_groups().await;

        let mut groups = self.group_list.write().await;
        if !self.group_seq.is_current(ticket) {
            debug!(ticket, "discarding superseded group list");
            return Ok(RefreshOutcome::Stale);
        }
        *groups = result?;
        Ok(RefreshOutcome::Committed)
    }

    /// Handle to the open membership view, if any.
    pub async fn membership(&self) -> Option<Arc<MembershipReconciler>> {
        self.membership.read().await.clone()
    }

    /// Open a membership view for a group, replacing any previous view,
    /// and perform the initial authoritative member read.
    ///
    /// On a read failure the view stays open in its loading state and the
    /// error propagates; the caller may retry the load on the returned
    /// handle.
    pub async fn open_membership(
        &self,
        group_dn: Dn,
    ) -> EngineResult<Arc<MembershipReconciler>> {
        if let Some(previous) = self.membership.write().await.take() {
            previous.close().await;
        }
        let view = Arc::new(MembershipReconciler::open(
            self.facade.clone(),
            group_dn,
            self.login_attribute.clone(),
        ));
        *self.membership.write().await = Some(view.clone());
        view.load_members().await?;
        Ok(view)
    }

    /// Close the open membership view, if any.
    pub async fn close_membership(&self) {
        if let Some(view) = self.membership.write().await.take() {
            view.close().await;
        }
    }

    // --- Mutating commands ---

    pub async fn create_entry(&self, entry: &NewEntry) -> EngineResult<UserEntry> {
        let created = self.facade.create_entry(entry).await?;
        self.synchronize(Mutation::EntryCreated).await?;
        Ok(created)
    }

    pub async fn update_entry(
        &self,
        uid: &str,
        update: &EntryUpdate,
    ) -> EngineResult<UserEntry> {
        let updated = self.facade.update_entry(uid, update).await?;
        self.synchronize(Mutation::EntryUpdated).await?;
        Ok(updated)
    }

    pub async fn disable_entry(&self, uid: &str) -> EngineResult<()> {
        self.facade.disable_entry(uid).await?;
        self.synchronize(Mutation::EntryDisabled).await
    }

    pub async fn delete_entry(&self, dn: &Dn) -> EngineResult<()> {
        self.facade.delete_entry(dn).await?;
        self.synchronize(Mutation::EntryDeleted).await
    }

    pub async fn create_group(&self, group: &NewGroup) -> EngineResult<()> {
        self.facade.create_group(group).await?;
        self.synchronize(Mutation::GroupCreated).await
    }

    pub async fn delete_group(&self, name: &str) -> EngineResult<()> {
        self.facade.delete_group(name).await?;
        self.synchronize(Mutation::GroupDeleted).await
    }

    /// Add a candidate to the group whose membership view is open.
    pub async fn add_member(&self, candidate: &UserEntry) -> EngineResult<()> {
        let view = self.require_membership().await?;
        view.add_member(candidate).await?;
        self.synchronize(Mutation::MemberAdded).await
    }

    /// Remove a member from the group whose membership view is open.
    ///
    /// The view applies its targeted local patch on confirmation; the
    /// wholesale reconciling reload is issued here.
    pub async fn remove_member(&self, member_dn: &Dn) -> EngineResult<()> {
        let view = self.require_membership().await?;
        view.remove_member(member_dn).await?;
        self.synchronize(Mutation::MemberRemoved).await
    }

    async fn require_membership(&self) -> EngineResult<Arc<MembershipReconciler>> {
        self.membership
            .read()
            .await
            .clone()
            .ok_or_else(|| EngineError::validation("no membership view is open"))
    }

    /// Issue the refresh set for a confirmed mutation.
    ///
    /// Each refresh is an independent request under its own stream's
    /// supersession rule, issued exactly once. A refresh failure is logged
    /// and swallowed — the mutation itself already succeeded — except for
    /// authentication failure, which propagates so the caller tears the
    /// session down.
    async fn synchronize(&self, mutation: Mutation) -> EngineResult<()> {
        debug!(?mutation, "synchronizing dependent views");
        let (tree, list, groups, members) = tokio::join!(
            self.refresh_tree_if(mutation),
            self.refresh_entry_list_if(mutation),
            self.refresh_group_list_if(mutation),
            self.refresh_membership_if(mutation),
        );

        for result in [tree, list, groups, members] {
            if let Err(err) = result {
                if err.is_auth_failure() {
                    return Err(err);
                }
                warn!(error = %err, ?mutation, "view refresh failed after mutation");
            }
        }
        Ok(())
    }

    async fn refresh_tree_if(&self, mutation: Mutation) -> EngineResult<()> {
        if mutation.refreshes_tree() {
            self.tree.refresh().await?;
        }
        Ok(())
    }

    async fn refresh_entry_list_if(&self, mutation: Mutation) -> EngineResult<()> {
        if mutation.refreshes_entry_list() {
            self.entries.reload().await?;
        }
        Ok(())
    }

    async fn refresh_group_list_if(&self, mutation: Mutation) -> EngineResult<()> {
        if mutation.refreshes_group_list() {
            self.reload_groups().await?;
        }
        Ok(())
    }

    async fn refresh_membership_if(&self, mutation: Mutation) -> EngineResult<()> {
        if mutation.refreshes_membership() {
            if let Some(view) = self.membership().await {
                view.load_members().await?;
            }
        }
        Ok(())
    }
}
