//! Group membership views.
//!
//! One [`MembershipReconciler`] exists per group whose membership is being
//! managed. The member set is derived from the last confirmed server read
//! and fully replaced on every explicit re-fetch, never merged.
//!
//! Mutations are deliberately asymmetric. A confirmed removal filters
//! exactly the removed DN out of the local set, so the view reflects the
//! removal without waiting for a re-fetch round trip. A confirmed addition
//! applies no local patch at all: the current-members truth is always
//! re-derived by a fresh [`MembershipReconciler::load_members`] call
//! (triggered by the coordinator), which also reconciles changes made
//! concurrently by other administrators.

use tokio::sync::RwLock;
use tracing::debug;

use crate::dn::Dn;
use crate::error::{EngineError, EngineResult};
use crate::facade::DynFacade;
use crate::model::{RefreshOutcome, UserEntry};
use crate::seq::StreamSequence;

/// Attribute carrying the group name in its DN.
const GROUP_NAME_ATTRIBUTE: &str = "cn";

/// Minimum length for a candidate search query.
const MIN_QUERY_LEN: usize = 2;

/// Lifecycle of one open membership view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Opened, first authoritative read not yet committed.
    Loading,
    /// Member set reflects the last confirmed server read plus any
    /// confirmed targeted removals.
    Ready,
    /// A membership mutation is in flight.
    Mutating,
    /// View closed; terminal.
    Closed,
}

struct ViewInner {
    state: ViewState,
    members: Vec<Dn>,
}

/// Optimistic local membership view reconciled against server truth.
pub struct MembershipReconciler {
    facade: DynFacade,
    group_dn: Dn,
    group_name: String,
    login_attribute: String,
    seq: StreamSequence,
    inner: RwLock<ViewInner>,
}

impl MembershipReconciler {
    /// Open a membership view for the group with the given DN.
    ///
    /// The group name is derived from the DN's `cn` component; member
    /// identifiers are derived with `login_attribute` (the login-name
    /// attribute of user DNs).
    pub fn open(facade: DynFacade, group_dn: Dn, login_attribute: impl Into<String>) -> Self {
        let group_name = group_dn.leaf_value(GROUP_NAME_ATTRIBUTE);
        MembershipReconciler {
            facade,
            group_dn,
            group_name,
            login_attribute: login_attribute.into(),
            seq: StreamSequence::new(),
            inner: RwLock::new(ViewInner {
                state: ViewState::Loading,
                members: Vec::new(),
            }),
        }
    }

    pub fn group_dn(&self) -> &Dn {
        &self.group_dn
    }

    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    pub async fn state(&self) -> ViewState {
        self.inner.read().await.state
    }

    /// Snapshot of the current member set.
    pub async fn members(&self) -> Vec<Dn> {
        self.inner.read().await.members.clone()
    }

    /// Authoritative member read; wholesale replaces the local set.
    ///
    /// Overlapping loads follow the stream rule: only the most recently
    /// issued read commits.
    pub async fn load_members(&self) -> EngineResult<RefreshOutcome> {
        {
            let inner = self.inner.read().await;
            if inner.state == ViewState::Closed {
                return Err(EngineError::validation("membership view is closed"));
            }
        }
        let ticket = self.seq.issue();
        debug!(group = %self.group_name, ticket, "loading group members");

        let result = self.facade.group_members(&self.group_name).await;

        let mut inner = self.inner.write().await;
        if inner.state == ViewState::Closed || !self.seq.is_current(ticket) {
            debug!(ticket, "discarding superseded member read");
            return Ok(RefreshOutcome::Stale);
        }
        inner.members = result?;
        if inner.state == ViewState::Loading {
            inner.state = ViewState::Ready;
        }
        debug!(
            group = %self.group_name,
            members = inner.members.len(),
            "member set committed"
        );
        Ok(RefreshOutcome::Committed)
    }

    /// Add a candidate to the group.
    ///
    /// The candidate's identifier is resolved from its DN. On success the
    /// local set is *not* patched; the caller triggers the reconciling
    /// reload.
    pub async fn add_member(&self, candidate: &UserEntry) -> EngineResult<()> {
        self.begin_mutation().await?;
        let identifier = candidate.dn.leaf_value(&self.login_attribute);
        debug!(group = %self.group_name, member = %candidate.dn, "adding member");

        let result = self
            .facade
            .add_member(&self.group_dn, &candidate.dn, &identifier)
            .await;

        self.finish_mutation(|_| {}).await;
        result
    }

    /// Remove a member from the group.
    ///
    /// On confirmed success the local set is patched by filtering out
    /// exactly `member_dn`; on failure the set is left unchanged. No
    /// automatic retry: a failed remove may have partially applied, and the
    /// operation is not known to be idempotent.
    pub async fn remove_member(&self, member_dn: &Dn) -> EngineResult<()> {
        self.begin_mutation().await?;
        let identifier = member_dn.leaf_value(&self.login_attribute);
        debug!(group = %self.group_name, member = %member_dn, "removing member");

        let result = self
            .facade
            .remove_member(&self.group_dn, member_dn, &identifier)
            .await;

        if result.is_ok() {
            self.finish_mutation(|members| members.retain(|m| m != member_dn))
                .await;
        } else {
            self.finish_mutation(|_| {}).await;
        }
        result
    }

    /// Search user entries to offer as membership candidates.
    ///
    /// Queries shorter than two characters return no candidates without
    /// calling the façade.
    pub async fn search_candidates(&self, query: &str) -> EngineResult<Vec<UserEntry>> {
        let trimmed = query.trim();
        if trimmed.chars().count() < MIN_QUERY_LEN {
            return Ok(Vec::new());
        }
        self.facade.search_entries(trimmed).await
    }

    /// Close the view, discarding the member set.
    ///
    /// Terminal: any in-flight read is invalidated and later calls fail.
    pub async fn close(&self) {
        let mut inner = self.inner.write().await;
        inner.state = ViewState::Closed;
        inner.members.clear();
        self.seq.supersede();
        debug!(group = %self.group_name, "membership view closed");
    }

    async fn begin_mutation(&self) -> EngineResult<()> {
        let mut inner = self.inner.write().await;
        match inner.state {
            ViewState::Closed => Err(EngineError::validation("membership view is closed")),
            ViewState::Loading | ViewState::Mutating => {
                Err(EngineError::validation("membership view is busy"))
            }
            ViewState::Ready => {
                inner.state = ViewState::Mutating;
                Ok(())
            }
        }
    }

    async fn finish_mutation(&self, patch: impl FnOnce(&mut Vec<Dn>)) {
        let mut inner = self.inner.write().await;
        if inner.state == ViewState::Closed {
            return;
        }
        patch(&mut inner.members);
        inner.state = ViewState::Ready;
    }
}
