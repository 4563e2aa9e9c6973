//! Organizational container tree.
//!
//! The model fetches the full container hierarchy in one call and rebuilds
//! the tree wholesale on every refresh; the source data offers no stable
//! secondary index that would make diffing worthwhile, and container counts
//! are small relative to entry counts.

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;
use tracing::debug;

use crate::dn::Dn;
use crate::error::EngineResult;
use crate::facade::DynFacade;
use crate::model::{RefreshOutcome, ScopeFilter, TreeNode};
use crate::seq::StreamSequence;

/// Client-side view of the container hierarchy.
pub struct DirectoryTreeModel {
    facade: DynFacade,
    seq: StreamSequence,
    state: RwLock<Option<TreeNode>>,
}

impl DirectoryTreeModel {
    pub fn new(facade: DynFacade) -> Self {
        DirectoryTreeModel {
            facade,
            seq: StreamSequence::new(),
            state: RwLock::new(None),
        }
    }

    /// Re-fetch the container hierarchy and replace the held tree.
    ///
    /// Overlapping refreshes follow the stream rule: only the most recently
    /// issued call commits, older responses are discarded as
    /// [`RefreshOutcome::Stale`] no matter the arrival order.
    pub async fn refresh(&self) -> EngineResult<RefreshOutcome> {
        let ticket = self.seq.issue();
        debug!(ticket, "refreshing container tree");

        let result = self.facade.container_tree().await;

        let mut state = self.state.write().await;
        if !self.seq.is_current(ticket) {
            debug!(ticket, "discarding superseded tree refresh");
            return Ok(RefreshOutcome::Stale);
        }
        *state = assemble(result?);
        debug!(
            nodes = state.as_ref().map_or(0, TreeNode::node_count),
            "container tree committed"
        );
        Ok(RefreshOutcome::Committed)
    }

    /// Snapshot of the committed tree, `None` before the first refresh or
    /// when the directory reports no containers.
    pub async fn root(&self) -> Option<TreeNode> {
        self.state.read().await.clone()
    }

    /// Map a selected node to the scope filter the entry fetcher expects.
    ///
    /// An empty or absent selection denotes no restriction.
    pub fn selected_scope(&self, selection: Option<&Dn>) -> ScopeFilter {
        match selection {
            Some(dn) if !dn.is_empty() => ScopeFilter::under(dn.clone()),
            _ => ScopeFilter::everywhere(),
        }
    }
}

/// Assemble a flat container list into a nested tree.
///
/// The shallowest DN becomes the root (first in server order on ties).
/// Every other container hangs off its nearest present ancestor; skipped
/// intermediate levels are materialized so children always sit exactly one
/// level below their parent. Containers outside the root's subtree attach
/// directly to the root as a fallback.
fn assemble(containers: Vec<Dn>) -> Option<TreeNode> {
    let mut seen = HashSet::new();
    let mut ordered: Vec<Dn> = Vec::new();
    for dn in containers {
        if !dn.is_empty() && seen.insert(dn.clone()) {
            ordered.push(dn);
        }
    }

    let root_depth = ordered.iter().map(Dn::depth).min()?;
    let root = ordered.iter().find(|dn| dn.depth() == root_depth)?.clone();

    // Depth-ascending placement keeps parents ahead of their children while
    // preserving server order among siblings.
    let mut by_depth = ordered;
    by_depth.sort_by_key(Dn::depth);

    let mut placed: HashSet<Dn> = HashSet::from([root.clone()]);
    let mut children_of: HashMap<Dn, Vec<Dn>> = HashMap::new();
    for dn in by_depth {
        if dn == root {
            continue;
        }
        attach(dn, &root, &mut placed, &mut children_of);
    }

    Some(build(&root, &children_of))
}

fn attach(
    dn: Dn,
    root: &Dn,
    placed: &mut HashSet<Dn>,
    children_of: &mut HashMap<Dn, Vec<Dn>>,
) {
    if placed.contains(&dn) {
        return;
    }
    let mut current = dn;
    loop {
        placed.insert(current.clone());
        match current.parent() {
            Some(parent) if placed.contains(&parent) => {
                children_of.entry(parent).or_default().push(current);
                return;
            }
            Some(parent) if parent.is_descendant_of(root) => {
                children_of
                    .entry(parent.clone())
                    .or_default()
                    .push(current);
                current = parent;
            }
            _ => {
                children_of.entry(root.clone()).or_default().push(current);
                return;
            }
        }
    }
}

fn build(dn: &Dn, children_of: &HashMap<Dn, Vec<Dn>>) -> TreeNode {
    let mut node = TreeNode::new(dn.clone());
    if let Some(children) = children_of.get(dn) {
        node.children = children.iter().map(|c| build(c, children_of)).collect();
    }
    node
}
