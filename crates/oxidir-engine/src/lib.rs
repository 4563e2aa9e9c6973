//! # oxidir-engine
//!
//! Session and synchronization engine for administering a hierarchical
//! directory service through a REST façade.
//!
//! The engine owns the client-side consistency logic that sits between a
//! user-facing surface (CLI, shell, UI) and the directory API:
//!
//! - [`dn::Dn`] - distinguished-name parsing and hierarchy resolution
//! - [`tree::DirectoryTreeModel`] - the organizational container tree
//! - [`fetch::ScopedEntryFetcher`] - scoped, cursor-paginated entry retrieval
//! - [`membership::MembershipReconciler`] - group membership views with
//!   optimistic local state reconciled against server truth
//! - [`coordinator::ConsistencyCoordinator`] - refresh fan-out after mutations
//! - [`idle::IdleSessionGuard`] - idle-timeout session teardown
//!
//! The directory server itself is abstracted behind the
//! [`facade::DirectoryFacade`] trait; the engine never speaks the wire
//! protocol directly and treats the façade as a black box with the operation
//! set in that trait.
//!
//! ## Concurrency model
//!
//! All engine calls are non-blocking and may overlap freely. For any one
//! logical data stream (tree, entry list, membership set) only the result of
//! the most recently *issued* request is ever committed; older in-flight
//! requests that resolve later are discarded silently as
//! [`model::RefreshOutcome::Stale`]. Sequencing across streams is the
//! coordinator's job and is satisfied by issuing every required refresh, each
//! independently subject to the per-stream rule.
//!
//! ## Example
//!
//! ```ignore
//! use oxidir_engine::prelude::*;
//!
//! let session = SessionContext::new();
//! let facade: DynFacade = Arc::new(RestDirectory::new(config, session.clone())?);
//!
//! session.install(facade.authenticate("admin", "secret").await?).await;
//!
//! let coordinator = ConsistencyCoordinator::new(facade.clone(), 25);
//! coordinator.tree().refresh().await?;
//! coordinator.entries().load_first_page().await?;
//! ```

pub mod coordinator;
pub mod dn;
pub mod error;
pub mod facade;
pub mod fetch;
pub mod idle;
pub mod membership;
pub mod model;
pub mod seq;
pub mod session;
pub mod tree;

/// Prelude module for convenient imports.
///
/// ```
/// use oxidir_engine::prelude::*;
/// ```
pub mod prelude {
    pub use crate::coordinator::{ConsistencyCoordinator, Mutation};
    pub use crate::dn::Dn;
    pub use crate::error::{EngineError, EngineResult};
    pub use crate::facade::{DirectoryFacade, DynFacade};
    pub use crate::fetch::ScopedEntryFetcher;
    pub use crate::idle::{ActivityKind, GuardState, IdleSessionGuard};
    pub use crate::membership::{MembershipReconciler, ViewState};
    pub use crate::model::{
        DirectoryEntry, EntryPage, EntryUpdate, GroupEntry, GroupKind, NewEntry, NewGroup,
        PageCursor, RefreshOutcome, ScopeFilter, ServiceHealth, TreeNode, UserEntry,
    };
    pub use crate::session::{Credentials, SessionContext};
    pub use crate::tree::DirectoryTreeModel;
}

// Re-export async_trait for facade implementors
pub use async_trait::async_trait;
