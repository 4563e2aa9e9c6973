//! Scoped, cursor-paginated entry retrieval.

use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::facade::DynFacade;
use crate::model::{DirectoryEntry, PageCursor, RefreshOutcome, ScopeFilter};
use crate::seq::StreamSequence;

struct FetchState {
    scope: ScopeFilter,
    entries: Vec<DirectoryEntry>,
    cursor: Option<PageCursor>,
}

/// Client-side view of the entry list for the currently selected scope.
///
/// Pages accumulate: the first page replaces the visible list and every
/// continuation appends to it. A scope change discards the accumulated list
/// and cursor synchronously and supersedes whatever is still in flight for
/// the old scope. Entries keep server-assigned order; the fetcher never
/// re-sorts and assumes no stability across pages beyond what the server
/// promises.
pub struct ScopedEntryFetcher {
    facade: DynFacade,
    page_size: u32,
    seq: StreamSequence,
    state: RwLock<FetchState>,
}

impl ScopedEntryFetcher {
    pub fn new(facade: DynFacade, page_size: u32) -> Self {
        ScopedEntryFetcher {
            facade,
            page_size,
            seq: StreamSequence::new(),
            state: RwLock::new(FetchState {
                scope: ScopeFilter::everywhere(),
                entries: Vec::new(),
                cursor: None,
            }),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// The currently selected scope.
    pub async fn scope(&self) -> ScopeFilter {
        self.state.read().await.scope.clone()
    }

    /// Snapshot of the accumulated entry list.
    pub async fn entries(&self) -> Vec<DirectoryEntry> {
        self.state.read().await.entries.clone()
    }

    /// Whether a continuation cursor is held.
    pub async fn has_more(&self) -> bool {
        self.state.read().await.cursor.is_some()
    }

    /// Select a new scope.
    ///
    /// Discards the visible list and cursor immediately and invalidates any
    /// in-flight request for the old scope. Selecting the current scope
    /// again is a no-op.
    pub async fn set_scope(&self, scope: ScopeFilter) {
        let mut state = self.state.write().await;
        if state.scope == scope {
            return;
        }
        debug!(old = %state.scope, new = %scope, "entry list scope changed");
        self.seq.supersede();
        state.scope = scope;
        state.entries.clear();
        state.cursor = None;
    }

    /// Load the first page at the current scope, replacing the visible list
    /// and starting a new cursor chain.
    pub async fn load_first_page(&self) -> EngineResult<RefreshOutcome> {
        let (ticket, scope) = {
            let state = self.state.read().await;
            (self.seq.issue(), state.scope.clone())
        };
        debug!(ticket, scope = %scope, "loading first entry page");

        let result = self
            .facade
            .list_entries(&scope, self.page_size, None)
            .await;

        let mut state = self.state.write().await;
        if !self.seq.is_current(ticket) || state.scope != scope {
            debug!(ticket, "discarding superseded entry page");
            return Ok(RefreshOutcome::Stale);
        }
        let page = result?;
        state.entries = page.entries;
        state.cursor = page.next_cursor;
        debug!(
            ticket,
            entries = state.entries.len(),
            has_more = state.cursor.is_some(),
            "entry page committed"
        );
        Ok(RefreshOutcome::Committed)
    }

    /// Continue with the held cursor, appending the next page.
    ///
    /// Fails with a validation error when no continuation cursor is held;
    /// callers check [`ScopedEntryFetcher::has_more`] first.
    ///
    /// # Panics
    ///
    /// Panics if the held cursor does not belong to the current
    /// `(scope, page_size)` pair; [`ScopedEntryFetcher::set_scope`] discards
    /// the cursor on every scope change, so a mismatch is a programming
    /// error, not a recoverable condition.
    pub async fn load_next_page(&self) -> EngineResult<RefreshOutcome> {
        let (ticket, scope, cursor) = {
            let state = self.state.read().await;
            let cursor = state
                .cursor
                .clone()
                .ok_or_else(|| EngineError::validation("no further pages to load"))?;
            (self.seq.issue(), state.scope.clone(), cursor)
        };
        cursor.ensure_matches(&scope, self.page_size);
        debug!(ticket, scope = %scope, "loading continuation entry page");

        let result = self
            .facade
            .list_entries(&scope, self.page_size, Some(&cursor))
            .await;

        let mut state = self.state.write().await;
        if !self.seq.is_current(ticket) || state.scope != scope {
            debug!(ticket, "discarding superseded continuation page");
            return Ok(RefreshOutcome::Stale);
        }
        let page = result?;
        state.entries.extend(page.entries);
        state.cursor = page.next_cursor;
        debug!(
            ticket,
            entries = state.entries.len(),
            has_more = state.cursor.is_some(),
            "continuation page committed"
        );
        Ok(RefreshOutcome::Committed)
    }

    /// Re-fetch the first page at the current scope.
    ///
    /// Identical to [`ScopedEntryFetcher::load_first_page`]; used by the
    /// coordinator to reconcile the list after a mutation.
    pub async fn reload(&self) -> EngineResult<RefreshOutcome> {
        self.load_first_page().await
    }
}
