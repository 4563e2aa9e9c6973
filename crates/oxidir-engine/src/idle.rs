//! Idle-timeout session guard.
//!
//! One guard is instantiated per authenticated session. It runs a single
//! debounced timer task: every recognized activity signal restarts the
//! countdown, and when the configured timeout elapses with no signal the
//! guard clears the session credential, transitions to its terminal
//! `Expired` state exactly once, and notifies the host so it can route the
//! user back to the unauthenticated entry point. Cancellation and `Drop`
//! both stop the timer task; neither a timer nor a listener survives the
//! session ending by any path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Notify};
use tokio::time::{self, Instant};
use tracing::{debug, info, trace};

use crate::session::SessionContext;

/// User-activity signals recognized by the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    PointerMove,
    PointerDown,
    KeyPress,
    Scroll,
    TouchStart,
}

/// Guard lifecycle; `Expired` is terminal for a guard instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Active,
    Expired,
}

/// Handle to a running idle-session guard.
pub struct IdleSessionGuard {
    activity_tx: mpsc::UnboundedSender<ActivityKind>,
    expired: Arc<AtomicBool>,
    expiry_notify: Arc<Notify>,
    shutdown: Arc<Notify>,
}

impl IdleSessionGuard {
    /// Start the guard for a session.
    ///
    /// Must be called within a Tokio runtime; the countdown starts
    /// immediately.
    pub fn spawn(timeout: Duration, session: SessionContext) -> IdleSessionGuard {
        let (activity_tx, mut activity_rx) = mpsc::unbounded_channel();
        let expired = Arc::new(AtomicBool::new(false));
        let expiry_notify = Arc::new(Notify::new());
        let shutdown = Arc::new(Notify::new());

        let guard = IdleSessionGuard {
            activity_tx,
            expired: expired.clone(),
            expiry_notify: expiry_notify.clone(),
            shutdown: shutdown.clone(),
        };

        tokio::spawn(async move {
            let mut deadline = Instant::now() + timeout;
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown.notified() => {
                        debug!("idle guard cancelled");
                        break;
                    }
                    signal = activity_rx.recv() => match signal {
                        Some(kind) => {
                            trace!(?kind, "activity observed, countdown restarted");
                            deadline = Instant::now() + timeout;
                        }
                        None => break,
                    },
                    _ = time::sleep_until(deadline) => {
                        session.clear().await;
                        expired.store(true, Ordering::Release);
                        expiry_notify.notify_waiters();
                        info!(
                            timeout_secs = timeout.as_secs(),
                            "session expired after inactivity"
                        );
                        break;
                    }
                }
            }
        });

        guard
    }

    /// Report a user-activity signal.
    ///
    /// Restarts the countdown while the guard is active; ignored after
    /// expiry or cancellation.
    pub fn record_activity(&self, kind: ActivityKind) {
        let _ = self.activity_tx.send(kind);
    }

    /// Current guard state.
    pub fn state(&self) -> GuardState {
        if self.is_expired() {
            GuardState::Expired
        } else {
            GuardState::Active
        }
    }

    /// Whether the guard has expired the session.
    pub fn is_expired(&self) -> bool {
        self.expired.load(Ordering::Acquire)
    }

    /// Wait until the guard expires the session.
    ///
    /// Returns immediately when expiry has already happened. Never returns
    /// for a cancelled guard.
    pub async fn wait_expired(&self) {
        let notified = self.expiry_notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_expired() {
            return;
        }
        notified.await;
    }

    /// Stop the timer task without expiring the session.
    ///
    /// Used by the explicit logout path; the credential is left for the
    /// caller to clear through its own teardown.
    pub fn cancel(&self) {
        self.shutdown.notify_one();
    }
}

impl Drop for IdleSessionGuard {
    fn drop(&mut self) {
        self.shutdown.notify_one();
    }
}
