//! Per-stream request sequencing for stale-response suppression.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic issue counter for one logical data stream.
///
/// Every outgoing request for the stream takes a ticket at issue time; at
/// commit time the result is applied only if its ticket is still the most
/// recently issued one. Supersession is detected at commit, not prevented
/// by cancellation: the façade offers no cancellation primitive, so an
/// overtaken request runs to completion and its result is dropped.
#[derive(Debug, Default)]
pub struct StreamSequence {
    issued: AtomicU64,
}

impl StreamSequence {
    pub fn new() -> Self {
        StreamSequence::default()
    }

    /// Take the next issue ticket.
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `ticket` is still the most recently issued one.
    pub fn is_current(&self, ticket: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket
    }

    /// Invalidate every outstanding ticket without issuing a request.
    ///
    /// Used when held state is discarded synchronously (for example on a
    /// scope change) and any in-flight response for the old state must not
    /// commit.
    pub fn supersede(&self) {
        self.issued.fetch_add(1, Ordering::SeqCst);
    }
}
