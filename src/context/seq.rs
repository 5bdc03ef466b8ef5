//! Request sequencing.
//!
//! A page that re-fetches while an earlier request is still in flight
//! must not let the stale response overwrite the fresher one. Each fetch
//! takes a ticket; only the holder of the newest ticket may commit its
//! result.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct RequestSeq {
    current: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl RequestSeq {
    pub fn new() -> Self {
        Self {
            current: AtomicU64::new(0),
        }
    }

    /// Starts a new request generation, invalidating all earlier tickets.
    pub fn begin(&self) -> Ticket {
        Ticket(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.current.load(Ordering::SeqCst) == ticket.0
    }
}
