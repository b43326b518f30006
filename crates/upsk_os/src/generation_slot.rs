#![forbid(unsafe_code)]

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenerationTicket(pub u64);

#[derive(Debug, Default)]
struct SlotState {
    next_ticket: u64,
    outstanding: BTreeSet<u64>,
    result: Option<String>,
    resolved_by: Option<GenerationTicket>,
}

/// Display slot for one generation feature.
///
/// Resolutions are applied in arrival order: the result shown is whichever
/// request resolved last, not whichever started last. Requests cannot be
/// cancelled. Clones share state, so a worker thread can resolve into the
/// slot the view reads from.
#[derive(Debug, Clone, Default)]
pub struct GenerationSlot {
    inner: Arc<Mutex<SlotState>>,
}

impl GenerationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn begin(&self) -> GenerationTicket {
        let mut state = self.lock();
        state.next_ticket += 1;
        let ticket = state.next_ticket;
        state.outstanding.insert(ticket);
        GenerationTicket(ticket)
    }

    /// Stores `text` as the displayed result. A ticket resolves at most once;
    /// unknown or already-resolved tickets are ignored and return `false`.
    pub fn resolve(&self, ticket: GenerationTicket, text: String) -> bool {
        let mut state = self.lock();
        if !state.outstanding.remove(&ticket.0) {
            return false;
        }
        state.result = Some(text);
        state.resolved_by = Some(ticket);
        true
    }

    pub fn in_progress(&self) -> bool {
        !self.lock().outstanding.is_empty()
    }

    pub fn result(&self) -> Option<String> {
        self.lock().result.clone()
    }

    pub fn resolved_by(&self) -> Option<GenerationTicket> {
        self.lock().resolved_by
    }

    /// Clears the shown result. Outstanding requests still land when they resolve.
    pub fn clear_result(&self) {
        let mut state = self.lock();
        state.result = None;
        state.resolved_by = None;
    }
}
