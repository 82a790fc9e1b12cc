//! Bookkeeping for in-flight backend requests.
//!
//! Requests are never serialized or cancelled. Instead each request records
//! itself as the latest writer of one or more logical slots, and a completion
//! is applied to a slot only if no newer request has claimed it since. A
//! profile snapshot supersedes everything issued before it.

use crate::io::{BackendRequest, Ticket};
use crate::model::{CategoryId, ModId};
use std::collections::HashMap;

/// A piece of view state that a backend response may overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestSlot {
    /// The whole tree and list for a profile.
    Snapshot,
    Settings,
    /// The flat load-order list.
    LoadOrder,
    CategoryOrder,
    /// The enabled flag of one mod.
    Checked(ModId),
    /// The category one mod belongs to.
    Membership(ModId),
}

impl RequestSlot {
    fn survives_snapshot(&self) -> bool {
        matches!(self, RequestSlot::Snapshot | RequestSlot::Settings)
    }
}

/// Slots a request writes when it completes.
pub fn slots_for(request: &BackendRequest) -> Vec<RequestSlot> {
    match request {
        BackendRequest::LoadProfile { .. } => vec![RequestSlot::Snapshot],
        BackendRequest::LoadSettings => vec![RequestSlot::Settings],
        BackendRequest::SetModEnabled { id, .. } => {
            vec![RequestSlot::Checked(id.clone()), RequestSlot::LoadOrder]
        }
        BackendRequest::CreateCategory { .. } | BackendRequest::ReorderCategories { .. } => {
            vec![RequestSlot::CategoryOrder]
        }
        BackendRequest::RecategorizeMods { ids, .. } => {
            ids.iter().cloned().map(RequestSlot::Membership).collect()
        }
        BackendRequest::ReorderLoadOrder { .. } | BackendRequest::MoveLoadOrder { .. } => {
            vec![RequestSlot::LoadOrder]
        }
        BackendRequest::RenameCategory { .. }
        | BackendRequest::RemoveCategories { .. }
        | BackendRequest::Launch { .. }
        | BackendRequest::SaveSettings(_) => Vec::new(),
    }
}

/// Local state to restore if an optimistic request fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rollback {
    Checked { id: ModId, previous: bool },
    CategoryOrder(Vec<CategoryId>),
}

#[derive(Debug, Clone, Default)]
pub struct RequestLedger {
    latest: HashMap<RequestSlot, Ticket>,
    rollbacks: HashMap<Ticket, Rollback>,
    last_snapshot: Option<Ticket>,
}

impl RequestLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `ticket` as the newest writer of each slot.
    pub fn issue(&mut self, ticket: Ticket, slots: &[RequestSlot]) {
        for slot in slots {
            if *slot == RequestSlot::Snapshot {
                self.last_snapshot = Some(ticket);
            }
            self.latest.insert(slot.clone(), ticket);
        }
    }

    pub fn attach_rollback(&mut self, ticket: Ticket, rollback: Rollback) {
        self.rollbacks.insert(ticket, rollback);
    }

    /// True if the completion of `ticket` may still write `slot`.
    pub fn is_current(&self, slot: &RequestSlot, ticket: Ticket) -> bool {
        if !slot.survives_snapshot() && self.last_snapshot.is_some_and(|snap| snap > ticket) {
            return false;
        }
        self.latest.get(slot) == Some(&ticket)
    }

    /// True if a profile snapshot was issued after `ticket`.
    ///
    /// Used for requests that claim no slot but still patch the tree.
    pub fn is_superseded(&self, ticket: Ticket) -> bool {
        self.last_snapshot.is_some_and(|snap| snap > ticket)
    }

    /// Releases `slot` if `ticket` still owns it.
    pub fn settle(&mut self, slot: &RequestSlot, ticket: Ticket) {
        if self.latest.get(slot) == Some(&ticket) {
            self.latest.remove(slot);
        }
    }

    pub fn take_rollback(&mut self, ticket: Ticket) -> Option<Rollback> {
        self.rollbacks.remove(&ticket)
    }
}
