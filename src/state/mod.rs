//! State management modules for the launcher.
//!
//! This module contains state-only logic (no UI concerns):
//! - Selection state (selected mods/categories, range anchor)
//! - Tree view state (expansion, filter, sort)
//! - List view state (filter, sort, selected row, scroll requests)
//! - Drag state (payload, hover counters)
//! - Status state (messages, overlays, progress)
//! - Layout state (panel geometry, editor buffers)
//! - Request ledger (stale-response detection, rollbacks)
//! - Session state (profile, startup phase)

mod interaction;
mod layout_state;
mod list_state;
mod requests;
mod selection;
mod session;
mod status;
mod tree_state;

pub use interaction::DragState;
pub use layout_state::LayoutState;
pub use list_state::ListViewState;
pub use requests::{slots_for, RequestLedger, RequestSlot, Rollback};
pub use selection::{SelectModifiers, SelectionState, SelectionSummary};
pub use session::{SessionState, StartupPhase};
pub use status::{Panel, ProgressState, StatusLevel, StatusMessage, StatusState, MESSAGE_TTL};
pub use tree_state::TreeViewState;
