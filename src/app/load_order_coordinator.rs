//! Load-order list coordination.
//!
//! The list never computes an order of its own. Every move is sent to the
//! backend and the list is replaced wholesale with the answer.

use crate::app::{AppState, ApplicationCoordinator, CrossViewSync, SettingsCoordinator};
use crate::domain::drag::DragPayload;
use crate::domain::sorting::ListSortKey;
use crate::io::{AsyncDispatcher, BackendRequest, Ticket};
use crate::model::{LoadOrder, ModId, MoveDirection};
use crate::state::RequestSlot;
use tracing::debug;

/// Coordinates the flat load-order list.
pub struct LoadOrderCoordinator;

impl LoadOrderCoordinator {
    pub fn set_filter(state: &mut AppState, dispatcher: &mut AsyncDispatcher, text: &str) {
        if !state.list_view.set_filter_text(text) {
            return;
        }
        state.tree_cache.invalidate_list();
        SettingsCoordinator::persist(state, dispatcher);
    }

    /// Header click. Reorders the view only; `order` values are untouched.
    pub fn sort_by(state: &mut AppState, dispatcher: &mut AsyncDispatcher, key: ListSortKey) {
        let spec = state.list_view.sort().toggled(key);
        state.list_view.set_sort(spec);
        state.tree_cache.invalidate_list();
        SettingsCoordinator::persist(state, dispatcher);
    }

    /// Row click. With `sync`, the matching tree mod is selected as well.
    pub fn select(state: &mut AppState, dispatcher: &mut AsyncDispatcher, id: &ModId, sync: bool) {
        if !state.load_order.contains(id.as_str()) {
            return;
        }
        state.list_view.select(Some(id.clone()));
        if sync {
            CrossViewSync::list_to_tree(state, dispatcher, id);
        }
        SettingsCoordinator::persist(state, dispatcher);
    }

    pub fn begin_drag(state: &mut AppState, id: &ModId) {
        if state.load_order.contains(id.as_str()) {
            state.drag.begin(DragPayload::ListEntry { id: id.clone() });
        }
    }

    /// Up/down button. Swapping past either end is left to the backend, which
    /// answers with the unchanged list.
    pub fn move_in_direction(
        state: &mut AppState,
        dispatcher: &mut AsyncDispatcher,
        id: &ModId,
        direction: MoveDirection,
    ) -> Option<Ticket> {
        if !state.load_order.contains(id.as_str()) {
            return None;
        }
        Some(ApplicationCoordinator::dispatch(
            state,
            dispatcher,
            BackendRequest::MoveLoadOrder {
                id: id.clone(),
                direction,
            },
        ))
    }

    /// Drag drop: places `source` above `target`.
    pub fn move_by_drop(
        state: &mut AppState,
        dispatcher: &mut AsyncDispatcher,
        source: &ModId,
        target: &ModId,
    ) -> Option<Ticket> {
        if source == target
            || !state.load_order.contains(source.as_str())
            || !state.load_order.contains(target.as_str())
        {
            return None;
        }
        Some(ApplicationCoordinator::dispatch(
            state,
            dispatcher,
            BackendRequest::ReorderLoadOrder {
                source: source.clone(),
                target: target.clone(),
            },
        ))
    }

    /// Applies an authoritative list. `moved` is re-selected and scrolled to.
    pub fn on_list_replaced(
        state: &mut AppState,
        dispatcher: &mut AsyncDispatcher,
        ticket: Ticket,
        list: LoadOrder,
        moved: Option<&ModId>,
    ) {
        if !state.requests.is_current(&RequestSlot::LoadOrder, ticket) {
            debug!(ticket = ticket.0, "Discarding stale load order");
            return;
        }
        Self::replace_list(state, list);

        if let Some(id) = moved.filter(|id| state.load_order.contains(id.as_str())) {
            state.list_view.select_and_reveal(id.clone());
            SettingsCoordinator::persist(state, dispatcher);
        }
    }

    fn replace_list(state: &mut AppState, list: LoadOrder) {
        debug!(entries = list.len(), "Replacing load order");
        state.load_order = list;
        state.tree_cache.invalidate_list();
        if state
            .list_view
            .selected()
            .is_some_and(|id| !state.load_order.contains(id.as_str()))
        {
            state.list_view.select(None);
        }
    }
}
