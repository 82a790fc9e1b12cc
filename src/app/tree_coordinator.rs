//! Tree view coordination.
//!
//! Wires selection, expansion, filtering, sorting and dragging together and
//! issues the structural backend requests. Structural changes patch the local
//! tree in place and invalidate only the affected categories; a sort change
//! rebuilds everything.
//!
//! Reconciliation differs per operation:
//! - category reorder: optimistic splice, then the backend's order wins
//! - recategorize, rename, remove: applied after the backend confirms
//! - enabled flag: optimistic, rolled back on failure

use crate::app::{AppState, ApplicationCoordinator, CrossViewSync, LoadOrderCoordinator, SettingsCoordinator};
use crate::domain::drag::{resolve_drop, DragPayload, DropIntent, DropTarget};
use crate::domain::sorting::TreeSortKey;
use crate::io::{AsyncDispatcher, BackendRequest, Ticket};
use crate::model::{CategoryId, ModId, TreeNode};
use crate::state::{RequestSlot, Rollback, SelectModifiers, SelectionSummary};
use tracing::{debug, info, warn};

/// Coordinates the category tree.
pub struct TreeCoordinator;

impl TreeCoordinator {
    // ===== Expansion & Filter =====

    /// Flips or forces the expansion of a category and persists it.
    pub fn toggle_expansion(
        state: &mut AppState,
        dispatcher: &mut AsyncDispatcher,
        id: &CategoryId,
        force: Option<bool>,
    ) {
        if !state.tree.contains_category(id.as_str()) {
            return;
        }
        let open = state.tree_view.toggle_expansion(id, force);
        state.settings.tree_open_state.insert(id.to_string(), open);
        state.tree_cache.invalidate_rows();
        SettingsCoordinator::persist(state, dispatcher);
    }

    /// Sets the tree filter text. Every visible category is forced open.
    pub fn set_filter(state: &mut AppState, dispatcher: &mut AsyncDispatcher, text: &str) {
        if !state.tree_view.set_filter_text(text) {
            return;
        }
        state.tree_cache.invalidate_rows();
        Self::apply_filter_expansion(state);
        SettingsCoordinator::persist(state, dispatcher);
    }

    /// Re-runs the filter pass and opens the categories it forces visible.
    /// Returns true if any category was opened.
    pub fn apply_filter_expansion(state: &mut AppState) -> bool {
        let forced = state
            .tree_cache
            .filter_outcome(&state.tree, state.tree_view.filter_text())
            .forced_open()
            .to_vec();

        let mut changed = false;
        for id in forced {
            if state.tree_view.expand(&id) {
                state.settings.tree_open_state.insert(id.to_string(), true);
                changed = true;
            }
        }
        if changed {
            state.tree_cache.invalidate_rows();
        }
        changed
    }

    /// Makes a mod's row visible: clears a filter hiding it and expands its
    /// category.
    pub fn reveal(state: &mut AppState, id: &ModId) {
        let Some(category) = state.tree.category_of(id.as_str()).cloned() else {
            return;
        };

        let hidden_by_filter = !state
            .tree_cache
            .filter_outcome(&state.tree, state.tree_view.filter_text())
            .mod_visible(id.as_str());
        if hidden_by_filter {
            debug!(mod_id = id.as_str(), "Clearing tree filter to reveal selection");
            state.tree_view.set_filter_text("");
            state.tree_cache.invalidate_rows();
        }

        if state.tree_view.expand(&category) {
            state.settings.tree_open_state.insert(category.to_string(), true);
            state.tree_cache.invalidate_rows();
        }
    }

    // ===== Selection =====

    /// Applies a click on a tree row.
    pub fn select(
        state: &mut AppState,
        dispatcher: &mut AsyncDispatcher,
        node: TreeNode,
        modifiers: SelectModifiers,
    ) {
        let exists = match &node {
            TreeNode::Mod(id) => state.tree.contains_mod(id.as_str()),
            TreeNode::Category(id) => state.tree.contains_category(id.as_str()),
        };
        if !exists {
            return;
        }
        let visible = state.visible_tree_nodes();
        state.selection.select(node, modifiers, &visible);
        Self::after_selection_change(state, dispatcher, true);
    }

    /// Selects a mod on behalf of the list without syncing back to it.
    pub fn select_from_list(state: &mut AppState, dispatcher: &mut AsyncDispatcher, id: ModId) {
        if !state.tree.contains_mod(id.as_str()) {
            return;
        }
        state.selection.select_only(TreeNode::Mod(id.clone()));
        state.details_focus = Some(id);
        Self::after_selection_change(state, dispatcher, false);
    }

    fn after_selection_change(state: &mut AppState, dispatcher: &mut AsyncDispatcher, sync: bool) {
        match state.selection.summary() {
            SelectionSummary::Single(TreeNode::Mod(id)) => {
                Self::reveal(state, &id);
                state.settings.selected_tree_item = Some(id.to_string());
                state.settings.selected_tree_category =
                    state.tree.category_of(id.as_str()).map(|c| c.to_string());
                if sync {
                    CrossViewSync::tree_to_list(state, &id);
                }
                SettingsCoordinator::persist(state, dispatcher);
            }
            SelectionSummary::Single(TreeNode::Category(id)) => {
                state.settings.selected_tree_category = Some(id.to_string());
                SettingsCoordinator::persist(state, dispatcher);
            }
            SelectionSummary::Nothing | SelectionSummary::Multiple(_) => {}
        }
    }

    // ===== Sorting =====

    /// Header click: flips the direction of the active key or switches keys.
    pub fn sort_by(state: &mut AppState, dispatcher: &mut AsyncDispatcher, key: TreeSortKey) {
        let spec = state.tree_view.sort().toggled(key);
        state.tree_view.set_sort(spec);
        state.tree_cache.invalidate();
        SettingsCoordinator::persist(state, dispatcher);
    }

    // ===== Drag & Drop =====

    /// Starts dragging a mod. A mod outside the selection replaces it first,
    /// so the payload is always the selected set.
    pub fn begin_drag_mod(state: &mut AppState, id: &ModId) {
        if !state.tree.contains_mod(id.as_str()) {
            return;
        }
        if !state.selection.is_mod_selected(id.as_str()) {
            state.selection.select_only(TreeNode::Mod(id.clone()));
        }
        let ids = state.selection.selected_mods_ordered(&state.tree);
        state.drag.begin(DragPayload::Mods { ids });
    }

    pub fn begin_drag_category(state: &mut AppState, id: &CategoryId) {
        if state.tree.contains_category(id.as_str()) {
            state.drag.begin(DragPayload::Category { id: id.clone() });
        }
    }

    pub fn drag_enter(state: &mut AppState, target: DropTarget) {
        if state.drag.is_dragging() {
            state.drag.enter(target);
        }
    }

    pub fn drag_leave(state: &mut AppState, target: &DropTarget) {
        state.drag.leave(target);
    }

    /// Ends the drag without dropping.
    pub fn cancel_drag(state: &mut AppState) {
        state.drag.finish();
    }

    /// Resolves a drop on `target` into a backend request.
    pub fn drop_on(state: &mut AppState, dispatcher: &mut AsyncDispatcher, target: DropTarget) -> Option<Ticket> {
        let payload = state.drag.finish()?;
        match resolve_drop(&payload, &target, &state.tree) {
            DropIntent::ReorderCategories { source, target } => {
                Self::reorder_categories(state, dispatcher, source, target)
            }
            DropIntent::Recategorize { ids, target } => Some(ApplicationCoordinator::dispatch(
                state,
                dispatcher,
                BackendRequest::RecategorizeMods { ids, target },
            )),
            DropIntent::ReorderLoadOrder { source, target } => {
                LoadOrderCoordinator::move_by_drop(state, dispatcher, &source, &target)
            }
            DropIntent::Ignore => {
                debug!(kind = ?payload.kind(), ?target, "Ignoring drop");
                None
            }
        }
    }

    fn reorder_categories(
        state: &mut AppState,
        dispatcher: &mut AsyncDispatcher,
        source: CategoryId,
        target: CategoryId,
    ) -> Option<Ticket> {
        let previous = state.tree.category_order();
        if !state.tree.splice_category_before(source.as_str(), target.as_str()) {
            return None;
        }
        state.tree_cache.invalidate_rows();
        let ticket = ApplicationCoordinator::dispatch(
            state,
            dispatcher,
            BackendRequest::ReorderCategories { source, target },
        );
        state.requests.attach_rollback(ticket, Rollback::CategoryOrder(previous));
        Some(ticket)
    }

    // ===== Structural Operations =====

    /// Asks the backend to create a category. Collisions are rejected by the
    /// backend and surfaced when the completion arrives.
    pub fn create_category(state: &mut AppState, dispatcher: &mut AsyncDispatcher, raw_name: &str) -> Option<Ticket> {
        let Ok(name) = CategoryId::parse(raw_name) else {
            state.report_error("Category name cannot be empty");
            return None;
        };
        Some(ApplicationCoordinator::dispatch(
            state,
            dispatcher,
            BackendRequest::CreateCategory { name },
        ))
    }

    pub fn rename_category(
        state: &mut AppState,
        dispatcher: &mut AsyncDispatcher,
        old: &CategoryId,
        raw_new: &str,
    ) -> Option<Ticket> {
        if !state.tree.contains_category(old.as_str()) {
            return None;
        }
        let Ok(new) = CategoryId::parse(raw_new) else {
            state.report_error("Category name cannot be empty");
            return None;
        };
        if &new == old {
            return None;
        }
        Some(ApplicationCoordinator::dispatch(
            state,
            dispatcher,
            BackendRequest::RenameCategory { old: old.clone(), new },
        ))
    }

    /// Removes categories. The default category is never sent.
    pub fn remove_categories(
        state: &mut AppState,
        dispatcher: &mut AsyncDispatcher,
        ids: &[CategoryId],
    ) -> Option<Ticket> {
        let removable: Vec<CategoryId> = ids
            .iter()
            .filter(|id| state.tree.contains_category(id.as_str()) && !state.tree.is_default(id.as_str()))
            .cloned()
            .collect();
        if removable.is_empty() {
            if ids.iter().any(|id| state.tree.is_default(id.as_str())) {
                let message = format!("'{}' cannot be deleted", state.tree.default_category());
                state.report_error(message);
            }
            return None;
        }
        Some(ApplicationCoordinator::dispatch(
            state,
            dispatcher,
            BackendRequest::RemoveCategories { ids: removable },
        ))
    }

    pub fn remove_selected_categories(state: &mut AppState, dispatcher: &mut AsyncDispatcher) -> Option<Ticket> {
        let ids = state.selection.selected_categories_ordered(&state.tree);
        Self::remove_categories(state, dispatcher, &ids)
    }

    /// Enables or disables a mod optimistically.
    pub fn toggle_checked(
        state: &mut AppState,
        dispatcher: &mut AsyncDispatcher,
        id: &ModId,
        enabled: bool,
    ) -> Option<Ticket> {
        let previous = state.tree.mod_item(id.as_str())?.is_checked;
        if previous == enabled {
            return None;
        }
        state.tree.set_checked(id.as_str(), enabled);
        let ticket = ApplicationCoordinator::dispatch(
            state,
            dispatcher,
            BackendRequest::SetModEnabled { id: id.clone(), enabled },
        );
        state.requests.attach_rollback(
            ticket,
            Rollback::Checked {
                id: id.clone(),
                previous,
            },
        );
        Some(ticket)
    }

    // ===== Completions =====

    /// Inserts a created category where the backend's order puts it.
    ///
    /// A stale or mismatched order still inserts the category, just before
    /// the default one.
    pub fn on_category_created(
        state: &mut AppState,
        dispatcher: &mut AsyncDispatcher,
        ticket: Ticket,
        name: &CategoryId,
        order: &[CategoryId],
    ) {
        if state.tree.contains_category(name.as_str()) {
            return;
        }

        let placed = state.requests.is_current(&RequestSlot::CategoryOrder, ticket)
            && state.tree.insert_category(name.clone(), order).is_ok();
        if !placed {
            let mut fallback = state.tree.category_order();
            let at = fallback
                .iter()
                .position(|c| state.tree.is_default(c.as_str()))
                .unwrap_or(fallback.len());
            fallback.insert(at, name.clone());
            if let Err(err) = state.tree.insert_category(name.clone(), &fallback) {
                warn!(category = name.as_str(), "Could not place new category: {err}");
                return;
            }
        }

        info!(category = name.as_str(), "Category created");
        // The cached filter outcome predates the category.
        state.tree_cache.invalidate_categories([name.as_str()]);
        if Self::apply_filter_expansion(state) {
            SettingsCoordinator::persist(state, dispatcher);
        }
        state.report_info(format!("Created category '{name}'"));
    }

    /// Adopts the backend's category order over the optimistic splice.
    pub fn on_categories_reordered(state: &mut AppState, ticket: Ticket, order: &[CategoryId]) {
        if !state.requests.is_current(&RequestSlot::CategoryOrder, ticket) {
            debug!(ticket = ticket.0, "Discarding stale category order");
            return;
        }
        if state.tree.category_order() == order {
            return;
        }
        match state.tree.apply_category_order(order) {
            Ok(()) => {
                debug!("Backend category order differs from the local splice; adopting it");
                state.tree_cache.invalidate_rows();
            }
            Err(err) => {
                warn!("Category order does not match the tree: {err}");
                state.report_error(format!("Category order is out of date: {err}"));
            }
        }
    }

    /// Puts back the order saved before a failed optimistic splice.
    pub fn restore_category_order(state: &mut AppState, ticket: Ticket, previous: &[CategoryId]) {
        if !state.requests.is_current(&RequestSlot::CategoryOrder, ticket) {
            return;
        }
        debug!("Rolling back category order");
        if state.tree.apply_category_order(previous).is_ok() {
            state.tree_cache.invalidate_rows();
        }
    }

    /// Migrates every reference from the old category id to the new one in a
    /// single step.
    pub fn on_category_renamed(
        state: &mut AppState,
        dispatcher: &mut AsyncDispatcher,
        ticket: Ticket,
        old: &CategoryId,
        new: &CategoryId,
    ) {
        if state.requests.is_superseded(ticket) {
            debug!(ticket = ticket.0, "Rename superseded by a newer snapshot");
            return;
        }
        if let Err(err) = state.tree.rename_category(old.as_str(), new.clone()) {
            debug!("Rename no longer applies: {err}");
            return;
        }

        state.tree_view.rename(old.as_str(), new);
        if let Some(open) = state.settings.tree_open_state.remove(old.as_str()) {
            state.settings.tree_open_state.insert(new.to_string(), open);
        }
        state.selection.rename_category(old.as_str(), new);
        if state.settings.selected_tree_category.as_deref() == Some(old.as_str()) {
            state.settings.selected_tree_category = Some(new.to_string());
        }
        state
            .tree_cache
            .invalidate_categories([old.as_str(), new.as_str()]);
        Self::apply_filter_expansion(state);

        info!(old = old.as_str(), new = new.as_str(), "Category renamed");
        SettingsCoordinator::persist(state, dispatcher);
    }

    /// Reparents the mods of removed categories into the default category,
    /// then drops the categories.
    pub fn on_categories_removed(
        state: &mut AppState,
        dispatcher: &mut AsyncDispatcher,
        ticket: Ticket,
        ids: &[CategoryId],
    ) {
        if state.requests.is_superseded(ticket) {
            debug!(ticket = ticket.0, "Removal superseded by a newer snapshot");
            return;
        }

        let default = state.tree.default_category().clone();
        let mut reparented = 0;
        for id in ids {
            match state.tree.remove_category(id.as_str()) {
                Ok(orphans) => {
                    reparented += orphans.len();
                    state.tree_view.forget(id.as_str());
                    state.settings.tree_open_state.remove(id.as_str());
                    state
                        .tree_cache
                        .invalidate_categories([id.as_str(), default.as_str()]);
                    if state.settings.selected_tree_category.as_deref() == Some(id.as_str()) {
                        state.settings.selected_tree_category = None;
                    }
                }
                Err(err) => debug!("Removal no longer applies: {err}"),
            }
        }

        state.selection.retain_existing(&state.tree);
        state.tree_cache.invalidate_rows();
        info!(removed = ids.len(), reparented, "Categories removed");
        SettingsCoordinator::persist(state, dispatcher);
    }

    /// Moves confirmed mods into the target category. Mods claimed by a newer
    /// recategorization are left to that request.
    pub fn on_mods_recategorized(
        state: &mut AppState,
        dispatcher: &mut AsyncDispatcher,
        ticket: Ticket,
        ids: &[ModId],
        target: &CategoryId,
    ) {
        let current: Vec<ModId> = ids
            .iter()
            .filter(|id| state.requests.is_current(&RequestSlot::Membership((*id).clone()), ticket))
            .cloned()
            .collect();
        if current.len() < ids.len() {
            debug!(
                skipped = ids.len() - current.len(),
                "Skipping mods claimed by a newer request"
            );
        }

        let sources: Vec<CategoryId> = current
            .iter()
            .filter_map(|id| state.tree.category_of(id.as_str()).cloned())
            .collect();
        let moved = state.tree.move_mods(&current, target.as_str());
        if moved.is_empty() {
            return;
        }

        state
            .tree_cache
            .invalidate_categories(sources.iter().map(CategoryId::as_str).chain([target.as_str()]));
        info!(count = moved.len(), target = target.as_str(), "Mods recategorized");
        if Self::apply_filter_expansion(state) {
            SettingsCoordinator::persist(state, dispatcher);
        }
    }
}
