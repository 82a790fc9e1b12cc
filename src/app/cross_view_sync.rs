//! Highlight linking between the tree and the load-order list.

use crate::app::{AppState, TreeCoordinator};
use crate::domain::cross_view::{list_row_for_mod, tree_mod_for_entry};
use crate::domain::sorting::sort_entry_indices;
use crate::domain::visibility::entry_matches;
use crate::io::AsyncDispatcher;
use crate::model::ModId;
use tracing::debug;

pub struct CrossViewSync;

impl CrossViewSync {
    /// Selects the list row matching a tree mod, searching every row in
    /// display order. A list filter hiding the match is cleared. No match
    /// leaves the list untouched.
    pub fn tree_to_list(state: &mut AppState, mod_id: &ModId) {
        let Some(name) = state.tree.mod_item(mod_id.as_str()).map(|m| m.name.clone()) else {
            return;
        };
        let entries = state.load_order.entries();
        let ordered = sort_entry_indices(entries, state.list_view.sort())
            .into_iter()
            .map(|i| &entries[i]);
        let Some(row) = list_row_for_mod(&name, ordered) else {
            debug!(mod_id = mod_id.as_str(), "No list row matches mod");
            return;
        };

        let hidden_by_filter = state
            .load_order
            .entry(row.as_str())
            .is_some_and(|entry| !entry_matches(entry, state.list_view.filter_text()));
        if hidden_by_filter {
            debug!(entry = row.as_str(), "Clearing list filter to reveal match");
            state.list_view.set_filter_text("");
            state.tree_cache.invalidate_list();
        }
        state.list_view.select_and_reveal(row);
    }

    /// Selects the tree mod matching a list row and focuses it in the details
    /// panel.
    pub fn list_to_tree(state: &mut AppState, dispatcher: &mut AsyncDispatcher, entry_id: &ModId) {
        let Some(entry) = state.load_order.entry(entry_id.as_str()) else {
            return;
        };
        match tree_mod_for_entry(entry, &state.tree) {
            Some(mod_id) => TreeCoordinator::select_from_list(state, dispatcher, mod_id),
            None => debug!(entry = entry_id.as_str(), "No tree mod matches list row"),
        }
    }
}
