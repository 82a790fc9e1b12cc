//! Tree expansion, filter and sort state.

use crate::domain::sorting::{SortSpec, TreeSortKey};
use crate::model::CategoryId;
use std::collections::{HashMap, HashSet};

/// State related to the category tree view.
///
/// Responsibilities:
/// - Tracking which categories are expanded
/// - Holding the active filter text
/// - Holding the active mod sort
#[derive(Debug, Clone, Default)]
pub struct TreeViewState {
    /// Set of expanded category ids
    expanded: HashSet<CategoryId>,
    filter_text: String,
    sort: SortSpec<TreeSortKey>,
}

impl TreeViewState {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Expansion Queries =====

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn expanded_set(&self) -> &HashSet<CategoryId> {
        &self.expanded
    }

    // ===== Expansion Mutations =====

    /// Flips the expansion of a category, or forces it to `force`.
    ///
    /// # Returns
    /// The new expansion state.
    pub fn toggle_expansion(&mut self, id: &CategoryId, force: Option<bool>) -> bool {
        let open = force.unwrap_or_else(|| !self.expanded.contains(id));
        if open {
            self.expanded.insert(id.clone());
        } else {
            self.expanded.remove(id);
        }
        open
    }

    /// Expands a category. Returns true if it was collapsed before.
    pub fn expand(&mut self, id: &CategoryId) -> bool {
        self.expanded.insert(id.clone())
    }

    /// Moves the expansion flag from an old category id to a new one.
    pub fn rename(&mut self, old: &str, new: &CategoryId) {
        if self.expanded.remove(old) {
            self.expanded.insert(new.clone());
        }
    }

    pub fn forget(&mut self, id: &str) {
        self.expanded.remove(id);
    }

    /// Replaces expansion from the persisted map.
    pub fn restore_expansion(&mut self, open_state: &HashMap<String, bool>) {
        self.expanded = open_state
            .iter()
            .filter(|(_, open)| **open)
            .filter_map(|(id, _)| CategoryId::parse(id).ok())
            .collect();
    }

    // ===== Filter =====

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    /// Returns true if the text changed.
    pub fn set_filter_text(&mut self, text: &str) -> bool {
        if self.filter_text == text {
            return false;
        }
        self.filter_text = text.to_string();
        true
    }

    // ===== Sorting =====

    pub fn sort(&self) -> SortSpec<TreeSortKey> {
        self.sort
    }

    pub fn set_sort(&mut self, spec: SortSpec<TreeSortKey>) {
        self.sort = spec;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> CategoryId {
        s.parse().unwrap()
    }

    #[test]
    fn test_toggle_and_force() {
        let mut state = TreeViewState::new();
        assert!(state.toggle_expansion(&id("Graphics"), None));
        assert!(!state.toggle_expansion(&id("Graphics"), None));
        assert!(state.toggle_expansion(&id("Graphics"), Some(true)));
        assert!(state.toggle_expansion(&id("Graphics"), Some(true)));
        assert!(state.is_expanded("Graphics"));
    }

    #[test]
    fn test_restore_ignores_closed_and_invalid_keys() {
        let mut state = TreeViewState::new();
        let map = HashMap::from([
            ("Graphics".to_string(), true),
            ("Audio".to_string(), false),
            ("  ".to_string(), true),
        ]);
        state.restore_expansion(&map);
        assert_eq!(state.expanded_set().len(), 1);
        assert!(state.is_expanded("Graphics"));
    }

    #[test]
    fn test_rename_moves_expansion() {
        let mut state = TreeViewState::new();
        state.expand(&id("Audio"));
        state.rename("Audio", &id("Sound"));
        assert!(!state.is_expanded("Audio"));
        assert!(state.is_expanded("Sound"));
    }
}
