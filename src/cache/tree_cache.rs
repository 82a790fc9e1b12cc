//! Caching of derived tree and list rows.

use crate::domain::sorting::{sort_children, sort_entry_indices, ListSortKey, SortSpec, TreeSortKey};
use crate::domain::visibility::{
    compute_filter, entry_matches, strategy_for, visible_rows, FilterOutcome, TreeRow,
};
use crate::model::{CategoryId, LoadOrder, ModId, ModTree};
use std::collections::{HashMap, HashSet};

/// Cache for derived view rows.
///
/// Structural patches (a mod moved, a category renamed) drop only the entries
/// of the categories involved; a sort change or a fresh snapshot drops
/// everything. Expansion and filter changes only drop the row list.
pub struct TreeCache {
    /// Sorted child ids per category for `sorted_for`.
    pub sorted_children: HashMap<CategoryId, Vec<ModId>>,

    /// Sort spec the `sorted_children` entries were computed with.
    pub sorted_for: Option<SortSpec<TreeSortKey>>,

    /// Filter outcome keyed by the filter text it was computed for.
    pub filter: Option<(String, FilterOutcome)>,

    /// On-screen tree rows.
    pub rows: Option<Vec<TreeRow>>,

    /// Load-order indices in display order (sorted, filtered).
    pub list_rows: Option<Vec<usize>>,

    /// Incremented on every full invalidation.
    pub rebuild_seq: u64,

    /// Incremented on every per-category invalidation.
    pub patch_seq: u64,
}

impl TreeCache {
    pub fn new() -> Self {
        Self {
            sorted_children: HashMap::new(),
            sorted_for: None,
            filter: None,
            rows: None,
            list_rows: None,
            rebuild_seq: 0,
            patch_seq: 0,
        }
    }

    /// Invalidates all cached tree data.
    ///
    /// Called when:
    /// - A new snapshot replaces the tree
    /// - The tree sort changes
    pub fn invalidate(&mut self) {
        self.sorted_children.clear();
        self.sorted_for = None;
        self.filter = None;
        self.rows = None;
        self.rebuild_seq += 1;
    }

    /// Invalidates the entries of the given categories only.
    pub fn invalidate_categories<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        for id in ids {
            self.sorted_children.remove(id);
        }
        self.filter = None;
        self.rows = None;
        self.patch_seq += 1;
    }

    /// Drops the row list only (expansion changed).
    pub fn invalidate_rows(&mut self) {
        self.rows = None;
    }

    pub fn invalidate_list(&mut self) {
        self.list_rows = None;
    }

    /// Returns the filter outcome for `text`, recomputing it if the text changed.
    pub fn filter_outcome(&mut self, tree: &ModTree, text: &str) -> &FilterOutcome {
        let stale = !matches!(&self.filter, Some((cached, _)) if cached == text);
        if stale {
            self.filter = None;
            self.rows = None;
        }
        let (_, outcome) = self.filter.get_or_insert_with(|| {
            (text.to_string(), compute_filter(tree, strategy_for(text).as_ref()))
        });
        outcome
    }

    /// Returns a category's children in display order.
    pub fn sorted_children_of(
        &mut self,
        tree: &ModTree,
        category: &str,
        spec: SortSpec<TreeSortKey>,
    ) -> Vec<ModId> {
        self.ensure_sorted(tree, spec);
        self.sorted_children
            .get(category)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the on-screen rows.
    pub fn rows(
        &mut self,
        tree: &ModTree,
        expanded: &HashSet<CategoryId>,
        filter_text: &str,
        spec: SortSpec<TreeSortKey>,
    ) -> &[TreeRow] {
        self.ensure_sorted(tree, spec);
        self.filter_outcome(tree, filter_text);
        if self.rows.is_none() {
            let filter = self.filter.as_ref().map(|(_, f)| f);
            let empty = FilterOutcome::default();
            let rows = visible_rows(tree, expanded, filter.unwrap_or(&empty), &self.sorted_children);
            self.rows = Some(rows);
        }
        self.rows.as_deref().unwrap_or(&[])
    }

    /// Returns load-order indices in display order.
    pub fn list_rows(
        &mut self,
        list: &LoadOrder,
        filter_text: &str,
        spec: SortSpec<ListSortKey>,
    ) -> &[usize] {
        if self.list_rows.is_none() {
            let entries = list.entries();
            let rows: Vec<usize> = sort_entry_indices(entries, spec)
                .into_iter()
                .filter(|&i| entry_matches(&entries[i], filter_text))
                .collect();
            self.list_rows = Some(rows);
        }
        self.list_rows.as_deref().unwrap_or(&[])
    }

    fn ensure_sorted(&mut self, tree: &ModTree, spec: SortSpec<TreeSortKey>) {
        if self.sorted_for != Some(spec) {
            self.sorted_children.clear();
            self.sorted_for = Some(spec);
            self.rows = None;
        }
        for category in tree.categories() {
            if !self.sorted_children.contains_key(category.id()) {
                let sorted = sort_children(category.children(), tree, spec);
                self.sorted_children.insert(category.id().clone(), sorted);
                self.rows = None;
            }
        }
    }
}

impl Default for TreeCache {
    fn default() -> Self {
        Self::new()
    }
}
