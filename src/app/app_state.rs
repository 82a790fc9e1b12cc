//! Centralized launcher state.
//!
//! The State pattern again: focused state components, each owning its own
//! invariants, composed into one root that coordinators borrow mutably. There
//! is no ambient global; everything a coordinator touches arrives through
//! `&mut AppState`.

use crate::cache::TreeCache;
use crate::domain::visibility::TreeRow;
use crate::model::{LauncherSettings, LoadOrder, LoadOrderEntry, ModId, ModItem, ModTree, TreeNode};
use crate::state::{
    DragState, LayoutState, ListViewState, RequestLedger, SelectionState, SelectionSummary,
    SessionState, StatusState, TreeViewState,
};
use std::time::Instant;

/// What the details area shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailsView<'a> {
    Nothing,
    Mod(&'a ModItem),
    Category { id: &'a str, mods: usize },
    /// "N items selected"
    Summary(usize),
}

/// Main launcher state composed of focused state components.
pub struct AppState {
    // ===== Entity Data =====
    /// Category → mod hierarchy of the active profile
    pub tree: ModTree,

    /// Backend-ordered load order of the active profile
    pub load_order: LoadOrder,

    // ===== Focused State Components =====
    pub selection: SelectionState,

    /// Expansion, filter and sort of the tree
    pub tree_view: TreeViewState,

    /// Filter, sort and selection of the list
    pub list_view: ListViewState,

    pub drag: DragState,

    /// Status messages, overlays and progress
    pub status: StatusState,

    pub layout: LayoutState,

    pub session: SessionState,

    /// In-flight request bookkeeping
    pub requests: RequestLedger,

    // ===== Top-Level State =====
    /// Last known settings blob, including keys the launcher does not own
    pub settings: LauncherSettings,

    /// Mod pinned in the details panel by a list click
    pub details_focus: Option<ModId>,

    /// Derived row cache
    pub tree_cache: TreeCache,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            tree: ModTree::empty(),
            load_order: LoadOrder::default(),
            selection: SelectionState::new(),
            tree_view: TreeViewState::new(),
            list_view: ListViewState::new(),
            drag: DragState::new(),
            status: StatusState::new(),
            layout: LayoutState::new(),
            session: SessionState::new(),
            requests: RequestLedger::new(),
            settings: LauncherSettings::default(),
            details_focus: None,
            tree_cache: TreeCache::new(),
        }
    }

    // ===== Derived Views =====

    /// On-screen tree rows (post-filter, post-sort, collapsed children excluded).
    pub fn tree_rows(&mut self) -> Vec<TreeRow> {
        self.tree_cache
            .rows(
                &self.tree,
                self.tree_view.expanded_set(),
                self.tree_view.filter_text(),
                self.tree_view.sort(),
            )
            .to_vec()
    }

    /// The index space for range selection.
    pub fn visible_tree_nodes(&mut self) -> Vec<TreeNode> {
        self.tree_rows()
            .into_iter()
            .map(|row| match row {
                TreeRow::Category { id, .. } => TreeNode::Category(id),
                TreeRow::Mod { id, .. } => TreeNode::Mod(id),
            })
            .collect()
    }

    /// List rows in display order (post-filter, post-sort).
    pub fn list_rows(&mut self) -> Vec<LoadOrderEntry> {
        let indices = self
            .tree_cache
            .list_rows(
                &self.load_order,
                self.list_view.filter_text(),
                self.list_view.sort(),
            )
            .to_vec();
        let entries = self.load_order.entries();
        indices.into_iter().map(|i| entries[i].clone()).collect()
    }

    pub fn details(&self) -> DetailsView<'_> {
        match self.selection.summary() {
            SelectionSummary::Nothing => self
                .details_focus
                .as_ref()
                .and_then(|id| self.tree.mod_item(id.as_str()))
                .map_or(DetailsView::Nothing, DetailsView::Mod),
            SelectionSummary::Single(TreeNode::Mod(id)) => self
                .tree
                .mod_item(id.as_str())
                .map_or(DetailsView::Nothing, DetailsView::Mod),
            SelectionSummary::Single(TreeNode::Category(id)) => match self.tree.category(id.as_str()) {
                Some(category) => DetailsView::Category {
                    id: category.id().as_str(),
                    mods: category.children().len(),
                },
                None => DetailsView::Nothing,
            },
            SelectionSummary::Multiple(n) => DetailsView::Summary(n),
        }
    }

    // ===== Feedback =====

    pub fn report_error(&mut self, message: impl Into<String>) {
        self.status.error(message, Instant::now());
    }

    pub fn report_info(&mut self, message: impl Into<String>) {
        self.status.info(message, Instant::now());
    }

    // ===== High-Level Coordination Methods =====

    /// Replaces the entity data with a fresh snapshot and drops derived data.
    pub fn install_snapshot(&mut self, tree: ModTree, load_order: LoadOrder) {
        self.tree = tree;
        self.load_order = load_order;
        self.selection.retain_existing(&self.tree);
        if self
            .list_view
            .selected()
            .is_some_and(|id| !self.load_order.contains(id.as_str()))
        {
            self.list_view.select(None);
        }
        if self
            .details_focus
            .as_ref()
            .is_some_and(|id| !self.tree.contains_mod(id.as_str()))
        {
            self.details_focus = None;
        }
        self.drag.finish();
        self.tree_cache.invalidate();
        self.tree_cache.invalidate_list();
    }
}
