//! Tree selection state.
//!
//! Mods and categories are selected independently but never together:
//! selecting a node of one kind clears every node of the other kind.

use crate::model::{CategoryId, ModId, ModTree, TreeNode};
use std::collections::HashSet;

/// Keyboard modifiers that shape a selection click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectModifiers {
    /// Toggle membership without clearing others (ctrl/cmd).
    pub extend: bool,
    /// Select the visual range from the anchor (shift).
    pub range: bool,
}

impl SelectModifiers {
    pub const PLAIN: Self = Self {
        extend: false,
        range: false,
    };

    pub const EXTEND: Self = Self {
        extend: true,
        range: false,
    };

    pub const RANGE: Self = Self {
        extend: false,
        range: true,
    };
}

/// What the details area should show for the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionSummary {
    Nothing,
    Single(TreeNode),
    /// "N items selected"
    Multiple(usize),
}

/// State related to tree selection.
///
/// Responsibilities:
/// - Tracking selected mods and categories (mutually exclusive)
/// - Keeping the anchor for range selection
/// - Migrating or dropping ids when the tree changes
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected_mods: HashSet<ModId>,
    selected_categories: HashSet<CategoryId>,
    /// Last plain or extend-clicked node; range selections start here.
    anchor: Option<TreeNode>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.selected_mods.clear();
        self.selected_categories.clear();
        self.anchor = None;
    }

    // ===== Selection Queries =====

    pub fn is_selected(&self, node: &TreeNode) -> bool {
        match node {
            TreeNode::Mod(id) => self.selected_mods.contains(id),
            TreeNode::Category(id) => self.selected_categories.contains(id),
        }
    }

    pub fn is_mod_selected(&self, id: &str) -> bool {
        self.selected_mods.contains(id)
    }

    pub fn is_category_selected(&self, id: &str) -> bool {
        self.selected_categories.contains(id)
    }

    pub fn selected_mods(&self) -> &HashSet<ModId> {
        &self.selected_mods
    }

    pub fn selected_categories(&self) -> &HashSet<CategoryId> {
        &self.selected_categories
    }

    /// Selected mods in tree order.
    pub fn selected_mods_ordered(&self, tree: &ModTree) -> Vec<ModId> {
        tree.mods_in_order()
            .filter(|m| self.selected_mods.contains(&m.id))
            .map(|m| m.id.clone())
            .collect()
    }

    /// Selected categories in category order.
    pub fn selected_categories_ordered(&self, tree: &ModTree) -> Vec<CategoryId> {
        tree.categories()
            .iter()
            .filter(|c| self.selected_categories.contains(c.id()))
            .map(|c| c.id().clone())
            .collect()
    }

    pub fn anchor(&self) -> Option<&TreeNode> {
        self.anchor.as_ref()
    }

    pub fn len(&self) -> usize {
        self.selected_mods.len() + self.selected_categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The selected mod when exactly one mod is selected.
    pub fn single_mod(&self) -> Option<&ModId> {
        if self.selected_mods.len() == 1 && self.selected_categories.is_empty() {
            self.selected_mods.iter().next()
        } else {
            None
        }
    }

    pub fn summary(&self) -> SelectionSummary {
        match self.len() {
            0 => SelectionSummary::Nothing,
            1 => {
                let node = self
                    .selected_mods
                    .iter()
                    .next()
                    .map(|id| TreeNode::Mod(id.clone()))
                    .or_else(|| {
                        self.selected_categories
                            .iter()
                            .next()
                            .map(|id| TreeNode::Category(id.clone()))
                    });
                node.map_or(SelectionSummary::Nothing, SelectionSummary::Single)
            }
            n => SelectionSummary::Multiple(n),
        }
    }

    // ===== Selection Mutations =====

    /// Applies a click on `node`.
    ///
    /// `visible` is the current on-screen order (post-filter, post-sort,
    /// collapsed children excluded) and is the index space for range
    /// selection. A range covers only nodes of the clicked node's kind. When
    /// the anchor is missing, of the other kind, or no longer on screen, a
    /// range click behaves like a plain click.
    pub fn select(&mut self, node: TreeNode, modifiers: SelectModifiers, visible: &[TreeNode]) {
        if modifiers.range {
            if let Some(range) = self.visual_range(&node, visible) {
                if !modifiers.extend {
                    self.clear_kind_of(&node);
                }
                self.clear_other_kind(&node);
                for member in range {
                    self.insert(member);
                }
                return;
            }
        }

        if modifiers.extend {
            self.clear_other_kind(&node);
            if self.is_selected(&node) {
                self.remove(&node);
            } else {
                self.insert(node.clone());
            }
        } else {
            self.selected_mods.clear();
            self.selected_categories.clear();
            self.insert(node.clone());
        }
        self.anchor = Some(node);
    }

    /// Replaces the selection with a single node.
    pub fn select_only(&mut self, node: TreeNode) {
        self.select(node, SelectModifiers::PLAIN, &[]);
    }

    /// Replaces the selection with the given mods, anchoring on the first.
    pub fn select_mods(&mut self, ids: impl IntoIterator<Item = ModId>) {
        self.selected_mods.clear();
        self.selected_categories.clear();
        self.selected_mods.extend(ids);
        self.anchor = self
            .selected_mods
            .iter()
            .next()
            .map(|id| TreeNode::Mod(id.clone()));
    }

    /// Follows a category rename.
    pub fn rename_category(&mut self, old: &str, new: &CategoryId) {
        if self.selected_categories.remove(old) {
            self.selected_categories.insert(new.clone());
        }
        if let Some(TreeNode::Category(id)) = &self.anchor {
            if id.as_str() == old {
                self.anchor = Some(TreeNode::Category(new.clone()));
            }
        }
    }

    /// Drops every id that no longer exists in the tree.
    pub fn retain_existing(&mut self, tree: &ModTree) {
        self.selected_mods.retain(|id| tree.contains_mod(id.as_str()));
        self.selected_categories
            .retain(|id| tree.contains_category(id.as_str()));
        let anchor_alive = match &self.anchor {
            Some(TreeNode::Mod(id)) => tree.contains_mod(id.as_str()),
            Some(TreeNode::Category(id)) => tree.contains_category(id.as_str()),
            None => true,
        };
        if !anchor_alive {
            self.anchor = None;
        }
    }

    fn visual_range(&self, node: &TreeNode, visible: &[TreeNode]) -> Option<Vec<TreeNode>> {
        let anchor = self.anchor.as_ref()?;
        if !anchor.same_kind(node) {
            return None;
        }
        let from = visible.iter().position(|n| n == anchor)?;
        let to = visible.iter().position(|n| n == node)?;
        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
        Some(
            visible[lo..=hi]
                .iter()
                .filter(|n| n.same_kind(node))
                .cloned()
                .collect(),
        )
    }

    fn insert(&mut self, node: TreeNode) {
        match node {
            TreeNode::Mod(id) => {
                self.selected_mods.insert(id);
            }
            TreeNode::Category(id) => {
                self.selected_categories.insert(id);
            }
        }
    }

    fn remove(&mut self, node: &TreeNode) {
        match node {
            TreeNode::Mod(id) => {
                self.selected_mods.remove(id);
            }
            TreeNode::Category(id) => {
                self.selected_categories.remove(id);
            }
        }
    }

    fn clear_kind_of(&mut self, node: &TreeNode) {
        match node {
            TreeNode::Mod(_) => self.selected_mods.clear(),
            TreeNode::Category(_) => self.selected_categories.clear(),
        }
    }

    fn clear_other_kind(&mut self, node: &TreeNode) {
        match node {
            TreeNode::Mod(_) => self.selected_categories.clear(),
            TreeNode::Category(_) => self.selected_mods.clear(),
        }
    }
}
