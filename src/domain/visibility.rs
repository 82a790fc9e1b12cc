//! Visibility strategies and on-screen row computation for the tree and list.
//!
//! The strategy decides which categories and mods pass the current filter;
//! row computation then walks categories in order, applies expansion and child
//! ordering, and yields the rows in exactly the order they appear on screen.
//! That row order is the index space for range selection.

use crate::model::{Category, CategoryId, LoadOrderEntry, ModId, ModItem, ModTree};
use std::collections::{HashMap, HashSet};

/// Strategy for deciding which tree nodes pass the filter.
pub trait VisibilityStrategy {
    /// Should the mod row be shown?
    fn include_mod(&self, item: &ModItem) -> bool;

    /// Does the category header match on its own (independent of children)?
    fn category_matches(&self, category: &Category) -> bool;

    /// Should a category with `visible_children` passing children be shown?
    fn include_category(&self, category: &Category, visible_children: usize) -> bool {
        self.category_matches(category) || visible_children > 0
    }

    /// Whether this strategy narrows the tree at all.
    fn is_active(&self) -> bool;
}

/// Baseline strategy: everything is visible.
pub struct UnfilteredStrategy;

impl VisibilityStrategy for UnfilteredStrategy {
    fn include_mod(&self, _item: &ModItem) -> bool {
        true
    }

    fn category_matches(&self, _category: &Category) -> bool {
        true
    }

    fn is_active(&self) -> bool {
        false
    }
}

/// Case-insensitive substring filter.
///
/// A mod passes iff its id contains the text. A category passes iff its name
/// contains the text or it has at least one passing child.
pub struct TextFilterStrategy {
    needle: String,
}

impl TextFilterStrategy {
    pub fn new(text: &str) -> Self {
        Self {
            needle: text.to_lowercase(),
        }
    }
}

impl VisibilityStrategy for TextFilterStrategy {
    fn include_mod(&self, item: &ModItem) -> bool {
        item.id.as_str().to_lowercase().contains(&self.needle)
    }

    fn category_matches(&self, category: &Category) -> bool {
        category.id().as_str().to_lowercase().contains(&self.needle)
    }

    fn is_active(&self) -> bool {
        true
    }
}

/// Picks the strategy for a filter text. Empty text means unfiltered.
pub fn strategy_for(text: &str) -> Box<dyn VisibilityStrategy> {
    if text.is_empty() {
        Box::new(UnfilteredStrategy)
    } else {
        Box::new(TextFilterStrategy::new(text))
    }
}

/// Result of a full filter pass over the tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    active: bool,
    visible_mods: HashSet<ModId>,
    visible_categories: HashSet<CategoryId>,
    /// Categories the filter forces open, in category order.
    forced_open: Vec<CategoryId>,
}

impl FilterOutcome {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn mod_visible(&self, id: &str) -> bool {
        !self.active || self.visible_mods.contains(id)
    }

    pub fn category_visible(&self, id: &str) -> bool {
        !self.active || self.visible_categories.contains(id)
    }

    pub fn forced_open(&self) -> &[CategoryId] {
        &self.forced_open
    }
}

/// Runs the filter over the whole tree from scratch.
pub fn compute_filter(tree: &ModTree, strategy: &dyn VisibilityStrategy) -> FilterOutcome {
    if !strategy.is_active() {
        return FilterOutcome::default();
    }

    let mut outcome = FilterOutcome {
        active: true,
        ..FilterOutcome::default()
    };

    for category in tree.categories() {
        let mut visible_children = 0;
        for child in category.children() {
            if let Some(item) = tree.mod_item(child.as_str()) {
                if strategy.include_mod(item) {
                    outcome.visible_mods.insert(child.clone());
                    visible_children += 1;
                }
            }
        }

        if strategy.include_category(category, visible_children) {
            outcome.visible_categories.insert(category.id().clone());
            // Matching categories open, and so do categories hiding matches.
            outcome.forced_open.push(category.id().clone());
        }
    }

    outcome
}

/// Provider for the display order of a category's children.
pub trait ChildOrderProvider {
    fn ordered_children(&self, category: &Category) -> Vec<ModId>;
}

/// Keeps children in backend order.
pub struct NaturalChildOrder;

impl ChildOrderProvider for NaturalChildOrder {
    fn ordered_children(&self, category: &Category) -> Vec<ModId> {
        category.children().to_vec()
    }
}

impl ChildOrderProvider for HashMap<CategoryId, Vec<ModId>> {
    fn ordered_children(&self, category: &Category) -> Vec<ModId> {
        self.get(category.id())
            .cloned()
            .unwrap_or_else(|| category.children().to_vec())
    }
}

/// A row as it appears on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeRow {
    Category {
        id: CategoryId,
        expanded: bool,
        /// Children passing the filter (shown as the header's count).
        visible_children: usize,
    },
    Mod {
        id: ModId,
        category: CategoryId,
    },
}

impl TreeRow {
    pub fn mod_id(&self) -> Option<&ModId> {
        match self {
            TreeRow::Mod { id, .. } => Some(id),
            TreeRow::Category { .. } => None,
        }
    }

    pub fn category_id(&self) -> Option<&CategoryId> {
        match self {
            TreeRow::Category { id, .. } => Some(id),
            TreeRow::Mod { .. } => None,
        }
    }
}

/// Computes the on-screen rows: visible categories in category order, each
/// followed by its visible children (in provider order) when expanded.
pub fn visible_rows(
    tree: &ModTree,
    expanded: &HashSet<CategoryId>,
    filter: &FilterOutcome,
    order: &dyn ChildOrderProvider,
) -> Vec<TreeRow> {
    let mut rows = Vec::with_capacity(tree.categories().len() + tree.mod_count());

    for category in tree.categories() {
        if !filter.category_visible(category.id().as_str()) {
            continue;
        }

        let children: Vec<ModId> = order
            .ordered_children(category)
            .into_iter()
            .filter(|id| filter.mod_visible(id.as_str()))
            .collect();
        let is_expanded = expanded.contains(category.id());

        rows.push(TreeRow::Category {
            id: category.id().clone(),
            expanded: is_expanded,
            visible_children: children.len(),
        });

        if is_expanded {
            rows.extend(children.into_iter().map(|id| TreeRow::Mod {
                id,
                category: category.id().clone(),
            }));
        }
    }

    rows
}

/// Case-insensitive match of a list row against the list filter text.
pub fn entry_matches(entry: &LoadOrderEntry, text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    let needle = text.to_lowercase();
    entry.pack.to_lowercase().contains(&needle) || entry.id.as_str().to_lowercase().contains(&needle)
}
