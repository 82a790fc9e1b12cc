//! In-memory category → mod hierarchy with O(1) id lookups.

use crate::error::ModelError;
use crate::model::entities::{CategoryRecord, ModItem};
use crate::model::ids::{CategoryId, ModId};
use std::collections::{HashMap, HashSet};

/// Name of the fallback category that receives orphaned mods.
pub const DEFAULT_CATEGORY: &str = "Unassigned";

/// A category node and the ids of the mods it owns, in backend order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    id: CategoryId,
    children: Vec<ModId>,
}

impl Category {
    pub fn id(&self) -> &CategoryId {
        &self.id
    }

    pub fn children(&self) -> &[ModId] {
        &self.children
    }
}

/// The two-level mod tree.
///
/// Invariants:
/// - category ids are unique and the default category is always present
/// - every mod is owned by exactly one category
/// - `owners` and `category_index` always agree with `categories`
#[derive(Debug, Clone)]
pub struct ModTree {
    categories: Vec<Category>,
    category_index: HashMap<CategoryId, usize>,
    mods: HashMap<ModId, ModItem>,
    owners: HashMap<ModId, CategoryId>,
    default_category: CategoryId,
}

impl Default for ModTree {
    fn default() -> Self {
        Self::empty()
    }
}

impl ModTree {
    /// Creates a tree holding only the empty default category.
    pub fn empty() -> Self {
        let default_category = default_category_id();
        let mut tree = Self {
            categories: vec![Category {
                id: default_category.clone(),
                children: Vec::new(),
            }],
            category_index: HashMap::new(),
            mods: HashMap::new(),
            owners: HashMap::new(),
            default_category,
        };
        tree.reindex();
        tree
    }

    /// Builds a tree from backend records, validating every tree invariant.
    pub fn from_records(records: Vec<CategoryRecord>) -> Result<Self, ModelError> {
        let default_category = default_category_id();
        let mut categories = Vec::with_capacity(records.len());
        let mut seen_categories = HashSet::new();
        let mut mods = HashMap::new();

        for record in records {
            if !seen_categories.insert(record.id.clone()) {
                return Err(ModelError::DuplicateCategory(record.id.to_string()));
            }
            let mut children = Vec::with_capacity(record.children.len());
            for item in record.children {
                if mods.contains_key(&item.id) {
                    return Err(ModelError::DuplicateMod(item.id.to_string()));
                }
                children.push(item.id.clone());
                mods.insert(item.id.clone(), item);
            }
            categories.push(Category {
                id: record.id,
                children,
            });
        }

        if !seen_categories.contains(&default_category) {
            return Err(ModelError::MissingDefaultCategory(default_category.to_string()));
        }

        let mut tree = Self {
            categories,
            category_index: HashMap::new(),
            mods,
            owners: HashMap::new(),
            default_category,
        };
        tree.reindex();
        Ok(tree)
    }

    fn reindex(&mut self) {
        self.category_index.clear();
        self.owners.clear();
        for (index, category) in self.categories.iter().enumerate() {
            self.category_index.insert(category.id.clone(), index);
            for child in &category.children {
                self.owners.insert(child.clone(), category.id.clone());
            }
        }
    }

    // ===== Queries =====

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn default_category(&self) -> &CategoryId {
        &self.default_category
    }

    pub fn is_default(&self, id: &str) -> bool {
        self.default_category.as_str() == id
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.category_index.get(id).map(|&i| &self.categories[i])
    }

    pub fn contains_category(&self, id: &str) -> bool {
        self.category_index.contains_key(id)
    }

    pub fn mod_item(&self, id: &str) -> Option<&ModItem> {
        self.mods.get(id)
    }

    pub fn contains_mod(&self, id: &str) -> bool {
        self.mods.contains_key(id)
    }

    /// Returns the category currently owning the mod.
    pub fn category_of(&self, mod_id: &str) -> Option<&CategoryId> {
        self.owners.get(mod_id)
    }

    pub fn mod_count(&self) -> usize {
        self.mods.len()
    }

    pub fn category_order(&self) -> Vec<CategoryId> {
        self.categories.iter().map(|c| c.id.clone()).collect()
    }

    /// Iterates all mods in category order, then child order.
    pub fn mods_in_order(&self) -> impl Iterator<Item = &ModItem> + '_ {
        self.categories
            .iter()
            .flat_map(|c| c.children.iter())
            .filter_map(|id| self.mods.get(id))
    }

    // ===== Mutations =====

    /// Sets the enabled flag of a mod. Returns false if the mod is unknown.
    pub fn set_checked(&mut self, mod_id: &str, checked: bool) -> bool {
        match self.mods.get_mut(mod_id) {
            Some(item) => {
                item.is_checked = checked;
                true
            }
            None => false,
        }
    }

    /// Moves mods into `target`, removing each from its source and appending it.
    ///
    /// Unknown mods and mods already owned by `target` are skipped. Returns the
    /// ids that actually moved, in the order given.
    pub fn move_mods(&mut self, ids: &[ModId], target: &str) -> Vec<ModId> {
        let Some(&target_index) = self.category_index.get(target) else {
            return Vec::new();
        };

        let mut moved = Vec::new();
        for id in ids {
            let Some(source) = self.owners.get(id).cloned() else {
                continue;
            };
            if source.as_str() == target {
                continue;
            }
            if let Some(&source_index) = self.category_index.get(&source) {
                self.categories[source_index].children.retain(|c| c != id);
            }
            self.categories[target_index].children.push(id.clone());
            self.owners
                .insert(id.clone(), self.categories[target_index].id.clone());
            moved.push(id.clone());
        }
        moved
    }

    /// Reorders categories to match an authoritative order.
    ///
    /// The order must be a permutation of the known category ids.
    pub fn apply_category_order(&mut self, order: &[CategoryId]) -> Result<(), ModelError> {
        if order.len() != self.categories.len() {
            return Err(ModelError::CategoryOrderMismatch(format!(
                "expected {} categories, got {}",
                self.categories.len(),
                order.len()
            )));
        }

        let mut remaining: HashMap<CategoryId, Category> = self
            .categories
            .drain(..)
            .map(|c| (c.id.clone(), c))
            .collect();

        let mut reordered = Vec::with_capacity(order.len());
        for id in order {
            match remaining.remove(id) {
                Some(category) => reordered.push(category),
                None => {
                    // Put everything back before reporting the mismatch.
                    reordered.extend(remaining.into_values());
                    self.categories = reordered;
                    self.reindex();
                    return Err(ModelError::CategoryOrderMismatch(format!(
                        "'{id}' is unknown or repeated"
                    )));
                }
            }
        }

        self.categories = reordered;
        self.reindex();
        Ok(())
    }

    /// Adds an empty category, placing it where the authoritative order says.
    pub fn insert_category(
        &mut self,
        id: CategoryId,
        order: &[CategoryId],
    ) -> Result<(), ModelError> {
        if self.category_index.contains_key(&id) {
            return Err(ModelError::DuplicateCategory(id.to_string()));
        }
        self.categories.push(Category {
            id: id.clone(),
            children: Vec::new(),
        });
        self.reindex();

        if let Err(err) = self.apply_category_order(order) {
            self.categories.retain(|c| c.id != id);
            self.reindex();
            return Err(err);
        }
        Ok(())
    }

    /// Moves `source` directly before `target`. Returns true if the order changed.
    pub fn splice_category_before(&mut self, source: &str, target: &str) -> bool {
        if source == target {
            return false;
        }
        let (Some(&from), Some(&to)) = (
            self.category_index.get(source),
            self.category_index.get(target),
        ) else {
            return false;
        };

        let category = self.categories.remove(from);
        let to = if to > from { to - 1 } else { to };
        self.categories.insert(to, category);
        self.reindex();
        from != to
    }

    /// Renames a category, migrating every back-reference to the new id.
    pub fn rename_category(&mut self, old: &str, new: CategoryId) -> Result<(), ModelError> {
        if old == new.as_str() {
            return Ok(());
        }
        if self.is_default(old) {
            return Err(ModelError::DefaultCategoryProtected("renamed"));
        }
        if self.is_default(new.as_str()) {
            return Err(ModelError::DefaultCategoryProtected("a rename target"));
        }
        if self.category_index.contains_key(&new) {
            return Err(ModelError::DuplicateCategory(new.to_string()));
        }
        let &index = self
            .category_index
            .get(old)
            .ok_or_else(|| ModelError::UnknownCategory(old.to_string()))?;

        self.categories[index].id = new;
        self.reindex();
        Ok(())
    }

    /// Removes a category, reparenting its mods into the default category first.
    ///
    /// Returns the ids of the reparented mods.
    pub fn remove_category(&mut self, id: &str) -> Result<Vec<ModId>, ModelError> {
        if self.is_default(id) {
            return Err(ModelError::DefaultCategoryProtected("removed"));
        }
        let &index = self
            .category_index
            .get(id)
            .ok_or_else(|| ModelError::UnknownCategory(id.to_string()))?;

        let orphans = std::mem::take(&mut self.categories[index].children);
        let default_index = self.category_index[&self.default_category];
        self.categories[default_index]
            .children
            .extend(orphans.iter().cloned());
        self.categories.remove(index);
        self.reindex();
        Ok(orphans)
    }
}

fn default_category_id() -> CategoryId {
    CategoryId::parse(DEFAULT_CATEGORY).unwrap_or_else(|_| unreachable!("constant id is valid"))
}
