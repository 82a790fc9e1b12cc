//! Sorting helpers for tree mods and load-order rows.
//!
//! Sorting only ever orders the rendered children of one level: the mods of a
//! single category, or the flat list. It never touches category order and never
//! rewrites a load-order entry's `order`.

use crate::domain::markup::strip_inline_markup;
use crate::model::{LoadOrderEntry, ModId, ModItem, ModTree};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Columns the tree's mod rows can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreeSortKey {
    Name,
    Type,
    Creator,
    Size,
}

/// Columns the load-order list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListSortKey {
    Pack,
    Type,
    Order,
    Location,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn flipped(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

/// Complete sorting specification: one field and one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec<K> {
    pub key: K,
    pub dir: SortDir,
}

impl<K: Copy + PartialEq> SortSpec<K> {
    pub fn ascending(key: K) -> Self {
        Self {
            key,
            dir: SortDir::Asc,
        }
    }

    /// Result of clicking the header of `key`: flips direction on the active
    /// field, otherwise switches field and resets to ascending.
    pub fn toggled(self, key: K) -> Self {
        if self.key == key {
            Self {
                key,
                dir: self.dir.flipped(),
            }
        } else {
            Self::ascending(key)
        }
    }
}

impl Default for SortSpec<TreeSortKey> {
    fn default() -> Self {
        Self::ascending(TreeSortKey::Name)
    }
}

impl Default for SortSpec<ListSortKey> {
    fn default() -> Self {
        Self::ascending(ListSortKey::Order)
    }
}

/// Parses a human-readable size ("10.5 MB") into bytes.
///
/// Units are binary (KB = 1024). The numeric part is rounded to two decimals.
/// Anything unparseable yields 0.
pub fn parse_size(text: &str) -> u64 {
    let text = text.trim();
    let split = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
        .unwrap_or(text.len());
    let (number, unit) = text.split_at(split);
    let number: String = number.chars().filter(|&c| c != ',').collect();

    let Ok(value) = number.parse::<f64>() else {
        return 0;
    };
    if !value.is_finite() || value < 0.0 {
        return 0;
    }

    let multiplier: f64 = match unit.trim().to_ascii_uppercase().as_str() {
        "" | "B" | "BYTES" => 1.0,
        "KB" | "KIB" => 1024.0,
        "MB" | "MIB" => 1024.0 * 1024.0,
        "GB" | "GIB" => 1024.0 * 1024.0 * 1024.0,
        "TB" | "TIB" => 1024.0 * 1024.0 * 1024.0 * 1024.0,
        _ => return 0,
    };

    let value = (value * 100.0).round() / 100.0;
    (value * multiplier).round() as u64
}

/// Key used for sorting. Only one variant is produced per sort field.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Text(String),
    Bytes(u64),
    Number(i32),
}

impl SortValue {
    fn text(s: &str) -> Self {
        SortValue::Text(s.to_lowercase())
    }

    fn from_mod(item: &ModItem, key: TreeSortKey) -> Self {
        match key {
            TreeSortKey::Name => SortValue::text(&strip_inline_markup(&item.name)),
            TreeSortKey::Type => SortValue::text(&item.mod_type),
            TreeSortKey::Creator => SortValue::text(&item.creator),
            TreeSortKey::Size => SortValue::Bytes(parse_size(&item.size)),
        }
    }

    fn from_entry(entry: &LoadOrderEntry, key: ListSortKey) -> Self {
        match key {
            ListSortKey::Pack => SortValue::text(&entry.pack),
            ListSortKey::Type => SortValue::text(&entry.entry_type),
            ListSortKey::Order => SortValue::Number(entry.order),
            ListSortKey::Location => SortValue::text(&entry.location),
        }
    }
}

fn directed(ordering: Ordering, dir: SortDir) -> Ordering {
    match dir {
        SortDir::Asc => ordering,
        SortDir::Desc => ordering.reverse(),
    }
}

/// Returns a category's children in display order for the given sort.
///
/// The sort is stable, so ties keep their incoming order. Unknown ids keep
/// their relative position at the end.
pub fn sort_children(children: &[ModId], tree: &ModTree, spec: SortSpec<TreeSortKey>) -> Vec<ModId> {
    let mut items: Vec<(ModId, Option<SortValue>)> = children
        .iter()
        .map(|id| {
            let key = tree.mod_item(id.as_str()).map(|m| SortValue::from_mod(m, spec.key));
            (id.clone(), key)
        })
        .collect();

    items.sort_by(|a, b| match (&a.1, &b.1) {
        (Some(ka), Some(kb)) => directed(ka.cmp(kb), spec.dir),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    items.into_iter().map(|(id, _)| id).collect()
}

/// Computes list row indices in display order for the given sort.
pub fn sort_entry_indices(entries: &[LoadOrderEntry], spec: SortSpec<ListSortKey>) -> Vec<usize> {
    let mut items: Vec<(usize, SortValue)> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (i, SortValue::from_entry(e, spec.key)))
        .collect();

    items.sort_by(|a, b| directed(a.1.cmp(&b.1), spec.dir));

    items.into_iter().map(|(i, _)| i).collect()
}
