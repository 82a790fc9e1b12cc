//! Name-based linking between tree mods and load-order rows.
//!
//! The two views share no foreign key. Matching is best-effort and the first
//! match wins; no match is not an error.

use crate::domain::markup::strip_inline_markup;
use crate::model::{LoadOrderEntry, ModId, ModTree};

/// Finds the first row, in the given display order, whose pack name is a
/// substring of the mod's plain display name.
pub fn list_row_for_mod<'a, I>(mod_name: &str, rows: I) -> Option<ModId>
where
    I: IntoIterator<Item = &'a LoadOrderEntry>,
{
    let plain = strip_inline_markup(mod_name);
    rows.into_iter()
        .find(|entry| !entry.pack.is_empty() && plain.contains(entry.pack.as_str()))
        .map(|entry| entry.id.clone())
}

/// Finds the tree mod for a list row: an exact plain-name match first, then
/// the first mod whose plain name contains the pack name.
pub fn tree_mod_for_entry(entry: &LoadOrderEntry, tree: &ModTree) -> Option<ModId> {
    if entry.pack.is_empty() {
        return None;
    }

    let names: Vec<(&ModId, String)> = tree
        .mods_in_order()
        .map(|m| (&m.id, strip_inline_markup(&m.name)))
        .collect();

    names
        .iter()
        .find(|(_, name)| *name == entry.pack)
        .or_else(|| names.iter().find(|(_, name)| name.contains(entry.pack.as_str())))
        .map(|(id, _)| (*id).clone())
}
