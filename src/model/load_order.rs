//! The flat load-order list.
//!
//! The backend is the only authority on `order`. This type never assigns or
//! adjusts order values; it only stores a validated list and answers lookups.

use crate::error::ModelError;
use crate::model::entities::LoadOrderEntry;
use crate::model::ids::ModId;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadOrder {
    entries: Vec<LoadOrderEntry>,
    positions: HashMap<ModId, usize>,
}

impl LoadOrder {
    /// Validates a backend list and wraps it, keeping the backend's sequence.
    pub fn from_entries(entries: Vec<LoadOrderEntry>) -> Result<Self, ModelError> {
        validate_entries(&entries)?;
        let positions = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect();
        Ok(Self { entries, positions })
    }

    pub fn entries(&self) -> &[LoadOrderEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, id: &str) -> Option<&LoadOrderEntry> {
        self.positions.get(id).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// The order values in list sequence.
    pub fn orders(&self) -> Vec<i32> {
        self.entries.iter().map(|e| e.order).collect()
    }
}

/// Checks that ids are unique and that `order` values are distinct and dense
/// (a gap-free run starting at 0 or 1).
pub fn validate_entries(entries: &[LoadOrderEntry]) -> Result<(), ModelError> {
    let mut ids = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !ids.insert(entry.id.as_str()) {
            return Err(ModelError::DuplicateEntry(entry.id.to_string()));
        }
    }

    if entries.is_empty() {
        return Ok(());
    }

    let mut orders: Vec<i32> = entries.iter().map(|e| e.order).collect();
    orders.sort_unstable();
    let base = orders[0];
    if base != 0 && base != 1 {
        return Err(ModelError::NonDenseOrder(format!(
            "order starts at {base}, expected 0 or 1"
        )));
    }
    for (offset, &order) in orders.iter().enumerate() {
        let expected = base + offset as i32;
        if order != expected {
            return Err(ModelError::NonDenseOrder(format!(
                "expected order {expected}, found {order}"
            )));
        }
    }
    Ok(())
}
