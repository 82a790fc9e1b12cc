//! Validation boundary for data arriving from the backend.
//!
//! Raw JSON is decoded into entity records (ids are normalized during
//! deserialization) and then checked against the model invariants before any
//! of it reaches view state. Malformed data becomes a recoverable
//! `BackendError::Malformed` instead of flowing into rendering.

use crate::error::{BackendError, ModelError};
use crate::model::entities::{LoadOrderEntry, ProfileSnapshot};
use crate::model::ids::CategoryId;
use crate::model::load_order::LoadOrder;
use crate::model::tree::ModTree;
use std::collections::HashSet;

/// Validated contents of a profile snapshot.
#[derive(Debug, Clone)]
pub struct ValidatedSnapshot {
    pub tree: ModTree,
    pub load_order: LoadOrder,
}

/// Validates a decoded snapshot.
pub fn validate_snapshot(snapshot: ProfileSnapshot) -> Result<ValidatedSnapshot, ModelError> {
    let tree = ModTree::from_records(snapshot.categories)?;
    let load_order = LoadOrder::from_entries(snapshot.load_order)?;
    Ok(ValidatedSnapshot { tree, load_order })
}

/// Validates an authoritative category order (no repeats).
pub fn validate_category_order(order: &[CategoryId]) -> Result<(), ModelError> {
    let mut seen = HashSet::with_capacity(order.len());
    for id in order {
        if !seen.insert(id) {
            return Err(ModelError::DuplicateCategory(id.to_string()));
        }
    }
    Ok(())
}

/// Validates an authoritative load-order list.
pub fn validate_load_order(entries: Vec<LoadOrderEntry>) -> Result<LoadOrder, ModelError> {
    LoadOrder::from_entries(entries)
}

/// Decodes and validates a JSON profile snapshot.
pub fn decode_snapshot(json: &str) -> Result<ValidatedSnapshot, BackendError> {
    let snapshot: ProfileSnapshot =
        serde_json::from_str(json).map_err(|e| ModelError::Decode(e.to_string()))?;
    Ok(validate_snapshot(snapshot)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_snapshot_normalizes_ids() {
        let json = r#"{
            "categories": [
                {"id": " Unassigned ", "children": [{"id": " a.pack", "name": "<b>A</b>", "size": "1 MB"}]}
            ],
            "load_order": [{"id": "a.pack ", "pack": "a.pack", "order": 0}]
        }"#;
        let snapshot = decode_snapshot(json).unwrap();
        assert!(snapshot.tree.contains_mod("a.pack"));
        assert!(snapshot.load_order.contains("a.pack"));
    }

    #[test]
    fn test_decode_rejects_invalid_invariants() {
        let json = r#"{
            "categories": [{"id": "Unassigned", "children": []}],
            "load_order": [{"id": "a", "pack": "a", "order": 0}, {"id": "b", "pack": "b", "order": 5}]
        }"#;
        assert!(matches!(
            decode_snapshot(json),
            Err(BackendError::Malformed(ModelError::NonDenseOrder(_)))
        ));

        let json = r#"{"categories": [{"id": "", "children": []}], "load_order": []}"#;
        assert!(decode_snapshot(json).is_err());
    }

    #[test]
    fn test_category_order_rejects_repeats() {
        let order: Vec<CategoryId> = vec!["A".parse().unwrap(), "A".parse().unwrap()];
        assert!(validate_category_order(&order).is_err());
    }
}
