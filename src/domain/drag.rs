//! Drag payloads and drop resolution.
//!
//! A drag carries a tagged payload through the platform drag channel. On drop
//! the payload and the target are resolved into one of three intents, or
//! ignored when the drop would not change anything.

use crate::model::{CategoryId, ModId, ModTree};
use serde::{Deserialize, Serialize};

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DragPayload {
    /// A category header being reordered among categories.
    Category { id: CategoryId },
    /// One or more mods, always the full selected set at drag start.
    Mods { ids: Vec<ModId> },
    /// A single load-order row.
    ListEntry { id: ModId },
}

impl DragPayload {
    /// Serializes the payload for the drag-data channel.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses drag data. Foreign or garbled data yields `None`.
    pub fn decode(data: &str) -> Option<Self> {
        serde_json::from_str(data).ok()
    }

    pub fn kind(&self) -> DragKind {
        match self {
            DragPayload::Category { .. } => DragKind::Category,
            DragPayload::Mods { .. } => DragKind::Mods,
            DragPayload::ListEntry { .. } => DragKind::ListEntry,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragKind {
    Category,
    Mods,
    ListEntry,
}

/// Element a payload can be hovered over and dropped on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DropTarget {
    /// A category header, or any mod row inside that category.
    Category(CategoryId),
    ListEntry(ModId),
}

/// The backend request a drop translates into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropIntent {
    ReorderCategories { source: CategoryId, target: CategoryId },
    /// Only ids whose current category differs from `target`.
    Recategorize { ids: Vec<ModId>, target: CategoryId },
    ReorderLoadOrder { source: ModId, target: ModId },
    Ignore,
}

/// Resolves a drop. Self-drops, kind mismatches, unknown targets and mod drops
/// where every mod already lives in the target are all ignored.
pub fn resolve_drop(payload: &DragPayload, target: &DropTarget, tree: &ModTree) -> DropIntent {
    match (payload, target) {
        (DragPayload::Category { id }, DropTarget::Category(target)) => {
            if id == target || !tree.contains_category(id.as_str()) || !tree.contains_category(target.as_str()) {
                DropIntent::Ignore
            } else {
                DropIntent::ReorderCategories {
                    source: id.clone(),
                    target: target.clone(),
                }
            }
        }
        (DragPayload::Mods { ids }, DropTarget::Category(target)) => {
            if !tree.contains_category(target.as_str()) {
                return DropIntent::Ignore;
            }
            let movable: Vec<ModId> = ids
                .iter()
                .filter(|id| {
                    tree.category_of(id.as_str())
                        .is_some_and(|owner| owner != target)
                })
                .cloned()
                .collect();
            if movable.is_empty() {
                DropIntent::Ignore
            } else {
                DropIntent::Recategorize {
                    ids: movable,
                    target: target.clone(),
                }
            }
        }
        (DragPayload::ListEntry { id }, DropTarget::ListEntry(target)) => {
            if id == target {
                DropIntent::Ignore
            } else {
                DropIntent::ReorderLoadOrder {
                    source: id.clone(),
                    target: target.clone(),
                }
            }
        }
        _ => DropIntent::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategoryRecord, ModItem, DEFAULT_CATEGORY};

    fn tree() -> ModTree {
        let rec = |id: &str, mods: &[&str]| CategoryRecord {
            id: id.parse().unwrap(),
            children: mods.iter().map(|m| ModItem::new(m.parse().unwrap(), *m)).collect(),
        };
        ModTree::from_records(vec![rec("Graphics", &["C"]), rec(DEFAULT_CATEGORY, &["A", "B"])]).unwrap()
    }

    fn cat(id: &str) -> CategoryId {
        id.parse().unwrap()
    }

    fn mid(id: &str) -> ModId {
        id.parse().unwrap()
    }

    #[test]
    fn test_payload_is_tagged() {
        let payload = DragPayload::Mods {
            ids: vec![mid("A"), mid("B")],
        };
        let encoded = payload.encode().unwrap();
        assert!(encoded.contains(r#""kind":"mods""#));
        assert_eq!(DragPayload::decode(&encoded), Some(payload));
        assert_eq!(DragPayload::decode("category:Graphics"), None);
    }

    #[test]
    fn test_mod_drop_filters_mods_already_in_target() {
        let payload = DragPayload::Mods {
            ids: vec![mid("A"), mid("C")],
        };
        let intent = resolve_drop(&payload, &DropTarget::Category(cat("Graphics")), &tree());
        assert_eq!(
            intent,
            DropIntent::Recategorize {
                ids: vec![mid("A")],
                target: cat("Graphics")
            }
        );

        let only_c = DragPayload::Mods { ids: vec![mid("C")] };
        assert_eq!(
            resolve_drop(&only_c, &DropTarget::Category(cat("Graphics")), &tree()),
            DropIntent::Ignore
        );
    }

    #[test]
    fn test_self_drops_are_ignored() {
        let t = tree();
        let category = DragPayload::Category { id: cat("Graphics") };
        assert_eq!(
            resolve_drop(&category, &DropTarget::Category(cat("Graphics")), &t),
            DropIntent::Ignore
        );
        let entry = DragPayload::ListEntry { id: mid("A") };
        assert_eq!(resolve_drop(&entry, &DropTarget::ListEntry(mid("A")), &t), DropIntent::Ignore);
    }

    #[test]
    fn test_kind_mismatch_is_ignored() {
        let entry = DragPayload::ListEntry { id: mid("A") };
        assert_eq!(
            resolve_drop(&entry, &DropTarget::Category(cat("Graphics")), &tree()),
            DropIntent::Ignore
        );
    }

    #[test]
    fn test_category_reorder() {
        let payload = DragPayload::Category { id: cat(DEFAULT_CATEGORY) };
        assert_eq!(
            resolve_drop(&payload, &DropTarget::Category(cat("Graphics")), &tree()),
            DropIntent::ReorderCategories {
                source: cat(DEFAULT_CATEGORY),
                target: cat("Graphics")
            }
        );
    }
}
