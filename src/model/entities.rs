//! Entity records exchanged with the backend.

use crate::model::ids::{CategoryId, ModId};
use serde::{Deserialize, Serialize};

/// A mod as shown in the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModItem {
    pub id: ModId,
    /// Display name. May carry trusted inline markup; never escaped.
    pub name: String,
    #[serde(rename = "type", default)]
    pub mod_type: String,
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub location: String,
    /// Human-readable size such as "12.5 MB".
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub updated: u64,
    #[serde(default)]
    pub is_checked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_played: Option<String>,
    /// BBCode-like description, shown verbatim in the details panel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ModItem {
    /// Creates a mod with only its identity and display name set.
    pub fn new(id: ModId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            mod_type: String::new(),
            creator: String::new(),
            location: String::new(),
            size: String::new(),
            created: 0,
            updated: 0,
            is_checked: false,
            status: None,
            last_played: None,
            description: None,
        }
    }
}

/// A category with its children, in the nested shape the backend snapshot uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: CategoryId,
    #[serde(default)]
    pub children: Vec<ModItem>,
}

/// A row of the flat load-order list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOrderEntry {
    pub id: ModId,
    pub pack: String,
    #[serde(rename = "type", default)]
    pub entry_type: String,
    /// Load precedence. Assigned by the backend only.
    pub order: i32,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub steam_id: String,
}

/// Direction of a load-order button move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Full tree and list state for one profile, as returned by a refresh.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub categories: Vec<CategoryRecord>,
    pub load_order: Vec<LoadOrderEntry>,
}
