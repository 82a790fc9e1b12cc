//! Canonical identifiers for tree and list entities.
//!
//! Ids coming from the backend are normalized exactly once, when they are
//! deserialized or parsed into one of these newtypes. Everything downstream
//! (lookup maps, selection sets, expansion keys, drag payloads) stores the
//! newtype, so a key written by one component is always found by another.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Normalizes a raw backend id into its canonical string form.
///
/// Surrounding whitespace is dropped; empty ids and ids carrying control
/// characters are rejected.
pub fn normalize_id(raw: &str) -> Result<String, ModelError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ModelError::EmptyId);
    }
    if trimmed.chars().any(char::is_control) {
        return Err(ModelError::InvalidId(trimmed.escape_debug().to_string()));
    }
    Ok(trimmed.to_string())
}

macro_rules! canonical_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parses and normalizes a raw id.
            pub fn parse(raw: &str) -> Result<Self, ModelError> {
                normalize_id(raw).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ModelError;

            fn try_from(raw: String) -> Result<Self, Self::Error> {
                Self::parse(&raw)
            }
        }

        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                Self::parse(raw)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

canonical_id!(
    /// Stable identity of a mod (file path or workshop id). Also keys load-order entries.
    ModId
);

canonical_id!(
    /// Identity of a category. Doubles as its display name, so a rename changes identity.
    CategoryId
);

/// A node of the two-level tree: either a category header or a mod row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum TreeNode {
    Category(CategoryId),
    Mod(ModId),
}

impl TreeNode {
    pub fn as_mod(&self) -> Option<&ModId> {
        match self {
            TreeNode::Mod(id) => Some(id),
            TreeNode::Category(_) => None,
        }
    }

    pub fn as_category(&self) -> Option<&CategoryId> {
        match self {
            TreeNode::Category(id) => Some(id),
            TreeNode::Mod(_) => None,
        }
    }

    /// Returns true if both nodes are of the same kind (both mods or both categories).
    pub fn same_kind(&self, other: &TreeNode) -> bool {
        matches!(
            (self, other),
            (TreeNode::Mod(_), TreeNode::Mod(_)) | (TreeNode::Category(_), TreeNode::Category(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_normalization_trims_whitespace() {
        let id = ModId::parse("  data/upgrade_pack.pack \n").unwrap();
        assert_eq!(id.as_str(), "data/upgrade_pack.pack");
    }

    #[test]
    fn test_rejects_empty_and_control_chars() {
        assert_eq!(CategoryId::parse("   "), Err(ModelError::EmptyId));
        assert!(matches!(ModId::parse("a\u{0007}b"), Err(ModelError::InvalidId(_))));
    }

    #[test]
    fn test_lookup_by_raw_str_after_normalization() {
        let mut map = HashMap::new();
        map.insert(ModId::parse(" graphics.pack").unwrap(), 1);
        assert_eq!(map.get("graphics.pack"), Some(&1));
    }

    #[test]
    fn test_deserialize_goes_through_normalization() {
        let id: CategoryId = serde_json::from_str("\" Graphics \"").unwrap();
        assert_eq!(id.as_str(), "Graphics");
        assert!(serde_json::from_str::<CategoryId>("\"\"").is_err());
    }
}
