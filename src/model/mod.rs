//! Entity model: identifiers, records, the category tree and the load order.

pub mod entities;
pub mod ids;
pub mod load_order;
pub mod settings;
pub mod tree;
pub mod wire;

pub use entities::{CategoryRecord, LoadOrderEntry, ModItem, MoveDirection, ProfileSnapshot};
pub use ids::{normalize_id, CategoryId, ModId, TreeNode};
pub use load_order::LoadOrder;
pub use settings::LauncherSettings;
pub use tree::{Category, ModTree, DEFAULT_CATEGORY};
pub use wire::ValidatedSnapshot;
