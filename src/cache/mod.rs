//! Caching of derived view data.

pub mod tree_cache;

// Re-export commonly used types
pub use tree_cache::TreeCache;
