//! Domain logic for the launcher views.
//!
//! Pure functions and small value types, no view state:
//! - Visibility strategies (filtering and on-screen row order)
//! - Sorting (per-level child ordering, size parsing)
//! - Drag payloads and drop resolution
//! - Cross-view name matching
//! - Inline markup stripping for display names

pub mod cross_view;
pub mod drag;
pub mod markup;
pub mod sorting;
pub mod visibility;
