//! Utility modules for the launcher GUI.

pub mod formatting;

// Re-export commonly used functions
pub use formatting::{format_count, format_date, format_memory_mb, get_current_memory_mb};
