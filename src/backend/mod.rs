//! The native backend boundary.
//!
//! The launcher core never touches the file system, Steam or game processes
//! itself. Everything goes through [`Backend`], whose calls may block and are
//! therefore issued from the async dispatcher, never from the UI thread.

pub mod memory;

use crate::error::BackendResult;
use crate::model::{CategoryId, LauncherSettings, LoadOrderEntry, ModId, MoveDirection, ProfileSnapshot};

pub use memory::MemoryBackend;

/// A coarse progress event pushed by the backend during bulk work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub id: String,
    pub progress: u64,
    pub total: u64,
}

/// Sink for progress events.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// Discards progress.
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _update: ProgressUpdate) {}
}

/// Operations the launcher consumes. Responses are raw and are validated by
/// the dispatcher before they reach view state.
pub trait Backend: Send + Sync {
    /// Full tree and list for a profile.
    fn load_profile(&self, profile: &str, progress: &dyn ProgressReporter) -> BackendResult<ProfileSnapshot>;

    /// Enables or disables a mod, returning the refreshed load order.
    fn set_mod_enabled(&self, id: &ModId, enabled: bool) -> BackendResult<Vec<LoadOrderEntry>>;

    /// Creates a category, returning the full category order.
    fn create_category(&self, name: &CategoryId) -> BackendResult<Vec<CategoryId>>;

    fn rename_category(&self, old: &CategoryId, new: &CategoryId) -> BackendResult<()>;

    /// Removes categories, reparenting their mods into the default category.
    fn remove_categories(&self, ids: &[CategoryId]) -> BackendResult<()>;

    /// Moves `source` before `target`, returning the full category order.
    fn reorder_categories(&self, source: &CategoryId, target: &CategoryId) -> BackendResult<Vec<CategoryId>>;

    fn recategorize_mods(&self, ids: &[ModId], target: &CategoryId) -> BackendResult<()>;

    /// Moves `source` above `target` in the load order.
    fn reorder_load_order(&self, source: &ModId, target: &ModId) -> BackendResult<Vec<LoadOrderEntry>>;

    /// Swaps an entry with its neighbour.
    fn move_load_order(&self, id: &ModId, direction: MoveDirection) -> BackendResult<Vec<LoadOrderEntry>>;

    fn launch(&self, profile: &str, options: &str) -> BackendResult<String>;

    fn load_settings(&self) -> BackendResult<LauncherSettings>;

    fn save_settings(&self, settings: &LauncherSettings) -> BackendResult<()>;
}
