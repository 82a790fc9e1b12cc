//! State and synchronization core of the modshelf mod launcher.
//!
//! The core keeps two views of a game profile consistent with a native
//! backend: a category → mod tree and the flat load-order list. Views are
//! rendered by the `modshelf-gui` binary; everything here is UI-toolkit free.

pub mod app;
pub mod backend;
pub mod cache;
pub mod domain;
pub mod error;
pub mod io;
pub mod model;
pub mod state;

pub use app::{AppState, Launcher};
pub use backend::{Backend, MemoryBackend};
pub use error::{BackendError, BackendResult, ModelError};
pub use model::{CategoryId, LauncherSettings, LoadOrderEntry, ModId, ModItem, ModTree, TreeNode};
