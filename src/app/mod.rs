//! Application-level modules for the launcher.
//!
//! This module contains the root controller, the coordinators and the
//! centralized state they operate on.

mod app_state;
mod application_coordinator;
mod cross_view_sync;
mod launcher;
mod load_order_coordinator;
mod settings_coordinator;
mod tree_coordinator;

pub use app_state::{AppState, DetailsView};
pub use application_coordinator::ApplicationCoordinator;
pub use cross_view_sync::CrossViewSync;
pub use launcher::Launcher;
pub use load_order_coordinator::LoadOrderCoordinator;
pub use settings_coordinator::{SettingsCoordinator, LIST_SORT_KEY, TREE_SORT_KEY};
pub use tree_coordinator::TreeCoordinator;
