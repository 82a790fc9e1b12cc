//! Settings persistence coordination.
//!
//! The settings blob is owned by the backend. The launcher rehydrates its view
//! state from the blob at startup and writes the view state back after every
//! state-affecting operation. View preferences the blob has no field for are
//! kept in its `extra` map through the typed helpers below.

use crate::app::AppState;
use crate::domain::sorting::{ListSortKey, SortSpec, TreeSortKey};
use crate::io::{AsyncDispatcher, BackendRequest};
use crate::model::LauncherSettings;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const TREE_SORT_KEY: &str = "tree_sort";
pub const LIST_SORT_KEY: &str = "list_sort";

/// Coordinates settings persistence.
pub struct SettingsCoordinator;

impl SettingsCoordinator {
    /// Loads a value from the blob's `extra` map with a default fallback.
    ///
    /// # Examples
    /// ```ignore
    /// let sort: SortSpec<TreeSortKey> = SettingsCoordinator::load_setting(&settings, "tree_sort");
    /// ```
    pub fn load_setting<T>(settings: &LauncherSettings, key: &str) -> T
    where
        T: for<'de> Deserialize<'de> + Default,
    {
        Self::try_load_setting(settings, key).unwrap_or_default()
    }

    /// Attempts to load a value, returning None if it is missing or invalid.
    pub fn try_load_setting<T>(settings: &LauncherSettings, key: &str) -> Option<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let value = settings.extra.get(key)?;
        T::deserialize(value).ok()
    }

    /// Stores a value in the blob's `extra` map.
    pub fn save_setting<T>(settings: &mut LauncherSettings, key: &str, value: &T)
    where
        T: Serialize,
    {
        if let Ok(json) = serde_json::to_value(value) {
            settings.extra.insert(key.to_string(), json);
        }
    }

    // ===== View State Round-Trip =====

    /// Applies a settings blob to the view state.
    pub fn rehydrate(state: &mut AppState, settings: LauncherSettings) {
        state.tree_view.restore_expansion(&settings.tree_open_state);
        state.tree_view.set_filter_text(&settings.tree_filter_value);
        state.tree_view.set_sort(Self::load_setting(&settings, TREE_SORT_KEY));

        state.list_view.set_filter_text(&settings.list_filter_value);
        state.list_view.set_sort(Self::load_setting(&settings, LIST_SORT_KEY));

        state
            .layout
            .restore(&settings.panel_heights, settings.right_panel_width);

        state.settings = settings;
        state.tree_cache.invalidate();
        state.tree_cache.invalidate_list();
    }

    /// Writes the current view state into the settings blob.
    ///
    /// Expansion flags are written when they change, so the blob also keeps
    /// entries for categories that are currently collapsed.
    pub fn capture(state: &mut AppState) {
        let settings = &mut state.settings;
        settings.tree_filter_value = state.tree_view.filter_text().to_string();
        settings.list_filter_value = state.list_view.filter_text().to_string();
        settings.selected_list_item = state.list_view.selected().map(|id| id.to_string());
        settings.panel_heights = state.layout.panel_heights().clone();
        settings.right_panel_width = state.layout.right_panel_width();
        if !state.session.profile().is_empty() {
            settings.last_selected_game = state.session.profile().to_string();
        }

        let tree_sort: SortSpec<TreeSortKey> = state.tree_view.sort();
        let list_sort: SortSpec<ListSortKey> = state.list_view.sort();
        Self::save_setting(settings, TREE_SORT_KEY, &tree_sort);
        Self::save_setting(settings, LIST_SORT_KEY, &list_sort);
    }

    /// Captures the view state and submits a save (last write wins).
    pub fn persist(state: &mut AppState, dispatcher: &mut AsyncDispatcher) {
        Self::capture(state);
        let ticket = dispatcher.submit(BackendRequest::SaveSettings(state.settings.clone()));
        debug!(ticket = ticket.0, "Persisting settings");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sorting::SortDir;

    #[test]
    fn test_save_and_load_simple() {
        let mut settings = LauncherSettings::default();
        SettingsCoordinator::save_setting(&mut settings, "test_key", &42i32);
        let loaded: i32 = SettingsCoordinator::load_setting(&settings, "test_key");
        assert_eq!(loaded, 42);
    }

    #[test]
    fn test_load_with_default() {
        let settings = LauncherSettings::default();
        let loaded: i32 = SettingsCoordinator::load_setting(&settings, "missing_key");
        assert_eq!(loaded, 0);
    }

    #[test]
    fn test_try_load_setting_rejects_wrong_type() {
        let mut settings = LauncherSettings::default();
        SettingsCoordinator::save_setting(&mut settings, "sort", &"not a sort");
        let result: Option<SortSpec<TreeSortKey>> = SettingsCoordinator::try_load_setting(&settings, "sort");
        assert_eq!(result, None);
    }

    #[test]
    fn test_rehydrate_then_capture_round_trips() {
        let mut settings = LauncherSettings::default();
        settings.tree_open_state.insert("Graphics".into(), true);
        settings.tree_filter_value = "rad".into();
        settings.list_filter_value = "sfo".into();
        settings.right_panel_width = 420;
        settings.extra.insert("language".into(), "English".into());
        SettingsCoordinator::save_setting(
            &mut settings,
            TREE_SORT_KEY,
            &SortSpec {
                key: TreeSortKey::Size,
                dir: SortDir::Desc,
            },
        );

        let mut state = AppState::new();
        SettingsCoordinator::rehydrate(&mut state, settings.clone());
        assert!(state.tree_view.is_expanded("Graphics"));
        assert_eq!(state.tree_view.sort().key, TreeSortKey::Size);
        assert_eq!(state.layout.right_panel_width(), 420);

        SettingsCoordinator::capture(&mut state);
        assert_eq!(state.settings.tree_filter_value, "rad");
        assert_eq!(state.settings.list_filter_value, "sfo");
        assert_eq!(state.settings.extra["language"], "English");
        assert_eq!(state.settings.extra[TREE_SORT_KEY], settings.extra[TREE_SORT_KEY]);
    }
}
