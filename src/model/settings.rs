//! Persisted settings blob read at startup and written after every
//! state-affecting operation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The settings document shared with the backend.
///
/// Fields the core does not know about are kept in `extra` and written back
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherSettings {
    /// Expansion state keyed by category id.
    pub tree_open_state: HashMap<String, bool>,
    pub tree_filter_value: String,
    pub list_filter_value: String,
    /// Last single-selected tree mod.
    pub selected_tree_item: Option<String>,
    pub selected_tree_category: Option<String>,
    pub selected_list_item: Option<String>,
    pub panel_heights: HashMap<String, u32>,
    pub right_panel_width: u32,
    /// Game install paths keyed by game/profile id.
    pub paths: HashMap<String, String>,
    pub last_selected_game: String,
    pub launch_options: HashMap<String, String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            tree_open_state: HashMap::new(),
            tree_filter_value: String::new(),
            list_filter_value: String::new(),
            selected_tree_item: None,
            selected_tree_category: None,
            selected_list_item: None,
            panel_heights: HashMap::new(),
            right_panel_width: 300,
            paths: HashMap::new(),
            last_selected_game: String::new(),
            launch_options: HashMap::new(),
            extra: serde_json::Map::new(),
        }
    }
}

impl LauncherSettings {
    /// Returns the configured install path for a game, if it is non-empty.
    pub fn game_path(&self, game: &str) -> Option<&str> {
        self.paths
            .get(game)
            .map(String::as_str)
            .filter(|p| !p.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_keys_round_trip() {
        let json = r#"{"tree_filter_value":"rad","language":"English","date_format":"DD/MM/YYYY"}"#;
        let settings: LauncherSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.tree_filter_value, "rad");
        assert_eq!(settings.right_panel_width, 300);
        assert_eq!(settings.extra["language"], "English");

        let back = serde_json::to_value(&settings).unwrap();
        assert_eq!(back["date_format"], "DD/MM/YYYY");
    }

    #[test]
    fn test_blank_game_path_counts_as_missing() {
        let mut settings = LauncherSettings::default();
        settings.paths.insert("warhammer_3".into(), "  ".into());
        assert_eq!(settings.game_path("warhammer_3"), None);
        settings.paths.insert("warhammer_3".into(), "/games/wh3".into());
        assert_eq!(settings.game_path("warhammer_3"), Some("/games/wh3"));
    }
}
