//! UI layout state management.
//!
//! Panel geometry is round-tripped through settings; the text buffers back the
//! inline editors and are never persisted.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Smallest and largest width the right (load-order) panel may take.
pub const RIGHT_PANEL_MIN: u32 = 200;
pub const RIGHT_PANEL_MAX: u32 = 900;

/// State related to UI layout and sizing.
///
/// Responsibilities:
/// - Tracking panel heights and the right panel width
/// - Holding text buffers for the category editor and game path input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutState {
    panel_heights: HashMap<String, u32>,
    right_panel_width: u32,
    #[serde(skip)]
    new_category_text: String,
    #[serde(skip)]
    rename_text: String,
    #[serde(skip)]
    game_path_text: String,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutState {
    pub fn new() -> Self {
        Self {
            panel_heights: HashMap::new(),
            right_panel_width: 300,
            new_category_text: String::new(),
            rename_text: String::new(),
            game_path_text: String::new(),
        }
    }

    // ===== Layout Queries =====

    pub fn right_panel_width(&self) -> u32 {
        self.right_panel_width
    }

    pub fn panel_height(&self, panel: &str) -> Option<u32> {
        self.panel_heights.get(panel).copied()
    }

    pub fn panel_heights(&self) -> &HashMap<String, u32> {
        &self.panel_heights
    }

    // ===== Layout Mutations =====

    /// Sets the right panel width, clamped to the allowed range.
    ///
    /// # Returns
    /// `true` if the stored width changed.
    pub fn set_right_panel_width(&mut self, width: u32) -> bool {
        let width = width.clamp(RIGHT_PANEL_MIN, RIGHT_PANEL_MAX);
        let changed = self.right_panel_width != width;
        self.right_panel_width = width;
        changed
    }

    pub fn set_panel_height(&mut self, panel: &str, height: u32) -> bool {
        self.panel_heights.insert(panel.to_string(), height) != Some(height)
    }

    pub fn restore(&mut self, panel_heights: &HashMap<String, u32>, right_panel_width: u32) {
        self.panel_heights = panel_heights.clone();
        self.set_right_panel_width(right_panel_width);
    }

    // ===== Text Buffers =====

    pub fn new_category_text_mut(&mut self) -> &mut String {
        &mut self.new_category_text
    }

    pub fn rename_text_mut(&mut self) -> &mut String {
        &mut self.rename_text
    }

    pub fn game_path_text_mut(&mut self) -> &mut String {
        &mut self.game_path_text
    }

    pub fn game_path_text(&self) -> &str {
        &self.game_path_text
    }
}
