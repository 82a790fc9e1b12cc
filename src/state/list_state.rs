//! Load-order list view state.

use crate::domain::sorting::{ListSortKey, SortSpec};
use crate::model::ModId;

/// State related to the flat load-order list.
///
/// Responsibilities:
/// - Holding the list's own filter text and sort
/// - Tracking the single selected row
/// - Carrying a one-shot "scroll this row into view" request to the renderer
#[derive(Debug, Clone, Default)]
pub struct ListViewState {
    filter_text: String,
    sort: SortSpec<ListSortKey>,
    selected: Option<ModId>,
    scroll_target: Option<ModId>,
}

impl ListViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    /// Returns true if the text changed.
    pub fn set_filter_text(&mut self, text: &str) -> bool {
        if self.filter_text == text {
            return false;
        }
        self.filter_text = text.to_string();
        true
    }

    pub fn sort(&self) -> SortSpec<ListSortKey> {
        self.sort
    }

    pub fn set_sort(&mut self, spec: SortSpec<ListSortKey>) {
        self.sort = spec;
    }

    // ===== Selection =====

    pub fn selected(&self) -> Option<&ModId> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_ref().is_some_and(|s| s.as_str() == id)
    }

    pub fn select(&mut self, id: Option<ModId>) {
        self.selected = id;
    }

    /// Selects a row and asks the renderer to bring it into view.
    pub fn select_and_reveal(&mut self, id: ModId) {
        self.scroll_target = Some(id.clone());
        self.selected = Some(id);
    }

    pub fn scroll_target(&self) -> Option<&ModId> {
        self.scroll_target.as_ref()
    }

    /// Consumes the pending scroll request.
    pub fn take_scroll_target(&mut self) -> Option<ModId> {
        self.scroll_target.take()
    }
}
