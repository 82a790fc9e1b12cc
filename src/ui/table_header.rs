//! Table header component rendering
//!
//! Sortable column headers shared by the tree and the load-order list.

use eframe::egui;
use modshelf::domain::sorting::{SortDir, SortSpec};

/// A header column: label, sort key and fixed width (`None` fills the rest).
pub struct Column<K> {
    pub label: &'static str,
    pub key: K,
    pub width: Option<f32>,
}

/// Renders a header row and returns the key whose header was clicked.
///
/// The active column carries a direction arrow.
pub fn render_sort_header<K: Copy + PartialEq>(
    ui: &mut egui::Ui,
    leading_space: f32,
    columns: &[Column<K>],
    active: SortSpec<K>,
) -> Option<K> {
    let mut clicked = None;

    ui.horizontal(|ui| {
        if leading_space > 0.0 {
            ui.add_space(leading_space);
        }
        for column in columns {
            let arrow = match (column.key == active.key, active.dir) {
                (true, SortDir::Asc) => " ⏶",
                (true, SortDir::Desc) => " ⏷",
                (false, _) => "",
            };
            let text = egui::RichText::new(format!("{}{}", column.label, arrow)).strong();
            let button = egui::Button::new(text).frame(false);
            let width = column.width.unwrap_or_else(|| ui.available_width());
            let response = ui.add_sized([width, 20.0], button);
            if response.clicked() {
                clicked = Some(column.key);
            }
        }
    });

    clicked
}
