//! Shared row painting for the tree and the list.

use eframe::egui;
use egui::{Color32, Sense, UiBuilder};
use std::hash::Hash;

pub const ROW_HEIGHT: f32 = 22.0;

/// Allocates a full-width row that can be clicked and dragged, paints its
/// selection or drop highlight, and lays out `add_contents` on top.
///
/// Widgets inside the row (checkboxes, buttons) keep their own clicks.
pub fn render_row(
    ui: &mut egui::Ui,
    id_source: impl Hash,
    selected: bool,
    highlighted: bool,
    add_contents: impl FnOnce(&mut egui::Ui),
) -> egui::Response {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(ui.available_width(), ROW_HEIGHT), Sense::hover());
    let response = ui.interact(rect, ui.id().with(id_source), Sense::click_and_drag());

    let visuals = ui.visuals();
    let fill = if highlighted {
        visuals.selection.bg_fill.gamma_multiply(0.5)
    } else if selected {
        visuals.selection.bg_fill
    } else if response.hovered() {
        visuals.widgets.hovered.weak_bg_fill
    } else {
        Color32::TRANSPARENT
    };
    ui.painter().rect_filled(rect, 2.0, fill);
    if highlighted {
        ui.painter()
            .rect_stroke(rect, 2.0, visuals.selection.stroke, egui::StrokeKind::Inside);
    }

    let mut row_ui = ui.new_child(
        UiBuilder::new()
            .max_rect(rect.shrink2(egui::vec2(4.0, 0.0)))
            .layout(egui::Layout::left_to_right(egui::Align::Center)),
    );
    add_contents(&mut row_ui);

    response
}
