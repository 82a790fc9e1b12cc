//! Load-order panel UI rendering
//!
//! Flat list of enabled packs with its own filter, sort and move buttons.

use crate::ui::rows::{render_row, ROW_HEIGHT};
use crate::ui::table_header::{render_sort_header, Column};
use eframe::egui;
use egui::ScrollArea;
use modshelf::app::AppState;
use modshelf::domain::drag::DropTarget;
use modshelf::domain::sorting::ListSortKey;
use modshelf::model::{ModId, MoveDirection};
use modshelf::state::Panel;

pub enum ListPanelInteraction {
    /// A row was clicked outside its move buttons
    EntryClicked(ModId),
    EntryMoved { id: ModId, direction: MoveDirection },
    SortRequested(ListSortKey),
    FilterChanged(String),
    DragStarted(ModId),
}

const BUTTONS_WIDTH: f32 = 44.0;

fn columns() -> [Column<ListSortKey>; 4] {
    [
        Column { label: "#", key: ListSortKey::Order, width: Some(32.0) },
        Column { label: "Pack", key: ListSortKey::Pack, width: Some(180.0) },
        Column { label: "Type", key: ListSortKey::Type, width: Some(60.0) },
        Column { label: "Location", key: ListSortKey::Location, width: None },
    ]
}

pub fn render_load_order_panel(
    ui: &mut egui::Ui,
    state: &mut AppState,
    hovered: &mut Option<DropTarget>,
) -> Vec<ListPanelInteraction> {
    let mut out = Vec::new();

    ui.horizontal(|ui| {
        ui.label("🔍");
        let mut filter = state.list_view.filter_text().to_string();
        let response = ui.add(
            egui::TextEdit::singleline(&mut filter)
                .hint_text("Filter load order")
                .desired_width(f32::INFINITY),
        );
        if response.changed() {
            out.push(ListPanelInteraction::FilterChanged(filter));
        }
    });
    ui.separator();

    if state.status.is_blocked(Panel::List) {
        ui.centered_and_justified(|ui| {
            ui.spinner();
        });
        return out;
    }

    if let Some(key) = render_sort_header(ui, BUTTONS_WIDTH, &columns(), state.list_view.sort()) {
        out.push(ListPanelInteraction::SortRequested(key));
    }
    ui.separator();

    let rows = state.list_rows();
    let scroll_to = state.list_view.take_scroll_target();
    let [order_w, pack_w, type_w, _] = columns().map(|c| c.width.unwrap_or(0.0));

    ScrollArea::vertical()
        .id_salt("load_order_scroll_area")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            if rows.is_empty() {
                ui.weak("No enabled mods");
            }
            for entry in &rows {
                let target = DropTarget::ListEntry(entry.id.clone());
                let selected = state.list_view.is_selected(entry.id.as_str());
                let highlighted = state.drag.is_highlighted(&target);

                let response = render_row(ui, ("entry", entry.id.as_str()), selected, highlighted, |ui| {
                    if ui.small_button("⏶").clicked() {
                        out.push(ListPanelInteraction::EntryMoved {
                            id: entry.id.clone(),
                            direction: MoveDirection::Up,
                        });
                    }
                    if ui.small_button("⏷").clicked() {
                        out.push(ListPanelInteraction::EntryMoved {
                            id: entry.id.clone(),
                            direction: MoveDirection::Down,
                        });
                    }
                    cell(ui, order_w, &entry.order.to_string());
                    cell(ui, pack_w, &entry.pack);
                    cell(ui, type_w, &entry.entry_type);
                    ui.add(egui::Label::new(entry.location.as_str()).selectable(false).truncate());
                });

                if scroll_to.as_ref() == Some(&entry.id) {
                    response.scroll_to_me(Some(egui::Align::Center));
                }
                if response.drag_started() {
                    out.push(ListPanelInteraction::DragStarted(entry.id.clone()));
                }
                if response.clicked() {
                    out.push(ListPanelInteraction::EntryClicked(entry.id.clone()));
                }
                if state.drag.is_dragging() && response.contains_pointer() {
                    *hovered = Some(target);
                }
            }
        });

    out
}

fn cell(ui: &mut egui::Ui, width: f32, text: &str) {
    ui.add_sized(
        [width, ROW_HEIGHT],
        egui::Label::new(text).selectable(false).truncate(),
    );
}
