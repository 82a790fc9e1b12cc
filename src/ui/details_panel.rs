//! Details panel UI rendering
//!
//! Shows the selected mod's fields and description, a category summary, or
//! the selection count.

use crate::utils::{format_count, format_date};
use eframe::egui;
use egui::{Color32, RichText, ScrollArea};
use modshelf::app::{AppState, DetailsView};
use modshelf::domain::markup::strip_inline_markup;
use modshelf::model::ModItem;

pub fn render_details_panel(ui: &mut egui::Ui, state: &AppState) {
    match state.details() {
        DetailsView::Nothing => {
            ui.weak("Select a mod to view its details");
        }
        DetailsView::Summary(n) => {
            ui.label(RichText::new(format!("{n} items selected")).strong());
        }
        DetailsView::Category { id, mods } => {
            ui.label(RichText::new(id).strong());
            ui.label(format_count(mods, "mod"));
        }
        DetailsView::Mod(item) => render_mod_details(ui, item),
    }
}

fn render_mod_details(ui: &mut egui::Ui, item: &ModItem) {
    ui.label(RichText::new(strip_inline_markup(&item.name)).strong());
    ui.separator();

    ScrollArea::vertical()
        .id_salt("details_scroll_area")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            egui::Grid::new("mod_details_grid")
                .num_columns(2)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    field(ui, "Id", item.id.as_str());
                    field(ui, "Type", &item.mod_type);
                    field(ui, "Creator", &item.creator);
                    field(ui, "Size", &item.size);
                    field(ui, "Location", &item.location);
                    field(ui, "Created", &format_date(item.created));
                    field(ui, "Updated", &format_date(item.updated));
                    field(ui, "Enabled", if item.is_checked { "yes" } else { "no" });
                    if let Some(status) = &item.status {
                        field(ui, "Status", status);
                    }
                    if let Some(last_played) = &item.last_played {
                        field(ui, "Last played", last_played);
                    }
                });

            ui.add_space(10.0);
            ui.label(RichText::new("Description").strong());
            match item.description.as_deref().filter(|d| !d.trim().is_empty()) {
                Some(description) => {
                    ui.label(description);
                }
                None => {
                    ui.colored_label(Color32::GRAY, "(no description)");
                }
            }
        });
}

fn field(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.label(RichText::new(label).weak());
    ui.label(if value.is_empty() { "-" } else { value });
    ui.end_row();
}
