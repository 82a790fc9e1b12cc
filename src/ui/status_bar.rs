//! Status bar UI rendering
//!
//! Memory usage, profile counts, backend progress and transient messages.

use crate::utils::{format_count, format_memory_mb, get_current_memory_mb};
use eframe::egui;
use egui::{Color32, RichText};
use modshelf::app::AppState;
use modshelf::state::StatusLevel;

/// Renders the status panel at the bottom of the window.
///
/// `busy` is true while any backend request is in flight.
pub fn render_status_bar(ui: &mut egui::Ui, state: &AppState, busy: bool) {
    ui.horizontal(|ui| {
        let memory_text = format_memory_mb(get_current_memory_mb());
        ui.label(RichText::new(&memory_text).strong());
        ui.label(RichText::new("|").strong());

        ui.label(format!(
            "{} | {} in load order",
            format_count(state.tree.mod_count(), "mod"),
            state.load_order.len()
        ));

        if let Some(progress) = state.status.progress() {
            ui.separator();
            ui.add(
                egui::ProgressBar::new(progress.fraction())
                    .desired_width(160.0)
                    .text(format!("{} {}/{}", progress.id, progress.progress, progress.total)),
            );
        } else if busy {
            ui.separator();
            ui.spinner();
        }

        if let Some(message) = state.status.message() {
            ui.separator();
            let color = match message.level {
                StatusLevel::Info => ui.visuals().text_color(),
                StatusLevel::Error => Color32::from_rgb(230, 90, 80),
            };
            ui.label(RichText::new(&message.text).color(color));
        }
    });
}
