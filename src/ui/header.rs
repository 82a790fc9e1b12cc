//! Header panel UI rendering
//!
//! Handles the top bar with the game selector, launch options and the launch
//! button.

use eframe::egui;
use modshelf::app::AppState;

/// Result of user interaction with the header panel
pub enum HeaderInteraction {
    ProfileSelected(String),
    LaunchOptionsChanged(String),
    LaunchRequested,
    /// User asked to change the game folder
    GamePathRequested,
}

/// Renders the application header.
///
/// # Arguments
/// * `games` - `(profile id, display name)` pairs offered in the selector
pub fn render_header(
    ui: &mut egui::Ui,
    state: &AppState,
    games: &[(&str, &str)],
    launching: bool,
) -> Vec<HeaderInteraction> {
    let mut out = Vec::new();
    let profile = state.session.profile();

    ui.horizontal(|ui| {
        let current = games
            .iter()
            .find(|(id, _)| *id == profile)
            .map_or(profile, |(_, name)| *name);
        egui::ComboBox::from_id_salt("game_selector")
            .selected_text(current)
            .show_ui(ui, |ui| {
                for (id, name) in games {
                    if ui.selectable_label(*id == profile, *name).clicked() && *id != profile {
                        out.push(HeaderInteraction::ProfileSelected(id.to_string()));
                    }
                }
            });

        if ui.button("📁 Game folder").clicked() {
            out.push(HeaderInteraction::GamePathRequested);
        }

        ui.separator();

        ui.label("Launch options:");
        let mut options = state
            .settings
            .launch_options
            .get(profile)
            .cloned()
            .unwrap_or_default();
        if ui
            .add(egui::TextEdit::singleline(&mut options).desired_width(200.0))
            .changed()
        {
            out.push(HeaderInteraction::LaunchOptionsChanged(options));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let launch = ui.add_enabled(!launching, egui::Button::new("▶ Launch"));
            if launch.clicked() {
                out.push(HeaderInteraction::LaunchRequested);
            }
            if let Some(last) = state.session.last_launch() {
                ui.weak(last);
            }
        });
    });

    out
}
