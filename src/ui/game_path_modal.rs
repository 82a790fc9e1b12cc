//! Blocking "where is the game installed" prompt.

use eframe::egui;
use modshelf::app::AppState;

pub enum GamePathInteraction {
    Submitted(String),
    Cancelled,
    ExitRequested,
}

/// Renders the modal. Nothing behind it takes input while it is open.
pub fn render_game_path_modal(ctx: &egui::Context, state: &mut AppState) -> Option<GamePathInteraction> {
    let mut interaction = None;
    let profile = state.session.profile().to_string();

    egui::Modal::new(egui::Id::new("game_path_modal")).show(ctx, |ui| {
        ui.set_width(420.0);
        ui.heading("Game folder");
        ui.label(format!("Select the install folder for '{profile}'."));
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(state.layout.game_path_text_mut())
                    .hint_text("/path/to/game")
                    .desired_width(300.0),
            );
            if ui.button("Browse…").clicked() {
                let mut dialog = rfd::FileDialog::new();
                if let Some(home) = dirs::home_dir() {
                    dialog = dialog.set_directory(home);
                }
                if let Some(path) = dialog.pick_folder() {
                    *state.layout.game_path_text_mut() = path.display().to_string();
                }
            }
        });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let has_text = !state.layout.game_path_text().trim().is_empty();
            if ui.add_enabled(has_text, egui::Button::new("Save")).clicked() {
                interaction = Some(GamePathInteraction::Submitted(
                    state.layout.game_path_text().to_string(),
                ));
            }
            if state.settings.game_path(&profile).is_some() && ui.button("Cancel").clicked() {
                interaction = Some(GamePathInteraction::Cancelled);
            }
            if ui.button("Exit").clicked() {
                interaction = Some(GamePathInteraction::ExitRequested);
            }
        });
    });

    interaction
}
