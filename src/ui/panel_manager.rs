//! Panel orchestration and layout management.
//!
//! Coordinates all UI panels (header, tree, load order, details, status) and
//! turns per-frame pointer state into drag enter/leave/drop interactions.

use crate::ui::details_panel;
use crate::ui::game_path_modal::{self, GamePathInteraction};
use crate::ui::header::{self, HeaderInteraction};
use crate::ui::load_order_panel::{self, ListPanelInteraction};
use crate::ui::status_bar;
use crate::ui::tree_panel::{self, TreePanelInteraction};
use eframe::egui;
use modshelf::app::AppState;
use modshelf::domain::drag::DropTarget;
use modshelf::state::StartupPhase;

pub const DETAILS_PANEL: &str = "details";

/// Result of panel interactions that need to be handled by the application coordinator.
pub enum PanelInteraction {
    Header(HeaderInteraction),
    Tree(TreePanelInteraction),
    List(ListPanelInteraction),
    GamePath(GamePathInteraction),
    /// The pointer moved onto a new drop target during a drag
    DragEntered(DropTarget),
    DragLeft(DropTarget),
    Dropped(DropTarget),
    /// Released over nothing droppable
    DragCancelled,
    RightPanelResized(u32),
    PanelResized { panel: &'static str, height: u32 },
}

/// Frame-level facts the panels need but the state does not hold.
pub struct FrameInfo<'a> {
    pub games: &'a [(&'a str, &'a str)],
    pub busy: bool,
}

/// Manages the layout and rendering of all UI panels.
pub struct PanelManager;

impl PanelManager {
    /// Renders all panels in the application window.
    ///
    /// This is the main entry point for rendering the entire UI, called from
    /// the eframe::App::update() implementation.
    pub fn render_all_panels(
        ctx: &egui::Context,
        state: &mut AppState,
        frame: &FrameInfo<'_>,
    ) -> Vec<PanelInteraction> {
        let mut out = Vec::new();
        let mut hovered: Option<DropTarget> = None;

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            let launching = state.session.is_launching();
            out.extend(
                header::render_header(ui, state, frame.games, launching)
                    .into_iter()
                    .map(PanelInteraction::Header),
            );
        });

        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            status_bar::render_status_bar(ui, state, frame.busy);
        });

        let details_height = state.layout.panel_height(DETAILS_PANEL).unwrap_or(200) as f32;
        let details = egui::TopBottomPanel::bottom("details_panel")
            .default_height(details_height)
            .resizable(true)
            .show(ctx, |ui| {
                egui::Frame::default().inner_margin(4.0).show(ui, |ui| {
                    details_panel::render_details_panel(ui, state);
                });
            });

        let list = egui::SidePanel::right("load_order_panel")
            .default_width(state.layout.right_panel_width() as f32)
            .resizable(true)
            .show(ctx, |ui| {
                ui.heading("Load Order");
                ui.separator();
                out.extend(
                    load_order_panel::render_load_order_panel(ui, state, &mut hovered)
                        .into_iter()
                        .map(PanelInteraction::List),
                );
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Mods");
            ui.separator();
            out.extend(
                tree_panel::render_tree_panel(ui, state, &mut hovered)
                    .into_iter()
                    .map(PanelInteraction::Tree),
            );
        });

        if state.session.phase() == StartupPhase::NeedsGamePath {
            if let Some(interaction) = game_path_modal::render_game_path_modal(ctx, state) {
                out.push(PanelInteraction::GamePath(interaction));
            }
        }

        Self::collect_drag_events(ctx, state, hovered, &mut out);

        // Geometry is reported once the user lets go of the resize handle.
        if !ctx.input(|i| i.pointer.any_down()) {
            let width = list.response.rect.width().round() as u32;
            if width != state.layout.right_panel_width() {
                out.push(PanelInteraction::RightPanelResized(width));
            }
            let height = details.response.rect.height().round() as u32;
            if state.layout.panel_height(DETAILS_PANEL) != Some(height) {
                out.push(PanelInteraction::PanelResized {
                    panel: DETAILS_PANEL,
                    height,
                });
            }
        }

        out
    }

    /// Compares the target under the pointer with the highlighted one and
    /// emits enter/leave pairs, then a drop or cancel on release.
    fn collect_drag_events(
        ctx: &egui::Context,
        state: &AppState,
        hovered: Option<DropTarget>,
        out: &mut Vec<PanelInteraction>,
    ) {
        if !state.drag.is_dragging() {
            return;
        }

        let highlighted = state.drag.highlighted().cloned();
        if hovered != highlighted {
            if let Some(previous) = highlighted {
                out.push(PanelInteraction::DragLeft(previous));
            }
            if let Some(next) = hovered.clone() {
                out.push(PanelInteraction::DragEntered(next));
            }
        }

        if ctx.input(|i| i.pointer.any_released()) {
            out.push(match hovered {
                Some(target) => PanelInteraction::Dropped(target),
                None => PanelInteraction::DragCancelled,
            });
        }
    }
}
