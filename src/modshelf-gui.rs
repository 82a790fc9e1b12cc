//! Mod Shelf launcher GUI
//!
//! Desktop front end for organizing game mods into categories and managing
//! the load order, built with egui. The window hosts:
//! - A category tree with filtering, sorting, multi-select and drag and drop
//! - The load order list with keyboard-free move buttons and drag reordering
//! - A details panel for the selected mod
//! - A header with the game selector, launch options and launch button
//!
//! All mutations go through the library's coordinators; backend requests run
//! on worker threads and their completions are applied at the start of each
//! frame.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Context as _;
use eframe::egui;
use modshelf::app::{ApplicationCoordinator, Launcher, LoadOrderCoordinator, TreeCoordinator};
use modshelf::backend::MemoryBackend;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod ui;
mod utils;

use ui::game_path_modal::GamePathInteraction;
use ui::header::HeaderInteraction;
use ui::load_order_panel::ListPanelInteraction;
use ui::panel_manager::{FrameInfo, PanelInteraction, PanelManager};
use ui::tree_panel::TreePanelInteraction;

/// `(profile id, display name)` pairs offered in the game selector.
const GAMES: &[(&str, &str)] = &[
    ("warhammer_3", "Total War: WARHAMMER III"),
    ("warhammer_2", "Total War: WARHAMMER II"),
];

const DEFAULT_PROFILE: &str = "warhammer_3";
const BACKEND_LATENCY: Duration = Duration::from_millis(150);

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(false))
        .init();

    let seed = std::env::args().nth(1).map(PathBuf::from);
    let backend = build_backend(seed)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_title("Mod Shelf"),
        ..Default::default()
    };

    eframe::run_native(
        "Mod Shelf",
        options,
        Box::new(move |cc| Ok(Box::new(ModShelfApp::new(cc, backend)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI terminated with an error: {e}"))
}

fn build_backend(seed: Option<PathBuf>) -> anyhow::Result<MemoryBackend> {
    let backend = load_profiles(seed.as_deref())?;

    match MemoryBackend::default_settings_dir() {
        Some(dir) => match backend.with_settings_dir(&dir) {
            Ok(backend) => {
                info!(dir = %dir.display(), "Persisting settings");
                Ok(backend)
            }
            Err(e) => {
                warn!(error = %e, "Settings will not persist across runs");
                load_profiles(seed.as_deref())
            }
        },
        None => Ok(backend),
    }
}

/// Loads the seed file, or the bundled demo profiles without one.
fn load_profiles(seed: Option<&Path>) -> anyhow::Result<MemoryBackend> {
    let backend = match seed {
        Some(path) => MemoryBackend::from_seed_file(path)?,
        None => MemoryBackend::demo().context("Failed to load the bundled demo profiles")?,
    };
    Ok(backend.with_latency(BACKEND_LATENCY))
}

/// The launcher window.
///
/// Rendering is delegated to `PanelManager`, every interaction it reports is
/// routed to a coordinator.
struct ModShelfApp {
    launcher: Launcher,
}

impl ModShelfApp {
    fn new(cc: &eframe::CreationContext, backend: MemoryBackend) -> Self {
        let mut launcher = Launcher::new(Arc::new(backend), DEFAULT_PROFILE);
        let ctx = cc.egui_ctx.clone();
        launcher.set_waker(Arc::new(move || ctx.request_repaint()));
        launcher.start();
        Self { launcher }
    }

    fn handle_panel_interaction(&mut self, interaction: PanelInteraction) {
        let Launcher { state, dispatcher } = &mut self.launcher;
        match interaction {
            PanelInteraction::Header(header) => match header {
                HeaderInteraction::ProfileSelected(profile) => {
                    ApplicationCoordinator::select_profile(state, dispatcher, &profile);
                }
                HeaderInteraction::LaunchOptionsChanged(options) => {
                    ApplicationCoordinator::set_launch_options(state, dispatcher, &options);
                }
                HeaderInteraction::LaunchRequested => {
                    ApplicationCoordinator::launch(state, dispatcher);
                }
                HeaderInteraction::GamePathRequested => {
                    ApplicationCoordinator::request_game_path(state);
                }
            },
            PanelInteraction::Tree(tree) => match tree {
                TreePanelInteraction::NodeClicked { node, modifiers } => {
                    TreeCoordinator::select(state, dispatcher, node, modifiers);
                }
                TreePanelInteraction::ExpandToggled(id) => {
                    TreeCoordinator::toggle_expansion(state, dispatcher, &id, None);
                }
                TreePanelInteraction::CheckedToggled { id, enabled } => {
                    TreeCoordinator::toggle_checked(state, dispatcher, &id, enabled);
                }
                TreePanelInteraction::SortRequested(key) => {
                    TreeCoordinator::sort_by(state, dispatcher, key);
                }
                TreePanelInteraction::FilterChanged(text) => {
                    TreeCoordinator::set_filter(state, dispatcher, &text);
                }
                TreePanelInteraction::ModDragStarted(id) => {
                    TreeCoordinator::begin_drag_mod(state, &id);
                }
                TreePanelInteraction::CategoryDragStarted(id) => {
                    TreeCoordinator::begin_drag_category(state, &id);
                }
                TreePanelInteraction::CreateCategory(name) => {
                    TreeCoordinator::create_category(state, dispatcher, &name);
                }
                TreePanelInteraction::RenameCategory { old, new } => {
                    TreeCoordinator::rename_category(state, dispatcher, &old, &new);
                }
                TreePanelInteraction::RemoveSelectedCategories => {
                    TreeCoordinator::remove_selected_categories(state, dispatcher);
                }
            },
            PanelInteraction::List(list) => match list {
                ListPanelInteraction::EntryClicked(id) => {
                    LoadOrderCoordinator::select(state, dispatcher, &id, true);
                }
                ListPanelInteraction::EntryMoved { id, direction } => {
                    LoadOrderCoordinator::move_in_direction(state, dispatcher, &id, direction);
                }
                ListPanelInteraction::SortRequested(key) => {
                    LoadOrderCoordinator::sort_by(state, dispatcher, key);
                }
                ListPanelInteraction::FilterChanged(text) => {
                    LoadOrderCoordinator::set_filter(state, dispatcher, &text);
                }
                ListPanelInteraction::DragStarted(id) => {
                    LoadOrderCoordinator::begin_drag(state, &id);
                }
            },
            PanelInteraction::GamePath(prompt) => match prompt {
                GamePathInteraction::Submitted(path) => {
                    ApplicationCoordinator::set_game_path(state, dispatcher, &path);
                }
                GamePathInteraction::Cancelled => ApplicationCoordinator::dismiss_game_path(state),
                GamePathInteraction::ExitRequested => state.session.request_exit(),
            },
            PanelInteraction::DragEntered(target) => TreeCoordinator::drag_enter(state, target),
            PanelInteraction::DragLeft(target) => TreeCoordinator::drag_leave(state, &target),
            PanelInteraction::Dropped(target) => {
                TreeCoordinator::drop_on(state, dispatcher, target);
            }
            PanelInteraction::DragCancelled => TreeCoordinator::cancel_drag(state),
            PanelInteraction::RightPanelResized(width) => {
                ApplicationCoordinator::set_right_panel_width(state, dispatcher, width);
            }
            PanelInteraction::PanelResized { panel, height } => {
                ApplicationCoordinator::set_panel_height(state, dispatcher, panel, height);
            }
        }
    }
}

impl eframe::App for ModShelfApp {
    /// Main update loop.
    ///
    /// 1. Apply backend completions and expire transient messages
    /// 2. Render all panels via PanelManager
    /// 3. Route panel interactions to coordinators
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.launcher.update();

        let frame = FrameInfo {
            games: GAMES,
            busy: self.launcher.is_busy(),
        };
        let interactions = PanelManager::render_all_panels(ctx, &mut self.launcher.state, &frame);
        for interaction in interactions {
            self.handle_panel_interaction(interaction);
        }

        if self.launcher.state.session.exit_requested() {
            info!("Exit requested");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        // Keep the spinner turning and let transient messages expire.
        if self.launcher.is_busy() || self.launcher.state.status.message().is_some() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}
