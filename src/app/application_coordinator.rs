//! Application-level coordination and workflow management.
//!
//! Handles startup, profile switching, launching and the routing of backend
//! completions to the coordinator that owns the affected view state.

use crate::app::{AppState, CrossViewSync, LoadOrderCoordinator, SettingsCoordinator, TreeCoordinator};
use crate::error::BackendError;
use crate::io::{AsyncDispatcher, BackendRequest, BackendResponse, Completion, DispatchEvent, Ticket};
use crate::model::{LauncherSettings, TreeNode, ValidatedSnapshot};
use crate::state::{slots_for, Panel, ProgressState, RequestSlot, Rollback, StartupPhase};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Coordinates application-level operations and workflows.
///
/// This struct is responsible for:
/// - Issuing backend requests and recording their slots
/// - Startup and profile switching
/// - Routing completions and discarding stale ones
/// - Launching the game
pub struct ApplicationCoordinator;

impl ApplicationCoordinator {
    /// Submits a request and records it as the newest writer of its slots.
    pub fn dispatch(state: &mut AppState, dispatcher: &mut AsyncDispatcher, request: BackendRequest) -> Ticket {
        let slots = slots_for(&request);
        let ticket = dispatcher.submit(request);
        state.requests.issue(ticket, &slots);
        ticket
    }

    /// Starts the launcher by reading the settings blob.
    pub fn startup(state: &mut AppState, dispatcher: &mut AsyncDispatcher) {
        state.session.set_phase(StartupPhase::LoadingSettings);
        Self::dispatch(state, dispatcher, BackendRequest::LoadSettings);
    }

    /// Switches to another game profile on user request.
    pub fn select_profile(state: &mut AppState, dispatcher: &mut AsyncDispatcher, profile: &str) {
        if profile.is_empty() || profile == state.session.profile() {
            return;
        }
        Self::switch_profile(state, dispatcher, profile);
        SettingsCoordinator::persist(state, dispatcher);
    }

    /// Loads a profile behind blocking overlays on both panels.
    ///
    /// The overlays are released by the completion, whatever its outcome.
    pub fn switch_profile(state: &mut AppState, dispatcher: &mut AsyncDispatcher, profile: &str) {
        info!(profile, "Switching profile");
        state.session.set_profile(profile);
        let phase = if state.settings.game_path(profile).is_some() {
            StartupPhase::Ready
        } else {
            StartupPhase::NeedsGamePath
        };
        state.session.set_phase(phase);

        state.status.acquire_overlay(Panel::Tree);
        state.status.acquire_overlay(Panel::List);
        Self::dispatch(
            state,
            dispatcher,
            BackendRequest::LoadProfile {
                profile: profile.to_string(),
            },
        );
    }

    /// Stores the install path for the active profile.
    ///
    /// # Returns
    /// `false` if the path is not an existing directory.
    pub fn set_game_path(state: &mut AppState, dispatcher: &mut AsyncDispatcher, path: &str) -> bool {
        let path = path.trim();
        if path.is_empty() || !Path::new(path).is_dir() {
            state.report_error(format!("'{path}' is not a folder"));
            return false;
        }
        let profile = state.session.profile().to_string();
        state.settings.paths.insert(profile, path.to_string());
        state.session.set_phase(StartupPhase::Ready);
        SettingsCoordinator::persist(state, dispatcher);
        true
    }

    /// Reopens the game folder prompt, prefilled with the current path.
    pub fn request_game_path(state: &mut AppState) {
        let current = state
            .settings
            .game_path(state.session.profile())
            .unwrap_or_default()
            .to_string();
        *state.layout.game_path_text_mut() = current;
        state.session.set_phase(StartupPhase::NeedsGamePath);
    }

    /// Closes the prompt if the profile already has a usable path.
    pub fn dismiss_game_path(state: &mut AppState) {
        if state.settings.game_path(state.session.profile()).is_some() {
            state.session.set_phase(StartupPhase::Ready);
        }
    }

    pub fn set_launch_options(state: &mut AppState, dispatcher: &mut AsyncDispatcher, options: &str) {
        let profile = state.session.profile().to_string();
        state.settings.launch_options.insert(profile, options.to_string());
        SettingsCoordinator::persist(state, dispatcher);
    }

    /// Launches the active profile with its configured options.
    pub fn launch(state: &mut AppState, dispatcher: &mut AsyncDispatcher) -> Option<Ticket> {
        let profile = state.session.profile().to_string();
        if state.settings.game_path(&profile).is_none() {
            state.session.set_phase(StartupPhase::NeedsGamePath);
            state.report_error("Set the game folder before launching");
            return None;
        }
        if state.session.is_launching() {
            return None;
        }
        let options = state
            .settings
            .launch_options
            .get(&profile)
            .cloned()
            .unwrap_or_default();
        state.session.set_launching(true);
        Some(Self::dispatch(state, dispatcher, BackendRequest::Launch { profile, options }))
    }

    // ===== Layout =====

    /// Stores a resized right panel. Persists only a real change.
    pub fn set_right_panel_width(state: &mut AppState, dispatcher: &mut AsyncDispatcher, width: u32) {
        if state.layout.set_right_panel_width(width) {
            SettingsCoordinator::persist(state, dispatcher);
        }
    }

    pub fn set_panel_height(state: &mut AppState, dispatcher: &mut AsyncDispatcher, panel: &str, height: u32) {
        if state.layout.set_panel_height(panel, height) {
            SettingsCoordinator::persist(state, dispatcher);
        }
    }

    /// Expires transient messages.
    pub fn tick(state: &mut AppState, now: Instant) {
        state.status.tick(now);
    }

    // ===== Completion Routing =====

    /// Drains the dispatcher and applies every event.
    ///
    /// Called once per frame in the update loop. Returns true if anything
    /// arrived.
    pub fn process_events(state: &mut AppState, dispatcher: &mut AsyncDispatcher) -> bool {
        let events = dispatcher.poll();
        let any = !events.is_empty();
        for event in events {
            match event {
                DispatchEvent::Progress(update) => state.status.set_progress(ProgressState {
                    id: update.id,
                    progress: update.progress,
                    total: update.total,
                }),
                DispatchEvent::Completed(completion) => Self::on_completion(state, dispatcher, completion),
            }
        }
        any
    }

    fn on_completion(state: &mut AppState, dispatcher: &mut AsyncDispatcher, completion: Completion) {
        let Completion { ticket, request, result } = completion;
        debug!(ticket = ticket.0, request = request.label(), ok = result.is_ok(), "Backend request completed");

        match result {
            Ok(response) => Self::on_success(state, dispatcher, ticket, &request, response),
            Err(err) => Self::on_failure(state, dispatcher, ticket, &request, err),
        }

        for slot in slots_for(&request) {
            state.requests.settle(&slot, ticket);
        }
    }

    fn on_success(
        state: &mut AppState,
        dispatcher: &mut AsyncDispatcher,
        ticket: Ticket,
        request: &BackendRequest,
        response: BackendResponse,
    ) {
        // A confirmed request never needs its rollback.
        state.requests.take_rollback(ticket);

        match (request, response) {
            (BackendRequest::LoadSettings, BackendResponse::Settings(settings)) => {
                Self::on_settings(state, dispatcher, settings);
            }
            (BackendRequest::LoadProfile { .. }, BackendResponse::Snapshot(snapshot)) => {
                Self::on_snapshot(state, dispatcher, ticket, Some(snapshot));
            }
            (BackendRequest::SetModEnabled { .. }, BackendResponse::LoadOrder(list)) => {
                LoadOrderCoordinator::on_list_replaced(state, dispatcher, ticket, list, None);
            }
            (BackendRequest::ReorderLoadOrder { source: id, .. }, BackendResponse::LoadOrder(list))
            | (BackendRequest::MoveLoadOrder { id, .. }, BackendResponse::LoadOrder(list)) => {
                LoadOrderCoordinator::on_list_replaced(state, dispatcher, ticket, list, Some(id));
            }
            (BackendRequest::CreateCategory { name }, BackendResponse::CategoryOrder(order)) => {
                TreeCoordinator::on_category_created(state, dispatcher, ticket, name, &order);
            }
            (BackendRequest::ReorderCategories { .. }, BackendResponse::CategoryOrder(order)) => {
                TreeCoordinator::on_categories_reordered(state, ticket, &order);
            }
            (BackendRequest::RenameCategory { old, new }, BackendResponse::Done) => {
                TreeCoordinator::on_category_renamed(state, dispatcher, ticket, old, new);
            }
            (BackendRequest::RemoveCategories { ids }, BackendResponse::Done) => {
                TreeCoordinator::on_categories_removed(state, dispatcher, ticket, ids);
            }
            (BackendRequest::RecategorizeMods { ids, target }, BackendResponse::Done) => {
                TreeCoordinator::on_mods_recategorized(state, dispatcher, ticket, ids, target);
            }
            (BackendRequest::Launch { profile, .. }, BackendResponse::Launched(status)) => {
                info!(profile = profile.as_str(), "Game launched");
                state.session.set_launching(false);
                state.report_info(status.clone());
                state.session.set_last_launch(status);
            }
            (BackendRequest::SaveSettings(_), BackendResponse::Done) => {}
            (request, response) => {
                warn!(request = request.label(), ?response, "Unexpected response shape, ignoring");
            }
        }
    }

    fn on_failure(
        state: &mut AppState,
        dispatcher: &mut AsyncDispatcher,
        ticket: Ticket,
        request: &BackendRequest,
        err: BackendError,
    ) {
        warn!(ticket = ticket.0, request = request.label(), "Backend request failed: {err}");

        if let Some(rollback) = state.requests.take_rollback(ticket) {
            Self::roll_back(state, ticket, rollback);
        }

        match request {
            BackendRequest::LoadProfile { .. } => Self::on_snapshot(state, dispatcher, ticket, None),
            BackendRequest::LoadSettings => {
                // Start from defaults so the launcher stays usable.
                Self::on_settings(state, dispatcher, LauncherSettings::default());
            }
            BackendRequest::Launch { .. } => state.session.set_launching(false),
            _ => {}
        }

        state.report_error(format!("Could not {}: {err}", describe(request)));
    }

    fn roll_back(state: &mut AppState, ticket: Ticket, rollback: Rollback) {
        match rollback {
            Rollback::Checked { id, previous } => {
                if state.requests.is_current(&RequestSlot::Checked(id.clone()), ticket) {
                    debug!(mod_id = id.as_str(), previous, "Rolling back enabled flag");
                    state.tree.set_checked(id.as_str(), previous);
                }
            }
            Rollback::CategoryOrder(order) => {
                TreeCoordinator::restore_category_order(state, ticket, &order);
            }
        }
    }

    // ===== Startup Flow =====

    fn on_settings(state: &mut AppState, dispatcher: &mut AsyncDispatcher, settings: LauncherSettings) {
        let profile = if settings.last_selected_game.is_empty() {
            state.session.profile().to_string()
        } else {
            settings.last_selected_game.clone()
        };
        SettingsCoordinator::rehydrate(state, settings);

        if profile.is_empty() {
            warn!("No profile configured");
            state.session.set_phase(StartupPhase::Ready);
            return;
        }
        Self::switch_profile(state, dispatcher, &profile);
    }

    /// Applies a profile load. Overlays and progress are released whatever the
    /// outcome; a stale snapshot is dropped.
    fn on_snapshot(
        state: &mut AppState,
        dispatcher: &mut AsyncDispatcher,
        ticket: Ticket,
        snapshot: Option<ValidatedSnapshot>,
    ) {
        state.status.release_overlay(Panel::Tree);
        state.status.release_overlay(Panel::List);
        state.status.dismiss_progress();

        let Some(snapshot) = snapshot else {
            return;
        };
        if !state.requests.is_current(&RequestSlot::Snapshot, ticket) {
            debug!(ticket = ticket.0, "Discarding stale profile snapshot");
            return;
        }

        info!(
            categories = snapshot.tree.categories().len(),
            mods = snapshot.tree.mod_count(),
            entries = snapshot.load_order.len(),
            "Profile loaded"
        );
        state.install_snapshot(snapshot.tree, snapshot.load_order);
        TreeCoordinator::apply_filter_expansion(state);
        Self::restore_selection(state, dispatcher);
    }

    fn restore_selection(state: &mut AppState, dispatcher: &mut AsyncDispatcher) {
        if let Some(id) = state
            .settings
            .selected_list_item
            .as_deref()
            .and_then(|raw| state.load_order.entry(raw))
            .map(|entry| entry.id.clone())
        {
            state.list_view.select(Some(id));
        }

        if !state.selection.is_empty() {
            return;
        }
        let remembered = state
            .settings
            .selected_tree_item
            .as_deref()
            .and_then(|raw| state.tree.mod_item(raw))
            .map(|item| item.id.clone());
        if let Some(id) = remembered {
            state.selection.select_only(TreeNode::Mod(id.clone()));
            TreeCoordinator::reveal(state, &id);
            CrossViewSync::tree_to_list(state, &id);
            SettingsCoordinator::persist(state, dispatcher);
        }
    }
}

/// Human-readable name of a request for status messages.
fn describe(request: &BackendRequest) -> String {
    match request {
        BackendRequest::LoadProfile { profile } => format!("load profile '{profile}'"),
        BackendRequest::SetModEnabled { id, enabled: true } => format!("enable '{id}'"),
        BackendRequest::SetModEnabled { id, enabled: false } => format!("disable '{id}'"),
        BackendRequest::CreateCategory { name } => format!("create category '{name}'"),
        BackendRequest::RenameCategory { old, new } => format!("rename '{old}' to '{new}'"),
        BackendRequest::RemoveCategories { ids } if ids.len() == 1 => format!("remove category '{}'", ids[0]),
        BackendRequest::RemoveCategories { ids } => format!("remove {} categories", ids.len()),
        BackendRequest::ReorderCategories { source, .. } => format!("move category '{source}'"),
        BackendRequest::RecategorizeMods { target, .. } => format!("move mods to '{target}'"),
        BackendRequest::ReorderLoadOrder { source, .. } => format!("move '{source}' in the load order"),
        BackendRequest::MoveLoadOrder { id, .. } => format!("move '{id}' in the load order"),
        BackendRequest::Launch { profile, .. } => format!("launch '{profile}'"),
        BackendRequest::LoadSettings => "load settings".to_string(),
        BackendRequest::SaveSettings(_) => "save settings".to_string(),
    }
}
