use anyhow::Result;
use modshelf::app::{ApplicationCoordinator, LoadOrderCoordinator, SettingsCoordinator, TreeCoordinator};
use modshelf::backend::{Backend, MemoryBackend, ProgressReporter};
use modshelf::domain::drag::DropTarget;
use modshelf::model::{CategoryId, LoadOrderEntry, ModId, MoveDirection, ProfileSnapshot, TreeNode};
use modshelf::state::{Panel, RequestSlot, SelectModifiers, StartupPhase, StatusLevel};
use modshelf::{BackendError, BackendResult, LauncherSettings, Launcher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const IDLE: Duration = Duration::from_secs(5);

fn cat(id: &str) -> CategoryId {
    id.parse().unwrap()
}

fn mod_id(id: &str) -> ModId {
    id.parse().unwrap()
}

/// Starts an inline launcher on the demo profiles and applies every startup
/// completion. Returns the backend too so tests can inspect or sabotage it.
fn started() -> (Launcher, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::demo().unwrap());
    let shared: Arc<dyn Backend> = backend.clone();
    let mut launcher = Launcher::inline(shared, "warhammer_3");
    launcher.start();
    assert!(launcher.run_until_idle(IDLE));
    (launcher, backend)
}

fn category_names(launcher: &Launcher) -> Vec<String> {
    launcher
        .state
        .tree
        .category_order()
        .iter()
        .map(|c| c.to_string())
        .collect()
}

fn list_ids(launcher: &Launcher) -> Vec<String> {
    launcher
        .state
        .load_order
        .entries()
        .iter()
        .map(|e| e.id.to_string())
        .collect()
}

fn last_error(launcher: &Launcher) -> Option<String> {
    launcher
        .state
        .status
        .message()
        .filter(|m| m.level == StatusLevel::Error)
        .map(|m| m.text.clone())
}

#[test]
fn test_startup_loads_last_selected_profile() {
    let (launcher, _) = started();
    let state = &launcher.state;

    assert_eq!(state.session.profile(), "warhammer_3");
    assert_eq!(category_names(&launcher), vec!["Graphics", "Overhauls", "Unassigned"]);
    assert_eq!(state.tree.mod_count(), 6);
    assert_eq!(state.load_order.len(), 4);
    assert_eq!(state.load_order.orders(), vec![0, 1, 2, 3]);

    // Expansion comes back from the settings blob
    assert!(state.tree_view.is_expanded("Graphics"));
    assert!(!state.tree_view.is_expanded("Overhauls"));

    // No game path in the demo settings
    assert_eq!(state.session.phase(), StartupPhase::NeedsGamePath);
}

#[test]
fn test_overlays_released_after_load() {
    let (launcher, _) = started();
    assert!(!launcher.state.status.is_blocked(Panel::Tree));
    assert!(!launcher.state.status.is_blocked(Panel::List));
    assert!(launcher.state.status.progress().is_none());
    assert!(!launcher.is_busy());
}

#[test]
fn test_overlays_released_when_load_fails() {
    let (mut launcher, backend) = started();
    backend.fail_next(BackendError::Unavailable("disk gone".to_string()));

    let Launcher { state, dispatcher } = &mut launcher;
    ApplicationCoordinator::select_profile(state, dispatcher, "warhammer_2");
    assert!(state.status.is_blocked(Panel::Tree));
    assert!(launcher.run_until_idle(IDLE));

    assert!(!launcher.state.status.is_blocked(Panel::Tree));
    assert!(!launcher.state.status.is_blocked(Panel::List));
    let error = last_error(&launcher).unwrap();
    assert!(error.contains("load profile 'warhammer_2'"), "{error}");
}

#[test]
fn test_create_category_rejects_collision() {
    let (mut launcher, _) = started();
    let before = category_names(&launcher);

    let Launcher { state, dispatcher } = &mut launcher;
    TreeCoordinator::create_category(state, dispatcher, "Graphics");
    assert!(launcher.run_until_idle(IDLE));

    assert_eq!(category_names(&launcher), before);
    let error = last_error(&launcher).unwrap();
    assert!(error.contains("already exists"), "{error}");
}

#[test]
fn test_create_category_lands_before_default() {
    let (mut launcher, backend) = started();

    let Launcher { state, dispatcher } = &mut launcher;
    TreeCoordinator::create_category(state, dispatcher, "  Audio  ");
    assert!(launcher.run_until_idle(IDLE));

    assert_eq!(
        category_names(&launcher),
        vec!["Graphics", "Overhauls", "Audio", "Unassigned"]
    );
    let persisted = backend.snapshot("warhammer_3").unwrap();
    assert_eq!(persisted.categories[2].id, cat("Audio"));
}

#[test]
fn test_created_category_matching_filter_is_shown_open() {
    let (mut launcher, _) = started();

    let Launcher { state, dispatcher } = &mut launcher;
    TreeCoordinator::set_filter(state, dispatcher, "map");
    assert!(!state.visible_tree_nodes().contains(&TreeNode::Category(cat("Graphics"))));
    TreeCoordinator::create_category(state, dispatcher, "Maps");
    assert!(launcher.run_until_idle(IDLE));

    let state = &mut launcher.state;
    assert!(state.tree.contains_category("Maps"));
    assert!(state.visible_tree_nodes().contains(&TreeNode::Category(cat("Maps"))));
    assert!(state.tree_view.is_expanded("Maps"));
    assert_eq!(state.settings.tree_open_state.get("Maps"), Some(&true));
}

#[test]
fn test_create_category_rejects_blank_name() {
    let (mut launcher, _) = started();
    let Launcher { state, dispatcher } = &mut launcher;
    assert!(TreeCoordinator::create_category(state, dispatcher, "   ").is_none());
    assert!(last_error(&launcher).is_some());
}

#[test]
fn test_remove_category_reparents_orphans() {
    let (mut launcher, _) = started();

    let Launcher { state, dispatcher } = &mut launcher;
    TreeCoordinator::remove_categories(state, dispatcher, &[cat("Overhauls")]);
    assert!(launcher.run_until_idle(IDLE));

    let tree = &launcher.state.tree;
    assert!(!tree.contains_category("Overhauls"));
    assert_eq!(tree.mod_count(), 6);
    for orphan in ["data/sfo_grimhammer.pack", "data/radious_units.pack"] {
        assert_eq!(tree.category_of(orphan).map(|c| c.as_str()), Some("Unassigned"));
    }
}

#[test]
fn test_default_category_cannot_be_removed() {
    let (mut launcher, _) = started();

    let Launcher { state, dispatcher } = &mut launcher;
    assert!(TreeCoordinator::remove_categories(state, dispatcher, &[cat("Unassigned")]).is_none());
    assert!(launcher.run_until_idle(IDLE));

    assert!(launcher.state.tree.contains_category("Unassigned"));
    assert!(last_error(&launcher).unwrap().contains("cannot be deleted"));
}

#[test]
fn test_rename_migrates_expansion_and_selection() {
    let (mut launcher, _) = started();

    let Launcher { state, dispatcher } = &mut launcher;
    TreeCoordinator::select(
        state,
        dispatcher,
        TreeNode::Category(cat("Graphics")),
        SelectModifiers::PLAIN,
    );
    TreeCoordinator::rename_category(state, dispatcher, &cat("Graphics"), "Visuals");
    assert!(launcher.run_until_idle(IDLE));

    let state = &launcher.state;
    assert_eq!(category_names(&launcher), vec!["Visuals", "Overhauls", "Unassigned"]);
    assert!(state.tree_view.is_expanded("Visuals"));
    assert!(!state.tree_view.is_expanded("Graphics"));
    assert!(state.selection.is_category_selected("Visuals"));
    assert_eq!(state.settings.tree_open_state.get("Visuals"), Some(&true));
    assert!(!state.settings.tree_open_state.contains_key("Graphics"));
    assert_eq!(
        state.tree.category_of("data/hd_textures.pack").map(|c| c.as_str()),
        Some("Visuals")
    );
}

#[test]
fn test_rename_to_existing_name_is_rejected() {
    let (mut launcher, _) = started();

    let Launcher { state, dispatcher } = &mut launcher;
    TreeCoordinator::rename_category(state, dispatcher, &cat("Graphics"), "Overhauls");
    assert!(launcher.run_until_idle(IDLE));

    assert_eq!(category_names(&launcher), vec!["Graphics", "Overhauls", "Unassigned"]);
    assert!(last_error(&launcher).unwrap().contains("already exists"));
}

#[test]
fn test_toggle_appends_and_removes_from_load_order() {
    let (mut launcher, _) = started();

    let Launcher { state, dispatcher } = &mut launcher;
    TreeCoordinator::toggle_checked(state, dispatcher, &mod_id("data/sfo_grimhammer.pack"), true);
    assert!(launcher.run_until_idle(IDLE));
    assert_eq!(list_ids(&launcher).last().map(String::as_str), Some("data/sfo_grimhammer.pack"));
    assert_eq!(launcher.state.load_order.len(), 5);

    let Launcher { state, dispatcher } = &mut launcher;
    TreeCoordinator::toggle_checked(state, dispatcher, &mod_id("data/upgrade_pack.pack"), false);
    assert!(launcher.run_until_idle(IDLE));

    assert!(!launcher.state.load_order.contains("data/upgrade_pack.pack"));
    assert_eq!(launcher.state.load_order.orders(), vec![0, 1, 2, 3]);
    assert!(!launcher.state.tree.mod_item("data/upgrade_pack.pack").unwrap().is_checked);
}

#[test]
fn test_toggle_rolls_back_on_failure() {
    let (mut launcher, backend) = started();
    backend.fail_next(BackendError::Unavailable("offline".to_string()));

    let Launcher { state, dispatcher } = &mut launcher;
    TreeCoordinator::toggle_checked(state, dispatcher, &mod_id("data/minimap.pack"), true);
    // Optimistic until the failure arrives
    assert!(state.tree.mod_item("data/minimap.pack").unwrap().is_checked);
    assert!(launcher.run_until_idle(IDLE));

    assert!(!launcher.state.tree.mod_item("data/minimap.pack").unwrap().is_checked);
    assert!(!launcher.state.load_order.contains("data/minimap.pack"));
    assert!(last_error(&launcher).unwrap().contains("enable 'data/minimap.pack'"));
}

#[test]
fn test_load_order_move_is_authoritative() {
    let (mut launcher, _) = started();

    let Launcher { state, dispatcher } = &mut launcher;
    LoadOrderCoordinator::move_in_direction(state, dispatcher, &mod_id("data/camera.pack"), MoveDirection::Up);
    assert!(launcher.run_until_idle(IDLE));

    assert_eq!(
        list_ids(&launcher),
        vec![
            "data/hd_textures.pack",
            "data/upgrade_pack.pack",
            "data/camera.pack",
            "data/radious_units.pack"
        ]
    );
    assert_eq!(launcher.state.load_order.orders(), vec![0, 1, 2, 3]);
    assert_eq!(
        launcher.state.list_view.selected().map(|id| id.as_str()),
        Some("data/camera.pack")
    );
}

#[test]
fn test_load_order_move_past_top_is_unchanged() {
    let (mut launcher, _) = started();
    let before = list_ids(&launcher);

    let Launcher { state, dispatcher } = &mut launcher;
    LoadOrderCoordinator::move_in_direction(state, dispatcher, &mod_id("data/hd_textures.pack"), MoveDirection::Up);
    assert!(launcher.run_until_idle(IDLE));

    assert_eq!(list_ids(&launcher), before);
}

#[test]
fn test_load_order_drop_places_above_target() {
    let (mut launcher, _) = started();

    let Launcher { state, dispatcher } = &mut launcher;
    LoadOrderCoordinator::begin_drag(state, &mod_id("data/camera.pack"));
    TreeCoordinator::drag_enter(state, DropTarget::ListEntry(mod_id("data/upgrade_pack.pack")));
    TreeCoordinator::drop_on(state, dispatcher, DropTarget::ListEntry(mod_id("data/upgrade_pack.pack")));
    assert!(!launcher.state.drag.is_dragging());
    assert!(launcher.run_until_idle(IDLE));

    assert_eq!(
        list_ids(&launcher),
        vec![
            "data/hd_textures.pack",
            "data/camera.pack",
            "data/upgrade_pack.pack",
            "data/radious_units.pack"
        ]
    );
}

#[test]
fn test_mod_drop_recategorizes_selection() {
    let (mut launcher, backend) = started();

    let Launcher { state, dispatcher } = &mut launcher;
    TreeCoordinator::select(
        state,
        dispatcher,
        TreeNode::Mod(mod_id("data/hd_textures.pack")),
        SelectModifiers::PLAIN,
    );
    TreeCoordinator::select(
        state,
        dispatcher,
        TreeNode::Mod(mod_id("data/upgrade_pack.pack")),
        SelectModifiers::EXTEND,
    );
    TreeCoordinator::begin_drag_mod(state, &mod_id("data/upgrade_pack.pack"));
    TreeCoordinator::drop_on(state, dispatcher, DropTarget::Category(cat("Overhauls")));
    assert!(launcher.run_until_idle(IDLE));

    let tree = &launcher.state.tree;
    assert!(tree.category("Graphics").unwrap().children().is_empty());
    assert_eq!(tree.category("Overhauls").unwrap().children().len(), 4);
    let persisted = backend.snapshot("warhammer_3").unwrap();
    assert!(persisted.categories[0].children.is_empty());
}

#[test]
fn test_category_move_of_default_rolls_back() {
    let (mut launcher, _) = started();

    let Launcher { state, dispatcher } = &mut launcher;
    TreeCoordinator::begin_drag_category(state, &cat("Unassigned"));
    let ticket = TreeCoordinator::drop_on(state, dispatcher, DropTarget::Category(cat("Graphics")));
    assert!(ticket.is_some());
    // Optimistic splice is visible before the completion is applied
    assert_eq!(category_names(&launcher)[0], "Unassigned");
    assert!(launcher.run_until_idle(IDLE));

    assert_eq!(category_names(&launcher), vec!["Graphics", "Overhauls", "Unassigned"]);
    assert!(last_error(&launcher).is_some());
}

#[test]
fn test_category_move_adopts_backend_order() {
    let (mut launcher, _) = started();

    let Launcher { state, dispatcher } = &mut launcher;
    TreeCoordinator::begin_drag_category(state, &cat("Overhauls"));
    TreeCoordinator::drop_on(state, dispatcher, DropTarget::Category(cat("Graphics")));
    assert!(launcher.run_until_idle(IDLE));

    assert_eq!(category_names(&launcher), vec!["Overhauls", "Graphics", "Unassigned"]);
}

#[test]
fn test_overlapping_list_moves_apply_newest_answer() {
    let (mut launcher, backend) = started();

    let Launcher { state, dispatcher } = &mut launcher;
    let first =
        LoadOrderCoordinator::move_in_direction(state, dispatcher, &mod_id("data/camera.pack"), MoveDirection::Up)
            .unwrap();
    let second = LoadOrderCoordinator::move_by_drop(
        state,
        dispatcher,
        &mod_id("data/radious_units.pack"),
        &mod_id("data/hd_textures.pack"),
    )
    .unwrap();
    assert!(!state.requests.is_current(&RequestSlot::LoadOrder, first));
    assert!(state.requests.is_current(&RequestSlot::LoadOrder, second));
    assert!(launcher.run_until_idle(IDLE));

    let expected = vec![
        "data/radious_units.pack",
        "data/hd_textures.pack",
        "data/upgrade_pack.pack",
        "data/camera.pack",
    ];
    assert_eq!(list_ids(&launcher), expected);
    assert_eq!(launcher.state.load_order.orders(), vec![0, 1, 2, 3]);
    assert!(launcher.state.list_view.is_selected("data/radious_units.pack"));

    let persisted: Vec<String> = backend
        .snapshot("warhammer_3")
        .unwrap()
        .load_order
        .iter()
        .map(|e| e.id.to_string())
        .collect();
    assert_eq!(persisted, expected);
}

#[test]
fn test_overlapping_category_drags_roll_back_only_newest() {
    let (mut launcher, backend) = started();

    let Launcher { state, dispatcher } = &mut launcher;
    TreeCoordinator::begin_drag_category(state, &cat("Overhauls"));
    TreeCoordinator::drop_on(state, dispatcher, DropTarget::Category(cat("Graphics")));
    // The default category cannot move; the backend rejects this one
    TreeCoordinator::begin_drag_category(state, &cat("Unassigned"));
    TreeCoordinator::drop_on(state, dispatcher, DropTarget::Category(cat("Overhauls")));
    assert_eq!(category_names(&launcher), vec!["Unassigned", "Overhauls", "Graphics"]);
    assert!(launcher.run_until_idle(IDLE));

    // The older success is stale; the newest failure restores its own snapshot
    assert_eq!(category_names(&launcher), vec!["Overhauls", "Graphics", "Unassigned"]);
    assert!(last_error(&launcher).is_some());
    let persisted: Vec<String> = backend
        .snapshot("warhammer_3")
        .unwrap()
        .categories
        .iter()
        .map(|c| c.id.to_string())
        .collect();
    assert_eq!(persisted, category_names(&launcher));
}

#[test]
fn test_overlapping_category_drags_adopt_newest_order() {
    let (mut launcher, _) = started();

    let Launcher { state, dispatcher } = &mut launcher;
    TreeCoordinator::begin_drag_category(state, &cat("Unassigned"));
    TreeCoordinator::drop_on(state, dispatcher, DropTarget::Category(cat("Graphics")));
    TreeCoordinator::begin_drag_category(state, &cat("Overhauls"));
    TreeCoordinator::drop_on(state, dispatcher, DropTarget::Category(cat("Graphics")));
    assert_eq!(category_names(&launcher), vec!["Unassigned", "Overhauls", "Graphics"]);
    assert!(launcher.run_until_idle(IDLE));

    // The older failure no longer owns the slot, so its rollback is skipped and
    // the newest answer replaces the local splice.
    assert_eq!(category_names(&launcher), vec!["Overhauls", "Graphics", "Unassigned"]);
    assert!(last_error(&launcher).is_some());
}

#[test]
fn test_stale_profile_snapshot_is_discarded() {
    let (mut launcher, _) = started();

    let Launcher { state, dispatcher } = &mut launcher;
    ApplicationCoordinator::select_profile(state, dispatcher, "warhammer_2");
    ApplicationCoordinator::select_profile(state, dispatcher, "warhammer_3");
    assert!(launcher.run_until_idle(IDLE));

    assert_eq!(launcher.state.session.profile(), "warhammer_3");
    assert_eq!(category_names(&launcher), vec!["Graphics", "Overhauls", "Unassigned"]);
    assert!(!launcher.state.tree.contains_mod("data/mixu_lords.pack"));
    // Both loads completed, so both overlays were released
    assert!(!launcher.state.status.is_blocked(Panel::Tree));
}

#[test]
fn test_profile_switch_replaces_views() {
    let (mut launcher, _) = started();

    let Launcher { state, dispatcher } = &mut launcher;
    ApplicationCoordinator::select_profile(state, dispatcher, "warhammer_2");
    assert!(launcher.run_until_idle(IDLE));

    assert_eq!(category_names(&launcher), vec!["Unassigned"]);
    assert_eq!(list_ids(&launcher), vec!["data/mixu_lords.pack"]);
    assert_eq!(launcher.state.settings.last_selected_game, "warhammer_2");
}

#[test]
fn test_tree_selection_highlights_list_row() {
    let (mut launcher, _) = started();

    let Launcher { state, dispatcher } = &mut launcher;
    TreeCoordinator::select(
        state,
        dispatcher,
        TreeNode::Mod(mod_id("data/radious_units.pack")),
        SelectModifiers::PLAIN,
    );

    assert!(launcher.state.list_view.is_selected("data/radious_units.pack"));
    assert_eq!(
        launcher.state.settings.selected_tree_item.as_deref(),
        Some("data/radious_units.pack")
    );
}

#[test]
fn test_tree_selection_finds_row_hidden_by_list_filter() {
    let (mut launcher, _) = started();

    let Launcher { state, dispatcher } = &mut launcher;
    LoadOrderCoordinator::set_filter(state, dispatcher, "camera");
    assert_eq!(state.list_rows().len(), 1);
    TreeCoordinator::select(
        state,
        dispatcher,
        TreeNode::Mod(mod_id("data/radious_units.pack")),
        SelectModifiers::PLAIN,
    );

    let state = &mut launcher.state;
    assert!(state.list_view.is_selected("data/radious_units.pack"));
    assert_eq!(state.list_view.filter_text(), "");
    assert_eq!(state.list_rows().len(), 4);
    assert_eq!(state.settings.list_filter_value, "");
}

#[test]
fn test_list_selection_reveals_tree_mod() {
    let (mut launcher, _) = started();
    assert!(!launcher.state.tree_view.is_expanded("Overhauls"));

    let Launcher { state, dispatcher } = &mut launcher;
    LoadOrderCoordinator::select(state, dispatcher, &mod_id("data/radious_units.pack"), true);

    let state = &launcher.state;
    assert_eq!(state.selection.single_mod().map(|id| id.as_str()), Some("data/radious_units.pack"));
    assert!(state.tree_view.is_expanded("Overhauls"));
}

#[test]
fn test_filter_forces_matching_categories_open() {
    let (mut launcher, _) = started();

    let Launcher { state, dispatcher } = &mut launcher;
    TreeCoordinator::set_filter(state, dispatcher, "radious");
    let visible = state.visible_tree_nodes();

    assert!(visible.contains(&TreeNode::Mod(mod_id("data/radious_units.pack"))));
    assert!(!visible.contains(&TreeNode::Mod(mod_id("data/sfo_grimhammer.pack"))));
    assert!(!visible.contains(&TreeNode::Category(cat("Graphics"))));
    assert!(launcher.state.tree_view.is_expanded("Overhauls"));
}

#[test]
fn test_launch_requires_game_path() -> Result<()> {
    let (mut launcher, backend) = started();

    let Launcher { state, dispatcher } = &mut launcher;
    assert!(ApplicationCoordinator::launch(state, dispatcher).is_none());
    assert_eq!(state.session.phase(), StartupPhase::NeedsGamePath);

    assert!(!ApplicationCoordinator::set_game_path(state, dispatcher, "/definitely/not/here"));

    let game_dir = tempfile::tempdir()?;
    let path = game_dir.path().to_string_lossy().to_string();
    assert!(ApplicationCoordinator::set_game_path(state, dispatcher, &path));
    assert_eq!(state.session.phase(), StartupPhase::Ready);

    ApplicationCoordinator::set_launch_options(state, dispatcher, "-windowed");
    assert!(ApplicationCoordinator::launch(state, dispatcher).is_some());
    assert!(launcher.run_until_idle(IDLE));

    let launches = backend.launches();
    assert_eq!(launches.len(), 1);
    assert!(launches[0].contains("-windowed"));
    assert!(!launcher.state.session.is_launching());
    assert_eq!(launcher.state.session.last_launch(), Some(launches[0].as_str()));
    Ok(())
}

#[test]
fn test_settings_survive_restart() -> Result<()> {
    let dir = tempfile::tempdir()?;

    {
        let backend = MemoryBackend::demo()?.with_settings_dir(dir.path())?;
        let mut launcher = Launcher::inline(Arc::new(backend), "warhammer_3");
        launcher.start();
        assert!(launcher.run_until_idle(IDLE));

        let Launcher { state, dispatcher } = &mut launcher;
        LoadOrderCoordinator::set_filter(state, dispatcher, "camera");
        TreeCoordinator::toggle_expansion(state, dispatcher, &cat("Overhauls"), Some(true));
        assert!(launcher.run_until_idle(IDLE));
    }

    let backend = MemoryBackend::demo()?.with_settings_dir(dir.path())?;
    let mut launcher = Launcher::inline(Arc::new(backend), "warhammer_3");
    launcher.start();
    assert!(launcher.run_until_idle(IDLE));

    assert_eq!(launcher.state.list_view.filter_text(), "camera");
    assert!(launcher.state.tree_view.is_expanded("Overhauls"));
    assert_eq!(launcher.state.list_rows().len(), 1);
    Ok(())
}

#[test]
fn test_threaded_launcher_reaches_idle() {
    let backend = MemoryBackend::demo().unwrap().with_latency(Duration::from_millis(5));
    let mut launcher = Launcher::new(Arc::new(backend), "warhammer_3");
    launcher.start();
    assert!(launcher.run_until_idle(IDLE));
    assert_eq!(launcher.state.tree.mod_count(), 6);
}

/// Delegates to a memory backend, stalling one settings save on request.
struct StallingSaves {
    inner: MemoryBackend,
    stall_next_save: AtomicBool,
}

impl Backend for StallingSaves {
    fn load_profile(&self, profile: &str, progress: &dyn ProgressReporter) -> BackendResult<ProfileSnapshot> {
        self.inner.load_profile(profile, progress)
    }
    fn set_mod_enabled(&self, id: &ModId, enabled: bool) -> BackendResult<Vec<LoadOrderEntry>> {
        self.inner.set_mod_enabled(id, enabled)
    }
    fn create_category(&self, name: &CategoryId) -> BackendResult<Vec<CategoryId>> {
        self.inner.create_category(name)
    }
    fn rename_category(&self, old: &CategoryId, new: &CategoryId) -> BackendResult<()> {
        self.inner.rename_category(old, new)
    }
    fn remove_categories(&self, ids: &[CategoryId]) -> BackendResult<()> {
        self.inner.remove_categories(ids)
    }
    fn reorder_categories(&self, source: &CategoryId, target: &CategoryId) -> BackendResult<Vec<CategoryId>> {
        self.inner.reorder_categories(source, target)
    }
    fn recategorize_mods(&self, ids: &[ModId], target: &CategoryId) -> BackendResult<()> {
        self.inner.recategorize_mods(ids, target)
    }
    fn reorder_load_order(&self, source: &ModId, target: &ModId) -> BackendResult<Vec<LoadOrderEntry>> {
        self.inner.reorder_load_order(source, target)
    }
    fn move_load_order(&self, id: &ModId, direction: MoveDirection) -> BackendResult<Vec<LoadOrderEntry>> {
        self.inner.move_load_order(id, direction)
    }
    fn launch(&self, profile: &str, options: &str) -> BackendResult<String> {
        self.inner.launch(profile, options)
    }
    fn load_settings(&self) -> BackendResult<LauncherSettings> {
        self.inner.load_settings()
    }
    fn save_settings(&self, settings: &LauncherSettings) -> BackendResult<()> {
        if self.stall_next_save.swap(false, Ordering::SeqCst) {
            std::thread::sleep(Duration::from_millis(200));
        }
        self.inner.save_settings(settings)
    }
}

#[test]
fn test_threaded_settings_saves_keep_newest_blob() {
    let backend = Arc::new(StallingSaves {
        inner: MemoryBackend::demo().unwrap(),
        stall_next_save: AtomicBool::new(false),
    });
    let shared: Arc<dyn Backend> = backend.clone();
    let mut launcher = Launcher::new(shared, "warhammer_3");
    launcher.start();
    assert!(launcher.run_until_idle(IDLE));

    backend.stall_next_save.store(true, Ordering::SeqCst);
    let Launcher { state, dispatcher } = &mut launcher;
    SettingsCoordinator::persist(state, dispatcher);
    for text in ["r", "ra", "rad"] {
        TreeCoordinator::set_filter(state, dispatcher, text);
    }
    assert!(launcher.run_until_idle(IDLE));

    assert_eq!(launcher.state.tree_view.filter_text(), "rad");
    assert_eq!(backend.load_settings().unwrap().tree_filter_value, "rad");
}
