//! An in-process backend holding profiles in memory.
//!
//! Used by the demo GUI and by the scenario tests. It follows the same rules
//! as the native backend: the default category is always last, load-order
//! values are renumbered densely from 0 after every change, and duplicate or
//! protected category names are rejected.

use crate::backend::{Backend, ProgressReporter, ProgressUpdate};
use crate::domain::markup::strip_inline_markup;
use crate::error::{BackendError, BackendResult, ModelError};
use crate::model::wire::validate_snapshot;
use crate::model::{
    CategoryId, CategoryRecord, LauncherSettings, LoadOrderEntry, ModId, MoveDirection,
    ProfileSnapshot, DEFAULT_CATEGORY,
};
use anyhow::Context;
use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Seed profile bundled with the GUI.
pub const DEMO_SEED: &str = include_str!("../../assets/demo_seed.json");

const SETTINGS_FILE: &str = "settings.json";

/// Seed document: profiles keyed by game id plus initial settings.
#[derive(Debug, Deserialize)]
struct Seed {
    profiles: HashMap<String, ProfileSnapshot>,
    #[serde(default)]
    settings: LauncherSettings,
}

#[derive(Debug, Default)]
struct MemoryState {
    profiles: HashMap<String, ProfileSnapshot>,
    active: Option<String>,
    settings: LauncherSettings,
    settings_path: Option<PathBuf>,
    fail_next: Option<BackendError>,
    launches: Vec<String>,
}

pub struct MemoryBackend {
    state: Mutex<MemoryState>,
    latency: Option<Duration>,
}

impl MemoryBackend {
    /// Builds a backend from already-decoded profiles.
    pub fn new(profiles: HashMap<String, ProfileSnapshot>, settings: LauncherSettings) -> BackendResult<Self> {
        for snapshot in profiles.values() {
            validate_snapshot(snapshot.clone())?;
        }
        Ok(Self {
            state: Mutex::new(MemoryState {
                profiles,
                settings,
                ..MemoryState::default()
            }),
            latency: None,
        })
    }

    /// Decodes a JSON seed, validating every profile through the same boundary
    /// used for live responses.
    pub fn from_json(json: &str) -> BackendResult<Self> {
        let seed: Seed = serde_json::from_str(json).map_err(|e| ModelError::Decode(e.to_string()))?;
        Self::new(seed.profiles, seed.settings)
    }

    /// Reads a JSON seed from disk.
    pub fn from_seed_file(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid seed file {}", path.display()))
    }

    /// The bundled demo profile.
    pub fn demo() -> BackendResult<Self> {
        Self::from_json(DEMO_SEED)
    }

    /// Adds an artificial delay to every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Persists settings as JSON in `dir`, loading any file already there.
    pub fn with_settings_dir(self, dir: &Path) -> anyhow::Result<Self> {
        let path = dir.join(SETTINGS_FILE);
        if path.exists() {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let settings: LauncherSettings = serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            self.state.lock().settings = settings;
        }
        self.state.lock().settings_path = Some(path);
        Ok(self)
    }

    /// Default settings directory: `<config dir>/modshelf`.
    pub fn default_settings_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("modshelf"))
    }

    /// Makes the next call fail with `error`.
    pub fn fail_next(&self, error: BackendError) {
        self.state.lock().fail_next = Some(error);
    }

    /// Current snapshot of a profile, for inspection.
    pub fn snapshot(&self, profile: &str) -> Option<ProfileSnapshot> {
        self.state.lock().profiles.get(profile).cloned()
    }

    /// Launch result strings, oldest first.
    pub fn launches(&self) -> Vec<String> {
        self.state.lock().launches.clone()
    }

    fn call<R>(&self, f: impl FnOnce(&mut MemoryState) -> BackendResult<R>) -> BackendResult<R> {
        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }
        let mut state = self.state.lock();
        if let Some(error) = state.fail_next.take() {
            return Err(error);
        }
        f(&mut state)
    }

    fn with_profile_mut<R>(&self, f: impl FnOnce(&mut ProfileSnapshot) -> BackendResult<R>) -> BackendResult<R> {
        self.call(|state| {
            let active = state
                .active
                .clone()
                .ok_or_else(|| BackendError::rejected("No profile is loaded"))?;
            let profile = state
                .profiles
                .get_mut(&active)
                .ok_or_else(|| BackendError::rejected(format!("Unknown profile '{active}'")))?;
            f(profile)
        })
    }
}

// ===== Profile helpers =====

fn category_index(profile: &ProfileSnapshot, id: &str) -> Option<usize> {
    profile.categories.iter().position(|c| c.id.as_str() == id)
}

fn category_order(profile: &ProfileSnapshot) -> Vec<CategoryId> {
    profile.categories.iter().map(|c| c.id.clone()).collect()
}

fn renumber(entries: &mut [LoadOrderEntry]) {
    for (order, entry) in entries.iter_mut().enumerate() {
        entry.order = order as i32;
    }
}

fn ensure_not_default(id: &str, action: &str) -> BackendResult<()> {
    if id == DEFAULT_CATEGORY {
        return Err(BackendError::rejected(format!(
            "The {DEFAULT_CATEGORY} category cannot be {action}"
        )));
    }
    Ok(())
}

impl Backend for MemoryBackend {
    fn load_profile(&self, profile: &str, progress: &dyn ProgressReporter) -> BackendResult<ProfileSnapshot> {
        self.call(|state| {
            let snapshot = state
                .profiles
                .get(profile)
                .cloned()
                .ok_or_else(|| BackendError::rejected(format!("Unknown profile '{profile}'")))?;

            let total = snapshot.categories.len() as u64;
            for done in 0..=total {
                progress.report(ProgressUpdate {
                    id: format!("load:{profile}"),
                    progress: done,
                    total,
                });
            }

            state.active = Some(profile.to_string());
            Ok(snapshot)
        })
    }

    fn set_mod_enabled(&self, id: &ModId, enabled: bool) -> BackendResult<Vec<LoadOrderEntry>> {
        self.with_profile_mut(|profile| {
            let item = profile
                .categories
                .iter_mut()
                .flat_map(|c| c.children.iter_mut())
                .find(|m| m.id == *id)
                .ok_or_else(|| BackendError::rejected(format!("Unknown mod '{id}'")))?;
            item.is_checked = enabled;
            let entry = LoadOrderEntry {
                id: item.id.clone(),
                pack: strip_inline_markup(&item.name),
                entry_type: item.mod_type.clone(),
                order: 0,
                location: item.location.clone(),
                steam_id: String::new(),
            };

            let present = profile.load_order.iter().any(|e| e.id == *id);
            if enabled && !present {
                profile.load_order.push(entry);
            } else if !enabled {
                profile.load_order.retain(|e| e.id != *id);
            }
            renumber(&mut profile.load_order);
            Ok(profile.load_order.clone())
        })
    }

    fn create_category(&self, name: &CategoryId) -> BackendResult<Vec<CategoryId>> {
        self.with_profile_mut(|profile| {
            ensure_not_default(name.as_str(), "created")?;
            if category_index(profile, name.as_str()).is_some() {
                return Err(BackendError::rejected(format!("Category '{name}' already exists")));
            }
            // The default category stays last.
            let at = profile.categories.len().saturating_sub(1);
            profile.categories.insert(
                at,
                CategoryRecord {
                    id: name.clone(),
                    children: Vec::new(),
                },
            );
            Ok(category_order(profile))
        })
    }

    fn rename_category(&self, old: &CategoryId, new: &CategoryId) -> BackendResult<()> {
        self.with_profile_mut(|profile| {
            if old == new {
                return Ok(());
            }
            ensure_not_default(old.as_str(), "renamed")?;
            ensure_not_default(new.as_str(), "used as a new name")?;
            if category_index(profile, new.as_str()).is_some() {
                return Err(BackendError::rejected(format!("Category '{new}' already exists")));
            }
            let index = category_index(profile, old.as_str())
                .ok_or_else(|| BackendError::rejected(format!("Unknown category '{old}'")))?;
            profile.categories[index].id = new.clone();
            Ok(())
        })
    }

    fn remove_categories(&self, ids: &[CategoryId]) -> BackendResult<()> {
        self.with_profile_mut(|profile| {
            for id in ids {
                ensure_not_default(id.as_str(), "deleted")?;
                if category_index(profile, id.as_str()).is_none() {
                    return Err(BackendError::rejected(format!("Unknown category '{id}'")));
                }
            }
            for id in ids {
                let Some(index) = category_index(profile, id.as_str()) else {
                    continue;
                };
                let removed = profile.categories.remove(index);
                let default = category_index(profile, DEFAULT_CATEGORY)
                    .ok_or_else(|| ModelError::MissingDefaultCategory(DEFAULT_CATEGORY.to_string()))?;
                profile.categories[default].children.extend(removed.children);
            }
            Ok(())
        })
    }

    fn reorder_categories(&self, source: &CategoryId, target: &CategoryId) -> BackendResult<Vec<CategoryId>> {
        self.with_profile_mut(|profile| {
            if source == target {
                return Ok(category_order(profile));
            }
            ensure_not_default(source.as_str(), "moved")?;
            let from = category_index(profile, source.as_str())
                .ok_or_else(|| BackendError::rejected(format!("Unknown category '{source}'")))?;
            let mut to = category_index(profile, target.as_str())
                .ok_or_else(|| BackendError::rejected(format!("Unknown category '{target}'")))?;
            let category = profile.categories.remove(from);
            if to > from {
                to -= 1;
            }
            profile.categories.insert(to, category);
            Ok(category_order(profile))
        })
    }

    fn recategorize_mods(&self, ids: &[ModId], target: &CategoryId) -> BackendResult<()> {
        self.with_profile_mut(|profile| {
            let target_index = category_index(profile, target.as_str())
                .ok_or_else(|| BackendError::rejected(format!("Unknown category '{target}'")))?;
            for id in ids {
                let Some(source_index) = profile
                    .categories
                    .iter()
                    .position(|c| c.children.iter().any(|m| m.id == *id))
                else {
                    continue;
                };
                if source_index == target_index {
                    continue;
                }
                let children = &mut profile.categories[source_index].children;
                let Some(pos) = children.iter().position(|m| m.id == *id) else {
                    continue;
                };
                let item = children.remove(pos);
                profile.categories[target_index].children.push(item);
            }
            Ok(())
        })
    }

    fn reorder_load_order(&self, source: &ModId, target: &ModId) -> BackendResult<Vec<LoadOrderEntry>> {
        self.with_profile_mut(|profile| {
            let list = &mut profile.load_order;
            if source == target {
                return Ok(list.clone());
            }
            let from = list
                .iter()
                .position(|e| e.id == *source)
                .ok_or_else(|| BackendError::rejected(format!("'{source}' is not in the load order")))?;
            let mut to = list
                .iter()
                .position(|e| e.id == *target)
                .ok_or_else(|| BackendError::rejected(format!("'{target}' is not in the load order")))?;
            let entry = list.remove(from);
            if to > from {
                to -= 1;
            }
            list.insert(to, entry);
            renumber(list);
            Ok(list.clone())
        })
    }

    fn move_load_order(&self, id: &ModId, direction: MoveDirection) -> BackendResult<Vec<LoadOrderEntry>> {
        self.with_profile_mut(|profile| {
            let list = &mut profile.load_order;
            let index = list
                .iter()
                .position(|e| e.id == *id)
                .ok_or_else(|| BackendError::rejected(format!("'{id}' is not in the load order")))?;
            let neighbour = match direction {
                MoveDirection::Up => index.checked_sub(1),
                MoveDirection::Down => Some(index + 1).filter(|&n| n < list.len()),
            };
            if let Some(neighbour) = neighbour {
                list.swap(index, neighbour);
            }
            renumber(list);
            Ok(list.clone())
        })
    }

    fn launch(&self, profile: &str, options: &str) -> BackendResult<String> {
        self.call(|state| {
            let path = state
                .settings
                .game_path(profile)
                .ok_or_else(|| BackendError::rejected(format!("No game path configured for '{profile}'")))?
                .to_string();
            let enabled = state
                .profiles
                .get(profile)
                .map(|p| p.load_order.len())
                .unwrap_or(0);
            let mut result = format!("Launched {profile} from {path} with {enabled} mods");
            if !options.trim().is_empty() {
                result.push_str(&format!(" ({})", options.trim()));
            }
            state.launches.push(result.clone());
            Ok(result)
        })
    }

    fn load_settings(&self) -> BackendResult<LauncherSettings> {
        self.call(|state| Ok(state.settings.clone()))
    }

    fn save_settings(&self, settings: &LauncherSettings) -> BackendResult<()> {
        self.call(|state| {
            state.settings = settings.clone();
            if let Some(path) = &state.settings_path {
                write_settings(path, settings).map_err(|e| BackendError::Unavailable(format!("{e:#}")))?;
            }
            Ok(())
        })
    }
}

fn write_settings(path: &Path, settings: &LauncherSettings) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
