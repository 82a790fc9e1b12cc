//! Status bar messages, loading overlays and progress.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// How long a transient status message stays visible.
pub const MESSAGE_TTL: Duration = Duration::from_secs(5);

/// Panels that can be covered by a loading overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Tree,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    expires_at: Instant,
}

/// Coarse progress reported by the backend during bulk operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressState {
    pub id: String,
    pub progress: u64,
    pub total: u64,
}

impl ProgressState {
    /// Completed fraction in `0.0..=1.0`.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        (self.progress.min(self.total) as f32) / (self.total as f32)
    }
}

/// State related to transient feedback.
///
/// Overlays are counted per panel so overlapping operations each hold their
/// own acquisition and the panel unblocks only when the last one releases.
#[derive(Debug, Clone, Default)]
pub struct StatusState {
    message: Option<StatusMessage>,
    overlays: HashMap<Panel, usize>,
    progress: Option<ProgressState>,
}

impl StatusState {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Messages =====

    pub fn info(&mut self, text: impl Into<String>, now: Instant) {
        self.set_message(text.into(), StatusLevel::Info, now);
    }

    pub fn error(&mut self, text: impl Into<String>, now: Instant) {
        self.set_message(text.into(), StatusLevel::Error, now);
    }

    fn set_message(&mut self, text: String, level: StatusLevel, now: Instant) {
        self.message = Some(StatusMessage {
            text,
            level,
            expires_at: now + MESSAGE_TTL,
        });
    }

    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    /// Drops the message once it has expired.
    pub fn tick(&mut self, now: Instant) {
        if self.message.as_ref().is_some_and(|m| now >= m.expires_at) {
            self.message = None;
        }
    }

    // ===== Overlays =====

    pub fn acquire_overlay(&mut self, panel: Panel) {
        *self.overlays.entry(panel).or_insert(0) += 1;
    }

    pub fn release_overlay(&mut self, panel: Panel) {
        if let Some(count) = self.overlays.get_mut(&panel) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.overlays.remove(&panel);
            }
        }
    }

    pub fn is_blocked(&self, panel: Panel) -> bool {
        self.overlays.get(&panel).is_some_and(|&c| c > 0)
    }

    // ===== Progress =====

    pub fn progress(&self) -> Option<&ProgressState> {
        self.progress.as_ref()
    }

    pub fn set_progress(&mut self, progress: ProgressState) {
        self.progress = Some(progress);
    }

    pub fn dismiss_progress(&mut self) {
        self.progress = None;
    }
}
