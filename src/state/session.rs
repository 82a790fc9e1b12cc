//! Active profile and launch readiness.

/// Where the launcher is in its startup sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartupPhase {
    /// Settings have not arrived yet.
    #[default]
    LoadingSettings,
    /// No usable game path; interaction is blocked until one is supplied.
    NeedsGamePath,
    Ready,
}

/// State related to the active game profile.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    profile: String,
    phase: StartupPhase,
    /// Result string of the most recent launch.
    last_launch: Option<String>,
    launching: bool,
    exit_requested: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn set_profile(&mut self, profile: &str) {
        self.profile = profile.to_string();
    }

    pub fn phase(&self) -> StartupPhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: StartupPhase) {
        self.phase = phase;
    }

    pub fn is_blocked(&self) -> bool {
        self.phase != StartupPhase::Ready
    }

    pub fn is_launching(&self) -> bool {
        self.launching
    }

    pub fn set_launching(&mut self, launching: bool) {
        self.launching = launching;
    }

    pub fn last_launch(&self) -> Option<&str> {
        self.last_launch.as_deref()
    }

    pub fn set_last_launch(&mut self, result: String) {
        self.last_launch = Some(result);
    }

    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}
