//! Root controller owning the launcher state and the request dispatcher.

use crate::app::{AppState, ApplicationCoordinator};
use crate::backend::Backend;
use crate::io::{AsyncDispatcher, Waker};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Owns all launcher state. Coordinators borrow the two halves mutably.
pub struct Launcher {
    pub state: AppState,
    pub dispatcher: AsyncDispatcher,
}

impl Launcher {
    /// Creates a launcher whose requests run on background threads.
    ///
    /// `default_profile` is used when the settings blob names no game.
    pub fn new(backend: Arc<dyn Backend>, default_profile: &str) -> Self {
        Self::with_dispatcher(AsyncDispatcher::new(backend), default_profile)
    }

    /// Creates a launcher whose requests complete synchronously.
    pub fn inline(backend: Arc<dyn Backend>, default_profile: &str) -> Self {
        Self::with_dispatcher(AsyncDispatcher::inline(backend), default_profile)
    }

    fn with_dispatcher(dispatcher: AsyncDispatcher, default_profile: &str) -> Self {
        let mut state = AppState::new();
        state.session.set_profile(default_profile);
        Self { state, dispatcher }
    }

    pub fn set_waker(&mut self, waker: Waker) {
        self.dispatcher.set_waker(waker);
    }

    pub fn start(&mut self) {
        ApplicationCoordinator::startup(&mut self.state, &mut self.dispatcher);
    }

    /// Per-frame update. Returns true if any backend event was applied.
    pub fn update(&mut self) -> bool {
        let applied = ApplicationCoordinator::process_events(&mut self.state, &mut self.dispatcher);
        ApplicationCoordinator::tick(&mut self.state, Instant::now());
        applied
    }

    pub fn is_busy(&self) -> bool {
        self.dispatcher.is_busy()
    }

    /// Applies events until no request is in flight and nothing is queued.
    ///
    /// Gives up after `timeout`. Returns true if the launcher went idle.
    pub fn run_until_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let applied = self.update();
            if !applied && !self.dispatcher.is_busy() {
                // A worker may have sent its completion after the last poll.
                if !self.update() {
                    return true;
                }
                continue;
            }
            if Instant::now() >= deadline {
                return false;
            }
            if !applied {
                thread::sleep(Duration::from_millis(1));
            }
        }
    }
}
