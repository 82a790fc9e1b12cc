//! Asynchronous backend request dispatch.
//!
//! Each request runs on a background thread and reports back over a channel
//! that the UI drains once per frame, keeping the GUI responsive while the
//! backend works. Responses are validated on the worker before they are sent,
//! so only well-formed data ever reaches view state.
//!
//! Settings saves are the exception: they go to a single writer thread in
//! submission order, and a burst queued behind a slow save collapses into one
//! write of the newest blob.

use crate::backend::{Backend, ProgressReporter, ProgressUpdate};
use crate::error::{BackendError, BackendResult};
use crate::io::LoadingState;
use crate::model::wire::{validate_category_order, validate_load_order, validate_snapshot};
use crate::model::{CategoryId, LauncherSettings, LoadOrder, ModId, MoveDirection, ValidatedSnapshot};
use parking_lot::Mutex;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use tracing::{debug, warn};

/// Identity of an issued request. Tickets increase monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub u64);

/// A backend call, as issued by a coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendRequest {
    LoadProfile { profile: String },
    SetModEnabled { id: ModId, enabled: bool },
    CreateCategory { name: CategoryId },
    RenameCategory { old: CategoryId, new: CategoryId },
    RemoveCategories { ids: Vec<CategoryId> },
    ReorderCategories { source: CategoryId, target: CategoryId },
    RecategorizeMods { ids: Vec<ModId>, target: CategoryId },
    ReorderLoadOrder { source: ModId, target: ModId },
    MoveLoadOrder { id: ModId, direction: MoveDirection },
    Launch { profile: String, options: String },
    LoadSettings,
    SaveSettings(LauncherSettings),
}

impl BackendRequest {
    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            BackendRequest::LoadProfile { .. } => "load_profile",
            BackendRequest::SetModEnabled { .. } => "set_mod_enabled",
            BackendRequest::CreateCategory { .. } => "create_category",
            BackendRequest::RenameCategory { .. } => "rename_category",
            BackendRequest::RemoveCategories { .. } => "remove_categories",
            BackendRequest::ReorderCategories { .. } => "reorder_categories",
            BackendRequest::RecategorizeMods { .. } => "recategorize_mods",
            BackendRequest::ReorderLoadOrder { .. } => "reorder_load_order",
            BackendRequest::MoveLoadOrder { .. } => "move_load_order",
            BackendRequest::Launch { .. } => "launch",
            BackendRequest::LoadSettings => "load_settings",
            BackendRequest::SaveSettings(_) => "save_settings",
        }
    }
}

/// A validated backend answer.
#[derive(Debug, Clone)]
pub enum BackendResponse {
    Snapshot(ValidatedSnapshot),
    LoadOrder(LoadOrder),
    CategoryOrder(Vec<CategoryId>),
    Settings(LauncherSettings),
    Launched(String),
    Done,
}

/// Outcome of one request.
#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub request: BackendRequest,
    pub result: BackendResult<BackendResponse>,
}

/// Everything the dispatcher reports back to the UI thread.
#[derive(Debug)]
pub enum DispatchEvent {
    Progress(ProgressUpdate),
    Completed(Completion),
}

/// Callback used to wake the UI (e.g. request an egui repaint).
pub type Waker = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DispatchMode {
    Threaded,
    /// Runs requests on the caller's thread. Events are still delivered via `poll`.
    Inline,
}

/// Runs a request against the backend and validates the response.
pub fn execute(
    backend: &dyn Backend,
    request: &BackendRequest,
    progress: &dyn ProgressReporter,
) -> BackendResult<BackendResponse> {
    let response = match request {
        BackendRequest::LoadProfile { profile } => {
            let snapshot = backend.load_profile(profile, progress)?;
            BackendResponse::Snapshot(validate_snapshot(snapshot)?)
        }
        BackendRequest::SetModEnabled { id, enabled } => {
            BackendResponse::LoadOrder(validate_load_order(backend.set_mod_enabled(id, *enabled)?)?)
        }
        BackendRequest::CreateCategory { name } => {
            let order = backend.create_category(name)?;
            validate_category_order(&order)?;
            BackendResponse::CategoryOrder(order)
        }
        BackendRequest::RenameCategory { old, new } => {
            backend.rename_category(old, new)?;
            BackendResponse::Done
        }
        BackendRequest::RemoveCategories { ids } => {
            backend.remove_categories(ids)?;
            BackendResponse::Done
        }
        BackendRequest::ReorderCategories { source, target } => {
            let order = backend.reorder_categories(source, target)?;
            validate_category_order(&order)?;
            BackendResponse::CategoryOrder(order)
        }
        BackendRequest::RecategorizeMods { ids, target } => {
            backend.recategorize_mods(ids, target)?;
            BackendResponse::Done
        }
        BackendRequest::ReorderLoadOrder { source, target } => {
            BackendResponse::LoadOrder(validate_load_order(backend.reorder_load_order(source, target)?)?)
        }
        BackendRequest::MoveLoadOrder { id, direction } => {
            BackendResponse::LoadOrder(validate_load_order(backend.move_load_order(id, *direction)?)?)
        }
        BackendRequest::Launch { profile, options } => {
            BackendResponse::Launched(backend.launch(profile, options)?)
        }
        BackendRequest::LoadSettings => BackendResponse::Settings(backend.load_settings()?),
        BackendRequest::SaveSettings(settings) => {
            backend.save_settings(settings)?;
            BackendResponse::Done
        }
    };
    Ok(response)
}

struct ChannelProgress {
    sender: Sender<DispatchEvent>,
    waker: Option<Waker>,
}

impl ProgressReporter for ChannelProgress {
    fn report(&self, update: ProgressUpdate) {
        let _ = self.sender.send(DispatchEvent::Progress(update));
        if let Some(waker) = &self.waker {
            waker();
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("backend worker panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("backend worker panicked: {msg}")
    } else {
        "backend worker panicked".to_string()
    }
}

/// Runs a request, turning a panic into an `Unavailable` error so every
/// request is guaranteed a completion.
fn run_guarded(backend: &dyn Backend, request: &BackendRequest, progress: &dyn ProgressReporter) -> BackendResult<BackendResponse> {
    panic::catch_unwind(AssertUnwindSafe(|| execute(backend, request, progress)))
        .unwrap_or_else(|payload| Err(BackendError::Unavailable(panic_message(payload))))
}

/// A settings save queued for the writer thread.
struct SaveJob {
    ticket: Ticket,
    request: BackendRequest,
    waker: Option<Waker>,
}

/// Writes queued saves one at a time. Only the newest job of each batch
/// reaches the backend; the older ones complete without writing.
fn run_settings_writer(
    backend: Arc<dyn Backend>,
    jobs: Receiver<SaveJob>,
    events: Sender<DispatchEvent>,
    loading_state: Arc<Mutex<LoadingState>>,
) {
    while let Ok(first) = jobs.recv() {
        let mut batch = vec![first];
        batch.extend(jobs.try_iter());
        let Some(newest) = batch.pop() else {
            continue;
        };

        for job in batch {
            debug!(ticket = job.ticket.0, newer = newest.ticket.0, "Coalescing settings save");
            complete(&events, &loading_state, job, Ok(BackendResponse::Done));
        }

        let progress = ChannelProgress {
            sender: events.clone(),
            waker: newest.waker.clone(),
        };
        let result = run_guarded(backend.as_ref(), &newest.request, &progress);
        complete(&events, &loading_state, newest, result);
    }
}

fn complete(
    events: &Sender<DispatchEvent>,
    loading_state: &Mutex<LoadingState>,
    job: SaveJob,
    result: BackendResult<BackendResponse>,
) {
    let _ = events.send(DispatchEvent::Completed(Completion {
        ticket: job.ticket,
        request: job.request,
        result,
    }));
    loading_state.lock().finished();
    if let Some(waker) = job.waker {
        waker();
    }
}

/// Issues backend requests and collects their completions.
pub struct AsyncDispatcher {
    backend: Arc<dyn Backend>,
    mode: DispatchMode,
    next_ticket: u64,
    sender: Sender<DispatchEvent>,
    receiver: Receiver<DispatchEvent>,
    loading_state: Arc<Mutex<LoadingState>>,
    waker: Option<Waker>,
    /// Feeds the settings writer, spawned on the first threaded save.
    settings_writer: Option<Sender<SaveJob>>,
}

impl AsyncDispatcher {
    /// Creates a dispatcher that runs every request on its own thread.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self::with_mode(backend, DispatchMode::Threaded)
    }

    /// Creates a dispatcher that runs requests synchronously inside `submit`.
    pub fn inline(backend: Arc<dyn Backend>) -> Self {
        Self::with_mode(backend, DispatchMode::Inline)
    }

    fn with_mode(backend: Arc<dyn Backend>, mode: DispatchMode) -> Self {
        let (sender, receiver) = channel();
        Self {
            backend,
            mode,
            next_ticket: 0,
            sender,
            receiver,
            loading_state: Arc::new(Mutex::new(LoadingState::new())),
            waker: None,
            settings_writer: None,
        }
    }

    /// Installs a callback invoked whenever a worker has news.
    pub fn set_waker(&mut self, waker: Waker) {
        self.waker = Some(waker);
    }

    /// True while at least one request is running.
    pub fn is_busy(&self) -> bool {
        self.loading_state.lock().is_busy()
    }

    pub fn in_flight(&self) -> usize {
        self.loading_state.lock().in_flight
    }

    /// Issues a request and returns its ticket immediately.
    pub fn submit(&mut self, request: BackendRequest) -> Ticket {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        debug!(ticket = ticket.0, request = request.label(), "Submitting backend request");

        self.loading_state.lock().started();
        let progress = ChannelProgress {
            sender: self.sender.clone(),
            waker: self.waker.clone(),
        };

        match self.mode {
            DispatchMode::Inline => {
                let result = run_guarded(self.backend.as_ref(), &request, &progress);
                self.finish(ticket, request, result);
            }
            DispatchMode::Threaded if matches!(request, BackendRequest::SaveSettings(_)) => {
                self.queue_save(ticket, request);
            }
            DispatchMode::Threaded => {
                let backend = Arc::clone(&self.backend);
                let sender = self.sender.clone();
                let loading_state = Arc::clone(&self.loading_state);
                let waker = self.waker.clone();
                let worker_request = request.clone();

                let spawned = thread::Builder::new()
                    .name(format!("backend-{}", request.label()))
                    .spawn(move || {
                        let result = run_guarded(backend.as_ref(), &worker_request, &progress);
                        let _ = sender.send(DispatchEvent::Completed(Completion {
                            ticket,
                            request: worker_request,
                            result,
                        }));
                        loading_state.lock().finished();
                        if let Some(waker) = waker {
                            waker();
                        }
                    });

                if let Err(err) = spawned {
                    warn!(ticket = ticket.0, "Failed to spawn backend worker: {err}");
                    self.finish(ticket, request, Err(BackendError::Unavailable(err.to_string())));
                }
            }
        }
        ticket
    }

    /// Hands a save to the writer thread, starting it if needed.
    fn queue_save(&mut self, ticket: Ticket, request: BackendRequest) {
        if self.settings_writer.is_none() {
            let (jobs_tx, jobs_rx) = channel();
            let backend = Arc::clone(&self.backend);
            let events = self.sender.clone();
            let loading_state = Arc::clone(&self.loading_state);
            let spawned = thread::Builder::new()
                .name("backend-settings-writer".to_string())
                .spawn(move || run_settings_writer(backend, jobs_rx, events, loading_state));
            match spawned {
                Ok(_) => self.settings_writer = Some(jobs_tx),
                Err(err) => {
                    warn!(ticket = ticket.0, "Failed to spawn settings writer: {err}");
                    self.finish(ticket, request, Err(BackendError::Unavailable(err.to_string())));
                    return;
                }
            }
        }

        let job = SaveJob {
            ticket,
            request,
            waker: self.waker.clone(),
        };
        let sent = match &self.settings_writer {
            Some(writer) => writer.send(job).map_err(|err| err.0),
            None => Err(job),
        };
        if let Err(job) = sent {
            warn!(ticket = ticket.0, "Settings writer is gone");
            self.settings_writer = None;
            self.finish(
                job.ticket,
                job.request,
                Err(BackendError::Unavailable("settings writer stopped".to_string())),
            );
        }
    }

    fn finish(&self, ticket: Ticket, request: BackendRequest, result: BackendResult<BackendResponse>) {
        let _ = self.sender.send(DispatchEvent::Completed(Completion {
            ticket,
            request,
            result,
        }));
        self.loading_state.lock().finished();
        if let Some(waker) = &self.waker {
            waker();
        }
    }

    /// Drains every event received since the last call.
    ///
    /// This should be called once per frame in the update loop.
    pub fn poll(&mut self) -> Vec<DispatchEvent> {
        self.receiver.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::model::{LoadOrderEntry, ProfileSnapshot};
    use std::time::{Duration, Instant};

    fn memory() -> Arc<dyn Backend> {
        Arc::new(MemoryBackend::demo().unwrap())
    }

    fn completions(events: Vec<DispatchEvent>) -> Vec<Completion> {
        events
            .into_iter()
            .filter_map(|e| match e {
                DispatchEvent::Completed(c) => Some(c),
                DispatchEvent::Progress(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_inline_dispatch_completes_in_submit() {
        let mut dispatcher = AsyncDispatcher::inline(memory());
        let ticket = dispatcher.submit(BackendRequest::LoadSettings);
        assert!(!dispatcher.is_busy());
        let done = completions(dispatcher.poll());
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].ticket, ticket);
        assert!(matches!(done[0].result, Ok(BackendResponse::Settings(_))));
    }

    #[test]
    fn test_tickets_increase() {
        let mut dispatcher = AsyncDispatcher::inline(memory());
        let a = dispatcher.submit(BackendRequest::LoadSettings);
        let b = dispatcher.submit(BackendRequest::LoadSettings);
        assert!(b > a);
    }

    #[test]
    fn test_profile_load_reports_progress_before_completion() {
        let mut dispatcher = AsyncDispatcher::inline(memory());
        dispatcher.submit(BackendRequest::LoadProfile {
            profile: "warhammer_3".into(),
        });
        let events = dispatcher.poll();
        assert!(matches!(events.first(), Some(DispatchEvent::Progress(_))));
        assert!(matches!(events.last(), Some(DispatchEvent::Completed(_))));
    }

    struct PanickingBackend;

    impl Backend for PanickingBackend {
        fn load_profile(&self, _: &str, _: &dyn ProgressReporter) -> BackendResult<ProfileSnapshot> {
            panic!("disk on fire")
        }
        fn set_mod_enabled(&self, _: &ModId, _: bool) -> BackendResult<Vec<LoadOrderEntry>> {
            Ok(vec![])
        }
        fn create_category(&self, _: &CategoryId) -> BackendResult<Vec<CategoryId>> {
            Ok(vec![])
        }
        fn rename_category(&self, _: &CategoryId, _: &CategoryId) -> BackendResult<()> {
            Ok(())
        }
        fn remove_categories(&self, _: &[CategoryId]) -> BackendResult<()> {
            Ok(())
        }
        fn reorder_categories(&self, _: &CategoryId, _: &CategoryId) -> BackendResult<Vec<CategoryId>> {
            Ok(vec![])
        }
        fn recategorize_mods(&self, _: &[ModId], _: &CategoryId) -> BackendResult<()> {
            Ok(())
        }
        fn reorder_load_order(&self, _: &ModId, _: &ModId) -> BackendResult<Vec<LoadOrderEntry>> {
            Ok(vec![])
        }
        fn move_load_order(&self, _: &ModId, _: MoveDirection) -> BackendResult<Vec<LoadOrderEntry>> {
            Ok(vec![])
        }
        fn launch(&self, _: &str, _: &str) -> BackendResult<String> {
            Ok(String::new())
        }
        fn load_settings(&self) -> BackendResult<LauncherSettings> {
            Ok(LauncherSettings::default())
        }
        fn save_settings(&self, _: &LauncherSettings) -> BackendResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_panicking_worker_still_completes() {
        let mut dispatcher = AsyncDispatcher::new(Arc::new(PanickingBackend));
        dispatcher.submit(BackendRequest::LoadProfile { profile: "x".into() });

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut done = Vec::new();
        while done.is_empty() && Instant::now() < deadline {
            done.extend(completions(dispatcher.poll()));
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(done.len(), 1);
        assert!(matches!(&done[0].result, Err(BackendError::Unavailable(msg)) if msg.contains("disk on fire")));
    }

    #[test]
    fn test_threaded_saves_land_in_submission_order() {
        let backend = Arc::new(MemoryBackend::demo().unwrap());
        let mut dispatcher = AsyncDispatcher::new(backend.clone());
        for filter in ["r", "ra", "rad"] {
            let settings = LauncherSettings {
                tree_filter_value: filter.to_string(),
                ..LauncherSettings::default()
            };
            dispatcher.submit(BackendRequest::SaveSettings(settings));
        }

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut done = Vec::new();
        while done.len() < 3 && Instant::now() < deadline {
            done.extend(completions(dispatcher.poll()));
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(done.len(), 3);
        assert!(done.iter().all(|c| c.result.is_ok()));
        assert_eq!(backend.load_settings().unwrap().tree_filter_value, "rad");
    }

    #[test]
    fn test_threaded_requests_all_complete() {
        let mut dispatcher = AsyncDispatcher::new(memory());
        for _ in 0..4 {
            dispatcher.submit(BackendRequest::LoadSettings);
        }
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut done = Vec::new();
        while done.len() < 4 && Instant::now() < deadline {
            done.extend(completions(dispatcher.poll()));
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(done.len(), 4);
    }
}
