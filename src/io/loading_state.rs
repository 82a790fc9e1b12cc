//! Shared in-flight request counter.

/// Holds the number of backend requests currently running.
///
/// Wrapped in an `Arc<Mutex<>>` and shared between the UI thread and the
/// worker threads; results themselves come through a channel.
#[derive(Debug, Default)]
pub struct LoadingState {
    pub in_flight: usize,
}

impl LoadingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    pub fn started(&mut self) {
        self.in_flight += 1;
    }

    pub fn finished(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }
}
