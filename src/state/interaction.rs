//! In-flight drag and hover state.
//!
//! Nested drop zones report enter/leave in pairs that overlap, so hover is
//! tracked with a counter per target. A target is highlighted only while its
//! counter is positive, and entering a new target clears the previous one so
//! at most one target is ever highlighted.

use crate::domain::drag::{DragPayload, DropTarget};
use std::collections::HashMap;

/// State related to an ongoing drag gesture.
#[derive(Debug, Clone, Default)]
pub struct DragState {
    payload: Option<DragPayload>,
    hover_counts: HashMap<DropTarget, u32>,
    highlighted: Option<DropTarget>,
}

impl DragState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, payload: DragPayload) {
        self.reset();
        self.payload = Some(payload);
    }

    pub fn payload(&self) -> Option<&DragPayload> {
        self.payload.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.payload.is_some()
    }

    // ===== Hover Tracking =====

    pub fn enter(&mut self, target: DropTarget) {
        if self.highlighted.as_ref() != Some(&target) {
            if let Some(previous) = self.highlighted.take() {
                self.hover_counts.remove(&previous);
            }
        }
        *self.hover_counts.entry(target.clone()).or_insert(0) += 1;
        self.highlighted = Some(target);
    }

    pub fn leave(&mut self, target: &DropTarget) {
        let Some(count) = self.hover_counts.get_mut(target) else {
            return;
        };
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.hover_counts.remove(target);
            if self.highlighted.as_ref() == Some(target) {
                self.highlighted = None;
            }
        }
    }

    pub fn is_highlighted(&self, target: &DropTarget) -> bool {
        self.highlighted.as_ref() == Some(target)
            && self.hover_counts.get(target).is_some_and(|&c| c > 0)
    }

    pub fn highlighted(&self) -> Option<&DropTarget> {
        self.highlighted.as_ref()
    }

    /// Ends the gesture, returning the payload it carried.
    pub fn finish(&mut self) -> Option<DragPayload> {
        let payload = self.payload.take();
        self.reset();
        payload
    }

    fn reset(&mut self) {
        self.payload = None;
        self.hover_counts.clear();
        self.highlighted = None;
    }
}
