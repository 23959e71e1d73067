//! Recording presenter — captures every call the playback core makes.

use std::sync::{Arc, Mutex};

use qriadrama_core::presenter::Presenter;
use qriadrama_core::style::RoleStyle;

/// One recorded presenter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterEvent {
    /// `on_line_changed`, with the style rendered as CSS.
    LineChanged {
        /// Speaker of the line.
        speaker: String,
        /// Revealed prefix.
        revealed: String,
        /// Style declarations.
        style: String,
    },
    /// `on_line_fully_shown`.
    LineFullyShown,
    /// `on_progress`.
    Progress {
        /// 1-based current line.
        current: usize,
        /// Total lines.
        total: usize,
    },
    /// `on_finished`.
    Finished,
}

/// A presenter that records calls into a shared log.
///
/// Clones share the log, so a test can hand one clone to the session and
/// inspect the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    events: Arc<Mutex<Vec<PresenterEvent>>>,
}

impl RecordingPresenter {
    /// Creates a presenter with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn events(&self) -> Vec<PresenterEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Returns the revealed prefixes passed to `on_line_changed`, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn revealed(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                PresenterEvent::LineChanged { revealed, .. } => Some(revealed.clone()),
                _ => None,
            })
            .collect()
    }

    /// Counts recorded calls equal to `event`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn count(&self, event: &PresenterEvent) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| *e == event)
            .count()
    }

    /// Forgets everything recorded so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    fn push(&self, event: PresenterEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl Presenter for RecordingPresenter {
    fn on_line_changed(&mut self, speaker: &str, revealed: &str, style: &RoleStyle) {
        self.push(PresenterEvent::LineChanged {
            speaker: speaker.to_owned(),
            revealed: revealed.to_owned(),
            style: style.to_string(),
        });
    }

    fn on_line_fully_shown(&mut self) {
        self.push(PresenterEvent::LineFullyShown);
    }

    fn on_progress(&mut self, current: usize, total: usize) {
        self.push(PresenterEvent::Progress { current, total });
    }

    fn on_finished(&mut self) {
        self.push(PresenterEvent::Finished);
    }
}
