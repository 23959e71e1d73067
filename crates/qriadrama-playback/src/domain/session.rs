//! Script session: sequence traversal and phase transitions.
//!
//! A session is created per script and never reused. Its only input is an
//! advance request (plus the reveal ticks its own engine asked for); its only
//! output is presenter calls.
//!
//! ```text
//! Idle --start reveal--> Revealing --reveal completes--> LineComplete
//! Revealing --advance--> LineComplete          (forced, same line)
//! LineComplete --advance, more lines--> Revealing (next line)
//! LineComplete --advance, no more lines--> Finished
//! Finished --advance--> Finished               (no-op)
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use qriadrama_core::clock::Clock;
use qriadrama_core::presenter::Presenter;
use qriadrama_core::schedule::TickScheduler;
use qriadrama_core::script::{DialogueLine, Script};
use tracing::{debug, info, instrument, trace, warn};
use uuid::Uuid;

use super::reveal::{RevealEngine, RevealStep};
use crate::config::PlaybackConfig;
use crate::error::PlaybackError;

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, no line started yet.
    Idle,
    /// The current line is being revealed.
    Revealing,
    /// The current line is fully shown; waiting for an advance.
    LineComplete,
    /// Every line has been acknowledged. Terminal.
    Finished,
}

/// Reading statistics for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    /// Session identifier, as recorded in logs.
    pub session_id: Uuid,
    /// Script title.
    pub title: String,
    /// Lines in the script.
    pub lines_total: usize,
    /// Lines that were fully shown.
    pub lines_shown: usize,
    /// Lines whose reveal was force-completed.
    pub skipped_reveals: usize,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    /// When the session finished, if it did.
    pub finished_at: Option<DateTime<Utc>>,
}

/// Runtime state of one script being read.
pub struct ScriptSession<P: Presenter, S: TickScheduler> {
    id: Uuid,
    script: Script,
    position: usize,
    phase: Phase,
    reveal: RevealEngine<S>,
    presenter: P,
    clock: Arc<dyn Clock>,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    lines_shown: usize,
    skipped_reveals: usize,
}

impl<P: Presenter, S: TickScheduler> ScriptSession<P, S> {
    /// Starts a session and begins revealing the first line.
    ///
    /// A script without lines finishes immediately: the presenter receives
    /// `on_finished` and nothing else.
    #[must_use]
    #[instrument(skip_all, fields(title = %script.title(), lines = script.len()))]
    pub fn start(
        script: Script,
        presenter: P,
        scheduler: S,
        clock: Arc<dyn Clock>,
        config: &PlaybackConfig,
    ) -> Self {
        let started_at = clock.now();
        let mut session = Self {
            id: Uuid::new_v4(),
            script,
            position: 0,
            phase: Phase::Idle,
            reveal: RevealEngine::new(scheduler, config.typing_speed()),
            presenter,
            clock,
            started_at,
            finished_at: None,
            lines_shown: 0,
            skipped_reveals: 0,
        };
        info!(session_id = %session.id, "session started");

        if session.script.is_empty() {
            let error = PlaybackError::EmptyScript(session.script.title().to_owned());
            warn!(session_id = %session.id, %error, "nothing to reveal");
            session.finish();
        } else {
            session.begin_line();
        }
        session
    }

    /// The single user-facing control.
    ///
    /// While a line is revealing, shows the rest of it at once. Once a line is
    /// fully shown, moves to the next line, or finishes after the last one.
    /// Does nothing once finished.
    #[instrument(
        skip_all,
        fields(session_id = %self.id, position = self.position, phase = ?self.phase)
    )]
    pub fn request_advance(&mut self) {
        match self.phase {
            Phase::Finished => {
                debug!("advance ignored, session finished");
            }
            Phase::Revealing => self.force_complete_line(),
            Phase::Idle | Phase::LineComplete => {
                self.position += 1;
                if self.position >= self.script.len() {
                    self.finish();
                } else {
                    self.begin_line();
                }
            }
        }
    }

    /// Delivers one reveal tick tagged `generation`.
    ///
    /// Ticks that do not belong to the line being revealed are ignored.
    pub fn on_tick(&mut self, generation: u64) {
        if self.phase != Phase::Revealing {
            trace!(generation, phase = ?self.phase, "tick outside reveal ignored");
            return;
        }
        let Some(line) = self.script.line(self.position) else {
            return;
        };
        let style = self.script.style_for(&line.speaker);

        let completed = match self.reveal.tick(generation) {
            RevealStep::Unchanged => false,
            RevealStep::Revealed(prefix) => {
                self.presenter.on_line_changed(&line.speaker, prefix, style);
                false
            }
            RevealStep::Completed(text) => {
                self.presenter.on_line_changed(&line.speaker, text, style);
                true
            }
        };
        if completed {
            self.complete_line();
        }
    }

    /// The line at the current position, or `None` once finished.
    #[must_use]
    pub fn current_line(&self) -> Option<&DialogueLine> {
        match self.phase {
            Phase::Finished => None,
            _ => self.script.line(self.position),
        }
    }

    /// `(current, total)` with a 1-based current line, or `None` once finished.
    #[must_use]
    pub fn progress(&self) -> Option<(usize, usize)> {
        match self.phase {
            Phase::Finished => None,
            _ => Some((self.position + 1, self.script.len())),
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the current line; equals the line count once finished.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether the session reached its terminal phase.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Session identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The script being read.
    #[must_use]
    pub fn script(&self) -> &Script {
        &self.script
    }

    /// The reveal engine, for inspecting reveal progress.
    #[must_use]
    pub fn reveal(&self) -> &RevealEngine<S> {
        &self.reveal
    }

    /// The presenter receiving this session's output.
    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Reading statistics so far.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.id,
            title: self.script.title().to_owned(),
            lines_total: self.script.len(),
            lines_shown: self.lines_shown,
            skipped_reveals: self.skipped_reveals,
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }

    fn begin_line(&mut self) {
        self.phase = Phase::Revealing;
        self.presenter.on_progress(self.position + 1, self.script.len());

        let Some(line) = self.script.line(self.position) else {
            return;
        };
        debug!(
            session_id = %self.id,
            position = self.position,
            speaker = %line.speaker,
            "line started"
        );
        let style = self.script.style_for(&line.speaker);

        let completed = match self.reveal.begin(&line.text) {
            RevealStep::Completed(text) => {
                self.presenter.on_line_changed(&line.speaker, text, style);
                true
            }
            RevealStep::Unchanged | RevealStep::Revealed(_) => false,
        };
        if completed {
            self.complete_line();
        }
    }

    fn force_complete_line(&mut self) {
        if let Some(line) = self.script.line(self.position) {
            let style = self.script.style_for(&line.speaker);
            if let Some(text) = self.reveal.force_complete() {
                self.presenter.on_line_changed(&line.speaker, text, style);
                self.skipped_reveals += 1;
            }
        }
        self.complete_line();
    }

    fn complete_line(&mut self) {
        self.phase = Phase::LineComplete;
        self.lines_shown += 1;
        self.presenter.on_line_fully_shown();
    }

    fn finish(&mut self) {
        self.reveal.cancel();
        self.position = self.script.len();
        self.phase = Phase::Finished;
        self.finished_at = Some(self.clock.now());
        info!(
            session_id = %self.id,
            lines_shown = self.lines_shown,
            skipped_reveals = self.skipped_reveals,
            "session finished"
        );
        self.presenter.on_finished();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use qriadrama_core::style::RoleStyle;
    use qriadrama_test_support::{
        FixedClock, ManualTickScheduler, PresenterEvent, RecordingPresenter,
    };

    use super::*;

    type TestSession = ScriptSession<RecordingPresenter, ManualTickScheduler>;

    fn script(lines: &[(&str, &str)]) -> Script {
        Script::new(
            "Demo",
            lines
                .iter()
                .map(|(speaker, text)| DialogueLine::new(*speaker, *text))
                .collect(),
            HashMap::new(),
        )
    }

    fn start(script: Script) -> (TestSession, RecordingPresenter, ManualTickScheduler) {
        let presenter = RecordingPresenter::new();
        let scheduler = ManualTickScheduler::new();
        let session = ScriptSession::start(
            script,
            presenter.clone(),
            scheduler.clone(),
            Arc::new(FixedClock::reference()),
            &PlaybackConfig::default(),
        );
        (session, presenter, scheduler)
    }

    /// Delivers ticks for the current reveal until it stops.
    fn tick_to_end(session: &mut TestSession) {
        while session.reveal().is_running() {
            let generation = session.reveal().generation();
            session.on_tick(generation);
        }
    }

    fn changed(speaker: &str, revealed: &str) -> PresenterEvent {
        PresenterEvent::LineChanged {
            speaker: speaker.to_owned(),
            revealed: revealed.to_owned(),
            style: RoleStyle::fallback().to_string(),
        }
    }

    fn progress(current: usize, total: usize) -> PresenterEvent {
        PresenterEvent::Progress { current, total }
    }

    #[test]
    fn test_start_begins_revealing_first_line() {
        // Arrange & Act
        let (session, presenter, scheduler) = start(script(&[("A", "hi"), ("B", "bye")]));

        // Assert
        assert_eq!(session.phase(), Phase::Revealing);
        assert_eq!(session.position(), 0);
        assert_eq!(session.current_line(), Some(&DialogueLine::new("A", "hi")));
        assert_eq!(session.progress(), Some((1, 2)));
        assert_eq!(presenter.events(), vec![progress(1, 2)]);
        assert_eq!(scheduler.active().len(), 1);
    }

    #[test]
    fn test_two_line_script_plays_to_finish() {
        // Arrange
        let (mut session, presenter, _scheduler) = start(script(&[("A", "hi"), ("B", "bye")]));

        // Act
        tick_to_end(&mut session);
        session.request_advance();
        tick_to_end(&mut session);
        session.request_advance();

        // Assert
        assert_eq!(
            presenter.events(),
            vec![
                progress(1, 2),
                changed("A", "h"),
                changed("A", "hi"),
                PresenterEvent::LineFullyShown,
                progress(2, 2),
                changed("B", "b"),
                changed("B", "by"),
                changed("B", "bye"),
                PresenterEvent::LineFullyShown,
                PresenterEvent::Finished,
            ]
        );
        assert!(session.is_finished());
        assert_eq!(session.position(), 2);
    }

    #[test]
    fn test_advance_mid_reveal_completes_line_without_moving() {
        // Arrange
        let (mut session, presenter, scheduler) = start(script(&[("A", "0123456789"), ("B", "x")]));
        let generation = session.reveal().generation();
        for _ in 0..3 {
            session.on_tick(generation);
        }
        assert_eq!(session.reveal().revealed_count(), 3);
        presenter.clear();

        // Act
        session.request_advance();

        // Assert
        assert_eq!(session.phase(), Phase::LineComplete);
        assert_eq!(session.position(), 0);
        assert_eq!(
            presenter.events(),
            vec![changed("A", "0123456789"), PresenterEvent::LineFullyShown]
        );
        assert!(scheduler.active().is_empty());
    }

    #[test]
    fn test_stale_tick_after_forced_completion_changes_nothing() {
        // Arrange
        let (mut session, presenter, _scheduler) = start(script(&[("A", "0123456789")]));
        let generation = session.reveal().generation();
        session.on_tick(generation);
        session.request_advance();
        presenter.clear();

        // Act
        session.on_tick(generation);
        session.on_tick(generation);

        // Assert
        assert!(presenter.events().is_empty());
        assert_eq!(session.phase(), Phase::LineComplete);
    }

    #[test]
    fn test_line_fully_shown_fires_once_per_line_regardless_of_interrupts() {
        // Arrange
        let (mut session, presenter, _scheduler) = start(script(&[("A", "abc"), ("B", "def")]));

        // Act: interrupt the first line, wait out the second.
        session.request_advance();
        session.request_advance();
        tick_to_end(&mut session);
        let generation = session.reveal().generation();
        session.on_tick(generation);

        // Assert
        assert_eq!(presenter.count(&PresenterEvent::LineFullyShown), 2);
    }

    #[test]
    fn test_worst_case_needs_two_advances_per_line() {
        // Arrange
        let lines = [("A", "one"), ("B", "two"), ("C", "three")];
        let (mut session, _presenter, _scheduler) = start(script(&lines));

        // Act
        let mut advances = 0;
        while !session.is_finished() {
            session.request_advance();
            advances += 1;
        }

        // Assert
        assert_eq!(advances, 2 * lines.len());
        assert_eq!(session.summary().skipped_reveals, lines.len());
    }

    #[test]
    fn test_patient_reader_needs_one_advance_per_line() {
        // Arrange
        let lines = [("A", "one"), ("B", "two"), ("C", "three")];
        let (mut session, _presenter, _scheduler) = start(script(&lines));

        // Act
        let mut advances = 0;
        while !session.is_finished() {
            tick_to_end(&mut session);
            session.request_advance();
            advances += 1;
        }

        // Assert
        assert_eq!(advances, lines.len());
        assert_eq!(session.summary().skipped_reveals, 0);
    }

    #[test]
    fn test_progress_after_third_transition_of_five() {
        // Arrange
        let lines = [("A", "1"), ("B", "2"), ("C", "3"), ("D", "4"), ("E", "5")];
        let (mut session, presenter, _scheduler) = start(script(&lines));

        // Act
        for _ in 0..2 {
            tick_to_end(&mut session);
            session.request_advance();
        }

        // Assert
        let reported: Vec<_> = presenter
            .events()
            .into_iter()
            .filter(|e| matches!(e, PresenterEvent::Progress { .. }))
            .collect();
        assert_eq!(reported.last(), Some(&progress(3, 5)));
        assert_eq!(session.progress(), Some((3, 5)));
    }

    #[test]
    fn test_advances_after_finish_are_ignored() {
        // Arrange
        let (mut session, presenter, _scheduler) = start(script(&[("A", "a")]));
        session.request_advance();
        session.request_advance();
        assert!(session.is_finished());
        let events_before = presenter.events();

        // Act
        for _ in 0..5 {
            session.request_advance();
        }
        session.on_tick(session.reveal().generation());

        // Assert
        assert_eq!(presenter.events(), events_before);
        assert_eq!(presenter.count(&PresenterEvent::Finished), 1);
        assert_eq!(session.phase(), Phase::Finished);
        assert_eq!(session.position(), 1);
        assert_eq!(session.current_line(), None);
        assert_eq!(session.progress(), None);
    }

    #[test]
    fn test_empty_script_finishes_immediately() {
        // Arrange & Act
        let (session, presenter, scheduler) = start(script(&[]));

        // Assert
        assert!(session.is_finished());
        assert_eq!(presenter.events(), vec![PresenterEvent::Finished]);
        assert!(scheduler.scheduled().is_empty());
        assert_eq!(session.current_line(), None);
    }

    #[test]
    fn test_empty_line_is_shown_at_once() {
        // Arrange & Act
        let (session, presenter, scheduler) = start(script(&[("A", ""), ("B", "b")]));

        // Assert
        assert_eq!(session.phase(), Phase::LineComplete);
        assert_eq!(
            presenter.events(),
            vec![
                progress(1, 2),
                changed("A", ""),
                PresenterEvent::LineFullyShown
            ]
        );
        assert!(scheduler.scheduled().is_empty());
    }

    #[test]
    fn test_next_line_schedules_fresh_ticks_after_cancelling_previous() {
        // Arrange
        let (mut session, _presenter, scheduler) = start(script(&[("A", "abc"), ("B", "def")]));
        let first = session.reveal().generation();

        // Act
        session.request_advance();
        session.request_advance();

        // Assert
        assert_eq!(scheduler.cancelled(), vec![first]);
        assert_eq!(scheduler.active(), vec![session.reveal().generation()]);
    }

    #[test]
    fn test_line_changed_carries_role_style() {
        // Arrange
        let mut roles = HashMap::new();
        roles.insert("A".to_owned(), RoleStyle::parse("color: #010203"));
        let script = Script::new("Styled", vec![DialogueLine::new("A", "x")], roles);

        // Act
        let (mut session, presenter, _scheduler) = start(script);
        tick_to_end(&mut session);

        // Assert
        assert!(presenter.events().contains(&PresenterEvent::LineChanged {
            speaker: "A".to_owned(),
            revealed: "x".to_owned(),
            style: "color: #010203".to_owned(),
        }));
    }

    #[test]
    fn test_summary_records_timestamps() {
        // Arrange
        let clock = FixedClock::reference();
        let (mut session, _presenter, _scheduler) = start(script(&[("A", "a")]));
        assert_eq!(session.summary().finished_at, None);

        // Act
        session.request_advance();
        session.request_advance();

        // Assert
        let summary = session.summary();
        assert_eq!(summary.title, "Demo");
        assert_eq!(summary.lines_total, 1);
        assert_eq!(summary.lines_shown, 1);
        assert_eq!(summary.started_at, clock.0);
        assert_eq!(summary.finished_at, Some(clock.0));
        assert_eq!(summary.session_id, session.id());
    }
}
