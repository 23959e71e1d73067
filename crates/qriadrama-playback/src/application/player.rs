//! Async player: serialises advance requests and reveal ticks into one
//! session.
//!
//! Every input reaches the session through a single channel, so an advance
//! and a tick are never handled at the same time. Ticks come from
//! `TokioTickScheduler`, which runs one interval task per reveal and aborts
//! it when the reveal's handle is dropped.

use std::time::Duration;

use qriadrama_core::presenter::Presenter;
use qriadrama_core::schedule::TickScheduler;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, instrument};

use crate::domain::session::{ScriptSession, SessionSummary};

/// Input delivered to the player loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// The reader asked to advance.
    Advance,
    /// A reveal tick tagged with its generation.
    Tick(u64),
    /// Stop playback without finishing the script.
    Quit,
}

/// Sends reader input to a running player. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AdvanceHandle {
    tx: mpsc::UnboundedSender<PlayerInput>,
}

impl AdvanceHandle {
    /// Requests an advance. Returns `false` if the player has stopped.
    #[must_use]
    pub fn request_advance(&self) -> bool {
        self.tx.send(PlayerInput::Advance).is_ok()
    }

    /// Asks the player to stop. Returns `false` if it already has.
    #[must_use]
    pub fn quit(&self) -> bool {
        self.tx.send(PlayerInput::Quit).is_ok()
    }

    /// Whether the player has stopped reading input.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Schedules reveal ticks as tokio interval tasks feeding a player.
///
/// Holds only a weak sender: ticks never keep the input channel open, so the
/// player stops once every `AdvanceHandle` is gone.
#[derive(Debug, Clone)]
pub struct TokioTickScheduler {
    tx: mpsc::WeakUnboundedSender<PlayerInput>,
}

/// A running tick task. Aborted on drop.
#[derive(Debug)]
pub struct TickTask(JoinHandle<()>);

impl Drop for TickTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl TickScheduler for TokioTickScheduler {
    type Handle = TickTask;

    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    fn schedule(&mut self, period: Duration, generation: u64) -> TickTask {
        let tx = self.tx.clone();
        TickTask(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(sender) = tx.upgrade() else {
                    break;
                };
                if sender.send(PlayerInput::Tick(generation)).is_err() {
                    break;
                }
            }
        }))
    }
}

/// Drives one session from its input channel.
#[derive(Debug)]
pub struct Player {
    tx: mpsc::UnboundedSender<PlayerInput>,
    rx: mpsc::UnboundedReceiver<PlayerInput>,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// Creates a player with an empty input channel.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// A handle for sending reader input.
    #[must_use]
    pub fn handle(&self) -> AdvanceHandle {
        AdvanceHandle {
            tx: self.tx.clone(),
        }
    }

    /// A scheduler whose ticks are delivered to this player. Pass it to
    /// `ScriptSession::start`.
    #[must_use]
    pub fn scheduler(&self) -> TokioTickScheduler {
        TokioTickScheduler {
            tx: self.tx.downgrade(),
        }
    }

    /// Runs `session` until it finishes, a quit is requested, or every
    /// `AdvanceHandle` has been dropped, and returns its summary.
    #[instrument(skip_all, fields(session_id = %session.id()))]
    pub async fn run<P: Presenter>(
        self,
        mut session: ScriptSession<P, TokioTickScheduler>,
    ) -> SessionSummary {
        let Self { tx, mut rx } = self;
        drop(tx);

        while !session.is_finished() {
            match rx.recv().await {
                Some(PlayerInput::Advance) => session.request_advance(),
                Some(PlayerInput::Tick(generation)) => session.on_tick(generation),
                Some(PlayerInput::Quit) => {
                    info!(position = session.position(), "playback quit");
                    break;
                }
                None => {
                    debug!("input channel closed");
                    break;
                }
            }
        }
        session.summary()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use qriadrama_core::script::{DialogueLine, Script};
    use qriadrama_test_support::{FixedClock, PresenterEvent, RecordingPresenter};

    use super::*;
    use crate::config::PlaybackConfig;

    fn two_line_script() -> Script {
        Script::new(
            "Demo",
            vec![DialogueLine::new("A", "hi"), DialogueLine::new("B", "bye")],
            HashMap::new(),
        )
    }

    fn start(
        script: Script,
    ) -> (
        tokio::task::JoinHandle<SessionSummary>,
        AdvanceHandle,
        RecordingPresenter,
    ) {
        let player = Player::new();
        let presenter = RecordingPresenter::new();
        let session = ScriptSession::start(
            script,
            presenter.clone(),
            player.scheduler(),
            Arc::new(FixedClock::reference()),
            &PlaybackConfig::default(),
        );
        let handle = player.handle();
        (tokio::spawn(player.run(session)), handle, presenter)
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_reveal_line_then_advances_walk_to_the_end() {
        // Arrange
        let (task, handle, presenter) = start(two_line_script());

        // Act
        tokio::time::sleep(Duration::from_millis(200)).await;
        let after_first_reveal = presenter.revealed();
        assert!(handle.request_advance());
        settle().await;
        assert!(handle.request_advance());
        settle().await;
        assert!(handle.request_advance());
        let summary = task.await.unwrap();

        // Assert
        assert_eq!(after_first_reveal, vec!["h", "hi"]);
        assert_eq!(presenter.revealed(), vec!["h", "hi", "bye"]);
        assert_eq!(presenter.count(&PresenterEvent::LineFullyShown), 2);
        assert_eq!(presenter.count(&PresenterEvent::Finished), 1);
        assert_eq!(summary.lines_shown, 2);
        assert_eq!(summary.skipped_reveals, 1);
        assert!(summary.finished_at.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_ticks_land_after_force_complete() {
        // Arrange
        let script = Script::new(
            "Demo",
            vec![DialogueLine::new("A", "hello")],
            HashMap::new(),
        );
        let (task, handle, presenter) = start(script);
        tokio::time::sleep(Duration::from_millis(60)).await;

        // Act
        assert!(handle.request_advance());
        tokio::time::sleep(Duration::from_secs(1)).await;

        // Assert
        assert_eq!(presenter.revealed(), vec!["h", "hello"]);
        assert_eq!(presenter.count(&PresenterEvent::LineFullyShown), 1);
        assert!(handle.quit());
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_stops_before_finish() {
        // Arrange
        let (task, handle, presenter) = start(two_line_script());

        // Act
        assert!(handle.quit());
        let summary = task.await.unwrap();

        // Assert
        assert_eq!(summary.finished_at, None);
        assert_eq!(summary.lines_total, 2);
        assert_eq!(presenter.count(&PresenterEvent::Finished), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handle_reports_stopped_player() {
        // Arrange
        let (task, handle, _presenter) = start(two_line_script());
        assert!(handle.quit());
        task.await.unwrap();

        // Act
        let delivered = handle.request_advance();

        // Assert
        assert!(!delivered);
        assert!(handle.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_returns_when_every_handle_is_dropped() {
        // Arrange
        let script = Script::new(
            "Demo",
            vec![DialogueLine::new("A", ""), DialogueLine::new("B", "a long line")],
            HashMap::new(),
        );
        let (task, handle, presenter) = start(script);

        // Act
        drop(handle);
        let outcome = tokio::time::timeout(Duration::from_secs(3600), task).await;

        // Assert
        let summary = outcome
            .expect("player kept waiting without any input source")
            .unwrap();
        assert_eq!(summary.finished_at, None);
        assert_eq!(presenter.count(&PresenterEvent::Finished), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_returns_when_handle_drops_mid_reveal() {
        // Arrange
        let script = Script::new(
            "Demo",
            vec![DialogueLine::new("A", "hello")],
            HashMap::new(),
        );
        let (task, handle, presenter) = start(script);
        tokio::time::sleep(Duration::from_millis(60)).await;

        // Act
        drop(handle);
        let outcome = tokio::time::timeout(Duration::from_secs(3600), task).await;

        // Assert
        let summary = outcome.expect("ticks kept the player alive").unwrap();
        assert_eq!(summary.lines_shown, 0);
        assert_eq!(presenter.revealed().first().map(String::as_str), Some("h"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_script_returns_immediately() {
        // Arrange
        let script = Script::new("Blank", Vec::new(), HashMap::new());

        // Act
        let (task, _handle, presenter) = start(script);
        let summary = task.await.unwrap();

        // Assert
        assert_eq!(presenter.events(), vec![PresenterEvent::Finished]);
        assert_eq!(summary.lines_shown, 0);
    }
}
