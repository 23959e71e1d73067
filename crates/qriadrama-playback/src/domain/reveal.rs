//! Reveal engine: timed, interruptible character-by-character disclosure of
//! one line.
//!
//! The engine owns *how* a line is revealed. It does not know about speakers,
//! positions or phases; the session decides *when* a line is revealed and
//! turns the engine's steps into presenter calls.
//!
//! A "character" is an extended grapheme cluster, so combining marks and
//! emoji are never split across two ticks.

use std::fmt;
use std::time::Duration;

use qriadrama_core::schedule::TickScheduler;
use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;

/// Outcome of driving the engine one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStep<'a> {
    /// Nothing visible changed: a reveal was scheduled, or a tick was stale.
    Unchanged,
    /// One more character is visible. Carries the revealed prefix.
    Revealed(&'a str),
    /// The last character is visible and the reveal has stopped. Carries the
    /// full text. Returned at most once per `begin`.
    Completed(&'a str),
}

/// Drives the reveal of one line at a time.
pub struct RevealEngine<S: TickScheduler> {
    scheduler: S,
    period: Duration,
    text: String,
    /// Byte offset just past each grapheme of `text`.
    boundaries: Vec<usize>,
    revealed: usize,
    generation: u64,
    ticker: Option<S::Handle>,
}

impl<S: TickScheduler> RevealEngine<S> {
    /// Creates an idle engine that reveals one character every `period`.
    #[must_use]
    pub fn new(scheduler: S, period: Duration) -> Self {
        Self {
            scheduler,
            period,
            text: String::new(),
            boundaries: Vec::new(),
            revealed: 0,
            generation: 0,
            ticker: None,
        }
    }

    /// Starts revealing `text` from its first character.
    ///
    /// Any reveal still running is cancelled first. Empty text completes
    /// immediately and schedules nothing.
    pub fn begin(&mut self, text: &str) -> RevealStep<'_> {
        self.cancel();
        self.generation = self.generation.wrapping_add(1);
        self.text = text.to_owned();
        self.boundaries = self
            .text
            .grapheme_indices(true)
            .map(|(offset, grapheme)| offset + grapheme.len())
            .collect();
        self.revealed = 0;

        if self.boundaries.is_empty() {
            return RevealStep::Completed("");
        }

        self.ticker = Some(self.scheduler.schedule(self.period, self.generation));
        trace!(
            generation = self.generation,
            total = self.boundaries.len(),
            "reveal scheduled"
        );
        RevealStep::Unchanged
    }

    /// Handles one tick of the reveal tagged `generation`.
    ///
    /// Ticks from an earlier `begin`, or arriving after the reveal stopped,
    /// are ignored.
    pub fn tick(&mut self, generation: u64) -> RevealStep<'_> {
        if generation != self.generation || !self.is_running() {
            trace!(
                generation,
                current = self.generation,
                "stale reveal tick ignored"
            );
            return RevealStep::Unchanged;
        }

        self.revealed += 1;
        if self.revealed < self.boundaries.len() {
            return RevealStep::Revealed(self.revealed_text());
        }

        self.cancel();
        RevealStep::Completed(&self.text)
    }

    /// Finishes the running reveal at once.
    ///
    /// Returns the full text if a reveal was running, `None` otherwise.
    /// Calling it again, or after the reveal completed on its own, has no
    /// effect.
    pub fn force_complete(&mut self) -> Option<&str> {
        if !self.is_running() {
            return None;
        }
        self.cancel();
        self.revealed = self.boundaries.len();
        trace!(generation = self.generation, "reveal force-completed");
        Some(&self.text)
    }

    /// Stops the scheduled ticks without touching what is revealed.
    pub fn cancel(&mut self) {
        // Dropping the handle cancels the tick stream.
        self.ticker = None;
    }

    /// Whether ticks are scheduled for the current text.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    /// Characters revealed so far.
    #[must_use]
    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    /// Characters in the current text.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.boundaries.len()
    }

    /// The revealed prefix of the current text.
    #[must_use]
    pub fn revealed_text(&self) -> &str {
        match self.revealed {
            0 => "",
            n => &self.text[..self.boundaries[n - 1]],
        }
    }

    /// Tag carried by ticks of the current reveal.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<S: TickScheduler> fmt::Debug for RevealEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevealEngine")
            .field("period", &self.period)
            .field("revealed", &self.revealed)
            .field("total", &self.boundaries.len())
            .field("generation", &self.generation)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
