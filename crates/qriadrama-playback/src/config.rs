//! Playback configuration.

use std::time::Duration;

/// Delay between two revealed characters when nothing else is configured.
pub const DEFAULT_TYPING_SPEED: Duration = Duration::from_millis(50);

/// Shortest accepted delay between two revealed characters.
pub const MIN_TYPING_SPEED: Duration = Duration::from_millis(1);

/// Knobs read by the playback core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackConfig {
    typing_speed: Duration,
}

impl PlaybackConfig {
    /// Creates a configuration. Speeds below `MIN_TYPING_SPEED` are raised to it.
    #[must_use]
    pub fn new(typing_speed: Duration) -> Self {
        Self {
            typing_speed: typing_speed.max(MIN_TYPING_SPEED),
        }
    }

    /// Delay between two revealed characters.
    #[must_use]
    pub fn typing_speed(&self) -> Duration {
        self.typing_speed
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TYPING_SPEED)
    }
}
